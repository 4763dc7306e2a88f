//! Sequential run over the account list, followed by notification dispatch.

use anyhow::Result;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::Config;
use crate::login;
use crate::messengers::{MessengerManager, TelegramMessenger, WeComMessenger};
use crate::report::RunReport;

/// Build the notification channels the configuration enables.
pub fn build_messengers(config: &Config) -> MessengerManager {
    let mut manager = MessengerManager::new();

    match &config.telegram {
        Some(tg) => manager.add_messenger(Box::new(TelegramMessenger::new(
            tg.bot_token.clone(),
            tg.chat_id.clone(),
        ))),
        None => warn!("Telegram channel skipped: BOT_TOKEN or CHAT_ID not configured"),
    }

    match &config.wecom {
        Some(wc) => {
            manager.add_messenger(Box::new(WeComMessenger::new(wc.webhook_key.clone())))
        }
        None => warn!("WeCom channel skipped: WECOM_KEY not configured"),
    }

    manager
}

/// Log every account in sequence and collect the results.
pub async fn run_logins(config: &Config) -> RunReport {
    let total = config.accounts.len();
    info!(total, "accounts to process");

    let mut results = Vec::with_capacity(total);
    for (index, account) in config.accounts.iter().enumerate() {
        info!(
            position = index + 1,
            total,
            username = %account.username,
            "processing account"
        );
        results.push(login::login_account(config, account).await);

        if index + 1 < total {
            info!(
                delay_secs = config.account_delay.as_secs(),
                "waiting before next account"
            );
            sleep(config.account_delay).await;
        }
    }

    RunReport::new(results)
}

/// Full pipeline: logins, then report dispatch.
pub async fn run(config: &Config) -> Result<()> {
    let report = run_logins(config).await;
    info!(
        succeeded = report.succeeded(),
        total = report.total(),
        "run complete"
    );

    let mut manager = build_messengers(config);
    if manager.is_empty() {
        warn!("no notification channels configured, skipping dispatch");
        return Ok(());
    }

    manager.initialize_all().await;
    let delivered = manager.dispatch_report(&report).await;
    info!(delivered, "notification dispatch finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Cli;
    use crate::config::Config;

    fn config_from(cli: Cli) -> Config {
        Config::from_cli(&cli).unwrap()
    }

    fn base_cli() -> Cli {
        Cli {
            accounts: Some("a:1".to_string()),
            bot_token: None,
            chat_id: None,
            wecom_key: None,
            login_url: "https://www.netlib.re/".to_string(),
            timeout: 30,
            account_delay: 3,
            headful: false,
        }
    }

    #[test]
    fn no_credentials_means_no_channels() {
        let manager = build_messengers(&config_from(base_cli()));
        assert!(manager.is_empty());
    }

    #[test]
    fn each_configured_credential_adds_a_channel() {
        let mut cli = base_cli();
        cli.wecom_key = Some("key".to_string());
        let manager = build_messengers(&config_from(cli));
        assert_eq!(manager.len(), 1);

        let mut cli = base_cli();
        cli.bot_token = Some("123:abc".to_string());
        cli.chat_id = Some("42".to_string());
        cli.wecom_key = Some("key".to_string());
        let manager = build_messengers(&config_from(cli));
        assert_eq!(manager.len(), 2);
    }
}
