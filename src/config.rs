//! Runtime configuration assembled from CLI flags and environment variables.

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no accounts configured: set ACCOUNTS=\"user1:pass1,user2:pass2\"")]
    MissingAccounts,
    #[error("account list has no valid entries, expected `user1:pass1,user2:pass2`")]
    NoValidAccounts,
    #[error("invalid login URL `{url}`: {source}")]
    InvalidLoginUrl {
        url: String,
        source: url::ParseError,
    },
}

/// One username/password pair. Lives only for the duration of the run.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Account {
    // The password must never reach logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Telegram channel settings. Only valid as a complete pair.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// WeCom group-robot webhook settings.
#[derive(Debug, Clone)]
pub struct WeComConfig {
    pub webhook_key: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub accounts: Vec<Account>,
    pub telegram: Option<TelegramConfig>,
    pub wecom: Option<WeComConfig>,
    pub login_url: Url,
    pub step_timeout: Duration,
    pub account_delay: Duration,
    pub headful: bool,
}

impl Config {
    /// Validate the CLI input and build the runtime configuration.
    ///
    /// An absent or unparseable account list is a misconfiguration and
    /// fails the whole run. Absent notification credentials are not: the
    /// affected channel is simply skipped later.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let raw = cli.accounts.as_deref().ok_or(ConfigError::MissingAccounts)?;
        let accounts = parse_accounts(raw);
        if accounts.is_empty() {
            return Err(ConfigError::NoValidAccounts);
        }

        let login_url =
            Url::parse(&cli.login_url).map_err(|source| ConfigError::InvalidLoginUrl {
                url: cli.login_url.clone(),
                source,
            })?;

        let telegram = match (&cli.bot_token, &cli.chat_id) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig {
                bot_token: bot_token.clone(),
                chat_id: chat_id.clone(),
            }),
            _ => None,
        };

        let wecom = cli
            .wecom_key
            .clone()
            .map(|webhook_key| WeComConfig { webhook_key });

        Ok(Self {
            accounts,
            telegram,
            wecom,
            login_url,
            step_timeout: Duration::from_secs(cli.timeout),
            account_delay: Duration::from_secs(cli.account_delay),
            headful: cli.headful,
        })
    }
}

/// Split a delimited account list into credentials.
///
/// Entries are separated by `,` or `;`. Each entry splits on its first `:`
/// so passwords may themselves contain colons. Whitespace around either
/// field is trimmed, and entries missing a field are dropped.
pub fn parse_accounts(raw: &str) -> Vec<Account> {
    raw.split([',', ';'])
        .filter_map(|entry| {
            let (username, password) = entry.split_once(':')?;
            let username = username.trim();
            let password = password.trim();
            if username.is_empty() || password.is_empty() {
                return None;
            }
            Some(Account {
                username: username.to_string(),
                password: password.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_accounts(accounts: Option<&str>) -> Cli {
        Cli {
            accounts: accounts.map(String::from),
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
    fn parses_comma_separated_accounts() {
        let accounts = parse_accounts("a:1,b:2");
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].username, "a");
        assert_eq!(accounts[0].password, "1");
        assert_eq!(accounts[1].username, "b");
        assert_eq!(accounts[1].password, "2");
    }

    #[test]
    fn semicolons_separate_entries_too() {
        let accounts = parse_accounts("a:1;b:2,c:3");
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[2].username, "c");
    }

    #[test]
    fn whitespace_is_trimmed() {
        let accounts = parse_accounts(" a : 1 , b:2 ");
        assert_eq!(accounts[0].username, "a");
        assert_eq!(accounts[0].password, "1");
    }

    #[test]
    fn password_keeps_embedded_colons() {
        let accounts = parse_accounts("a:p:a:ss");
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].password, "p:a:ss");
    }

    #[test]
    fn incomplete_entries_are_dropped() {
        assert!(parse_accounts("no-colon").is_empty());
        assert!(parse_accounts(":only-pass").is_empty());
        assert!(parse_accounts("only-user:").is_empty());
        assert!(parse_accounts(",;,").is_empty());

        let accounts = parse_accounts("bad,a:1,:x");
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "a");
    }

    #[test]
    fn missing_accounts_is_a_config_error() {
        let err = Config::from_cli(&cli_with_accounts(None)).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAccounts));
    }

    #[test]
    fn unparseable_accounts_is_a_config_error() {
        let err = Config::from_cli(&cli_with_accounts(Some("garbage"))).unwrap_err();
        assert!(matches!(err, ConfigError::NoValidAccounts));
    }

    #[test]
    fn telegram_requires_both_token_and_chat_id() {
        let mut cli = cli_with_accounts(Some("a:1"));
        cli.bot_token = Some("123:abc".to_string());
        let config = Config::from_cli(&cli).unwrap();
        assert!(config.telegram.is_none());

        cli.chat_id = Some("42".to_string());
        let config = Config::from_cli(&cli).unwrap();
        assert!(config.telegram.is_some());
    }

    #[test]
    fn debug_output_redacts_passwords() {
        let account = Account {
            username: "a".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{account:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("redacted"));
    }
}
