use clap::Parser;

// Every flag can also come from the environment, which is how the tool is
// driven under CI schedulers:
//   ACCOUNTS="user1:pass1,user2:pass2"   the only required setting
//   BOT_TOKEN / CHAT_ID                  Telegram channel (optional as a pair)
//   WECOM_KEY                            WeCom group-robot key (optional)
#[derive(Debug, Parser)]
#[command(
    name = "netkeeper",
    version,
    about = "Logs into netlib.re for each configured account and reports the results over Telegram and WeCom"
)]
pub struct Cli {
    /// Account list, formatted `user1:pass1,user2:pass2` (`;` also separates entries)
    #[arg(long, value_name = "LIST", env = "ACCOUNTS", hide_env_values = true)]
    pub accounts: Option<String>,

    /// Telegram bot token
    #[arg(long, value_name = "TOKEN", env = "BOT_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    /// Telegram chat id the report is sent to
    #[arg(long, value_name = "ID", env = "CHAT_ID")]
    pub chat_id: Option<String>,

    /// WeCom group webhook key
    #[arg(long, value_name = "KEY", env = "WECOM_KEY", hide_env_values = true)]
    pub wecom_key: Option<String>,

    /// Login page URL
    #[arg(
        long,
        value_name = "URL",
        env = "NETKEEPER_LOGIN_URL",
        default_value = "https://www.netlib.re/"
    )]
    pub login_url: String,

    /// Per-step browser timeout in seconds
    #[arg(long, value_name = "SECS", env = "NETKEEPER_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Pause between accounts in seconds
    #[arg(
        long,
        value_name = "SECS",
        env = "NETKEEPER_ACCOUNT_DELAY",
        default_value_t = 3
    )]
    pub account_delay: u64,

    /// Run Chrome with a visible window instead of headless
    #[arg(long)]
    pub headful: bool,
}
