//! Telegram channel using the Bot API.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::Messenger;

/// Outbound request timeout for Bot API calls.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram messenger using bot API
pub struct TelegramMessenger {
    name: String,
    bot_token: String,
    chat_id: String,
    http: reqwest::Client,
}

impl TelegramMessenger {
    pub fn new(bot_token: String, chat_id: String) -> Self {
        Self {
            name: "telegram".to_string(),
            bot_token,
            chat_id,
            http: reqwest::Client::new(),
        }
    }

    fn api_url(&self, method: &str) -> String {
        format!("https://api.telegram.org/bot{}/{}", self.bot_token, method)
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    fn name(&self) -> &str {
        &self.name
    }

    fn messenger_type(&self) -> &str {
        "telegram"
    }

    async fn initialize(&mut self) -> Result<()> {
        // Verify the bot token with getMe
        let resp = self
            .http
            .get(self.api_url("getMe"))
            .timeout(SEND_TIMEOUT)
            .send()
            .await?;

        if resp.status().is_success() {
            let data: serde_json::Value = resp.json().await?;
            if data["ok"].as_bool() == Some(true) {
                return Ok(());
            }
        }
        anyhow::bail!("Telegram auth failed")
    }

    async fn send_message(&self, content: &str) -> Result<String> {
        // Plain text, no parse mode: usernames with `_` or `*` must survive
        let resp = self
            .http
            .post(self.api_url("sendMessage"))
            .timeout(SEND_TIMEOUT)
            .json(&serde_json::json!({
                "chat_id": self.chat_id,
                "text": content,
            }))
            .send()
            .await?;

        if resp.status().is_success() {
            let data: serde_json::Value = resp.json().await?;
            if data["ok"].as_bool() == Some(true) {
                return Ok(data["result"]["message_id"].to_string());
            }
        }
        anyhow::bail!("Telegram send failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_embeds_token_and_method() {
        let messenger = TelegramMessenger::new("123:abc".to_string(), "42".to_string());
        assert_eq!(
            messenger.api_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn messenger_identity() {
        let messenger = TelegramMessenger::new("t".to_string(), "c".to_string());
        assert_eq!(messenger.name(), "telegram");
        assert_eq!(messenger.messenger_type(), "telegram");
    }
}
