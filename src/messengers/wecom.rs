//! WeCom (企业微信) group-robot webhook channel.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::Messenger;
use crate::report::RunReport;

const WEBHOOK_BASE: &str = "https://qyapi.weixin.qq.com/cgi-bin/webhook/send";

/// Outbound request timeout for webhook calls.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Message body format accepted by the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeComFormat {
    Text,
    #[default]
    Markdown,
}

/// WeCom messenger posting to a group-robot webhook.
pub struct WeComMessenger {
    name: String,
    webhook_key: String,
    format: WeComFormat,
    http: reqwest::Client,
}

impl WeComMessenger {
    pub fn new(webhook_key: String) -> Self {
        Self {
            name: "wecom".to_string(),
            webhook_key,
            format: WeComFormat::default(),
            http: reqwest::Client::new(),
        }
    }

    pub fn with_format(mut self, format: WeComFormat) -> Self {
        self.format = format;
        self
    }

    fn webhook_url(&self) -> String {
        format!("{WEBHOOK_BASE}?key={}", self.webhook_key)
    }

    /// Webhook payload for `content` in the configured format.
    fn payload(&self, content: &str) -> Value {
        match self.format {
            WeComFormat::Text => json!({
                "msgtype": "text",
                "text": { "content": content },
            }),
            WeComFormat::Markdown => json!({
                "msgtype": "markdown",
                "markdown": { "content": content },
            }),
        }
    }
}

#[async_trait]
impl Messenger for WeComMessenger {
    fn name(&self) -> &str {
        &self.name
    }

    fn messenger_type(&self) -> &str {
        "wecom"
    }

    async fn send_message(&self, content: &str) -> Result<String> {
        let resp = self
            .http
            .post(self.webhook_url())
            .timeout(SEND_TIMEOUT)
            .json(&self.payload(content))
            .send()
            .await?;

        if !resp.status().is_success() {
            anyhow::bail!("WeCom webhook returned {}", resp.status());
        }

        // The webhook answers 200 even on rejection; errcode carries the verdict
        let data: Value = resp.json().await?;
        if data["errcode"].as_i64() == Some(0) {
            return Ok(data["errmsg"].as_str().unwrap_or("ok").to_string());
        }
        anyhow::bail!(
            "WeCom webhook rejected the message: errcode={} errmsg={}",
            data["errcode"],
            data["errmsg"]
        )
    }

    async fn send_report(&self, report: &RunReport) -> Result<String> {
        let content = match self.format {
            WeComFormat::Markdown => report.render_markdown(),
            WeComFormat::Text => report.render_text(),
        };
        self.send_message(&content).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_url_embeds_the_key() {
        let messenger = WeComMessenger::new("abc-123".to_string());
        assert_eq!(
            messenger.webhook_url(),
            "https://qyapi.weixin.qq.com/cgi-bin/webhook/send?key=abc-123"
        );
    }

    #[test]
    fn markdown_payload_shape() {
        let messenger = WeComMessenger::new("k".to_string());
        let payload = messenger.payload("## hello");
        assert_eq!(payload["msgtype"], "markdown");
        assert_eq!(payload["markdown"]["content"], "## hello");
    }

    #[test]
    fn text_payload_shape() {
        let messenger = WeComMessenger::new("k".to_string()).with_format(WeComFormat::Text);
        let payload = messenger.payload("hello");
        assert_eq!(payload["msgtype"], "text");
        assert_eq!(payload["text"]["content"], "hello");
    }
}
