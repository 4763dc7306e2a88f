//! Per-account results and the aggregate run report.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one login attempt.
///
/// Invariant: the message always reflects the success flag, so the report
/// can be assembled from messages alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResult {
    pub username: String,
    pub success: bool,
    pub message: String,
}

impl LoginResult {
    pub fn succeeded(username: &str) -> Self {
        Self {
            username: username.to_string(),
            success: true,
            message: format!("✅ {username} logged in"),
        }
    }

    pub fn failed(username: &str, reason: &str) -> Self {
        Self {
            username: username.to_string(),
            success: false,
            message: format!("❌ {username}: {reason}"),
        }
    }
}

// The notification audience reads Beijing time
const CST_OFFSET_SECS: i32 = 8 * 3600;

/// Aggregate over one run; knows its counts and renders the notification
/// payloads. Dropped once the notifications are out.
#[derive(Debug, Clone)]
pub struct RunReport {
    results: Vec<LoginResult>,
    finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn new(results: Vec<LoginResult>) -> Self {
        Self::at(results, Utc::now())
    }

    /// Report with an explicit timestamp; `new` uses the current time.
    pub fn at(results: Vec<LoginResult>, finished_at: DateTime<Utc>) -> Self {
        Self {
            results,
            finished_at,
        }
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn results(&self) -> &[LoginResult] {
        &self.results
    }

    fn timestamp_cst(&self) -> String {
        // +08:00 is always a valid offset
        let cst = FixedOffset::east_opt(CST_OFFSET_SECS).unwrap();
        self.finished_at
            .with_timezone(&cst)
            .format("%Y-%m-%d %H:%M:%S CST")
            .to_string()
    }

    fn summary_block(&self) -> String {
        let mut block = format!(
            "📊 Login summary: {}/{} accounts succeeded\n\n",
            self.succeeded(),
            self.total()
        );
        for result in &self.results {
            block.push_str(&result.message);
            block.push('\n');
        }
        block
    }

    /// Plain-text rendering, used for Telegram.
    pub fn render_text(&self) -> String {
        format!(
            "🎉 Netlib login report\n\nRun time: {}\n\n{}",
            self.timestamp_cst(),
            self.summary_block()
        )
    }

    /// Markdown rendering, used for the WeCom webhook.
    pub fn render_markdown(&self) -> String {
        format!(
            "## 🎉 Netlib login report\n\n> Run time: {}\n\n{}\n\n---\n> ☁️ netkeeper automated login service",
            self.timestamp_cst(),
            self.summary_block().trim_end()
        )
    }
}
