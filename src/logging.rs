//! Structured logging setup.
//!
//! `tracing` with an `EnvFilter`; level and format come from the
//! environment:
//!
//! - `NETKEEPER_LOG` or `RUST_LOG`: filter directive (default `netkeeper=info,warn`)
//! - `NETKEEPER_LOG_FORMAT`: `pretty` (default), `compact`, or `json`

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_FILTER: &str = "netkeeper=info,warn";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-line
    #[default]
    Pretty,
    /// Single-line output
    Compact,
    /// JSON for log aggregation
    Json,
}

impl LogFormat {
    /// Parse from string (case-insensitive); unknown values fall back to pretty.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(filter: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(env_filter);

    let _ = match format {
        LogFormat::Json => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().json()))
        }
        LogFormat::Compact => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().compact()))
        }
        LogFormat::Pretty => {
            tracing::subscriber::set_global_default(registry.with(fmt::layer().pretty()))
        }
    };
}

/// Initialize from `NETKEEPER_LOG`/`RUST_LOG` and `NETKEEPER_LOG_FORMAT`.
pub fn init_from_env() {
    let filter = std::env::var("NETKEEPER_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let format = std::env::var("NETKEEPER_LOG_FORMAT")
        .map(|s| LogFormat::parse(&s))
        .unwrap_or_default();
    init(&filter, format);
}
