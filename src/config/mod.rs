//! Configuration handling for newsdesk.
//!
//! Everything is read from environment variables with defaults that point at
//! the public endpoints, so the binaries run with no setup at all.
//! `Config::from_env` validates what it reads and reports the first bad value.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use url::Url;

pub const ENV_FEED_URL: &str = "NEWSDESK_FEED_URL";
pub const ENV_FALLBACK_FEED_URL: &str = "NEWSDESK_FALLBACK_FEED_URL";
pub const ENV_PROXY_URL: &str = "NEWSDESK_PROXY_URL";
pub const ENV_DISCUSSION_URL: &str = "NEWSDESK_DISCUSSION_URL";
pub const ENV_PREVIEW_DEADLINE_MS: &str = "NEWSDESK_PREVIEW_DEADLINE_MS";
pub const ENV_POLL_INTERVAL_SECS: &str = "NEWSDESK_POLL_INTERVAL_SECS";
pub const ENV_LOG_FORMAT: &str = "NEWSDESK_LOG_FORMAT";

const DEFAULT_FEED_URL: &str = "https://www.reddit.com/r/worldnews/new.json?limit=25";
const DEFAULT_FALLBACK_FEED_URL: &str = "https://jsonplaceholder.typicode.com/posts?_limit=25";
const DEFAULT_PROXY_URL: &str = "https://r.jina.ai";
const DEFAULT_DISCUSSION_URL: &str = "https://www.reddit.com";
const DEFAULT_PREVIEW_DEADLINE_MS: u64 = 6000;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    feed_url: String,
    fallback_feed_url: String,
    proxy_url: String,
    discussion_url: String,
    preview_deadline: Duration,
    poll_interval: Duration,
    log_format: LogFormat,
}

impl Config {
    /// Point every endpoint somewhere explicit; timings keep their defaults.
    pub fn new(
        feed_url: impl Into<String>,
        fallback_feed_url: impl Into<String>,
        proxy_url: impl Into<String>,
        discussion_url: impl Into<String>,
    ) -> Self {
        Self {
            feed_url: feed_url.into(),
            fallback_feed_url: fallback_feed_url.into(),
            proxy_url: trim_base(proxy_url.into()),
            discussion_url: trim_base(discussion_url.into()),
            preview_deadline: Duration::from_millis(DEFAULT_PREVIEW_DEADLINE_MS),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            log_format: LogFormat::Pretty,
        }
    }

    pub fn with_preview_deadline(mut self, deadline: Duration) -> Self {
        self.preview_deadline = deadline;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let feed_url = http_url_var(ENV_FEED_URL, DEFAULT_FEED_URL)?;
        let fallback_feed_url = http_url_var(ENV_FALLBACK_FEED_URL, DEFAULT_FALLBACK_FEED_URL)?;
        let proxy_url = http_url_var(ENV_PROXY_URL, DEFAULT_PROXY_URL)?;
        let discussion_url = http_url_var(ENV_DISCUSSION_URL, DEFAULT_DISCUSSION_URL)?;

        let deadline_ms = positive_var(ENV_PREVIEW_DEADLINE_MS, DEFAULT_PREVIEW_DEADLINE_MS)?;
        let poll_secs = positive_var(ENV_POLL_INTERVAL_SECS, DEFAULT_POLL_INTERVAL_SECS)?;

        let log_format = match env::var(ENV_LOG_FORMAT) {
            Ok(raw) => raw
                .parse()
                .map_err(|reason| ConfigError::InvalidValue {
                    field: ENV_LOG_FORMAT,
                    reason,
                })?,
            Err(_) => LogFormat::Pretty,
        };

        Ok(Self::new(feed_url, fallback_feed_url, proxy_url, discussion_url)
            .with_preview_deadline(Duration::from_millis(deadline_ms))
            .with_poll_interval(Duration::from_secs(poll_secs))
            .with_log_format(log_format))
    }

    fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Live listing of social news submissions.
    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }
    /// Placeholder posts API used when the live listing is unavailable.
    pub fn fallback_feed_url(&self) -> &str {
        &self.fallback_feed_url
    }
    /// Text-extraction proxy base, without trailing slash.
    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }
    /// Discussion-thread API base, without trailing slash.
    pub fn discussion_url(&self) -> &str {
        &self.discussion_url
    }
    pub fn preview_deadline(&self) -> Duration {
        self.preview_deadline
    }
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Defaults (mirrors `from_env` with no env overrides).
    pub fn default() -> Self {
        Self::new(
            DEFAULT_FEED_URL,
            DEFAULT_FALLBACK_FEED_URL,
            DEFAULT_PROXY_URL,
            DEFAULT_DISCUSSION_URL,
        )
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn http_url_var(field: &'static str, default: &str) -> Result<String, ConfigError> {
    let raw = env::var(field).unwrap_or_else(|_| default.to_string());
    let parsed = Url::parse(&raw).map_err(|e| ConfigError::InvalidValue {
        field,
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            field,
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    Ok(raw)
}

fn positive_var(field: &'static str, default: u64) -> Result<u64, ConfigError> {
    let Ok(raw) = env::var(field) else {
        return Ok(default);
    };
    let value: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field,
        reason: format!("'{raw}' is not a whole number"),
    })?;
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
