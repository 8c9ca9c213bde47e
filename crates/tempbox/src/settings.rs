//! Persistent client settings.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tempbox_api::{ApiConfig, InboxLookup};
use tempbox_core::{MIN_POLL_INTERVAL, RetryPolicy};

/// Default API base, including the mail host segment.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/mails/localhost";

/// Client settings that persist across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API base URL, e.g. `https://api.example.com/mails/example.com`.
    pub api_url: String,
    /// Ask the server to create inboxes that do not exist yet.
    pub auto_create_inboxes: bool,
    /// Inbox refresh period in milliseconds.
    pub poll_interval_ms: u64,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Attempts per message body fetch, including the first.
    pub body_fetch_attempts: u32,
    /// Backoff before the second body fetch attempt, in milliseconds.
    pub body_fetch_backoff_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auto_create_inboxes: false,
            poll_interval_ms: 5000,
            request_timeout_secs: 30,
            body_fetch_attempts: 1,
            body_fetch_backoff_ms: 250,
        }
    }
}

/// Values given on the command line (or through the environment).
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub auto_create: bool,
    pub poll_interval_ms: Option<u64>,
}

impl Settings {
    /// Applies command-line overrides on top of the file values.
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if overrides.auto_create {
            self.auto_create_inboxes = true;
        }
        if let Some(ms) = overrides.poll_interval_ms {
            self.poll_interval_ms = ms;
        }
    }

    /// Checks that the settings describe a usable client.
    pub fn validate(&self) -> tempbox_core::Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(config_error("api_url must not be empty"));
        }
        if self.poll_interval() < MIN_POLL_INTERVAL {
            return Err(config_error(format!(
                "poll_interval_ms must be at least {}",
                MIN_POLL_INTERVAL.as_millis()
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(config_error("request_timeout_secs must be greater than 0"));
        }
        if self.body_fetch_attempts == 0 {
            return Err(config_error("body_fetch_attempts must be greater than 0"));
        }
        self.api_config()
            .map_err(|e| config_error(format!("api_url: {e}")))?;
        Ok(())
    }

    /// Builds the HTTP client configuration.
    pub fn api_config(&self) -> tempbox_api::Result<ApiConfig> {
        let lookup = if self.auto_create_inboxes {
            InboxLookup::AutoCreate
        } else {
            InboxLookup::Strict
        };

        ApiConfig::builder(self.api_url.trim())
            .inbox_lookup(lookup)
            .request_timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn body_retry(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.body_fetch_attempts,
            Duration::from_millis(self.body_fetch_backoff_ms),
        )
    }
}

fn config_error(message: impl Into<String>) -> tempbox_core::Error {
    tempbox_core::Error::Config(message.into())
}

/// Default settings file location.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tempbox")
        .join("settings.json")
}

/// Load settings from `path`, falling back to defaults if the file is absent.
pub async fn load(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        tracing::debug!("No settings file at {:?}, using defaults", path);
        return Ok(Settings::default());
    }

    let contents = tokio::fs::read_to_string(path).await?;
    let settings = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("invalid settings file {}: {e}", path.display()))?;

    tracing::debug!("Settings loaded from {:?}", path);
    Ok(settings)
}
