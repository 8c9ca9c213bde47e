//! Client configuration types.

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

/// How an inbox lookup treats addresses the server does not know yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InboxLookup {
    /// Plain lookup. Unknown addresses come back as not found.
    #[default]
    Strict,
    /// Sends `create=1` so the server creates missing inboxes on first lookup.
    AutoCreate,
}

impl InboxLookup {
    /// Returns the query pair appended to inbox requests, if any.
    #[must_use]
    pub const fn query(self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Strict => None,
            Self::AutoCreate => Some(("create", "1")),
        }
    }
}

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL that `inboxes/` and `messages/` are resolved against.
    pub base_url: Url,
    /// Inbox lookup behaviour.
    pub inbox_lookup: InboxLookup,
    /// Per-request timeout. `None` lets a hung request wait forever.
    pub request_timeout: Option<Duration>,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl ApiConfig {
    /// Default per-request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration with strict lookup and the default timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot carry path segments.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder(base_url: impl AsRef<str>) -> ApiConfigBuilder {
        ApiConfigBuilder::new(base_url)
    }
}

/// Builder for [`ApiConfig`].
#[derive(Debug, Clone)]
pub struct ApiConfigBuilder {
    base_url: String,
    inbox_lookup: InboxLookup,
    request_timeout: Option<Duration>,
    user_agent: String,
}

impl ApiConfigBuilder {
    /// Creates a new builder for the given base URL.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: base_url.as_ref().trim().to_string(),
            inbox_lookup: InboxLookup::Strict,
            request_timeout: Some(ApiConfig::DEFAULT_TIMEOUT),
            user_agent: concat!("tempbox/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Sets the inbox lookup behaviour.
    #[must_use]
    pub const fn inbox_lookup(mut self, lookup: InboxLookup) -> Self {
        self.inbox_lookup = lookup;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Disables the per-request timeout.
    #[must_use]
    pub const fn no_timeout(mut self) -> Self {
        self.request_timeout = None;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is empty, unparseable, not http(s), or
    /// if the timeout is zero.
    pub fn build(self) -> Result<ApiConfig> {
        if self.base_url.is_empty() {
            return Err(Error::InvalidConfig("base URL is empty".into()));
        }

        let base_url = Url::parse(&self.base_url)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidConfig(format!(
                "unsupported URL scheme: {}",
                base_url.scheme()
            )));
        }
        if base_url.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!(
                "URL cannot be used as a base: {base_url}"
            )));
        }
        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::InvalidConfig("request timeout must be non-zero".into()));
        }

        Ok(ApiConfig {
            base_url,
            inbox_lookup: self.inbox_lookup,
            request_timeout: self.request_timeout,
            user_agent: self.user_agent,
        })
    }
}
