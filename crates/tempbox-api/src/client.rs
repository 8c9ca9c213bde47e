//! HTTP client for the mail API.

use std::future::Future;

use reqwest::{Client, Response};
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::{ErrorResponse, Inbox, InboxEnvelope, MessageEnvelope, MessageMetadata};

/// Read-only operations the inbox and message controllers depend on.
///
/// [`ApiClient`] is the HTTP implementation; tests substitute in-memory fakes.
pub trait MailApi: Send + Sync + 'static {
    /// Fetches an inbox and its message summaries by address.
    fn fetch_inbox(&self, address: &str) -> impl Future<Output = Result<Inbox>> + Send;

    /// Fetches message metadata, including the body URLs.
    fn fetch_message(&self, id: &str) -> impl Future<Output = Result<MessageMetadata>> + Send;

    /// Fetches a raw body from one of the URLs in [`MessageMetadata`].
    fn fetch_body(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP implementation of [`MailApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http_client: Client,
}

impl ApiClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            config,
        })
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Returns the URL an inbox lookup for `address` is sent to.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry path segments or
    /// `address` is empty or a dot segment.
    pub fn inbox_url(&self, address: &str) -> Result<Url> {
        let mut url = self.endpoint("inboxes", address)?;
        if let Some((key, value)) = self.config.inbox_lookup.query() {
            url.query_pairs_mut().append_pair(key, value);
        }
        Ok(url)
    }

    /// Returns the URL a message lookup for `id` is sent to.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry path segments or `id`
    /// is empty or a dot segment.
    pub fn message_url(&self, id: &str) -> Result<Url> {
        self.endpoint("messages", id)
    }

    /// Appends `collection/key` to the base path, percent-encoding `key`.
    ///
    /// Dot segments are refused: the URL parser would resolve them against
    /// the base path instead of encoding them.
    fn endpoint(&self, collection: &str, key: &str) -> Result<Url> {
        if matches!(key.trim(), "" | "." | "..") {
            return Err(Error::InvalidKey(key.to_string()));
        }
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                Error::InvalidConfig(format!(
                    "URL cannot be used as a base: {}",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .push(collection)
            .push(key);
        Ok(url)
    }

    /// Sends a GET and returns the body of a 2xx response.
    async fn get_text(&self, url: Url) -> Result<String> {
        debug!(%url, "GET");
        let response = self.http_client.get(url).send().await?;
        read_success(response).await
    }
}

impl MailApi for ApiClient {
    async fn fetch_inbox(&self, address: &str) -> Result<Inbox> {
        let body = self.get_text(self.inbox_url(address)?).await?;
        let envelope: InboxEnvelope = serde_json::from_str(&body)?;

        if envelope.success == Some(false) {
            return Err(Error::Rejected(envelope.error.unwrap_or_default()));
        }
        envelope.mail_inbox.ok_or(Error::MissingField("mail_inbox"))
    }

    async fn fetch_message(&self, id: &str) -> Result<MessageMetadata> {
        let body = self.get_text(self.message_url(id)?).await?;
        let envelope: MessageEnvelope = serde_json::from_str(&body)?;

        if envelope.success == Some(false) {
            return Err(Error::Rejected(envelope.error.unwrap_or_default()));
        }
        envelope
            .mail_message
            .ok_or(Error::MissingField("mail_message"))
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url).map_err(|source| Error::InvalidBodyUrl {
            url: url.to_string(),
            source,
        })?;
        self.get_text(parsed).await
    }
}

/// Returns the body of a 2xx response, or an [`Error::Status`] carrying the
/// server's error text.
async fn read_success(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or_default();
    Err(Error::Status {
        status: status.as_u16(),
        message,
    })
}
