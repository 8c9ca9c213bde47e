//! Error types for API operations.

use std::fmt;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport error (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server answered with a non-success status code.
    #[error("HTTP status {status}: {message}")]
    Status {
        /// Status code returned by the server.
        status: u16,
        /// Error text from the response body, if any.
        message: String,
    },

    /// Server answered 2xx but flagged the request as unsuccessful.
    #[error("Request rejected by server: {0}")]
    Rejected(String),

    /// Response body is missing a required field.
    #[error("Response is missing field `{0}`")]
    MissingField(&'static str),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Address or message id that cannot name a single path segment.
    #[error("Invalid lookup key: {0:?}")]
    InvalidKey(String),

    /// Body URL taken from message metadata does not parse.
    #[error("Invalid body URL {url:?}: {source}")]
    InvalidBodyUrl {
        /// URL as sent by the server.
        url: String,
        /// Parse failure.
        source: url::ParseError,
    },

    /// URL parsing error.
    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),
}

/// Coarse classification of a failed fetch.
///
/// Controllers collapse every kind into "no current value"; the kind is kept
/// for logging and status display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Resource absent, or the server response was ambiguous.
    NotFound,
    /// Network failure, timeout or server-side error. Worth re-attempting.
    Transient,
    /// Payload did not have the expected shape.
    Malformed,
}

impl FailureKind {
    /// Returns true if re-issuing the same request may succeed.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Transient)
    }

    /// Returns a short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not-found",
            Self::Transient => "transient",
            Self::Malformed => "malformed",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classifies the error into a [`FailureKind`].
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Http(e) => {
                if e.is_decode() {
                    FailureKind::Malformed
                } else if let Some(status) = e.status() {
                    kind_for_status(status.as_u16())
                } else {
                    FailureKind::Transient
                }
            }
            Self::Status { status, .. } => kind_for_status(*status),
            Self::Json(_) | Self::MissingField(_) | Self::InvalidBodyUrl { .. } => {
                FailureKind::Malformed
            }
            Self::Rejected(_) | Self::InvalidConfig(_) | Self::InvalidKey(_) | Self::UrlError(_) => {
                FailureKind::NotFound
            }
        }
    }
}

/// 5xx, 408 and 429 are worth retrying; any other non-success is treated as absent.
const fn kind_for_status(status: u16) -> FailureKind {
    match status {
        408 | 429 | 500..=599 => FailureKind::Transient,
        _ => FailureKind::NotFound,
    }
}
