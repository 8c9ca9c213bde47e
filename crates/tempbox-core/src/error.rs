//! Error types for the core library.

use chrono::{DateTime, Utc};
use tempbox_api::FailureKind;
use thiserror::Error;

/// Errors that can occur in core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// API request failed.
    #[error("API error: {0}")]
    Api(#[from] tempbox_api::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classifies the error for status display.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Api(e) => e.kind(),
            Self::Config(_) => FailureKind::Malformed,
        }
    }
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// A failed fetch, recorded by a controller instead of being propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    /// Failure class.
    pub kind: FailureKind,
    /// Error text.
    pub message: String,
    /// When the failure was recorded.
    pub at: DateTime<Utc>,
}

impl FetchFailure {
    /// Records `error` as of now.
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            at: Utc::now(),
        }
    }
}
