//! # tempbox-api
//!
//! Read-only HTTP client for the tempbox disposable-email API.
//!
//! ## Endpoints
//!
//! - `GET {base}/inboxes/{address}` returns `{"mail_inbox": {...}}`
//! - `GET {base}/messages/{id}` returns `{"mail_message": {...}}` whose
//!   `text_url` and `html_url` point at the raw bodies
//!
//! ## Quick Start
//!
//! ```ignore
//! use tempbox_api::{ApiClient, ApiConfig, MailApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::new("https://api.example.com/mails/example.com")?;
//!     let client = ApiClient::new(config)?;
//!
//!     let inbox = client.fetch_inbox("abc").await?;
//!     for message in &inbox.messages {
//!         println!("{}: {}", message.id, message.subject);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Every error maps onto a [`FailureKind`] (`NotFound`, `Transient`,
//! `Malformed`) so callers can decide how to degrade.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
pub mod types;

pub use client::{ApiClient, MailApi};
pub use config::{ApiConfig, ApiConfigBuilder, InboxLookup};
pub use error::{Error, FailureKind, Result};
pub use types::{
    FileRef, FileRole, Inbox, MessageMetadata, MessageSummary, Relation, RelationType,
};
