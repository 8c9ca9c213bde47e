//! View models published by the controllers.

use tempbox_api::{FileRef, MessageMetadata, Relation};

pub use tempbox_api::{Inbox, MessageSummary};

/// A fully assembled message: metadata plus both bodies.
///
/// Only ever constructed once all three fetches have succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Message id.
    pub id: String,
    /// Subject line.
    pub subject: String,
    /// Recipient relations, in server order.
    pub relations: Vec<Relation>,
    /// Attached and embedded files, in server order.
    pub files: Vec<FileRef>,
    /// Plain-text body.
    pub text: String,
    /// HTML body.
    pub html: String,
}

impl Message {
    /// Merges metadata with the two fetched bodies.
    #[must_use]
    pub fn assemble(metadata: MessageMetadata, text: String, html: String) -> Self {
        Self {
            id: metadata.id,
            subject: metadata.subject,
            relations: metadata.relations,
            files: metadata.files,
            text,
            html,
        }
    }

    /// Returns true if the plain-text body has visible content.
    #[must_use]
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}
