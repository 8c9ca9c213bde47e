//! Wire types returned by the API.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// A mailbox and its messages, newest first as the server orders them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Inbox {
    /// Full address, e.g. `abc@example.com`.
    pub address: String,
    /// Display name set when the inbox was created.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Message summaries.
    #[serde(
        rename = "mail_messages",
        default,
        deserialize_with = "null_as_default"
    )]
    pub messages: Vec<MessageSummary>,
}

impl Inbox {
    /// Returns true if the inbox holds no messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Enough of a message to render an inbox list entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageSummary {
    /// Message id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Subject line.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    /// Plain-text body, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// HTML body, when the server includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl MessageSummary {
    /// Preview text: the plain-text body, or the HTML body when text is empty.
    #[must_use]
    pub fn preview(&self) -> Option<&str> {
        non_empty(self.text.as_deref()).or_else(|| non_empty(self.html.as_deref()))
    }
}

/// Message detail as returned by `GET messages/{id}`.
///
/// The bodies are not inlined; they live behind `text_url` and `html_url`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageMetadata {
    /// Message id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Subject line.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,
    /// Recipient relations.
    #[serde(
        rename = "mail_message_relations",
        default,
        deserialize_with = "null_as_default"
    )]
    pub relations: Vec<Relation>,
    /// Attached and embedded files.
    #[serde(
        rename = "mail_message_files",
        default,
        deserialize_with = "null_as_default"
    )]
    pub files: Vec<FileRef>,
    /// Signed URL of the plain-text body.
    pub text_url: String,
    /// Signed URL of the HTML body.
    pub html_url: String,
}

/// A recipient of a message, tagged with its role.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Relation {
    /// Relation id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Role of the recipient.
    #[serde(rename = "type")]
    pub kind: RelationType,
    /// Display name, possibly empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub display_name: String,
    /// Mail address.
    pub address: String,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "<{}>", self.address)
        } else {
            write!(f, "{} <{}>", self.display_name, self.address)
        }
    }
}

/// Recipient role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    /// Primary recipient.
    To,
    /// Carbon copy.
    Cc,
    /// Blind carbon copy.
    Bcc,
}

impl RelationType {
    /// All roles, in display order.
    pub const ALL: [Self; 3] = [Self::To, Self::Cc, Self::Bcc];

    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::To => "to",
            Self::Cc => "cc",
            Self::Bcc => "bcc",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "to" => Ok(Self::To),
            "cc" => Ok(Self::Cc),
            "bcc" => Ok(Self::Bcc),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

/// A file attached to or embedded in a message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FileRef {
    /// File id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Role of the file, carried as the MIME disposition.
    #[serde(rename = "disposition", alias = "type", default)]
    pub role: FileRole,
    /// Original file name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_name: String,
    /// Signed download URL.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

/// File role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// Regular attachment.
    Attachment,
    /// Embedded in the HTML body (`cid:` reference).
    Inline,
    /// Anything else the server sends.
    #[default]
    #[serde(other)]
    Other,
}

impl FileRole {
    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Attachment => "attachment",
            Self::Inline => "inline",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileRole {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "attachment" => Ok(Self::Attachment),
            "inline" => Ok(Self::Inline),
            "other" => Ok(Self::Other),
            _ => Err(UnknownTag(s.to_string())),
        }
    }
}

/// Error returned when parsing an unknown relation or file tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tag: {0}")]
pub struct UnknownTag(pub String);

/// Body of `GET inboxes/{address}`.
#[derive(Debug, Deserialize)]
pub(crate) struct InboxEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub mail_inbox: Option<Inbox>,
}

/// Body of `GET messages/{id}`.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageEnvelope {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub mail_message: Option<MessageMetadata>,
}

/// Body of an error response.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub error: String,
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Ids are integers on the wire but opaque to the client.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
