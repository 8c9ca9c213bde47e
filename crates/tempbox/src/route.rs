//! Path routing.
//!
//! Paths follow the web client's layout: `/messages/{id}` opens a message,
//! `/{address}` opens an inbox and `/` is the search screen. Anything after
//! the first matching segments is ignored.

use std::fmt;

/// A screen and its parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Inbox search prompt.
    Index,
    /// Live view of one inbox.
    Inbox {
        /// Inbox address.
        address: String,
    },
    /// One fully loaded message.
    Message {
        /// Message id.
        id: String,
    },
}

impl Route {
    /// Resolves `path` to a screen. Query strings and fragments are ignored.
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let mut segments = path.split('/').filter(|s| !s.is_empty());

        match (segments.next(), segments.next()) {
            (None, _) => Self::Index,
            (Some("messages"), Some(id)) => Self::Message { id: id.to_string() },
            (Some(address), _) => Self::Inbox {
                address: address.to_string(),
            },
        }
    }

    /// The inbox route for `address`, or the index if it is blank.
    pub fn inbox(address: &str) -> Self {
        let address = address.trim();
        if address.is_empty() {
            Self::Index
        } else {
            Self::Inbox {
                address: address.to_string(),
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("/"),
            Self::Inbox { address } => write!(f, "/{address}"),
            Self::Message { id } => write!(f, "/messages/{id}"),
        }
    }
}
