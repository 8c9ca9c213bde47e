//! Scripted in-memory [`MailApi`] for controller tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tempbox_api::types::{FileRef, FileRole, Relation, RelationType};
use tempbox_api::{Error, Inbox, MailApi, MessageMetadata, MessageSummary, Result};
use tokio::sync::oneshot;

/// One scripted answer.
pub enum Reply<T> {
    /// Resolves immediately.
    Now(Result<T>),
    /// Resolves when the test sends on the paired channel.
    Later(oneshot::Receiver<Result<T>>),
}

impl<T> Reply<T> {
    /// A reply the test completes later through the returned sender.
    pub fn later() -> (Self, oneshot::Sender<Result<T>>) {
        let (tx, rx) = oneshot::channel();
        (Self::Later(rx), tx)
    }

    async fn resolve(self) -> Result<T> {
        match self {
            Self::Now(result) => result,
            Self::Later(rx) => match rx.await {
                Ok(result) => result,
                // Sender dropped: behave like a request that never returns.
                Err(_) => std::future::pending().await,
            },
        }
    }
}

/// Replies are consumed in order. An exhausted queue never resolves.
#[derive(Default)]
pub struct FakeApi {
    inbox_replies: Mutex<VecDeque<Reply<Inbox>>>,
    message_replies: Mutex<VecDeque<Reply<MessageMetadata>>>,
    body_replies: Mutex<HashMap<String, VecDeque<Reply<String>>>>,
    inbox_calls: AtomicUsize,
    message_calls: AtomicUsize,
    body_urls: Mutex<Vec<String>>,
    addresses: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_inbox(&self, reply: Reply<Inbox>) {
        self.inbox_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_message(&self, reply: Reply<MessageMetadata>) {
        self.message_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_body(&self, url: &str, reply: Reply<String>) {
        self.body_replies
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn inbox_calls(&self) -> usize {
        self.inbox_calls.load(Ordering::SeqCst)
    }

    pub fn message_calls(&self) -> usize {
        self.message_calls.load(Ordering::SeqCst)
    }

    pub fn body_calls(&self) -> usize {
        self.body_urls.lock().unwrap().len()
    }

    pub fn body_calls_for(&self, url: &str) -> usize {
        self.body_urls
            .lock()
            .unwrap()
            .iter()
            .filter(|u| *u == url)
            .count()
    }

    pub fn addresses(&self) -> Vec<String> {
        self.addresses.lock().unwrap().clone()
    }
}

impl MailApi for FakeApi {
    async fn fetch_inbox(&self, address: &str) -> Result<Inbox> {
        self.inbox_calls.fetch_add(1, Ordering::SeqCst);
        self.addresses.lock().unwrap().push(address.to_string());
        let reply = self.inbox_replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => std::future::pending().await,
        }
    }

    async fn fetch_message(&self, _id: &str) -> Result<MessageMetadata> {
        self.message_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.message_replies.lock().unwrap().pop_front();
        match reply {
            Some(reply) => reply.resolve().await,
            None => std::future::pending().await,
        }
    }

    async fn fetch_body(&self, url: &str) -> Result<String> {
        self.body_urls.lock().unwrap().push(url.to_string());
        let reply = self
            .body_replies
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(VecDeque::pop_front);
        match reply {
            Some(reply) => reply.resolve().await,
            None => std::future::pending().await,
        }
    }
}

pub const TEXT_URL: &str = "https://bucket.example.com/42/text";
pub const HTML_URL: &str = "https://bucket.example.com/42/html";

pub fn inbox(address: &str, subjects: &[&str]) -> Inbox {
    Inbox {
        address: address.to_string(),
        display_name: String::new(),
        messages: subjects
            .iter()
            .enumerate()
            .map(|(i, subject)| MessageSummary {
                id: i.to_string(),
                subject: (*subject).to_string(),
                text: Some(format!("body of {subject}")),
                html: None,
            })
            .collect(),
    }
}

pub fn metadata(id: &str) -> MessageMetadata {
    MessageMetadata {
        id: id.to_string(),
        subject: "Welcome".to_string(),
        relations: vec![
            Relation {
                id: "1".to_string(),
                kind: RelationType::To,
                display_name: "Alice".to_string(),
                address: "alice@example.com".to_string(),
            },
            Relation {
                id: "2".to_string(),
                kind: RelationType::Cc,
                display_name: String::new(),
                address: "bob@example.com".to_string(),
            },
        ],
        files: vec![FileRef {
            id: "7".to_string(),
            role: FileRole::Attachment,
            file_name: "terms.pdf".to_string(),
            url: "https://bucket.example.com/42/terms.pdf".to_string(),
        }],
        text_url: TEXT_URL.to_string(),
        html_url: HTML_URL.to_string(),
    }
}

pub fn not_found() -> Error {
    Error::Status {
        status: 404,
        message: "Not found".to_string(),
    }
}

pub fn forbidden() -> Error {
    Error::Status {
        status: 403,
        message: "Access Denied".to_string(),
    }
}

pub fn unavailable() -> Error {
    Error::Status {
        status: 503,
        message: "Service Unavailable".to_string(),
    }
}

/// Lets spawned tasks run without crossing a poll boundary.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
