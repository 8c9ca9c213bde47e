//! One-shot assembly of a full message.
//!
//! [`MessageAggregator`] fetches a message's metadata, then both of its
//! bodies concurrently, and publishes the merged [`Message`] only once all
//! three have arrived. A failure anywhere in the chain publishes
//! [`MessagePhase::Failed`] and no message at all.

use std::sync::Arc;

use tempbox_api::MailApi;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{Error, FetchFailure, Result};
use crate::model::Message;
use crate::retry::RetryPolicy;
use crate::task::TaskHandle;

/// Where an aggregation currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MessagePhase {
    /// Fetches are outstanding, or the aggregator was stopped before they
    /// finished.
    #[default]
    Loading,
    /// The message was assembled.
    Ready(Arc<Message>),
    /// Some fetch failed; no message will be published.
    Failed(FetchFailure),
}

impl MessagePhase {
    /// Returns true for `Ready` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// The message, if ready.
    #[must_use]
    pub const fn message(&self) -> Option<&Arc<Message>> {
        match self {
            Self::Ready(message) => Some(message),
            _ => None,
        }
    }
}

/// Snapshot of an aggregator's published state.
#[derive(Debug, Clone, Default)]
pub struct MessageState {
    epoch: u64,
    phase: MessagePhase,
}

impl MessageState {
    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &MessagePhase {
        &self.phase
    }
}

/// Assembles one message from three fetches, all or nothing.
///
/// Runs once per screen; there is no polling.
pub struct MessageAggregator<A: MailApi> {
    api: Arc<A>,
    retry: RetryPolicy,
    state: Arc<watch::Sender<MessageState>>,
    id: Option<String>,
    task: Option<TaskHandle>,
}

impl<A: MailApi> MessageAggregator<A> {
    /// Creates an idle aggregator. Body fetches are attempted once.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(MessageState::default());
        Self {
            api,
            retry: RetryPolicy::none(),
            state: Arc::new(state),
            id: None,
            task: None,
        }
    }

    /// Sets the retry policy for the two body fetches. Metadata is never
    /// retried.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Starts loading message `id`.
    ///
    /// Only the first call has any effect.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&mut self, id: impl Into<String>) {
        let id = id.into();
        if let Some(current) = &self.id {
            debug!(id = %current, requested = %id, "message aggregator already started");
            return;
        }

        let epoch = self.state.borrow().epoch;
        info!(%id, "loading message");
        self.task = Some(TaskHandle::spawn(load(
            Arc::clone(&self.api),
            id.clone(),
            self.retry,
            Arc::clone(&self.state),
            epoch,
        )));
        self.id = Some(id);
    }

    /// Abandons the load. Nothing is published after this returns.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        self.state.send_if_modified(|s| {
            s.epoch += 1;
            false
        });
        drop(task);

        debug!(id = ?self.id, "message aggregator stopped");
    }

    /// Returns true while fetches are outstanding.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// The id passed to [`start`](Self::start).
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> MessagePhase {
        self.state.borrow().phase.clone()
    }

    /// The assembled message, or `None` unless the phase is `Ready`.
    #[must_use]
    pub fn current_message(&self) -> Option<Arc<Message>> {
        self.state.borrow().phase.message().cloned()
    }

    /// Waits for a terminal phase.
    ///
    /// Returns the current phase immediately if the aggregator was never
    /// started or has been stopped.
    pub async fn wait(&self) -> MessagePhase {
        let mut rx = self.state.subscribe();
        if self.task.is_none() {
            return rx.borrow().phase.clone();
        }

        match rx.wait_for(|s| s.phase.is_terminal()).await {
            Ok(state) => state.phase.clone(),
            Err(_) => MessagePhase::Loading,
        }
    }

    /// Subscribes to phase changes. The receiver is notified exactly once,
    /// when a terminal phase is reached.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MessageState> {
        self.state.subscribe()
    }
}

impl<A: MailApi> Drop for MessageAggregator<A> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<A: MailApi> std::fmt::Debug for MessageAggregator<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageAggregator")
            .field("id", &self.id)
            .field("retry", &self.retry)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

async fn load<A: MailApi>(
    api: Arc<A>,
    id: String,
    retry: RetryPolicy,
    state: Arc<watch::Sender<MessageState>>,
    epoch: u64,
) {
    let result = assemble(api.as_ref(), &id, retry).await;

    state.send_if_modified(|s| {
        if s.epoch != epoch {
            debug!(%id, "discarding message from stopped aggregator");
            return false;
        }

        s.phase = match result {
            Ok(message) => {
                info!(%id, relations = message.relations.len(), files = message.files.len(), "message ready");
                MessagePhase::Ready(Arc::new(message))
            }
            Err(e) => {
                let failure = FetchFailure::from_error(&e);
                warn!(%id, kind = %failure.kind, error = %e, "message load failed");
                MessagePhase::Failed(failure)
            }
        };
        true
    });
}

/// Metadata first, then both bodies side by side. The first body failure
/// cancels the other.
async fn assemble<A: MailApi>(api: &A, id: &str, retry: RetryPolicy) -> Result<Message> {
    let metadata = api.fetch_message(id).await?;
    debug!(%id, "metadata fetched, loading bodies");

    let text_url = metadata.text_url.as_str();
    let html_url = metadata.html_url.as_str();
    let (text, html) = tokio::try_join!(
        retry.run(|| async move { api.fetch_body(text_url).await.map_err(Error::from) }),
        retry.run(|| async move { api.fetch_body(html_url).await.map_err(Error::from) }),
    )?;

    Ok(Message::assemble(metadata, text, html))
}
