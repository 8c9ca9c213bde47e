//! Periodic inbox refresh.
//!
//! [`InboxSynchronizer`] fetches an inbox immediately on [`start`], then on a
//! fixed period until [`stop`]. Every completed fetch is applied to a
//! `watch` channel holding [`InboxState`]:
//!
//! - a successful fetch replaces the inbox wholesale
//! - a failed fetch is recorded and leaves the last good inbox in place
//! - completions are applied in arrival order, so a slow older request that
//!   lands after a newer one wins
//!
//! Each start is tagged with an epoch. [`stop`] bumps the epoch under the
//! channel's write lock, and every write re-checks it under the same lock,
//! so nothing issued before `stop` can be observed after it returns, even
//! if the request itself is still on the wire.
//!
//! [`start`]: InboxSynchronizer::start
//! [`stop`]: InboxSynchronizer::stop

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tempbox_api::{Inbox, MailApi};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::{Error, FetchFailure};
use crate::task::TaskHandle;

/// Default refresh period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Shortest refresh period accepted.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Snapshot of a synchronizer's published state.
#[derive(Debug, Clone, Default)]
pub struct InboxState {
    epoch: u64,
    inbox: Option<Arc<Inbox>>,
    last_failure: Option<FetchFailure>,
    last_success_at: Option<DateTime<Utc>>,
    last_poll_failed: bool,
    completed_polls: u64,
    successful_polls: u64,
}

impl InboxState {
    /// The last successfully fetched inbox, or `None` if no fetch succeeded yet.
    #[must_use]
    pub fn inbox(&self) -> Option<&Arc<Inbox>> {
        self.inbox.as_ref()
    }

    /// The most recent failure, even if a later fetch succeeded.
    #[must_use]
    pub const fn last_failure(&self) -> Option<&FetchFailure> {
        self.last_failure.as_ref()
    }

    /// When the current inbox was fetched.
    #[must_use]
    pub const fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.last_success_at
    }

    /// Fetches that completed (either way) since the last start.
    #[must_use]
    pub const fn completed_polls(&self) -> u64 {
        self.completed_polls
    }

    /// Fetches that succeeded since the last start.
    #[must_use]
    pub const fn successful_polls(&self) -> u64 {
        self.successful_polls
    }

    /// Returns true if the latest completed fetch failed.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.last_poll_failed
    }

    /// Clears everything except the epoch.
    fn reset(&mut self) {
        *self = Self {
            epoch: self.epoch,
            ..Self::default()
        };
    }
}

/// Keeps an inbox fresh by re-fetching it on a timer.
///
/// Owned by exactly one screen. Dropping it stops it.
pub struct InboxSynchronizer<A: MailApi> {
    api: Arc<A>,
    poll_interval: Duration,
    state: Arc<watch::Sender<InboxState>>,
    running: Option<Running>,
}

struct Running {
    address: String,
    /// Owns the timer loop, which in turn owns every in-flight fetch.
    timer: TaskHandle,
}

impl<A: MailApi> InboxSynchronizer<A> {
    /// Creates a stopped synchronizer with the default poll interval.
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        let (state, _) = watch::channel(InboxState::default());
        Self {
            api,
            poll_interval: DEFAULT_POLL_INTERVAL,
            state: Arc::new(state),
            running: None,
        }
    }

    /// Sets the poll interval, raised to [`MIN_POLL_INTERVAL`] if shorter.
    ///
    /// Takes effect on the next [`start`](Self::start).
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Returns the poll interval.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Starts polling `address`: one fetch now, then one per interval.
    ///
    /// Calling it again for the address already being polled does nothing.
    /// Calling it for a different address stops the current polling and
    /// starts over with empty state.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn start(&mut self, address: impl Into<String>) {
        let address = address.into();

        if let Some(running) = &self.running {
            if running.address == address {
                debug!(%address, "inbox synchronizer already running");
                return;
            }
            self.stop();
        }

        let mut epoch = 0;
        self.state.send_modify(|s| {
            s.reset();
            epoch = s.epoch;
        });

        info!(%address, interval = ?self.poll_interval, "inbox synchronizer started");
        let timer = TaskHandle::spawn(poll_loop(
            Arc::clone(&self.api),
            address.clone(),
            self.poll_interval,
            Arc::clone(&self.state),
            epoch,
        ));

        self.running = Some(Running { address, timer });
    }

    /// Stops polling.
    ///
    /// Once this returns, no fetch issued before it can change the state.
    /// The last published state stays readable.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        // Bump without notifying: observers see no change.
        self.state.send_if_modified(|s| {
            s.epoch += 1;
            false
        });
        drop(running.timer);

        info!(address = %running.address, "inbox synchronizer stopped");
    }

    /// Returns true between [`start`](Self::start) and [`stop`](Self::stop).
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// The address being polled, if running.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.running.as_ref().map(|r| r.address.as_str())
    }

    /// The current inbox, or `None` if no fetch has succeeded.
    #[must_use]
    pub fn current_inbox(&self) -> Option<Arc<Inbox>> {
        self.state.borrow().inbox.clone()
    }

    /// A snapshot of the full state.
    #[must_use]
    pub fn state(&self) -> InboxState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes. The receiver is notified after every
    /// completed fetch and on every start.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<InboxState> {
        self.state.subscribe()
    }
}

impl<A: MailApi> Drop for InboxSynchronizer<A> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<A: MailApi> std::fmt::Debug for InboxSynchronizer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InboxSynchronizer")
            .field("poll_interval", &self.poll_interval)
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

/// Fires a fetch on every tick. Fetches run concurrently in a `JoinSet` so a
/// slow request never delays the next tick; aborting this task drops the set
/// and with it every request still in flight.
async fn poll_loop<A: MailApi>(
    api: Arc<A>,
    address: String,
    period: Duration,
    state: Arc<watch::Sender<InboxState>>,
    epoch: u64,
) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let api = Arc::clone(&api);
                let address = address.clone();
                let state = Arc::clone(&state);
                in_flight.spawn(async move {
                    debug!(%address, "polling inbox");
                    let result = api.fetch_inbox(&address).await.map_err(Error::from);
                    apply(&state, epoch, &address, result);
                });
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
    }
}

/// Applies a completed fetch if its epoch is still current.
fn apply(
    state: &watch::Sender<InboxState>,
    epoch: u64,
    address: &str,
    result: crate::Result<Inbox>,
) {
    state.send_if_modified(|s| {
        if s.epoch != epoch {
            debug!(%address, epoch, current = s.epoch, "discarding result from stopped poll");
            return false;
        }

        s.completed_polls += 1;
        match result {
            Ok(inbox) => {
                debug!(%address, messages = inbox.messages.len(), "inbox refreshed");
                s.inbox = Some(Arc::new(inbox));
                s.last_success_at = Some(Utc::now());
                s.last_poll_failed = false;
                s.successful_polls += 1;
            }
            Err(e) => {
                let failure = FetchFailure::from_error(&e);
                warn!(%address, kind = %failure.kind, error = %e, "inbox poll failed");
                s.last_failure = Some(failure);
                s.last_poll_failed = true;
            }
        }
        true
    });
}
