//! # tempbox-core
//!
//! Client-side controllers for the tempbox disposable-email client.
//!
//! This crate provides:
//! - **Inbox synchronization** - periodic refresh of one inbox, safe to stop
//!   with requests still in flight
//! - **Message aggregation** - metadata plus both bodies, published all at
//!   once or not at all
//! - **Grouping helpers** - recipients and files by role, derived on demand
//!
//! Controllers never return fetch errors to their callers. Failures are
//! recorded as [`FetchFailure`]s and the previous good value, if any, stays
//! in place.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod aggregate;
mod error;
pub mod group;
pub mod model;
mod retry;
pub mod sync;
mod task;

pub use aggregate::{MessageAggregator, MessagePhase, MessageState};
pub use error::{Error, FetchFailure, Result};
pub use group::{files_of_type, relations_of_type};
pub use model::{Inbox, Message, MessageSummary};
pub use retry::RetryPolicy;
pub use sync::{DEFAULT_POLL_INTERVAL, InboxState, InboxSynchronizer, MIN_POLL_INTERVAL};
