//! Owned handle for spawned controller tasks.

use std::future::Future;

use tokio::task::JoinHandle;

/// A spawned task owned by exactly one controller.
///
/// Dropping the handle aborts the task, so the task cannot outlive its
/// owner on any exit path.
#[derive(Debug)]
pub(crate) struct TaskHandle {
    inner: JoinHandle<()>,
}

impl TaskHandle {
    /// Spawns `future` on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            inner: tokio::spawn(future),
        }
    }

    /// Returns true if the task has run to completion or been aborted.
    pub(crate) fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.inner.abort();
    }
}
