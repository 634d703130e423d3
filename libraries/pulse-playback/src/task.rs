//! Background tasks tied to their owner's lifetime

use std::future::Future;
use tokio::task::JoinHandle;

/// A spawned task that is aborted when cancelled or dropped
///
/// Storing one in an `Option` and overwriting it cancels the previous task.
#[derive(Debug)]
pub struct ScopedTask {
    handle: JoinHandle<()>,
}

impl ScopedTask {
    /// Spawn `future` on the current Tokio runtime
    ///
    /// # Panics
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    /// Abort the task
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
