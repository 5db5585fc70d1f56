//! Trailing-edge debounce for list fetches

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs only the most recently scheduled future, `delay` after it was scheduled
///
/// Each call to [`Debouncer::schedule`] aborts whatever is still pending,
/// so a burst of calls inside the window produces a single run. Dropping
/// the debouncer aborts the pending run. Must be used inside a tokio
/// runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer; a zero delay still coalesces calls made
    /// before the runtime gets to the task
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending run with `task`
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            task.await;
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Abort the pending run, if any
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }

    /// Wait for the pending run to finish
    pub async fn flush(&self) {
        let handle = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            pending.take()
        };
        if let Some(handle) = handle {
            // an aborted run is as settled as a finished one
            let _ = handle.await;
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
