//! Cooperative cancellation flag shared between the engine and a running job.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Error, Result};

/// Cooperative cancellation signal for a single job.
///
/// An external driver calls [`cancel`](CancelFlag::cancel) at most once;
/// the running handler polls [`is_cancelled`](CancelFlag::is_cancelled)
/// between external-process invocations or compositing stages and stops
/// voluntarily. The flag is a hint, not a synchronization primitive, and
/// never protects other shared state.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a new, unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Checkpoint for handlers: returns [`Error::Killed`] once cancelled.
    pub fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Killed)
        } else {
            Ok(())
        }
    }
}
