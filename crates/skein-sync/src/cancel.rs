//! Cooperative cancellation scope.

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::signal::OneShot;

/// A cancellation scope shared by cloning.
///
/// All clones observe the same state. Cancelling is permanent.
#[derive(Clone)]
pub struct CancelToken {
    signal: Arc<OneShot>,
}

impl CancelToken {
    /// A fresh, uncancelled scope.
    pub fn new() -> Self {
        Self {
            signal: Arc::new(OneShot::new()),
        }
    }

    /// Cancel the scope. Returns `true` for the call that cancelled it.
    pub fn cancel(&self) -> bool {
        self.signal.fire()
    }

    /// Whether the scope has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.signal.is_fired()
    }

    /// Block until the scope is cancelled.
    pub fn wait(&self) {
        self.signal.wait();
    }

    /// Block until cancelled or `timeout` elapses. Returns whether the
    /// scope was cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.signal.wait_timeout(timeout)
    }

    /// A receiver that disconnects on cancellation, for use in
    /// `crossbeam_channel::select!`.
    pub fn cancelled(&self) -> Receiver<Infallible> {
        self.signal.receiver()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
