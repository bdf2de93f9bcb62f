//! Counting barrier with a one-way completion signal.
//!
//! The counter starts at 1 for the owner. Participants [`join`] with a
//! positive delta and [`done`] when finished; the owner calls [`close`]
//! once it will admit no further work of its own. When the counter reaches
//! zero the barrier closes for good and every waiter wakes.
//!
//! [`join`]: Barrier::join
//! [`done`]: Barrier::done
//! [`close`]: Barrier::close

use std::convert::Infallible;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;

use crossbeam_channel::Receiver;

use crate::signal::OneShot;

/// A counting barrier. Share it behind an `Arc`.
pub struct Barrier {
    pending: AtomicI64,
    owner_released: AtomicBool,
    done: OneShot,
}

impl Barrier {
    /// A barrier with one pending participant: the owner.
    pub fn new() -> Self {
        Self {
            pending: AtomicI64::new(1),
            owner_released: AtomicBool::new(false),
            done: OneShot::new(),
        }
    }

    /// Adjust the pending count by `delta`.
    ///
    /// A positive delta is admitted only while the barrier is open; once it
    /// has closed the request is rejected and `false` is returned. A
    /// negative delta decrements, clamping at zero; the call that brings
    /// the count to zero closes the barrier. Decrements on a closed barrier
    /// return `false` and have no effect. A zero delta reports whether the
    /// barrier is still open.
    pub fn join(&self, delta: i64) -> bool {
        let mut current = self.pending.load(Ordering::Acquire);
        loop {
            if current <= 0 {
                return false;
            }
            let next = if delta >= 0 {
                current.saturating_add(delta)
            } else {
                current.saturating_add(delta).max(0)
            };
            match self.pending.compare_exchange_weak(
                current,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    if next == 0 && self.done.fire() {
                        log::debug!("barrier closed");
                    }
                    return true;
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Mark one participant finished. Equivalent to `join(-1)`.
    pub fn done(&self) -> bool {
        self.join(-1)
    }

    /// Release the owner's share. Only the first call decrements.
    pub fn close(&self) {
        if !self.owner_released.swap(true, Ordering::AcqRel) {
            self.done();
        }
    }

    /// Block until the barrier has closed.
    pub fn wait(&self) {
        self.done.wait();
    }

    /// Block until the barrier closes or `timeout` elapses.
    ///
    /// Returns `true` if the barrier closed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.done.wait_timeout(timeout)
    }

    /// Whether the count has reached zero.
    pub fn is_closed(&self) -> bool {
        self.done.is_fired()
    }

    /// Current pending count. Stale as soon as it is read.
    pub fn pending(&self) -> u64 {
        self.pending.load(Ordering::Acquire).max(0) as u64
    }

    /// A receiver that disconnects when the barrier closes, for use in
    /// `crossbeam_channel::select!`.
    pub fn closed_signal(&self) -> Receiver<Infallible> {
        self.done.receiver()
    }
}

impl Default for Barrier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Barrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Barrier")
            .field("pending", &self.pending())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn owner_close_alone_closes() {
        let barrier = Barrier::new();
        assert_eq!(barrier.pending(), 1);
        assert!(!barrier.is_closed());
        barrier.close();
        assert!(barrier.is_closed());
        assert_eq!(barrier.pending(), 0);
        barrier.wait();
    }

    #[test]
    fn close_is_idempotent() {
        let barrier = Barrier::new();
        assert!(barrier.join(1));
        barrier.close();
        barrier.close();
        assert_eq!(barrier.pending(), 1);
        assert!(!barrier.is_closed());
        assert!(barrier.done());
        assert!(barrier.is_closed());
    }

    #[test]
    fn join_after_close_rejected() {
        let barrier = Barrier::new();
        barrier.close();
        assert!(!barrier.join(1));
        assert!(!barrier.join(0));
        assert_eq!(barrier.pending(), 0);
    }

    #[test]
    fn decrement_clamps_at_zero() {
        let barrier = Barrier::new();
        assert!(barrier.join(2));
        assert!(barrier.join(-10));
        assert_eq!(barrier.pending(), 0);
        assert!(barrier.is_closed());
        assert!(!barrier.done());
        assert_eq!(barrier.pending(), 0);
    }

    #[test]
    fn wait_timeout_reports_state() {
        let barrier = Barrier::new();
        assert!(!barrier.wait_timeout(Duration::from_millis(5)));
        barrier.close();
        assert!(barrier.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn concurrent_participants() {
        let barrier = Arc::new(Barrier::new());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                assert!(barrier.join(1));
                let b = Arc::clone(&barrier);
                thread::spawn(move || {
                    thread::sleep(Duration::from_millis(2));
                    b.done();
                })
            })
            .collect();
        barrier.close();
        barrier.wait();
        assert_eq!(barrier.pending(), 0);
        for w in workers {
            w.join().unwrap();
        }
    }

    #[test]
    fn closed_signal_disconnects() {
        let barrier = Barrier::new();
        let signal = barrier.closed_signal();
        assert!(signal.try_recv().is_err());
        barrier.close();
        assert!(signal.recv().is_err());
    }
}
