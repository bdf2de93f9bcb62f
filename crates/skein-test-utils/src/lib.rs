//! Test helpers and fixtures for Skein development.
//!
//! Provides timing helpers for exercising threaded primitives
//! ([`recv_n`], [`wait_until`]), a thread-safe [`Recorder`] for asserting
//! on event order, and container fixtures in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};

/// Generous upper bound for anything that should happen "promptly".
pub const PROMPT: Duration = Duration::from_secs(5);

/// Receive exactly `n` items, failing the test if they do not all arrive
/// within `timeout` or the channel ends first.
pub fn recv_n<T>(rx: &Receiver<T>, n: usize, timeout: Duration) -> Vec<T> {
    let deadline = Instant::now() + timeout;
    let mut out = Vec::with_capacity(n);
    while out.len() < n {
        let left = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(left) {
            Ok(item) => out.push(item),
            Err(RecvTimeoutError::Timeout) => {
                panic!("timed out after {} of {n} items", out.len())
            }
            Err(RecvTimeoutError::Disconnected) => {
                panic!("channel ended after {} of {n} items", out.len())
            }
        }
    }
    out
}

/// Assert that the channel reports end-of-stream within `timeout`.
pub fn assert_ended<T>(rx: &Receiver<T>, timeout: Duration) {
    match rx.recv_timeout(timeout) {
        Err(RecvTimeoutError::Disconnected) => {}
        Err(RecvTimeoutError::Timeout) => panic!("channel still open after {timeout:?}"),
        Ok(_) => panic!("expected end-of-stream, got an item"),
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        thread::sleep(Duration::from_millis(1));
    }
}

/// Thread-safe, append-only event log.
///
/// Clones share the same log.
pub struct Recorder<T> {
    events: Arc<Mutex<Vec<T>>>,
}

impl<T> Recorder<T> {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record(&self, event: T) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take everything recorded so far, leaving the log empty.
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl<T: Clone> Recorder<T> {
    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Vec<T> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recv_n_collects_in_order() {
        let (tx, rx) = crossbeam_channel::unbounded();
        for i in 0..3 {
            tx.send(i).unwrap();
        }
        assert_eq!(recv_n(&rx, 3, PROMPT), vec![0, 1, 2]);
        drop(tx);
        assert_ended(&rx, PROMPT);
    }

    #[test]
    #[should_panic(expected = "timed out after 1 of 2 items")]
    fn recv_n_times_out() {
        let (tx, rx) = crossbeam_channel::unbounded();
        tx.send(1).unwrap();
        recv_n(&rx, 2, Duration::from_millis(5));
    }

    #[test]
    fn recorder_shared_across_threads() {
        let rec = Recorder::new();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let r = rec.clone();
                thread::spawn(move || r.record(i))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let mut events = rec.take();
        events.sort();
        assert_eq!(events, vec![0, 1, 2, 3]);
        assert!(rec.is_empty());
    }

    #[test]
    fn wait_until_gives_up() {
        assert!(wait_until(PROMPT, || true));
        assert!(!wait_until(Duration::from_millis(3), || false));
    }
}
