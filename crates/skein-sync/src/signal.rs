//! One-shot broadcast signal built on channel disconnection.
//!
//! The signal owns the only [`Sender`] of a channel that never carries a
//! message. Firing drops the sender; every blocked or future `recv` on a
//! clone of the receiver then returns `Err(RecvError)` immediately. This
//! makes the signal usable inside `crossbeam_channel::select!`.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

pub(crate) struct OneShot {
    tx: Mutex<Option<Sender<Infallible>>>,
    rx: Receiver<Infallible>,
    fired: AtomicBool,
}

impl OneShot {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::bounded(0);
        Self {
            tx: Mutex::new(Some(tx)),
            rx,
            fired: AtomicBool::new(false),
        }
    }

    /// Fire the signal. Returns `true` only for the call that fired it.
    pub fn fire(&self) -> bool {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(tx);
        true
    }

    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Block until fired.
    pub fn wait(&self) {
        match self.rx.recv() {
            Ok(never) => match never {},
            Err(_) => {}
        }
    }

    /// Block until fired or `timeout` elapses. Returns whether it fired.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(never) => match never {},
            Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }

    /// A receiver that disconnects when the signal fires.
    pub fn receiver(&self) -> Receiver<Infallible> {
        self.rx.clone()
    }
}
