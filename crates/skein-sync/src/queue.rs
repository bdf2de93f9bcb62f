//! Unbounded FIFO queue served by a dedicated worker thread.
//!
//! Producers never wait for consumers: the worker accepts every submission
//! into an arena-backed buffer and hands items out in arrival order. After
//! [`close`](UnboundedQueue::close) new submissions are rejected, buffered
//! items are still delivered, and then consumers observe end-of-stream.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::config::QueueConfig;
use crate::error::{ConfigError, QueueError};
use crate::signal::OneShot;
use crate::worker::{worker_loop, WorkerChannels};

/// An unbounded multi-producer, multi-consumer FIFO queue.
///
/// Each queue owns one worker thread, which exits once the queue is closed
/// and drained, or once no consumer handle remains. Dropping the queue
/// closes it; receivers obtained from [`receiver`](Self::receiver) keep
/// draining what was buffered.
pub struct UnboundedQueue<T> {
    submit: Sender<T>,
    receiver: QueueReceiver<T>,
    close: OneShot,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> UnboundedQueue<T> {
    /// A queue with the default configuration.
    pub fn new() -> Self {
        Self::spawn(&QueueConfig::default())
    }

    /// A queue whose worker thread follows `config`.
    pub fn with_config(config: QueueConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::spawn(&config))
    }

    pub(crate) fn spawn(config: &QueueConfig) -> Self {
        let (submit_tx, submit_rx) = crossbeam_channel::bounded(0);
        let (deliver_tx, deliver_rx) = crossbeam_channel::bounded(0);
        let close = OneShot::new();
        let len = Arc::new(AtomicUsize::new(0));

        let channels = WorkerChannels {
            submit: submit_rx,
            deliver: deliver_tx,
            close: close.receiver(),
            len: Arc::clone(&len),
        };
        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }
        let handle = builder
            .spawn(move || worker_loop(channels))
            .expect("failed to spawn queue worker");
        log::debug!("queue worker '{}' started", config.thread_name);

        Self {
            submit: submit_tx,
            receiver: QueueReceiver {
                deliver: deliver_rx,
                len,
            },
            close,
            worker: Mutex::new(Some(handle)),
        }
    }
}

impl<T> UnboundedQueue<T> {
    /// Submit an item.
    ///
    /// Returns as soon as the worker has buffered it. Fails with
    /// [`QueueError::Closed`], handing the item back, once the queue has
    /// been closed.
    pub fn send(&self, item: T) -> Result<(), QueueError<T>> {
        if self.close.is_fired() {
            return Err(QueueError::Closed(item));
        }
        self.submit
            .send(item)
            .map_err(|err| QueueError::Closed(err.into_inner()))
    }

    /// Block for the next item. `None` once closed and drained.
    pub fn recv(&self) -> Option<T> {
        self.receiver.recv()
    }

    /// Take the next item if one is ready.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for the next item for at most `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Blocking iterator that ends when the queue is closed and drained.
    pub fn iter(&self) -> crossbeam_channel::Iter<'_, T> {
        self.receiver.iter()
    }

    /// A receive-only handle onto this queue.
    pub fn receiver(&self) -> QueueReceiver<T> {
        self.receiver.clone()
    }

    /// Stop accepting submissions. Returns `true` for the call that closed
    /// the queue. Already-buffered items are still delivered.
    pub fn close(&self) -> bool {
        self.close.fire()
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.close.is_fired()
    }

    /// Approximate number of buffered items.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether the buffer is (approximately) empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Close the queue and wait for the worker to hand off every buffered
    /// item and exit.
    ///
    /// Blocks until consumers have drained the buffer. Returns `false` if
    /// the worker panicked or was already joined.
    pub fn join(&self) -> bool {
        self.close();
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match handle {
            Some(h) => h.join().is_ok(),
            None => false,
        }
    }
}

impl<T: Send + 'static> Default for UnboundedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for UnboundedQueue<T> {
    fn drop(&mut self) {
        self.close.fire();
    }
}

impl<T> std::fmt::Debug for UnboundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnboundedQueue")
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Receive-only handle onto an [`UnboundedQueue`].
///
/// Clones share the same stream: each item goes to exactly one receiver.
pub struct QueueReceiver<T> {
    deliver: Receiver<T>,
    len: Arc<AtomicUsize>,
}

impl<T> QueueReceiver<T> {
    /// Block for the next item. `None` once closed and drained.
    pub fn recv(&self) -> Option<T> {
        self.deliver.recv().ok()
    }

    /// Take the next item if one is ready.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        self.deliver.try_recv()
    }

    /// Block for the next item for at most `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        self.deliver.recv_timeout(timeout)
    }

    /// Blocking iterator that ends when the queue is closed and drained.
    pub fn iter(&self) -> crossbeam_channel::Iter<'_, T> {
        self.deliver.iter()
    }

    /// Approximate number of buffered items.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Whether the buffer is (approximately) empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying channel, for use in `crossbeam_channel::select!`.
    pub fn as_channel(&self) -> &Receiver<T> {
        &self.deliver
    }
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self {
            deliver: self.deliver.clone(),
            len: Arc::clone(&self.len),
        }
    }
}

impl<T> IntoIterator for QueueReceiver<T> {
    type Item = T;
    type IntoIter = crossbeam_channel::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.deliver.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a QueueReceiver<T> {
    type Item = T;
    type IntoIter = crossbeam_channel::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> std::fmt::Debug for QueueReceiver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueueReceiver")
            .field("len", &self.len())
            .finish()
    }
}

// Compile-time check: queue handles cross threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<UnboundedQueue<Vec<u8>>>();
    assert::<QueueReceiver<Vec<u8>>>();
};
