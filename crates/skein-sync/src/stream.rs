//! Broadcast stream with per-subscriber queues.
//!
//! Every subscriber gets its own [`UnboundedQueue`], so a slow consumer
//! never blocks a publisher or another subscriber. A subscription lives
//! until its [`CancelToken`] is cancelled or the stream is dropped; either
//! way its queue is closed and drains what it already holds.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;

use indexmap::IndexMap;

use crate::cancel::CancelToken;
use crate::config::QueueConfig;
use crate::error::ConfigError;
use crate::queue::{QueueReceiver, UnboundedQueue};
use crate::signal::OneShot;

struct Subscriber<T> {
    queue: UnboundedQueue<T>,
    live: AtomicBool,
}

struct Shared<T> {
    subscribers: RwLock<IndexMap<u64, Subscriber<T>>>,
    next_id: AtomicU64,
    config: QueueConfig,
    shutdown: OneShot,
}

impl<T> Shared<T> {
    fn read(&self) -> RwLockReadGuard<'_, IndexMap<u64, Subscriber<T>>> {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexMap<u64, Subscriber<T>>> {
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn unsubscribe(&self, id: u64) {
        let removed = self.write().shift_remove(&id);
        if let Some(sub) = removed {
            sub.live.store(false, Ordering::Release);
            sub.queue.close();
            log::debug!("stream subscriber {id} removed");
        }
    }
}

/// A multi-subscriber broadcast stream.
///
/// Values published after a subscriber joins are delivered to it in
/// publish order, after any seed values it was given. Share the stream
/// behind an `Arc`; dropping it ends every subscription.
pub struct EventStream<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Clone + Send + 'static> EventStream<T> {
    /// A stream whose subscriber queues use the default configuration.
    pub fn new() -> Self {
        Self::build(QueueConfig::default().with_thread_name("skein-stream"))
    }

    /// A stream whose subscriber queues follow `config`.
    pub fn with_config(config: QueueConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: QueueConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                subscribers: RwLock::new(IndexMap::new()),
                next_id: AtomicU64::new(0),
                config,
                shutdown: OneShot::new(),
            }),
        }
    }

    /// Join the stream.
    ///
    /// `seed` values are queued first, ahead of anything published after
    /// this call. The subscription ends when `scope` is cancelled; values
    /// already queued are still delivered, then the receiver reports
    /// end-of-stream. Subscribing with an already-cancelled scope yields
    /// the seed values and nothing else.
    pub fn subscribe<I>(&self, scope: &CancelToken, seed: I) -> QueueReceiver<T>
    where
        I: IntoIterator<Item = T>,
    {
        let queue = UnboundedQueue::spawn(&self.shared.config);
        for value in seed {
            // The queue is fresh and open, so this cannot fail.
            let _ = queue.send(value);
        }
        let receiver = queue.receiver();

        if scope.is_cancelled() || self.shared.shutdown.is_fired() {
            queue.close();
            return receiver;
        }

        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);
        self.shared.write().insert(
            id,
            Subscriber {
                queue,
                live: AtomicBool::new(true),
            },
        );
        log::debug!("stream subscriber {id} added");

        let shared = Arc::clone(&self.shared);
        let cancelled = scope.cancelled();
        let shutdown = self.shared.shutdown.receiver();
        thread::Builder::new()
            .name(format!("{}-watch", self.shared.config.thread_name))
            .spawn(move || {
                crossbeam_channel::select! {
                    recv(cancelled) -> _ => {}
                    recv(shutdown) -> _ => {}
                }
                shared.unsubscribe(id);
            })
            .expect("failed to spawn subscription watcher");

        receiver
    }

    /// Deliver a clone of `value` to every live subscriber.
    ///
    /// Returns how many subscribers accepted it. Subscribers that are
    /// closing concurrently are skipped.
    pub fn publish(&self, value: T) -> usize {
        let subscribers = self.shared.read();
        let mut delivered = 0;
        for sub in subscribers.values() {
            if !sub.live.load(Ordering::Acquire) {
                continue;
            }
            if sub.queue.send(value.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }
}

impl<T> EventStream<T> {
    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.shared.read().len()
    }

    /// The configuration applied to subscriber queues.
    pub fn config(&self) -> &QueueConfig {
        &self.shared.config
    }
}

impl<T: Clone + Send + 'static> Default for EventStream<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for EventStream<T> {
    fn drop(&mut self) {
        self.shared.shutdown.fire();
        let drained: Vec<_> = self.shared.write().drain(..).collect();
        for (_, sub) in &drained {
            sub.live.store(false, Ordering::Release);
            sub.queue.close();
        }
        if !drained.is_empty() {
            log::debug!("stream dropped with {} subscribers", drained.len());
        }
    }
}

impl<T> std::fmt::Debug for EventStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<EventStream<String>>();
};
