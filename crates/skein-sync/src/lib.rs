//! Thread-based coordination primitives.
//!
//! - [`UnboundedQueue`]: FIFO queue whose producers never block on
//!   consumers. A worker thread buffers items in a
//!   [`SlotArena`](skein_arena::SlotArena) and hands them out in order.
//! - [`EventStream`]: broadcast to any number of subscribers, each with
//!   its own queue, optional seed values and a cancellation scope.
//! - [`Barrier`]: counting barrier that closes when its pending count
//!   reaches zero.
//! - [`CancelToken`]: shared, permanent cancellation flag that blocked
//!   threads can wait on.
//!
//! # Architecture
//!
//! ```text
//! producer ──submit (rendezvous)──▶ worker thread ──deliver (rendezvous)──▶ consumer
//!                                   └─ SlotArena<T> FIFO buffer
//!
//! EventStream
//! └── RwLock<IndexMap<id, Subscriber>>
//!     └── Subscriber { UnboundedQueue<T>, live }  + watcher thread on its CancelToken
//! ```
//!
//! Completion signals ([`Barrier`], [`CancelToken`], queue close) are
//! channels whose only sender is dropped when the signal fires, so they
//! compose with `crossbeam_channel::select!`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod barrier;
pub mod cancel;
pub mod config;
pub mod error;
pub mod queue;
mod signal;
pub mod stream;
mod worker;

pub use barrier::Barrier;
pub use cancel::CancelToken;
pub use config::QueueConfig;
pub use error::{ConfigError, QueueError};
pub use queue::{QueueReceiver, UnboundedQueue};
pub use stream::EventStream;

pub use crossbeam_channel::{RecvTimeoutError, TryRecvError};
