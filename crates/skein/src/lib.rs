//! Skein: index-stable containers that tolerate mutation mid-traversal,
//! plus the thread coordination primitives built on them.
//!
//! This is the facade crate that re-exports the public API of every Skein
//! sub-crate.
//!
//! # Quick start
//!
//! ```rust
//! use skein::prelude::*;
//!
//! // Release slots from inside a traversal; the walk still sees every value.
//! let mut arena = SlotArena::new();
//! for v in 0..6 {
//!     arena.push_back(v);
//! }
//! let mut seen = Vec::new();
//! arena.for_each(|arena, handle| {
//!     let v = *arena.get(handle.index()).unwrap();
//!     seen.push(v);
//!     if v % 2 == 0 {
//!         arena.release(handle.index());
//!     }
//! });
//! assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
//! assert_eq!(arena.to_vec(), vec![1, 3, 5]);
//!
//! // Producers never wait for consumers.
//! let queue = UnboundedQueue::new();
//! queue.send("hello").unwrap();
//! queue.close();
//! assert_eq!(queue.iter().collect::<Vec<_>>(), vec!["hello"]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`arena`] | `skein-arena` | `SlotArena`, handles, traversal |
//! | [`list`] | `skein-list` | `SentinelList` and `Element` |
//! | [`sync`] | `skein-sync` | `UnboundedQueue`, `EventStream`, `Barrier`, `CancelToken` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Generational slot arena (`skein-arena`).
///
/// [`arena::SlotArena`] keeps indices stable while occupied and lets
/// traversal visitors mutate the arena they are walking.
pub use skein_arena as arena;

/// Sentinel-rooted linked list (`skein-list`).
///
/// [`list::Element`] handles can escape their list at any time, including
/// from inside a traversal.
pub use skein_list as list;

/// Thread coordination primitives (`skein-sync`).
pub use skein_sync as sync;

/// Common imports for typical Skein usage.
///
/// ```rust
/// use skein::prelude::*;
/// ```
pub mod prelude {
    // Containers
    pub use skein_arena::{ArenaConfig, SlotArena, SlotHandle};
    pub use skein_list::{Element, SentinelList};

    // Coordination
    pub use skein_sync::{
        Barrier, CancelToken, EventStream, QueueConfig, QueueError, QueueReceiver, UnboundedQueue,
    };
}
