//! Generational slot arena with doubly linked list semantics.
//!
//! [`SlotArena`] stores values in a contiguous, growable slot vector and
//! threads a doubly linked list through the slot indices. Indices are stable
//! while a slot is occupied, and every re-population of an index bumps that
//! slot's version so a [`SlotHandle`] from a previous occupant is detectably
//! stale.
//!
//! # Architecture
//!
//! ```text
//! SlotArena<T>
//! ├── Vec<Slot<T>>        (Free | Live | Orphaned, prev/next indices, version)
//! ├── head / tail         (ends of the linked chain)
//! ├── free_cursor         (next candidate index for allocation)
//! └── depth               (active traversals; gates physical reclamation)
//! ```
//!
//! # Reentrant traversal
//!
//! Traversal visitors receive `&mut SlotArena<T>` and may insert, move or
//! release slots (including the one being visited). While any traversal is
//! active, a release only *orphans* the slot: the payload is dropped out of
//! the slot but the slot stays linked so walks positioned on it can still
//! advance. Orphans are unlinked and made reusable once the outermost
//! traversal ends and the orphan ratio crosses
//! [`ArenaConfig::sweep_ratio`], or on demand via [`SlotArena::sweep`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod config;
pub mod error;
pub mod handle;
mod slot;
pub mod traverse;

// Public re-exports for the primary API surface.
pub use arena::SlotArena;
pub use config::ArenaConfig;
pub use error::ConfigError;
pub use handle::SlotHandle;
pub use traverse::Iter;
