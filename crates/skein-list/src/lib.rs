//! Sentinel-rooted linked list with escape-safe traversal.
//!
//! [`SentinelList`] links reference-counted nodes behind a sentinel root.
//! Forward links own the next node; backward links between linked nodes are
//! [`Weak`]. An [`Element`] may *escape* (remove itself) at any time,
//! including from inside a traversal: its neighbours are re-linked around
//! it, its forward link is left intact, and it takes an owning link back
//! to its predecessor at that moment, so whoever holds it can still step
//! in either direction to the next live element.
//!
//! ```text
//! root ──next──▶ a ──next──▶ b ──next──▶ (None = root boundary)
//!  ▲ └────prev (weak, back)──────────────┘
//!  └──prev── a ◀──prev── b
//! ```
//!
//! Compared to the slot arena in `skein-arena`, iteration pays for safety
//! on the read side (skipping escaped nodes) instead of through depth
//! counting and deferred sweeps.
//!
//! The list is single-owner: nodes are `Rc`-based, so neither the list nor
//! its elements are `Send`.
//!
//! [`Weak`]: std::rc::Weak

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod list;
mod node;

pub use element::Element;
pub use list::{Iter, SentinelList};
