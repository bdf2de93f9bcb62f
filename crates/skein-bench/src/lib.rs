//! Benchmark workloads for Skein.
//!
//! - [`churn_arena`]: interleaved push/release cycles that exercise slot reuse
//! - [`sweep_workload`]: release every other value from inside a traversal
//! - [`pump_queue`]: push a batch through an [`UnboundedQueue`] and drain it

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use skein_arena::{ArenaConfig, SlotArena};
use skein_sync::UnboundedQueue;

/// Push `live` values, then run `rounds` of release-front/push-back.
///
/// Returns the arena so callers can inspect capacity; steady-state churn
/// should not grow it past the first allocation.
pub fn churn_arena(live: u32, rounds: u32) -> SlotArena<u64> {
    let config = ArenaConfig::with_initial_capacity(live.max(1));
    let mut arena = match SlotArena::with_config(config) {
        Ok(arena) => arena,
        Err(err) => panic!("benchmark arena config rejected: {err}"),
    };
    for v in 0..u64::from(live) {
        arena.push_back(v);
    }
    for r in 0..rounds {
        arena.pop_front();
        arena.push_back(u64::from(live + r));
    }
    arena
}

/// Release every even value from inside a forward traversal.
///
/// Returns how many values were released.
pub fn sweep_workload(arena: &mut SlotArena<u64>) -> usize {
    let mut released = 0;
    arena.for_each(|arena, handle| {
        if arena.get(handle.index()).is_some_and(|v| v % 2 == 0) {
            arena.release(handle.index());
            released += 1;
        }
    });
    released
}

/// Send `items` through `queue` and receive them all back.
///
/// Returns the sum of the received values.
pub fn pump_queue(queue: &UnboundedQueue<u64>, items: u64) -> u64 {
    for i in 0..items {
        if queue.send(i).is_err() {
            break;
        }
    }
    (0..items).filter_map(|_| queue.recv()).sum()
}
