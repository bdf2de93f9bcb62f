//! Reentrant traversal, orphan sweeping and borrowing iteration.
//!
//! A traversal raises the arena's depth for its whole duration. Visitors get
//! `&mut SlotArena<T>` and may mutate freely; releases made while the depth
//! is non-zero orphan the slot instead of unlinking it, so the walk can
//! always read the next link of the slot it just visited.

use crate::arena::SlotArena;
use crate::handle::SlotHandle;
use crate::slot::SlotState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Reverse,
}

impl<T> SlotArena<T> {
    // ── Positional lookup ──────────────────────────────────────

    /// Handle of the first live value.
    pub fn front(&self) -> Option<SlotHandle> {
        self.first_live(self.head, Direction::Forward)
    }

    /// Handle of the last live value.
    pub fn back(&self) -> Option<SlotHandle> {
        self.first_live(self.tail, Direction::Reverse)
    }

    /// The live value following `index`.
    ///
    /// `index` may be orphaned (a visitor asking for the successor of a slot
    /// it just released); free indices yield `None`.
    pub fn next(&self, index: u32) -> Option<SlotHandle> {
        let slot = self.slots.get(index as usize)?;
        if !slot.is_linked() {
            return None;
        }
        self.first_live(slot.next, Direction::Forward)
    }

    /// The live value preceding `index`.
    pub fn prev(&self, index: u32) -> Option<SlotHandle> {
        let slot = self.slots.get(index as usize)?;
        if !slot.is_linked() {
            return None;
        }
        self.first_live(slot.prev, Direction::Reverse)
    }

    fn first_live(&self, mut cursor: Option<u32>, direction: Direction) -> Option<SlotHandle> {
        while let Some(index) = cursor {
            let slot = &self.slots[index as usize];
            if slot.is_live() {
                return Some(SlotHandle::new(index, slot.version));
            }
            cursor = self.step(index, direction);
        }
        None
    }

    fn step(&self, index: u32, direction: Direction) -> Option<u32> {
        let slot = &self.slots[index as usize];
        match direction {
            Direction::Forward => slot.next,
            Direction::Reverse => slot.prev,
        }
    }

    // ── Traversal ──────────────────────────────────────────────

    /// Walk front to back until `visitor` returns `false`.
    ///
    /// Returns `true` if every live value was visited.
    pub fn traverse<F>(&mut self, visitor: F) -> bool
    where
        F: FnMut(&mut SlotArena<T>, SlotHandle) -> bool,
    {
        let head = self.head;
        self.walk(head, Direction::Forward, visitor)
    }

    /// Walk back to front until `visitor` returns `false`.
    pub fn traverse_rev<F>(&mut self, visitor: F) -> bool
    where
        F: FnMut(&mut SlotArena<T>, SlotHandle) -> bool,
    {
        let tail = self.tail;
        self.walk(tail, Direction::Reverse, visitor)
    }

    /// Walk forward starting at (and including) the live slot `index`.
    ///
    /// A non-live `index` visits nothing and returns `true`.
    pub fn traverse_from<F>(&mut self, index: u32, visitor: F) -> bool
    where
        F: FnMut(&mut SlotArena<T>, SlotHandle) -> bool,
    {
        if !self.is_live(index) {
            return true;
        }
        self.walk(Some(index), Direction::Forward, visitor)
    }

    /// Walk backward starting at (and including) the live slot `index`.
    pub fn traverse_rev_from<F>(&mut self, index: u32, visitor: F) -> bool
    where
        F: FnMut(&mut SlotArena<T>, SlotHandle) -> bool,
    {
        if !self.is_live(index) {
            return true;
        }
        self.walk(Some(index), Direction::Reverse, visitor)
    }

    /// Visit every live value front to back.
    pub fn for_each<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut SlotArena<T>, SlotHandle),
    {
        self.traverse(|arena, handle| {
            visitor(arena, handle);
            true
        });
    }

    /// Visit every live value back to front.
    pub fn for_each_rev<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&mut SlotArena<T>, SlotHandle),
    {
        self.traverse_rev(|arena, handle| {
            visitor(arena, handle);
            true
        });
    }

    fn walk<F>(&mut self, start: Option<u32>, direction: Direction, mut visitor: F) -> bool
    where
        F: FnMut(&mut SlotArena<T>, SlotHandle) -> bool,
    {
        let mut guard = DepthGuard::enter(self);
        let mut cursor = start;
        while let Some(index) = cursor {
            let slot = &guard.arena.slots[index as usize];
            if slot.is_live() {
                let handle = SlotHandle::new(index, slot.version);
                if !visitor(guard.arena, handle) {
                    return false;
                }
            }
            // Read the link after the visit: the slot cannot have been
            // freed while depth > 0, only orphaned or moved.
            cursor = guard.arena.step(index, direction);
        }
        true
    }

    fn leave(&mut self) {
        self.depth -= 1;
        if self.depth == 0 && self.orphan_count > 0 && self.sweep_due() {
            self.sweep_orphans();
        }
    }

    fn sweep_due(&self) -> bool {
        self.orphan_count as f64 >= self.config.sweep_ratio * self.slots.len() as f64
    }

    // ── Reclamation ────────────────────────────────────────────

    /// Reclaim every orphan now, regardless of the sweep ratio.
    ///
    /// No-op inside a traversal. Returns the number of slots reclaimed.
    pub fn sweep(&mut self) -> usize {
        if self.depth > 0 {
            return 0;
        }
        self.sweep_orphans()
    }

    /// Unlink orphans walking from the tail, leaving the free cursor at the
    /// lowest reclaimed index.
    pub(crate) fn sweep_orphans(&mut self) -> usize {
        let mut reclaimed = 0;
        let mut best_cursor: Option<u32> = None;
        let mut cursor = self.tail;
        while let Some(index) = cursor {
            if self.orphan_count == 0 {
                break;
            }
            let slot = &self.slots[index as usize];
            cursor = slot.prev;
            if slot.state != SlotState::Orphaned {
                continue;
            }
            self.unlink(index);
            self.slots[index as usize].state = SlotState::Free;
            self.orphan_count -= 1;
            reclaimed += 1;
            best_cursor = Some(best_cursor.map_or(index, |best| best.min(index)));
        }
        if let Some(best) = best_cursor {
            self.free_cursor = best;
            self.version += 1;
            log::trace!(
                "slot arena swept {reclaimed} orphans ({} live, capacity {})",
                self.len,
                self.slots.len()
            );
        }
        reclaimed
    }

    // ── Borrowing iteration ────────────────────────────────────

    /// Iterate live values in list order without entering a traversal.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            arena: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Clone the live values into a `Vec`, front to back.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().map(|(_, value)| value.clone()).collect()
    }
}

/// Holds one level of traversal depth for the duration of a walk.
///
/// Dropping it leaves the level, also when a visitor unwinds. No sweep runs
/// while unwinding; the next allocation at depth zero reclaims orphans.
struct DepthGuard<'a, T> {
    arena: &'a mut SlotArena<T>,
}

impl<'a, T> DepthGuard<'a, T> {
    fn enter(arena: &'a mut SlotArena<T>) -> Self {
        arena.depth += 1;
        Self { arena }
    }
}

impl<T> Drop for DepthGuard<'_, T> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.arena.depth -= 1;
        } else {
            self.arena.leave();
        }
    }
}

/// Borrowing iterator over `(handle, &value)` pairs, front to back.
///
/// Created by [`SlotArena::iter`]. Orphans are skipped.
pub struct Iter<'a, T> {
    arena: &'a SlotArena<T>,
    front: Option<u32>,
    back: Option<u32>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    fn advance(&mut self, direction: Direction) -> Option<(SlotHandle, &'a T)> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        loop {
            let cursor = match direction {
                Direction::Forward => &mut self.front,
                Direction::Reverse => &mut self.back,
            };
            let index = (*cursor)?;
            let slot = &arena.slots[index as usize];
            *cursor = match direction {
                Direction::Forward => slot.next,
                Direction::Reverse => slot.prev,
            };
            if let (true, Some(value)) = (slot.is_live(), slot.value.as_ref()) {
                self.remaining -= 1;
                return Some((SlotHandle::new(index, slot.version), value));
            }
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotHandle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.advance(Direction::Forward)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.advance(Direction::Reverse)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<'a, T> IntoIterator for &'a SlotArena<T> {
    type Item = (SlotHandle, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
