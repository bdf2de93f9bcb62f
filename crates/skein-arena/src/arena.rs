//! The slot arena: allocation, linking, moves and release.
//!
//! Traversal, orphan sweeping and iteration live in [`crate::traverse`].

use crate::config::ArenaConfig;
use crate::error::ConfigError;
use crate::handle::SlotHandle;
use crate::slot::{Slot, SlotState};

/// A generational slot arena with doubly linked list semantics.
///
/// Single-owner: the arena has no internal synchronisation. Every mutating
/// operation takes `&mut self`; reentrant mutation is only possible through
/// the `&mut SlotArena<T>` handed to traversal visitors.
///
/// The backing store is allocated lazily on the first insertion.
#[derive(Clone, Debug)]
pub struct SlotArena<T> {
    pub(crate) slots: Vec<Slot<T>>,
    pub(crate) head: Option<u32>,
    pub(crate) tail: Option<u32>,
    /// Next candidate index for allocation.
    pub(crate) free_cursor: u32,
    /// Live (non-orphaned) slots.
    pub(crate) len: usize,
    /// Bumped on every structural mutation.
    pub(crate) version: u64,
    pub(crate) orphan_count: usize,
    /// Number of traversals currently on the stack.
    pub(crate) depth: u32,
    pub(crate) config: ArenaConfig,
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotArena<T> {
    /// Create an empty arena with the default [`ArenaConfig`].
    pub fn new() -> Self {
        Self::from_valid_config(ArenaConfig::default())
    }

    /// Create an empty arena with a custom configuration.
    pub fn with_config(config: ArenaConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: ArenaConfig) -> Self {
        Self {
            slots: Vec::new(),
            head: None,
            tail: None,
            free_cursor: 0,
            len: 0,
            version: 0,
            orphan_count: 0,
            depth: 0,
            config,
        }
    }

    // ── Introspection ──────────────────────────────────────────

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the arena holds no live values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the backing store.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Structural version. Strictly increases on every mutation of the
    /// chain or the backing store.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Slots released during a traversal and not yet reclaimed.
    pub fn orphan_count(&self) -> usize {
        self.orphan_count
    }

    /// Number of traversals currently in progress.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The arena's configuration.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    // ── Lookup ─────────────────────────────────────────────────

    /// Handle of the live value at `index`, if any.
    pub fn handle(&self, index: u32) -> Option<SlotHandle> {
        let slot = self.live_slot(index)?;
        Some(SlotHandle::new(index, slot.version))
    }

    /// The live value at `index`.
    pub fn get(&self, index: u32) -> Option<&T> {
        self.live_slot(index)?.value.as_ref()
    }

    /// Mutable access to the live value at `index`.
    pub fn get_mut(&mut self, index: u32) -> Option<&mut T> {
        let slot = self.slots.get_mut(index as usize)?;
        if !slot.is_live() {
            return None;
        }
        slot.value.as_mut()
    }

    /// The value `handle` was issued for, or `None` if it has been released
    /// (and possibly replaced) since.
    pub fn get_versioned(&self, handle: SlotHandle) -> Option<&T> {
        let slot = self.live_slot(handle.index)?;
        if slot.version != handle.version {
            return None;
        }
        slot.value.as_ref()
    }

    /// Whether `handle` still names a live value.
    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.get_versioned(handle).is_some()
    }

    pub(crate) fn live_slot(&self, index: u32) -> Option<&Slot<T>> {
        self.slots.get(index as usize).filter(|s| s.is_live())
    }

    pub(crate) fn is_live(&self, index: u32) -> bool {
        self.live_slot(index).is_some()
    }

    // ── Insertion ──────────────────────────────────────────────

    /// Insert `value` at the front of the list.
    pub fn push_front(&mut self, value: T) -> SlotHandle {
        let index = self.alloc(value);
        let head = self.head;
        self.link_between(index, None, head);
        self.stamp(index)
    }

    /// Insert `value` at the back of the list.
    pub fn push_back(&mut self, value: T) -> SlotHandle {
        let index = self.alloc(value);
        let tail = self.tail;
        self.link_between(index, tail, None);
        self.stamp(index)
    }

    /// Insert `value` immediately before the live slot `at`.
    ///
    /// Returns `None` if `at` is not live; `value` is dropped in that case.
    pub fn insert_before(&mut self, at: u32, value: T) -> Option<SlotHandle> {
        if !self.is_live(at) {
            return None;
        }
        let index = self.alloc(value);
        let prev = self.slots[at as usize].prev;
        self.link_between(index, prev, Some(at));
        Some(self.stamp(index))
    }

    /// Insert `value` immediately after the live slot `at`.
    pub fn insert_after(&mut self, at: u32, value: T) -> Option<SlotHandle> {
        if !self.is_live(at) {
            return None;
        }
        let index = self.alloc(value);
        let next = self.slots[at as usize].next;
        self.link_between(index, Some(at), next);
        Some(self.stamp(index))
    }

    // ── Moves ──────────────────────────────────────────────────
    //
    // Each move returns whether the chain changed.

    /// Move the live slot `index` to the front.
    pub fn move_to_front(&mut self, index: u32) -> bool {
        if self.len < 2 || !self.is_live(index) || self.head == Some(index) {
            return false;
        }
        self.unlink(index);
        let head = self.head;
        self.link_between(index, None, head);
        self.version += 1;
        true
    }

    /// Move the live slot `index` to the back.
    pub fn move_to_back(&mut self, index: u32) -> bool {
        if self.len < 2 || !self.is_live(index) || self.tail == Some(index) {
            return false;
        }
        self.unlink(index);
        let tail = self.tail;
        self.link_between(index, tail, None);
        self.version += 1;
        true
    }

    /// Move the live slot `index` immediately before the live slot `at`.
    pub fn move_before(&mut self, index: u32, at: u32) -> bool {
        if !self.can_move(index, at) || self.slots[at as usize].prev == Some(index) {
            return false;
        }
        self.unlink(index);
        let prev = self.slots[at as usize].prev;
        self.link_between(index, prev, Some(at));
        self.version += 1;
        true
    }

    /// Move the live slot `index` immediately after the live slot `at`.
    pub fn move_after(&mut self, index: u32, at: u32) -> bool {
        if !self.can_move(index, at) || self.slots[at as usize].next == Some(index) {
            return false;
        }
        self.unlink(index);
        let next = self.slots[at as usize].next;
        self.link_between(index, Some(at), next);
        self.version += 1;
        true
    }

    fn can_move(&self, index: u32, at: u32) -> bool {
        index != at && self.len >= 2 && self.is_live(index) && self.is_live(at)
    }

    // ── Release ────────────────────────────────────────────────

    /// Release the live slot at `index`, returning its value.
    ///
    /// Outside a traversal the slot is unlinked and immediately reusable.
    /// During a traversal it is orphaned instead; see the crate docs.
    pub fn release(&mut self, index: u32) -> Option<T> {
        if !self.is_live(index) {
            return None;
        }
        self.release_live(index)
    }

    /// Release `index` only if its occupant still carries `version`.
    ///
    /// A mismatch means the caller's handle is stale; that is a no-op, not
    /// an error.
    pub fn release_if_version(&mut self, index: u32, version: u32) -> Option<T> {
        let slot = self.live_slot(index)?;
        if slot.version != version {
            return None;
        }
        self.release_live(index)
    }

    /// Release the occupant named by `handle`.
    pub fn release_handle(&mut self, handle: SlotHandle) -> Option<T> {
        self.release_if_version(handle.index, handle.version)
    }

    /// Release and return the front value.
    pub fn pop_front(&mut self) -> Option<T> {
        let front = self.front()?;
        self.release(front.index)
    }

    /// Release and return the back value.
    pub fn pop_back(&mut self) -> Option<T> {
        let back = self.back()?;
        self.release(back.index)
    }

    /// Release every value.
    ///
    /// Capacity and per-slot versions are kept, so handles issued before the
    /// clear stay detectably stale.
    pub fn clear(&mut self) {
        if self.depth > 0 {
            let mut cursor = self.head;
            while let Some(index) = cursor {
                cursor = self.slots[index as usize].next;
                if self.slots[index as usize].is_live() {
                    self.release_live(index);
                }
            }
            return;
        }
        for slot in &mut self.slots {
            slot.value = None;
            slot.prev = None;
            slot.next = None;
            slot.state = SlotState::Free;
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
        self.orphan_count = 0;
        self.free_cursor = 0;
        self.version += 1;
    }

    fn release_live(&mut self, index: u32) -> Option<T> {
        let orphan = self.depth > 0;
        let slot = &mut self.slots[index as usize];
        let value = slot.value.take();
        self.len -= 1;
        self.version += 1;
        if orphan {
            slot.state = SlotState::Orphaned;
            self.orphan_count += 1;
        } else {
            slot.state = SlotState::Free;
            self.unlink(index);
            self.free_cursor = index;
        }
        value
    }

    // ── Allocation ─────────────────────────────────────────────

    /// Populate a free slot with `value` and return its index. The slot is
    /// not linked yet.
    fn alloc(&mut self, value: T) -> u32 {
        let index = match self.find_free() {
            Some(index) => index,
            None => {
                if self.depth == 0 && self.orphan_count > 0 {
                    self.sweep_orphans();
                }
                match self.find_free() {
                    Some(index) => index,
                    None => {
                        self.grow();
                        match self.find_free() {
                            Some(index) => index,
                            None => panic!(
                                "slot arena exhausted right after growing to {} slots \
                                 ({} live, {} orphaned)",
                                self.slots.len(),
                                self.len,
                                self.orphan_count
                            ),
                        }
                    }
                }
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.value = Some(value);
        slot.state = SlotState::Live;
        slot.version = slot.version.wrapping_add(1);
        self.len += 1;
        self.free_cursor = index + 1;
        index
    }

    /// Scan for a free slot starting at the cursor, wrapping once.
    fn find_free(&self) -> Option<u32> {
        let cap = self.slots.len();
        if self.len + self.orphan_count >= cap {
            return None;
        }
        let start = (self.free_cursor as usize).min(cap);
        (start..cap)
            .chain(0..start)
            .find(|&i| self.slots[i].state == SlotState::Free)
            .map(|i| i as u32)
    }

    fn grow(&mut self) {
        let current = self.slots.len() as u32;
        let next = self.config.next_capacity(current);
        assert!(
            next > current && next < u32::MAX,
            "slot arena cannot grow beyond {current} slots"
        );
        self.slots.resize_with(next as usize, Slot::vacant);
        self.free_cursor = current;
        self.version += 1;
        log::trace!("slot arena grew from {current} to {next} slots");
    }

    // ── Linking ────────────────────────────────────────────────

    pub(crate) fn link_between(&mut self, index: u32, prev: Option<u32>, next: Option<u32>) {
        {
            let slot = &mut self.slots[index as usize];
            slot.prev = prev;
            slot.next = next;
        }
        match prev {
            Some(p) => self.slots[p as usize].next = Some(index),
            None => self.head = Some(index),
        }
        match next {
            Some(n) => self.slots[n as usize].prev = Some(index),
            None => self.tail = Some(index),
        }
    }

    pub(crate) fn unlink(&mut self, index: u32) {
        let (prev, next) = {
            let slot = &mut self.slots[index as usize];
            (slot.prev.take(), slot.next.take())
        };
        match prev {
            Some(p) => self.slots[p as usize].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n as usize].prev = prev,
            None => self.tail = prev,
        }
    }

    fn stamp(&mut self, index: u32) -> SlotHandle {
        self.version += 1;
        SlotHandle::new(index, self.slots[index as usize].version)
    }
}
