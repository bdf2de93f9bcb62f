//! Per-index slot storage.

/// Occupancy state of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SlotState {
    /// Unlinked and available for allocation.
    Free,
    /// Linked and holding a value.
    Live,
    /// Released during a traversal: still linked, payload gone, not yet
    /// reusable.
    Orphaned,
}

/// One entry of the arena's backing store.
#[derive(Clone, Debug)]
pub(crate) struct Slot<T> {
    pub value: Option<T>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    /// Bumped every time the slot is populated.
    pub version: u32,
    pub state: SlotState,
}

impl<T> Slot<T> {
    pub fn vacant() -> Self {
        Self {
            value: None,
            prev: None,
            next: None,
            version: 0,
            state: SlotState::Free,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state == SlotState::Live
    }

    /// Linked into the chain (live or orphaned).
    pub fn is_linked(&self) -> bool {
        self.state != SlotState::Free
    }
}
