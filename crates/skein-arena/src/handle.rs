//! Versioned slot handles.
//!
//! A [`SlotHandle`] names one logical occupant of an arena index. The
//! `version` lets callers detect in O(1) that the index has since been
//! released and re-populated.

use std::fmt;

/// An arena index paired with the version of its occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct SlotHandle {
    pub(crate) index: u32,
    pub(crate) version: u32,
}

impl SlotHandle {
    pub(crate) fn new(index: u32, version: u32) -> Self {
        Self { index, version }
    }

    /// Position of the slot in the arena's backing store.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Version stamp of the occupant this handle was issued for.
    pub fn version(&self) -> u32 {
        self.version
    }
}

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotHandle(idx={}, v={})", self.index, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_index_and_version() {
        let h = SlotHandle::new(7, 3);
        assert_eq!(h.to_string(), "SlotHandle(idx=7, v=3)");
    }

    #[test]
    fn handles_differ_by_version() {
        assert_ne!(SlotHandle::new(1, 1), SlotHandle::new(1, 2));
    }
}
