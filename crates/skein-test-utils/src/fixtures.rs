//! Container fixtures.

use skein_arena::{SlotArena, SlotHandle};
use skein_list::{Element, SentinelList};

/// An arena holding `values` in order, plus the handle of each.
pub fn arena_from<T>(values: impl IntoIterator<Item = T>) -> (SlotArena<T>, Vec<SlotHandle>) {
    let mut arena = SlotArena::new();
    let handles = values.into_iter().map(|v| arena.push_back(v)).collect();
    (arena, handles)
}

/// A list holding `values` in order, plus the element of each.
pub fn list_from<T>(values: impl IntoIterator<Item = T>) -> (SentinelList<T>, Vec<Element<T>>) {
    let list = SentinelList::new();
    let elements = values.into_iter().map(|v| list.push_back(v)).collect();
    (list, elements)
}

/// Values in forward arena order.
pub fn arena_values<T: Clone>(arena: &SlotArena<T>) -> Vec<T> {
    arena.iter().map(|(_, v)| v.clone()).collect()
}
