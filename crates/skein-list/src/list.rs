//! The list itself: insertion, moves, removal and traversal.

use std::cell::Cell;
use std::fmt;
use std::iter::FusedIterator;
use std::rc::{Rc, Weak};

use crate::element::Element;
use crate::node::{link_between, unlink, Header, Node};

/// A doubly linked list behind a sentinel root.
///
/// All operations take `&self`, so visitors and iterators may mutate the
/// list they are walking. Operations given an element of another list, or an
/// escaped element, are no-ops.
pub struct SentinelList<T> {
    header: Rc<Header<T>>,
}

impl<T> Default for SentinelList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SentinelList<T> {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            header: Rc::new(Header {
                root: Rc::new(Node::root()),
                len: Cell::new(0),
                version: Cell::new(0),
            }),
        }
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.header.len.get()
    }

    /// Whether the list has no live elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Structural version, bumped on every link and unlink.
    pub fn version(&self) -> u64 {
        self.header.version.get()
    }

    /// The first element.
    pub fn front(&self) -> Option<Element<T>> {
        self.header.root.next_node().map(Element::from_node)
    }

    /// The last element.
    pub fn back(&self) -> Option<Element<T>> {
        self.header
            .root
            .prev_node()
            .filter(|node| !node.is_root())
            .map(Element::from_node)
    }

    // ── Insertion ──────────────────────────────────────────────

    /// Insert `value` at the front.
    pub fn push_front(&self, value: T) -> Element<T> {
        let root = Rc::clone(&self.header.root);
        let next = root.next_node();
        self.insert_node(value, &root, next)
    }

    /// Insert `value` at the back.
    pub fn push_back(&self, value: T) -> Element<T> {
        let last = self.last_node();
        self.insert_node(value, &last, None)
    }

    /// Insert `value` immediately before `mark`.
    pub fn insert_before(&self, value: T, mark: &Element<T>) -> Option<Element<T>> {
        if !self.owns(mark) {
            return None;
        }
        let prev = mark.node.prev_node()?;
        Some(self.insert_node(value, &prev, Some(Rc::clone(&mark.node))))
    }

    /// Insert `value` immediately after `mark`.
    pub fn insert_after(&self, value: T, mark: &Element<T>) -> Option<Element<T>> {
        if !self.owns(mark) {
            return None;
        }
        let next = mark.node.next_node();
        Some(self.insert_node(value, &mark.node, next))
    }

    fn insert_node(&self, value: T, prev: &Rc<Node<T>>, next: Option<Rc<Node<T>>>) -> Element<T> {
        let node = Rc::new(Node::item(value, Rc::downgrade(&self.header)));
        link_between(&self.header, &node, prev, next);
        self.header.len.set(self.header.len.get() + 1);
        Element::from_node(node)
    }

    // ── Moves ──────────────────────────────────────────────────

    /// Move `e` to the front. Returns whether the list changed.
    pub fn move_to_front(&self, e: &Element<T>) -> bool {
        if !self.owns(e) || self.len() < 2 || self.front().is_some_and(|f| f == *e) {
            return false;
        }
        unlink(&self.header, &e.node);
        let root = Rc::clone(&self.header.root);
        let next = root.next_node();
        link_between(&self.header, &e.node, &root, next);
        true
    }

    /// Move `e` to the back.
    pub fn move_to_back(&self, e: &Element<T>) -> bool {
        if !self.owns(e) || self.len() < 2 || self.back().is_some_and(|b| b == *e) {
            return false;
        }
        unlink(&self.header, &e.node);
        let last = self.last_node();
        link_between(&self.header, &e.node, &last, None);
        true
    }

    /// Move `e` immediately before `mark`.
    pub fn move_before(&self, e: &Element<T>, mark: &Element<T>) -> bool {
        if !self.can_move(e, mark) || mark.prev().is_some_and(|p| p == *e) {
            return false;
        }
        unlink(&self.header, &e.node);
        let prev = mark
            .node
            .prev_node()
            .unwrap_or_else(|| Rc::clone(&self.header.root));
        link_between(&self.header, &e.node, &prev, Some(Rc::clone(&mark.node)));
        true
    }

    /// Move `e` immediately after `mark`.
    pub fn move_after(&self, e: &Element<T>, mark: &Element<T>) -> bool {
        if !self.can_move(e, mark) || mark.next().is_some_and(|n| n == *e) {
            return false;
        }
        unlink(&self.header, &e.node);
        let next = mark.node.next_node();
        link_between(&self.header, &e.node, &mark.node, next);
        true
    }

    fn can_move(&self, e: &Element<T>, mark: &Element<T>) -> bool {
        e != mark && self.owns(e) && self.owns(mark)
    }

    // ── Removal ────────────────────────────────────────────────

    /// Remove `e` from this list. Equivalent to [`Element::escape`] for
    /// elements of this list; returns `false` otherwise.
    pub fn remove(&self, e: &Element<T>) -> bool {
        self.owns(e) && e.escape()
    }

    /// Remove every element.
    pub fn clear(&self) {
        let mut cursor = self.front();
        while let Some(e) = cursor {
            e.escape();
            cursor = e.next();
        }
    }

    // ── Traversal ──────────────────────────────────────────────

    /// Walk front to back until `visitor` returns `false`.
    ///
    /// Returns `true` if the walk reached the end. The visitor may escape or
    /// move any element, including the one it is handed.
    pub fn traverse<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&Element<T>) -> bool,
    {
        let mut cursor = self.front();
        while let Some(e) = cursor {
            if !visitor(&e) {
                return false;
            }
            cursor = e.next();
        }
        true
    }

    /// Walk back to front until `visitor` returns `false`.
    pub fn traverse_rev<F>(&self, mut visitor: F) -> bool
    where
        F: FnMut(&Element<T>) -> bool,
    {
        let mut cursor = self.back();
        while let Some(e) = cursor {
            if !visitor(&e) {
                return false;
            }
            cursor = e.prev();
        }
        true
    }

    /// Visit every element front to back.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&Element<T>),
    {
        self.traverse(|e| {
            visitor(e);
            true
        });
    }

    /// Visit every element back to front.
    pub fn for_each_rev<F>(&self, mut visitor: F)
    where
        F: FnMut(&Element<T>),
    {
        self.traverse_rev(|e| {
            visitor(e);
            true
        });
    }

    /// Escape-safe iterator over the elements, front to back.
    ///
    /// Each step is computed from the previously yielded element when
    /// `next` is called, so changes made between steps are observed.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            last: None,
            done: false,
        }
    }

    /// Clone the values into a `Vec`, front to back.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().map(|e| e.value().clone()).collect()
    }

    // ── Helpers ────────────────────────────────────────────────

    fn owns(&self, e: &Element<T>) -> bool {
        !e.is_escaped() && Weak::as_ptr(&e.node.header) == Rc::as_ptr(&self.header)
    }

    fn last_node(&self) -> Rc<Node<T>> {
        self.header
            .root
            .prev_node()
            .filter(|node| !node.is_root())
            .unwrap_or_else(|| Rc::clone(&self.header.root))
    }
}

impl<T: fmt::Debug> fmt::Debug for SentinelList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for e in self.iter() {
            list.entry(&*e.value());
        }
        list.finish()
    }
}

/// Iterator over list elements. Created by [`SentinelList::iter`].
pub struct Iter<'a, T> {
    list: &'a SentinelList<T>,
    last: Option<Element<T>>,
    done: bool,
}

impl<T> Iterator for Iter<'_, T> {
    type Item = Element<T>;

    fn next(&mut self) -> Option<Element<T>> {
        if self.done {
            return None;
        }
        let next = match &self.last {
            None => self.list.front(),
            Some(e) => e.next(),
        };
        match &next {
            Some(e) => self.last = Some(e.clone()),
            None => self.done = true,
        }
        next
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(values: &[i32]) -> (SentinelList<i32>, Vec<Element<i32>>) {
        let list = SentinelList::new();
        let elements = values.iter().map(|&v| list.push_back(v)).collect();
        (list, elements)
    }

    #[test]
    fn empty_list_has_no_ends() {
        let list: SentinelList<i32> = SentinelList::new();
        assert!(list.is_empty());
        assert!(list.front().is_none());
        assert!(list.back().is_none());
        assert_eq!(list.iter().count(), 0);
    }

    #[test]
    fn push_and_insert_order() {
        let list = SentinelList::new();
        let two = list.push_back(2);
        list.push_front(0);
        list.insert_before(1, &two).unwrap();
        list.insert_after(3, &two).unwrap();
        assert_eq!(list.to_vec(), vec![0, 1, 2, 3]);
        assert_eq!(list.len(), 4);
        assert_eq!(*list.front().unwrap().value(), 0);
        assert_eq!(*list.back().unwrap().value(), 3);
    }

    #[test]
    fn sentinel_never_surfaces() {
        let (list, e) = list_of(&[1, 2]);
        assert!(e[0].prev().is_none());
        assert!(e[1].next().is_none());
        list.remove(&e[0]);
        list.remove(&e[1]);
        assert!(list.back().is_none());
        assert!(list.front().is_none());
    }

    #[test]
    fn moves() {
        let (list, e) = list_of(&[1, 2, 3, 4]);
        assert!(list.move_to_front(&e[3]));
        assert_eq!(list.to_vec(), vec![4, 1, 2, 3]);
        assert!(list.move_to_back(&e[3]));
        assert_eq!(list.to_vec(), vec![1, 2, 3, 4]);
        assert!(list.move_before(&e[3], &e[0]));
        assert_eq!(list.to_vec(), vec![4, 1, 2, 3]);
        assert!(list.move_after(&e[0], &e[2]));
        assert_eq!(list.to_vec(), vec![4, 2, 3, 1]);
        assert_eq!(*list.back().unwrap().value(), 1);

        assert!(!list.move_after(&e[0], &e[0]));
        assert!(!list.move_before(&e[2], &e[0]));
        assert!(!list.move_to_front(&e[3]));
    }

    #[test]
    fn escape_is_idempotent() {
        let (list, e) = list_of(&[1, 2, 3]);
        assert!(e[1].escape());
        assert!(!e[1].escape());
        assert!(!list.remove(&e[1]));
        assert_eq!(list.len(), 2);
        assert_eq!(list.to_vec(), vec![1, 3]);
        // The escaped element keeps its links for its holder.
        assert_eq!(*e[1].next().unwrap().value(), 3);
        assert_eq!(*e[1].prev().unwrap().value(), 1);
    }

    #[test]
    fn escape_during_traversal_continues() {
        let (list, _) = list_of(&[1, 2, 3, 4]);
        let mut seen = Vec::new();
        list.for_each(|e| {
            seen.push(*e.value());
            if *e.value() % 2 == 0 {
                e.escape();
            }
        });
        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert_eq!(list.to_vec(), vec![1, 3]);
    }

    #[test]
    fn escaping_successor_during_traversal_skips_it() {
        let (list, e) = list_of(&[1, 2, 3, 4]);
        let mut seen = Vec::new();
        for el in list.iter() {
            seen.push(*el.value());
            if el == e[0] {
                e[1].escape();
                el.escape();
            }
        }
        assert_eq!(seen, vec![1, 3, 4]);
    }

    #[test]
    fn walk_from_stale_escaped_chain() {
        let (list, e) = list_of(&[1, 2, 3, 4]);
        e[1].escape();
        e[2].escape();
        // From 2 (escaped), the walk crosses escaped 3 to reach 4.
        assert_eq!(*e[1].next().unwrap().value(), 4);
        assert_eq!(*e[2].prev().unwrap().value(), 1);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn reverse_traversal_with_escape() {
        let (list, _) = list_of(&[1, 2, 3]);
        let mut seen = Vec::new();
        list.for_each_rev(|e| {
            seen.push(*e.value());
            e.escape();
        });
        assert_eq!(seen, vec![3, 2, 1]);
        assert!(list.is_empty());
    }

    #[test]
    fn reverse_traversal_escaping_predecessor() {
        let list = SentinelList::new();
        for v in 1..=4 {
            list.push_back(v);
        }
        let mut seen = Vec::new();
        list.for_each_rev(|e| {
            seen.push(*e.value());
            if *e.value() == 3 {
                e.escape();
                // Temporary handle: the only owner of 2 once it escapes.
                if let Some(p) = e.prev() {
                    p.escape();
                }
            }
        });
        assert_eq!(seen, vec![4, 3, 1]);
        assert_eq!(list.to_vec(), vec![1, 4]);
    }

    #[test]
    fn prev_crosses_dropped_escaped_predecessor() {
        let (list, mut e) = list_of(&[0, 1, 2]);
        e[2].escape();
        e[1].escape();
        let c = e.pop().unwrap();
        e.pop();
        assert_eq!(c.prev().map(|p| *p.value()), Some(0));
        assert_eq!(list.to_vec(), vec![0]);
    }

    #[test]
    fn escaped_back_chain_drops_without_recursion() {
        let list = SentinelList::new();
        let elements: Vec<_> = (0..200_000).map(|v| list.push_back(v)).collect();
        for e in elements.iter().rev() {
            e.escape();
        }
        assert!(list.is_empty());
        drop(list);
        drop(elements);
    }

    #[test]
    fn foreign_elements_are_rejected() {
        let (a, ea) = list_of(&[1]);
        let (b, eb) = list_of(&[2]);
        assert!(!a.remove(&eb[0]));
        assert!(a.insert_after(5, &eb[0]).is_none());
        assert!(!b.move_before(&eb[0], &ea[0]));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn version_tracks_links() {
        let list = SentinelList::new();
        let v0 = list.version();
        let a = list.push_back(1);
        assert!(list.version() > v0);
        assert_eq!(a.version(), list.version());
        let b = list.push_back(2);
        list.move_to_front(&b);
        assert!(b.version() > a.version());
    }

    #[test]
    fn clear_escapes_everything() {
        let (list, e) = list_of(&[1, 2, 3]);
        list.clear();
        assert!(list.is_empty());
        assert!(e.iter().all(Element::is_escaped));
    }

    #[test]
    fn value_mut_updates_in_place() {
        let (list, e) = list_of(&[1]);
        *e[0].value_mut() += 1;
        assert_eq!(list.to_vec(), vec![2]);
        assert_eq!(format!("{list:?}"), "[2]");
    }

    #[test]
    fn long_list_drops_without_recursion() {
        let list = SentinelList::new();
        for v in 0..200_000 {
            list.push_back(v);
        }
        drop(list);
    }

    #[test]
    fn element_outlives_list() {
        let list = SentinelList::new();
        list.push_back(1);
        let e = list.push_back(2);
        drop(list);
        assert_eq!(*e.value(), 2);
        assert!(e.escape());
    }
}
