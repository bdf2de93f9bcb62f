//! Element handles.

use std::cell::{Ref, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::node::{unlink, Node};

/// A shared handle to one list node.
///
/// Cloning an `Element` clones the handle, not the value. Two elements are
/// equal when they refer to the same node.
pub struct Element<T> {
    pub(crate) node: Rc<Node<T>>,
}

impl<T> Element<T> {
    pub(crate) fn from_node(node: Rc<Node<T>>) -> Self {
        Self { node }
    }

    /// Borrow the value.
    ///
    /// # Panics
    ///
    /// Panics if the value is currently borrowed mutably.
    pub fn value(&self) -> Ref<'_, T> {
        match &self.node.value {
            Some(cell) => cell.borrow(),
            None => unreachable!("the sentinel root is never handed out"),
        }
    }

    /// Mutably borrow the value.
    ///
    /// # Panics
    ///
    /// Panics if the value is currently borrowed.
    pub fn value_mut(&self) -> RefMut<'_, T> {
        match &self.node.value {
            Some(cell) => cell.borrow_mut(),
            None => unreachable!("the sentinel root is never handed out"),
        }
    }

    /// Whether this element has escaped its list.
    pub fn is_escaped(&self) -> bool {
        self.node.escaped.get()
    }

    /// The list version at which this element was last linked.
    pub fn version(&self) -> u64 {
        self.node.version.get()
    }

    /// The next live element, or `None` at the end of the list.
    ///
    /// Works from an escaped element too: the walk follows the links the
    /// element had when it escaped and skips anything escaped since.
    pub fn next(&self) -> Option<Element<T>> {
        let mut cursor = self.node.next_node();
        while let Some(node) = cursor {
            if !node.escaped.get() {
                return Some(Element::from_node(node));
            }
            cursor = node.next_node();
        }
        None
    }

    /// The previous live element, or `None` at the start of the list.
    pub fn prev(&self) -> Option<Element<T>> {
        let mut cursor = self.node.prev_node();
        while let Some(node) = cursor {
            if node.is_root() {
                return None;
            }
            if !node.escaped.get() {
                return Some(Element::from_node(node));
            }
            cursor = node.prev_node();
        }
        None
    }

    /// Remove this element from its list.
    ///
    /// Idempotent: returns `false` if the element had already escaped.
    pub fn escape(&self) -> bool {
        if self.node.escaped.replace(true) {
            return false;
        }
        if let Some(header) = self.node.header.upgrade() {
            let back = self.node.prev_node();
            unlink(&header, &self.node);
            *self.node.back.borrow_mut() = back;
            header.len.set(header.len.get() - 1);
        }
        true
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Element<T>) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl<T> Clone for Element<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T> PartialEq for Element<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for Element<T> {}

impl<T: fmt::Debug> fmt::Debug for Element<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Element");
        match self.node.value.as_ref().map(|cell| cell.try_borrow()) {
            Some(Ok(value)) => s.field("value", &*value),
            _ => s.field("value", &format_args!("<borrowed>")),
        };
        s.field("escaped", &self.is_escaped()).finish()
    }
}
