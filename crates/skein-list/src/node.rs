//! Node storage and the shared list header.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// List-wide bookkeeping shared (weakly) with every node.
pub(crate) struct Header<T> {
    pub root: Rc<Node<T>>,
    pub len: Cell<usize>,
    pub version: Cell<u64>,
}

impl<T> Header<T> {
    pub fn bump(&self) -> u64 {
        let v = self.version.get() + 1;
        self.version.set(v);
        v
    }
}

pub(crate) struct Node<T> {
    /// `None` only for the sentinel root.
    pub value: Option<RefCell<T>>,
    /// Owning forward link. `None` marks the root boundary.
    pub next: RefCell<Option<Rc<Node<T>>>>,
    pub prev: RefCell<Weak<Node<T>>>,
    /// Owning link to the predecessor at escape time. Set only once the
    /// node has escaped, when no live link points at it any more.
    pub back: RefCell<Option<Rc<Node<T>>>>,
    /// The list this node was created in.
    pub header: Weak<Header<T>>,
    pub escaped: Cell<bool>,
    /// List version when the node was last linked.
    pub version: Cell<u64>,
}

impl<T> Node<T> {
    pub fn root() -> Self {
        Self {
            value: None,
            next: RefCell::new(None),
            prev: RefCell::new(Weak::new()),
            back: RefCell::new(None),
            header: Weak::new(),
            escaped: Cell::new(false),
            version: Cell::new(0),
        }
    }

    pub fn item(value: T, header: Weak<Header<T>>) -> Self {
        Self {
            value: Some(RefCell::new(value)),
            next: RefCell::new(None),
            prev: RefCell::new(Weak::new()),
            back: RefCell::new(None),
            header,
            escaped: Cell::new(false),
            version: Cell::new(0),
        }
    }

    pub fn is_root(&self) -> bool {
        self.value.is_none()
    }

    pub fn next_node(&self) -> Option<Rc<Node<T>>> {
        self.next.borrow().clone()
    }

    pub fn prev_node(&self) -> Option<Rc<Node<T>>> {
        if let Some(back) = self.back.borrow().as_ref() {
            return Some(Rc::clone(back));
        }
        self.prev.borrow().upgrade()
    }
}

// Tear owning chains (forward links and escaped back links) down
// iteratively so long lists cannot overflow the stack through recursive
// `Rc` drops.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut pending: Vec<Rc<Node<T>>> = Vec::new();
        pending.extend(self.next.get_mut().take());
        pending.extend(self.back.get_mut().take());
        while let Some(node) = pending.pop() {
            if let Ok(mut node) = Rc::try_unwrap(node) {
                pending.extend(node.next.get_mut().take());
                pending.extend(node.back.get_mut().take());
            }
        }
    }
}

/// Link `node` between `prev` and `next` (`None` = root boundary).
pub(crate) fn link_between<T>(
    header: &Header<T>,
    node: &Rc<Node<T>>,
    prev: &Rc<Node<T>>,
    next: Option<Rc<Node<T>>>,
) {
    *node.prev.borrow_mut() = Rc::downgrade(prev);
    *node.next.borrow_mut() = next.clone();
    match next {
        Some(n) => *n.prev.borrow_mut() = Rc::downgrade(node),
        None => *header.root.prev.borrow_mut() = Rc::downgrade(node),
    }
    *prev.next.borrow_mut() = Some(Rc::clone(node));
    node.version.set(header.bump());
}

/// Re-link `node`'s neighbours around it. The node's own links are kept.
pub(crate) fn unlink<T>(header: &Header<T>, node: &Rc<Node<T>>) {
    let Some(prev) = node.prev_node() else {
        return;
    };
    let next = node.next_node();
    let back_link = node.prev.borrow().clone();
    match &next {
        Some(n) => *n.prev.borrow_mut() = back_link,
        None => *header.root.prev.borrow_mut() = back_link,
    }
    *prev.next.borrow_mut() = next;
    header.bump();
}
