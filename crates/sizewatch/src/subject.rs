//! What a single-element tracker observes.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A mutable slot holding the element a component rendered, filled in by the
/// host once the element exists.
///
/// Cloning shares the slot.
pub struct NodeRef<N> {
    current: Rc<RefCell<Option<N>>>,
}

impl<N> Clone for NodeRef<N> {
    fn clone(&self) -> Self {
        Self {
            current: Rc::clone(&self.current),
        }
    }
}

impl<N> Default for NodeRef<N> {
    fn default() -> Self {
        Self {
            current: Rc::new(RefCell::new(None)),
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for NodeRef<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeRef").field(&self.current.borrow()).finish()
    }
}

impl<N: Clone> NodeRef<N> {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_node(node: N) -> Self {
        Self {
            current: Rc::new(RefCell::new(Some(node))),
        }
    }

    pub fn current(&self) -> Option<N> {
        self.current.borrow().clone()
    }

    pub fn set(&self, node: Option<N>) {
        *self.current.borrow_mut() = node;
    }
}

/// The element observed by [`track_size`](crate::track_size).
#[derive(Debug, Clone)]
pub enum Subject<N> {
    /// A handle known up front (possibly absent).
    Node(Option<N>),
    /// A slot read each time the tracker subscribes.
    Ref(NodeRef<N>),
}

impl<N: Clone> Subject<N> {
    /// The element to observe right now.
    pub fn resolve(&self) -> Option<N> {
        match self {
            Subject::Node(node) => node.clone(),
            Subject::Ref(node_ref) => node_ref.current(),
        }
    }
}

impl<N> From<Option<N>> for Subject<N> {
    fn from(node: Option<N>) -> Self {
        Subject::Node(node)
    }
}

impl<N> From<NodeRef<N>> for Subject<N> {
    fn from(node_ref: NodeRef<N>) -> Self {
        Subject::Ref(node_ref)
    }
}
