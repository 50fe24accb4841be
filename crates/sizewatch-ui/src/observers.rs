//! Size and child-list observation for the element tree.
//!
//! [`TreeObservers`] is a cloneable handle onto the tree's observer registry.
//! It implements [`ResizeSource`] and [`MutationSource`] for [`NodeId`], so it
//! can be handed to anything that tracks element sizes.
//!
//! Notifications are batched and delivered by [`ElementTree::update`](crate::ElementTree::update):
//! first one notification per container whose child list changed, then one
//! notification per resize observation whose element size differs from the
//! last size reported to it. A fresh observation reports the element's size
//! at the first delivery after it was registered, provided the element has
//! been laid out.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexSet;
use sizewatch_core::alloc::HashMap;
use sizewatch_core::observe::{MutationCallback, SizeCallback};
use sizewatch_core::profiling::profile_function;
use sizewatch_core::{MutationSource, ResizeSource, Size, Subscription};

use crate::tree::NodeId;

struct ResizeEntry {
    id: u64,
    node: NodeId,
    active: Rc<Cell<bool>>,
    /// Size last delivered to this observation.
    last: Rc<Cell<Option<Size<f32>>>>,
    callback: Rc<dyn Fn(Size<f32>)>,
}

struct MutationEntry {
    id: u64,
    container: NodeId,
    active: Rc<Cell<bool>>,
    callback: Rc<dyn Fn()>,
}

#[derive(Default)]
struct ObserverState {
    next_id: u64,
    resize: Vec<ResizeEntry>,
    mutation: Vec<MutationEntry>,
    parents: HashMap<NodeId, NodeId>,
    /// Containers whose child list changed since the last delivery.
    pending: IndexSet<NodeId>,
}

/// Counts from one delivery pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryStats {
    /// Child-list callbacks invoked
    pub mutations: usize,
    /// Resize callbacks invoked
    pub resizes: usize,
}

/// Observer registry shared between an [`ElementTree`](crate::ElementTree) and its observers.
#[derive(Clone, Default)]
pub struct TreeObservers {
    state: Rc<RefCell<ObserverState>>,
}

impl fmt::Debug for TreeObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TreeObservers")
            .field("resize", &state.resize.len())
            .field("mutation", &state.mutation.len())
            .field("pending", &state.pending.len())
            .finish()
    }
}

impl TreeObservers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Live resize observations.
    pub fn resize_observer_count(&self) -> usize {
        self.state.borrow().resize.len()
    }

    /// Live child-list observations.
    pub fn mutation_observer_count(&self) -> usize {
        self.state.borrow().mutation.len()
    }

    /// Whether child-list changes are waiting for delivery.
    pub fn has_pending_mutations(&self) -> bool {
        !self.state.borrow().pending.is_empty()
    }

    pub(crate) fn set_parent(&self, child: NodeId, parent: Option<NodeId>) {
        let mut state = self.state.borrow_mut();
        match parent {
            Some(parent) => {
                state.parents.insert(child, parent);
            }
            None => {
                state.parents.remove(&child);
            }
        }
    }

    pub(crate) fn record_child_list_change(&self, container: NodeId) {
        tracing::trace!(?container, "child list changed");
        self.state.borrow_mut().pending.insert(container);
    }

    pub(crate) fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.parents.clear();
        state.pending.clear();
    }

    /// Deliver queued child-list changes, then size changes.
    ///
    /// `size_of` returns the laid-out size of an element, or `None` if it has
    /// none (detached, removed, or never laid out). Callbacks run with no
    /// internal borrow held; an observation released by an earlier callback in
    /// the same pass is skipped.
    pub fn deliver(&self, size_of: impl Fn(NodeId) -> Option<Size<f32>>) -> DeliveryStats {
        profile_function!();

        let mut stats = DeliveryStats::default();

        let mut mutation_batch: Vec<(Rc<Cell<bool>>, Rc<dyn Fn()>)> = Vec::new();
        {
            let mut state = self.state.borrow_mut();
            let pending: Vec<NodeId> = state.pending.drain(..).collect();
            for container in pending {
                for entry in state.mutation.iter().filter(|entry| entry.container == container) {
                    mutation_batch.push((Rc::clone(&entry.active), Rc::clone(&entry.callback)));
                }
            }
        }
        for (active, callback) in mutation_batch {
            if active.get() {
                callback();
                stats.mutations += 1;
            }
        }

        let resize_batch: Vec<ResizeDelivery> = {
            let state = self.state.borrow();
            state
                .resize
                .iter()
                .map(|entry| ResizeDelivery {
                    node: entry.node,
                    active: Rc::clone(&entry.active),
                    last: Rc::clone(&entry.last),
                    callback: Rc::clone(&entry.callback),
                })
                .collect()
        };
        for delivery in resize_batch {
            if !delivery.active.get() {
                continue;
            }
            let Some(size) = size_of(delivery.node) else {
                continue;
            };
            if delivery.last.get() == Some(size) {
                continue;
            }
            delivery.last.set(Some(size));
            (delivery.callback)(size);
            stats.resizes += 1;
        }

        if stats != DeliveryStats::default() {
            tracing::trace!(?stats, "observations delivered");
        }
        stats
    }

    fn next_id(state: &mut ObserverState) -> u64 {
        let id = state.next_id;
        state.next_id += 1;
        id
    }

    fn release_handle(&self, id: u64, active: Rc<Cell<bool>>) -> Subscription {
        let weak = Rc::downgrade(&self.state);
        Subscription::new(move || {
            active.set(false);
            if let Some(state) = weak.upgrade() {
                let mut state = state.borrow_mut();
                state.resize.retain(|entry| entry.id != id);
                state.mutation.retain(|entry| entry.id != id);
            }
        })
    }
}

struct ResizeDelivery {
    node: NodeId,
    active: Rc<Cell<bool>>,
    last: Rc<Cell<Option<Size<f32>>>>,
    callback: Rc<dyn Fn(Size<f32>)>,
}

impl ResizeSource<NodeId> for TreeObservers {
    fn observe_size(&self, node: &NodeId, callback: SizeCallback) -> Subscription {
        let active = Rc::new(Cell::new(true));
        let id = {
            let mut state = self.state.borrow_mut();
            let id = Self::next_id(&mut state);
            state.resize.push(ResizeEntry {
                id,
                node: *node,
                active: Rc::clone(&active),
                last: Rc::new(Cell::new(None)),
                callback: Rc::from(callback),
            });
            id
        };
        self.release_handle(id, active)
    }
}

impl MutationSource<NodeId> for TreeObservers {
    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.state.borrow().parents.get(node).copied()
    }

    fn observe_children(&self, container: &NodeId, callback: MutationCallback) -> Subscription {
        let active = Rc::new(Cell::new(true));
        let id = {
            let mut state = self.state.borrow_mut();
            let id = Self::next_id(&mut state);
            state.mutation.push(MutationEntry {
                id,
                container: *container,
                active: Rc::clone(&active),
                callback: Rc::from(callback),
            });
            id
        };
        self.release_handle(id, active)
    }
}
