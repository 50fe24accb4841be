//! Mock [`MutationSource`].

use std::cell::RefCell;
use std::rc::Rc;

use sizewatch_core::observe::MutationCallback;
use sizewatch_core::{MutationSource, Subscription};

use crate::registry::Registry;

/// Records child-list observations. Parent links are declared by the test.
pub struct MockMutationSource<N> {
    registry: Registry<N, dyn Fn()>,
    parents: Rc<RefCell<Vec<(N, N)>>>,
}

impl<N> Clone for MockMutationSource<N> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            parents: Rc::clone(&self.parents),
        }
    }
}

impl<N: Clone + PartialEq + 'static> Default for MockMutationSource<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + PartialEq + 'static> MockMutationSource<N> {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            parents: Rc::default(),
        }
    }

    /// Declare `parent` as the container of `child`.
    pub fn set_parent(&self, child: N, parent: N) {
        let mut parents = self.parents.borrow_mut();
        parents.retain(|(c, _)| *c != child);
        parents.push((child, parent));
    }

    pub fn clear_parent(&self, child: &N) {
        self.parents.borrow_mut().retain(|(c, _)| c != child);
    }

    /// Report a child-list change of `container`. Returns how many callbacks ran.
    pub fn fire(&self, container: &N) -> usize {
        let mut delivered = 0;
        for (active, callback) in self.registry.matching(container) {
            if active.get() {
                callback();
                delivered += 1;
            }
        }
        delivered
    }

    /// Containers with a live observation, in subscription order.
    pub fn observed_containers(&self) -> Vec<N> {
        self.registry.keys()
    }

    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    pub fn subscribe_count(&self) -> usize {
        self.registry.subscribe_count()
    }

    pub fn release_count(&self) -> usize {
        self.registry.release_count()
    }
}

impl<N: Clone + PartialEq + 'static> MutationSource<N> for MockMutationSource<N> {
    fn parent(&self, node: &N) -> Option<N> {
        self.parents
            .borrow()
            .iter()
            .find(|(child, _)| child == node)
            .map(|(_, parent)| parent.clone())
    }

    fn observe_children(&self, container: &N, callback: MutationCallback) -> Subscription {
        self.registry.register(container.clone(), Rc::from(callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parents_are_declared() {
        let source = MockMutationSource::new();
        source.set_parent(1u32, 10);
        assert_eq!(source.parent(&1), Some(10));

        source.set_parent(1, 11);
        assert_eq!(source.parent(&1), Some(11));

        source.clear_parent(&1);
        assert_eq!(source.parent(&1), None);
    }

    #[test]
    fn counts_subscriptions() {
        let source = MockMutationSource::new();
        let sub = source.observe_children(&10u32, Box::new(|| {}));
        assert_eq!(source.fire(&10), 1);
        assert_eq!(source.observed_containers(), vec![10]);

        sub.release();
        assert_eq!(source.fire(&10), 0);
        assert_eq!((source.subscribe_count(), source.release_count()), (1, 1));
    }
}
