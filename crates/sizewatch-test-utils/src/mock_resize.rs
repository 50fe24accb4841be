//! Mock [`ResizeSource`].

use std::rc::Rc;

use sizewatch_core::observe::SizeCallback;
use sizewatch_core::{ResizeSource, Size, Subscription};

use crate::registry::Registry;

/// Records size observations and lets a test report sizes on demand.
pub struct MockResizeSource<N> {
    registry: Registry<N, dyn Fn(Size<f32>)>,
}

impl<N> Clone for MockResizeSource<N> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
        }
    }
}

impl<N: Clone + PartialEq + 'static> Default for MockResizeSource<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Clone + PartialEq + 'static> MockResizeSource<N> {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Report `size` for `node` to every live observer of it.
    ///
    /// Returns how many callbacks ran.
    pub fn fire(&self, node: &N, size: Size<f32>) -> usize {
        let mut delivered = 0;
        for (active, callback) in self.registry.matching(node) {
            if active.get() {
                callback(size);
                delivered += 1;
            }
        }
        delivered
    }

    /// Nodes with a live observation, in subscription order.
    pub fn observed_nodes(&self) -> Vec<N> {
        self.registry.keys()
    }

    /// Live observations.
    pub fn active_count(&self) -> usize {
        self.registry.active_count()
    }

    /// Live observations of `node`.
    pub fn active_for(&self, node: &N) -> usize {
        self.registry.matching(node).len()
    }

    /// Observations ever created.
    pub fn subscribe_count(&self) -> usize {
        self.registry.subscribe_count()
    }

    /// Observations released so far.
    pub fn release_count(&self) -> usize {
        self.registry.release_count()
    }
}

impl<N: Clone + PartialEq + 'static> ResizeSource<N> for MockResizeSource<N> {
    fn observe_size(&self, node: &N, callback: SizeCallback) -> Subscription {
        self.registry.register(node.clone(), Rc::from(callback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fire_reaches_only_matching_node() {
        let source = MockResizeSource::new();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _a = source.observe_size(&1u32, Box::new(move |_| hits_clone.set(hits_clone.get() + 1)));
        let _b = source.observe_size(&2u32, Box::new(|_| panic!("wrong node")));

        assert_eq!(source.fire(&1, Size::new(1.0, 1.0)), 1);
        assert_eq!(hits.get(), 1);
        assert_eq!(source.observed_nodes(), vec![1, 2]);
        assert_eq!(source.active_for(&2), 1);
    }

    #[test]
    fn release_during_fire_skips_remaining_callback() {
        let source = MockResizeSource::new();
        let second: Rc<std::cell::RefCell<Option<Subscription>>> = Rc::default();

        let second_clone = Rc::clone(&second);
        let _first = source.observe_size(
            &1u32,
            Box::new(move |_| {
                second_clone.borrow_mut().take();
            }),
        );
        *second.borrow_mut() = Some(source.observe_size(&1u32, Box::new(|_| panic!("released"))));

        assert_eq!(source.fire(&1, Size::new(2.0, 2.0)), 1);
        assert_eq!(source.release_count(), 1);
    }
}
