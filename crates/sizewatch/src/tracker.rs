//! Size tracking for a dynamic list of elements.
//!
//! A [`SizeTracker`] owns one subscription cycle at a time. A cycle is built
//! from a fresh call to the node accessor:
//!
//! - one [`ResizeSource`] subscription per present node, each writing only its
//!   own slot of the size list;
//! - optionally one [`MutationSource`] subscription on the parent of the first
//!   node, which bumps the epoch when the parent's child list changes.
//!
//! The cycle lives inside a [`LayoutEffect`] keyed on the epoch, so the next
//! [`SizeTracker::flush`] after an epoch bump releases the whole cycle and
//! builds a new one. Sibling insertions and removals are picked up this way.

use std::rc::Rc;

use sizewatch_core::profiling::profile_function;
use sizewatch_core::{MutationSource, ResizeSource, Size, Subscription};

use crate::reactive::{LayoutEffect, Observable};

/// Last known size of each tracked node, index-aligned with the node list.
pub type SizeList = Vec<Option<Size<f32>>>;

/// Options for a [`SizeTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerOptions {
    /// Observe the first node's parent for child-list changes and resubscribe
    /// when they happen. Has no effect without a mutation source.
    pub observe_mutation: bool,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            observe_mutation: true,
        }
    }
}

/// Tracks the sizes of the nodes returned by an accessor.
///
/// The host drives the lifecycle:
///
/// 1. [`mount`](SizeTracker::mount) once the nodes exist;
/// 2. [`flush`](SizeTracker::flush) in every layout phase, which resubscribes
///    if the parent's child list changed since the last cycle;
/// 3. [`unmount`](SizeTracker::unmount) (or drop) to release everything.
///
/// Re-render requests are delivered to [`on_change`](SizeTracker::on_change)
/// listeners.
pub struct SizeTracker<N: 'static> {
    get_nodes: Rc<dyn Fn() -> Vec<Option<N>>>,
    resize: Rc<dyn ResizeSource<N>>,
    mutation: Option<Rc<dyn MutationSource<N>>>,
    options: TrackerOptions,
    sizes: Observable<SizeList>,
    epoch: Observable<u64>,
    effect: LayoutEffect<u64>,
    mounted: bool,
}

impl<N: Clone + 'static> SizeTracker<N> {
    /// Create an unmounted tracker.
    pub fn new(
        get_nodes: impl Fn() -> Vec<Option<N>> + 'static,
        resize: impl ResizeSource<N> + 'static,
    ) -> Self {
        Self {
            get_nodes: Rc::new(get_nodes),
            resize: Rc::new(resize),
            mutation: None,
            options: TrackerOptions::default(),
            sizes: Observable::new(Vec::new()),
            epoch: Observable::new(0),
            effect: LayoutEffect::new(),
            mounted: false,
        }
    }

    /// Attach the source used to find the first node's parent and watch its
    /// child list.
    pub fn with_mutation_source(mut self, mutation: impl MutationSource<N> + 'static) -> Self {
        self.mutation = Some(Rc::new(mutation));
        self
    }

    /// Replace the default [`TrackerOptions`].
    pub fn with_options(mut self, options: TrackerOptions) -> Self {
        self.options = options;
        self
    }

    /// Options this tracker was built with.
    pub fn options(&self) -> TrackerOptions {
        self.options
    }

    /// Subscribe to the current nodes. Does nothing if already mounted.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.sync();
    }

    /// Layout-phase hook: rebuild the subscription cycle if the epoch moved.
    ///
    /// Returns whether a new cycle was built. No-op while unmounted.
    pub fn flush(&mut self) -> bool {
        if !self.mounted {
            return false;
        }
        self.sync()
    }

    /// Release every subscription of the current cycle and forget the
    /// reported sizes, so a later [`mount`](SizeTracker::mount) starts empty.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.effect.dispose();
        self.sizes.set(Vec::new());
        tracing::trace!("size tracker unmounted");
    }

    /// Force the next [`flush`](SizeTracker::flush) to re-read the nodes, as
    /// if the observed parent's child list had changed.
    pub fn invalidate(&self) {
        bump(&self.epoch);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Snapshot of the size list.
    pub fn sizes(&self) -> SizeList {
        self.sizes.get()
    }

    /// Size of the node at `index`, if it has been reported.
    pub fn size(&self, index: usize) -> Option<Size<f32>> {
        self.sizes.with(|sizes| sizes.get(index).copied().flatten())
    }

    /// Number of child-list changes seen so far.
    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Register a re-render callback, invoked whenever a size slot changes or
    /// the epoch moves.
    pub fn on_change(&self, callback: impl Fn() + 'static) -> Subscription {
        let callback: Rc<dyn Fn()> = Rc::new(callback);

        let on_sizes = Rc::clone(&callback);
        let sizes_sub = self.sizes.subscribe(move |_| on_sizes());
        let epoch_sub = self.epoch.subscribe(move |_| callback());

        Subscription::new(move || {
            sizes_sub.release();
            epoch_sub.release();
        })
    }

    fn sync(&mut self) -> bool {
        let epoch = self.epoch.get();
        let get_nodes = Rc::clone(&self.get_nodes);
        let resize = Rc::clone(&self.resize);
        let mutation = if self.options.observe_mutation {
            self.mutation.clone()
        } else {
            None
        };
        let sizes = self.sizes.clone();
        let epoch_cell = self.epoch.clone();

        self.effect.run(epoch, move || {
            let subscriptions = subscribe_cycle(
                &*get_nodes,
                &*resize,
                mutation.as_deref(),
                &sizes,
                &epoch_cell,
            );
            tracing::debug!(epoch, subscriptions = subscriptions.len(), "size tracker subscribed");
            move || {
                for subscription in subscriptions {
                    subscription.release();
                }
            }
        })
    }
}

impl<N: 'static> std::fmt::Debug for SizeTracker<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeTracker")
            .field("options", &self.options)
            .field("mounted", &self.mounted)
            .field("sizes", &self.sizes)
            .field("epoch", &self.epoch)
            .finish()
    }
}

fn bump(epoch: &Observable<u64>) {
    epoch.update(|epoch| {
        *epoch = epoch.wrapping_add(1);
        true
    });
}

/// Build one subscription cycle.
fn subscribe_cycle<N: Clone + 'static>(
    get_nodes: &dyn Fn() -> Vec<Option<N>>,
    resize: &dyn ResizeSource<N>,
    mutation: Option<&dyn MutationSource<N>>,
    sizes: &Observable<SizeList>,
    epoch: &Observable<u64>,
) -> Vec<Subscription> {
    profile_function!();

    let nodes = get_nodes();
    sizes.update(|list| {
        let changed = list.len() != nodes.len();
        list.resize(nodes.len(), None);
        changed
    });

    let mut subscriptions = Vec::with_capacity(nodes.len() + 1);
    for (index, node) in nodes.iter().enumerate() {
        let Some(node) = node else {
            tracing::trace!(index, "skipping absent node");
            continue;
        };

        let sizes = sizes.clone();
        subscriptions.push(resize.observe_size(
            node,
            Box::new(move |size| {
                sizes.update(|list| match list.get_mut(index) {
                    Some(slot) if *slot != Some(size) => {
                        *slot = Some(size);
                        true
                    }
                    _ => false,
                });
            }),
        ));
    }

    if let Some(mutation) = mutation {
        match nodes.first().and_then(|first| first.as_ref()) {
            Some(first) => match mutation.parent(first) {
                Some(parent) => {
                    let epoch = epoch.clone();
                    subscriptions.push(mutation.observe_children(
                        &parent,
                        Box::new(move || bump(&epoch)),
                    ));
                }
                None => tracing::trace!("first node has no parent, child list not observed"),
            },
            None => tracing::trace!("no first node, child list not observed"),
        }
    }

    subscriptions
}

#[cfg(test)]
mod tests {
    use super::*;
    use sizewatch_test_utils::{MockMutationSource, MockResizeSource};
    use std::cell::{Cell, RefCell};

    const PARENT: u32 = 100;

    fn nodes_of(list: &Rc<RefCell<Vec<Option<u32>>>>) -> impl Fn() -> Vec<Option<u32>> + 'static {
        let list = Rc::clone(list);
        move || list.borrow().clone()
    }

    fn setup(
        nodes: Vec<Option<u32>>,
    ) -> (
        SizeTracker<u32>,
        Rc<RefCell<Vec<Option<u32>>>>,
        MockResizeSource<u32>,
        MockMutationSource<u32>,
    ) {
        let resize = MockResizeSource::new();
        let mutation = MockMutationSource::new();
        for node in nodes.iter().flatten() {
            mutation.set_parent(*node, PARENT);
        }
        let list = Rc::new(RefCell::new(nodes));
        let tracker = SizeTracker::new(nodes_of(&list), resize.clone())
            .with_mutation_source(mutation.clone());
        (tracker, list, resize, mutation)
    }

    #[test]
    fn mount_yields_one_empty_slot_per_node() {
        let (mut tracker, _list, resize, mutation) = setup(vec![Some(1), Some(2), Some(3)]);
        tracker.mount();

        assert_eq!(tracker.sizes(), vec![None, None, None]);
        assert_eq!(resize.active_count(), 3);
        assert_eq!(mutation.active_count(), 1);
        assert_eq!(mutation.observed_containers(), vec![PARENT]);
    }

    #[test]
    fn notification_updates_only_its_slot() {
        let (mut tracker, _list, resize, _mutation) = setup(vec![Some(1), Some(2), Some(3)]);
        tracker.mount();

        resize.fire(&1, Size::new(10.0, 10.0));
        resize.fire(&3, Size::new(30.0, 5.0));
        let before = tracker.sizes();

        resize.fire(&2, Size::new(20.0, 8.0));
        let after = tracker.sizes();

        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], Some(Size::new(20.0, 8.0)));
        assert_eq!(after[2], before[2]);
        assert_eq!(tracker.size(2), Some(Size::new(30.0, 5.0)));
    }

    #[test]
    fn absent_nodes_keep_their_slot_without_subscribing() {
        let (mut tracker, _list, resize, _mutation) = setup(vec![Some(1), None, Some(3)]);
        tracker.mount();

        assert_eq!(tracker.sizes().len(), 3);
        assert_eq!(resize.active_count(), 2);
    }

    #[test]
    fn observe_mutation_off_never_subscribes_to_children() {
        let (tracker, _list, resize, mutation) = setup(vec![Some(1), Some(2)]);
        let mut tracker = tracker.with_options(TrackerOptions {
            observe_mutation: false,
        });
        tracker.mount();

        assert_eq!(mutation.fire(&PARENT), 0);
        assert!(!tracker.flush());
        assert_eq!(mutation.subscribe_count(), 0);
        assert_eq!(resize.active_count(), 2);
    }

    #[test]
    fn missing_first_node_or_parent_skips_mutation_observer() {
        let (mut tracker, _list, _resize, mutation) = setup(vec![None, Some(2)]);
        tracker.mount();
        assert_eq!(mutation.subscribe_count(), 0);

        let resize = MockResizeSource::new();
        let orphan_mutation = MockMutationSource::<u32>::new();
        let mut orphan = SizeTracker::new(|| vec![Some(7u32)], resize)
            .with_mutation_source(orphan_mutation.clone());
        orphan.mount();
        assert_eq!(orphan_mutation.subscribe_count(), 0);
    }

    #[test]
    fn child_list_change_resubscribes_on_flush() {
        let (mut tracker, list, resize, mutation) = setup(vec![Some(1), Some(2)]);
        tracker.mount();
        resize.fire(&1, Size::new(10.0, 10.0));
        assert_eq!(resize.subscribe_count(), 2);

        // A sibling is inserted into the observed parent.
        mutation.set_parent(3, PARENT);
        list.borrow_mut().push(Some(3));
        assert_eq!(mutation.fire(&PARENT), 1);
        assert_eq!(tracker.epoch(), 1);

        // Nothing changes until the layout phase.
        assert_eq!(resize.active_count(), 2);
        assert!(tracker.flush());

        assert_eq!(resize.release_count(), 2);
        assert_eq!(resize.subscribe_count(), 5);
        assert_eq!(resize.active_count(), 3);
        assert_eq!(mutation.release_count(), 1);
        assert_eq!(mutation.active_count(), 1);
        assert_eq!(
            tracker.sizes(),
            vec![Some(Size::new(10.0, 10.0)), None, None]
        );

        // Second flush without another change does nothing.
        assert!(!tracker.flush());
        assert_eq!(resize.subscribe_count(), 5);
    }

    #[test]
    fn removed_sibling_shrinks_size_list() {
        let (mut tracker, list, resize, mutation) = setup(vec![Some(1), Some(2), Some(3)]);
        tracker.mount();
        resize.fire(&3, Size::new(1.0, 1.0));

        list.borrow_mut().pop();
        mutation.fire(&PARENT);
        tracker.flush();

        assert_eq!(tracker.sizes(), vec![None, None]);
        assert_eq!(resize.active_count(), 2);
        assert_eq!(resize.fire(&3, Size::new(2.0, 2.0)), 0);
    }

    #[test]
    fn unmount_releases_everything_once() {
        let (mut tracker, _list, resize, mutation) = setup(vec![Some(1), Some(2)]);
        tracker.mount();
        tracker.unmount();

        assert_eq!(resize.active_count(), 0);
        assert_eq!(resize.release_count(), 2);
        assert_eq!(mutation.release_count(), 1);
        assert_eq!(resize.fire(&1, Size::new(5.0, 5.0)), 0);
        assert_eq!(mutation.fire(&PARENT), 0);
        assert!(tracker.sizes().is_empty());

        tracker.unmount();
        drop(tracker);
        assert_eq!(resize.release_count(), 2);
        assert_eq!(mutation.release_count(), 1);
    }

    #[test]
    fn drop_releases_everything() {
        let (mut tracker, _list, resize, mutation) = setup(vec![Some(1)]);
        tracker.mount();
        drop(tracker);

        assert_eq!(resize.active_count(), 0);
        assert_eq!(mutation.active_count(), 0);
    }

    #[test]
    fn accessor_runs_once_per_cycle() {
        let calls = Rc::new(Cell::new(0u32));
        let calls_clone = Rc::clone(&calls);
        let resize = MockResizeSource::new();
        let mut tracker = SizeTracker::new(
            move || {
                calls_clone.set(calls_clone.get() + 1);
                vec![Some(1u32)]
            },
            resize,
        );

        assert_eq!(calls.get(), 0);
        tracker.mount();
        tracker.mount();
        tracker.flush();
        assert_eq!(calls.get(), 1);

        tracker.invalidate();
        tracker.flush();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn flush_before_mount_is_noop() {
        let (mut tracker, _list, resize, _mutation) = setup(vec![Some(1)]);
        assert!(!tracker.flush());
        assert_eq!(resize.subscribe_count(), 0);
    }

    #[test]
    fn remount_starts_new_cycle() {
        let (mut tracker, _list, resize, _mutation) = setup(vec![Some(1)]);
        tracker.mount();
        resize.fire(&1, Size::new(100.0, 50.0));
        assert_eq!(tracker.sizes(), vec![Some(Size::new(100.0, 50.0))]);

        tracker.unmount();
        tracker.mount();

        assert_eq!(tracker.sizes(), vec![None]);
        assert_eq!(resize.subscribe_count(), 2);
        assert_eq!(resize.active_count(), 1);
    }

    #[test]
    fn equal_size_leaves_list_version_alone() {
        let (mut tracker, _list, resize, _mutation) = setup(vec![Some(1), Some(2)]);
        tracker.mount();
        resize.fire(&1, Size::new(3.0, 3.0));
        let version = tracker.sizes.version();

        resize.fire(&1, Size::new(3.0, 3.0));
        assert_eq!(tracker.sizes.version(), version);

        resize.fire(&2, Size::new(3.0, 3.0));
        assert_eq!(tracker.sizes.version(), version + 1);
    }

    #[test]
    fn on_change_fires_for_sizes_and_epoch() {
        let (mut tracker, _list, resize, mutation) = setup(vec![Some(1)]);
        let renders = Rc::new(Cell::new(0u32));
        let renders_clone = Rc::clone(&renders);
        tracker.mount();
        let sub = tracker.on_change(move || renders_clone.set(renders_clone.get() + 1));

        resize.fire(&1, Size::new(4.0, 4.0));
        assert_eq!(renders.get(), 1);

        // Same size again: nothing changed, no re-render.
        resize.fire(&1, Size::new(4.0, 4.0));
        assert_eq!(renders.get(), 1);

        mutation.fire(&PARENT);
        assert_eq!(renders.get(), 2);

        sub.release();
        resize.fire(&1, Size::new(8.0, 8.0));
        assert_eq!(renders.get(), 2);
    }
}
