//! Single-element convenience over [`SizeTracker`].

use sizewatch_core::{ResizeSource, Size, Subscription};

use crate::subject::Subject;
use crate::tracker::{SizeTracker, TrackerOptions};

/// Tracks the size of one element. Built by [`track_size`].
#[derive(Debug)]
pub struct SingleSizeTracker<N: 'static> {
    tracker: SizeTracker<N>,
}

impl<N: Clone + 'static> SingleSizeTracker<N> {
    /// Last reported size, `None` until the first notification or when the
    /// subject resolved to no element.
    pub fn size(&self) -> Option<Size<f32>> {
        self.tracker.size(0)
    }

    pub fn flush(&mut self) -> bool {
        self.tracker.flush()
    }

    /// Re-resolve the subject on the next [`flush`](SingleSizeTracker::flush),
    /// e.g. after a [`NodeRef`](crate::NodeRef) was filled in.
    pub fn invalidate(&self) {
        self.tracker.invalidate();
    }

    pub fn unmount(&mut self) {
        self.tracker.unmount();
    }

    pub fn on_change(&self, callback: impl Fn() + 'static) -> Subscription {
        self.tracker.on_change(callback)
    }

    pub fn tracker(&self) -> &SizeTracker<N> {
        &self.tracker
    }
}

/// Track the size of `subject` without watching its parent's children.
///
/// The returned tracker is already mounted.
pub fn track_size<N: Clone + 'static>(
    subject: impl Into<Subject<N>>,
    resize: impl ResizeSource<N> + 'static,
) -> SingleSizeTracker<N> {
    let subject = subject.into();
    let mut tracker = SizeTracker::new(move || vec![subject.resolve()], resize).with_options(
        TrackerOptions {
            observe_mutation: false,
        },
    );
    tracker.mount();
    SingleSizeTracker { tracker }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::NodeRef;
    use sizewatch_test_utils::MockResizeSource;

    #[test]
    fn none_until_first_notification() {
        let resize = MockResizeSource::new();
        let tracked = track_size(Some(1u32), resize.clone());

        assert_eq!(tracked.size(), None);

        resize.fire(&1, Size::new(100.0, 50.0));
        assert_eq!(tracked.size(), Some(Size::new(100.0, 50.0)));
    }

    #[test]
    fn empty_ref_creates_no_subscription() {
        let resize = MockResizeSource::<u32>::new();
        let node_ref = NodeRef::new();
        let tracked = track_size(node_ref, resize.clone());

        assert_eq!(tracked.size(), None);
        assert_eq!(resize.subscribe_count(), 0);
    }

    #[test]
    fn filled_ref_is_picked_up_after_invalidate() {
        let resize = MockResizeSource::new();
        let node_ref = NodeRef::new();
        let mut tracked = track_size(node_ref.clone(), resize.clone());

        node_ref.set(Some(4u32));
        assert!(!tracked.flush());
        assert_eq!(resize.subscribe_count(), 0);

        tracked.invalidate();
        assert!(tracked.flush());
        assert_eq!(resize.active_count(), 1);

        resize.fire(&4, Size::new(3.0, 2.0));
        assert_eq!(tracked.size(), Some(Size::new(3.0, 2.0)));
    }

    #[test]
    fn never_observes_mutations() {
        let resize = MockResizeSource::new();
        let tracked = track_size(Some(1u32), resize);
        assert!(!tracked.tracker().options().observe_mutation);
    }

    #[test]
    fn unmount_releases_subscription() {
        let resize = MockResizeSource::new();
        let mut tracked = track_size(Some(1u32), resize.clone());
        tracked.unmount();

        assert_eq!(resize.active_count(), 0);
        assert_eq!(resize.release_count(), 1);
    }
}
