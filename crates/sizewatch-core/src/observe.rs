//! Observation sources and subscription guards.
//!
//! A host (a DOM binding, a retained UI tree, a test double) exposes two kinds
//! of notification:
//!
//! - [`ResizeSource`]: reports the border-box size of one element whenever it
//!   changes.
//! - [`MutationSource`]: reports that the direct child list of a container
//!   changed.
//!
//! Both hand back a [`Subscription`]. Dropping or releasing it stops the
//! callback synchronously; the release closure runs exactly once.

use std::fmt;

use crate::geometry::Size;

/// Callback invoked with the new size of an observed element.
pub type SizeCallback = Box<dyn Fn(Size<f32>)>;

/// Callback invoked when an observed container's child list changed.
pub type MutationCallback = Box<dyn Fn()>;

/// Reports size changes of individual elements.
///
/// `N` is the host's element handle.
pub trait ResizeSource<N> {
    /// Start observing `node`. The callback fires with the element's size
    /// until the returned subscription is released.
    fn observe_size(&self, node: &N, callback: SizeCallback) -> Subscription;
}

/// Reports child-list changes of container elements.
pub trait MutationSource<N> {
    /// The container `node` currently lives in, if any.
    fn parent(&self, node: &N) -> Option<N>;

    /// Start observing the direct children of `container`.
    fn observe_children(&self, container: &N, callback: MutationCallback) -> Subscription;
}

/// RAII guard for an active observation.
///
/// The release closure runs once, either through [`Subscription::release`] or
/// on drop.
#[must_use = "dropping a Subscription releases it immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

static_assertions::assert_not_impl_any!(Subscription: Send, Sync);

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { release: None }
    }

    /// Whether the release closure has not run yet.
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    /// Release now instead of waiting for drop.
    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
