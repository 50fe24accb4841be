//! Dependency-keyed effect with cleanup.

use std::fmt;

type Cleanup = Box<dyn FnOnce()>;

/// An effect that re-runs when its dependency value changes.
///
/// The host calls [`LayoutEffect::run`] in its layout phase, after the tree
/// has been laid out and before painting. The previous cleanup always runs
/// before the next setup, and on [`dispose`](LayoutEffect::dispose) or drop.
pub struct LayoutEffect<D> {
    deps: Option<D>,
    cleanup: Option<Cleanup>,
    runs: u64,
}

impl<D> Default for LayoutEffect<D> {
    fn default() -> Self {
        Self {
            deps: None,
            cleanup: None,
            runs: 0,
        }
    }
}

impl<D: fmt::Debug> fmt::Debug for LayoutEffect<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEffect")
            .field("deps", &self.deps)
            .field("active", &self.cleanup.is_some())
            .field("runs", &self.runs)
            .finish()
    }
}

impl<D: PartialEq> LayoutEffect<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `setup` if `deps` differs from the last run, or if the effect has
    /// never run or was disposed. Returns whether `setup` ran.
    pub fn run<F, C>(&mut self, deps: D, setup: F) -> bool
    where
        F: FnOnce() -> C,
        C: FnOnce() + 'static,
    {
        if self.deps.as_ref() == Some(&deps) {
            return false;
        }

        self.run_cleanup();
        let cleanup = setup();
        self.cleanup = Some(Box::new(cleanup));
        self.deps = Some(deps);
        self.runs += 1;
        true
    }

    /// Run the outstanding cleanup and forget the dependency, so the next
    /// [`run`](LayoutEffect::run) always executes.
    pub fn dispose(&mut self) {
        self.run_cleanup();
        self.deps = None;
    }

    /// Whether a cleanup is pending.
    pub fn is_active(&self) -> bool {
        self.cleanup.is_some()
    }

    /// Number of times the setup closure ran.
    pub fn run_count(&self) -> u64 {
        self.runs
    }
}

impl<D> LayoutEffect<D> {
    fn run_cleanup(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl<D> Drop for LayoutEffect<D> {
    fn drop(&mut self) {
        self.run_cleanup();
    }
}
