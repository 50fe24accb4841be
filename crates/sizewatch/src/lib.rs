//! Sizewatch - track the rendered size of elements
//!
//! This crate keeps an index-aligned list of element sizes up to date and
//! tells the owning component when to re-render:
//! - [`SizeTracker`]: many elements, optionally resubscribing when the first
//!   element's parent gains or loses children
//! - [`track_size`]: one element, given directly or through a [`NodeRef`]
//!
//! Hosts plug in by implementing [`ResizeSource`] and [`MutationSource`] for
//! their element handle type. `sizewatch-ui` provides a taffy-backed element
//! tree that does this.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sizewatch::{SizeTracker, Size};
//!
//! let observers = tree.observers();
//! let mut tracker = SizeTracker::new(move || row_items(), observers.clone())
//!     .with_mutation_source(observers);
//! tracker.mount();
//!
//! // In the frame loop:
//! // tree.update()?;
//! // tracker.flush();
//! // let sizes = tracker.sizes();
//! ```

pub mod reactive;
pub mod single;
pub mod subject;
pub mod tracker;

pub use reactive::{LayoutEffect, Observable};
pub use single::{SingleSizeTracker, track_size};
pub use subject::{NodeRef, Subject};
pub use tracker::{SizeList, SizeTracker, TrackerOptions};

// Re-export the shared vocabulary
pub use sizewatch_core::{MutationSource, ResizeSource, Size, Subscription};

/// Build and mount a tracker over `get_nodes` that also watches the first
/// node's parent for child-list changes.
pub fn track_sizes<N, S>(get_nodes: impl Fn() -> Vec<Option<N>> + 'static, source: S) -> SizeTracker<N>
where
    N: Clone + 'static,
    S: ResizeSource<N> + MutationSource<N> + Clone + 'static,
{
    let mut tracker = SizeTracker::new(get_nodes, source.clone()).with_mutation_source(source);
    tracker.mount();
    tracker
}
