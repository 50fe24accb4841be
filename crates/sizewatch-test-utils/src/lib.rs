//! Test utilities for sizewatch.
//!
//! Mock observation sources that record every subscribe and release, so tests
//! can assert on subscription lifetimes without a real host.
//!
//! # Example
//!
//! ```rust
//! use sizewatch_core::{ResizeSource, Size};
//! use sizewatch_test_utils::MockResizeSource;
//!
//! let source = MockResizeSource::new();
//! let sub = source.observe_size(&1u32, Box::new(|size: Size<f32>| assert_eq!(size.width, 10.0)));
//!
//! assert_eq!(source.fire(&1, Size::new(10.0, 4.0)), 1);
//! drop(sub);
//! assert_eq!(source.active_count(), 0);
//! assert_eq!(source.release_count(), 1);
//! ```
//!
//! # Design
//!
//! Mocks are cheap handles over shared state: clone one, hand the clone to the
//! code under test and keep the original for assertions. Callbacks are invoked
//! with no internal borrow held, so they may subscribe or release re-entrantly.
//! A registration released while a `fire` is in progress is skipped.

pub mod mock_mutation;
pub mod mock_resize;

pub use mock_mutation::MockMutationSource;
pub use mock_resize::MockResizeSource;

mod registry;
