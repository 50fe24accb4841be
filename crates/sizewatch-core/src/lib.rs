//! Sizewatch Core
//!
//! Shared vocabulary for the sizewatch crates: geometry, the observation
//! source traits implemented by hosts, subscription guards, logging and
//! profiling setup.

pub mod alloc;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod observe;
pub mod profiling;

pub use config::Config;
pub use geometry::Size;
pub use observe::{MutationSource, ResizeSource, Subscription};
