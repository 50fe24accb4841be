//! Sizewatch UI - Taffy-backed element tree with size and child-list observation
//!
//! This crate provides a small retained element tree that hosts size tracking:
//! - Flexbox and Grid layouts via Taffy
//! - Structural edits (append, insert, move, remove) with cycle checks
//! - Dirty flag propagation so layout only reruns when something changed
//! - Batched resize and child-list notifications through [`TreeObservers`]
//!
//! ## Quick Start
//!
//! ```rust
//! use sizewatch_core::{ResizeSource, Size};
//! use sizewatch_ui::{ElementTree, FlexDirection, Style, length};
//!
//! let mut tree = ElementTree::new();
//! let root = tree
//!     .add_element(Style {
//!         flex_direction: FlexDirection::Row,
//!         size: sizewatch_ui::taffy::Size {
//!             width: length(300.0),
//!             height: length(40.0),
//!         },
//!         ..Default::default()
//!     })
//!     .unwrap();
//! tree.set_root(root).unwrap();
//!
//! let observers = tree.observers();
//! let _subscription = observers.observe_size(
//!     &root,
//!     Box::new(|size: Size<f32>| println!("root is {}x{}", size.width, size.height)),
//! );
//!
//! // Once per frame: lay out and deliver notifications.
//! let stats = tree.update().unwrap();
//! assert_eq!(stats.resizes, 1);
//! ```

pub mod dirty;
pub mod error;
pub mod observers;
pub mod tree;

pub use dirty::DirtyFlags;
pub use error::{UiError, UiResult};
pub use observers::{DeliveryStats, TreeObservers};
pub use tree::{Element, ElementTree, LayoutRect, NodeId, TreeConfig};

// Re-export the layout vocabulary used to style elements
pub use taffy;
pub use taffy::prelude::{auto, length, percent};
pub use taffy::{Dimension, Display, FlexDirection, Style};
