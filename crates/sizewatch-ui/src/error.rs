//! Error types for element tree operations.

use std::fmt;

use crate::tree::NodeId;

/// Errors that can occur while editing or laying out an [`ElementTree`](crate::ElementTree).
#[derive(Debug)]
pub enum UiError {
    /// The element does not exist (never created, or removed).
    UnknownNode {
        /// The missing element.
        node: NodeId,
    },

    /// The element is not a direct child of the given parent.
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The element that is not its child.
        child: NodeId,
    },

    /// Insertion index past the end of the child list.
    IndexOutOfBounds {
        /// The parent being edited.
        parent: NodeId,
        /// Requested index.
        index: usize,
        /// Current number of children.
        len: usize,
    },

    /// Attaching the child would make an element its own ancestor.
    WouldCycle {
        /// The prospective parent.
        parent: NodeId,
        /// The prospective child (an ancestor of `parent`, or `parent` itself).
        child: NodeId,
    },

    /// The layout engine rejected an operation.
    Layout {
        /// The underlying Taffy error.
        source: taffy::TaffyError,
    },
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::UnknownNode { node } => {
                write!(f, "Unknown element: {:?}", node)
            }
            UiError::NotAChild { parent, child } => {
                write!(f, "{:?} is not a child of {:?}", child, parent)
            }
            UiError::IndexOutOfBounds { parent, index, len } => {
                write!(
                    f,
                    "Child index {} out of bounds for {:?} with {} children",
                    index, parent, len
                )
            }
            UiError::WouldCycle { parent, child } => {
                write!(f, "Adding {:?} under {:?} would create a cycle", child, parent)
            }
            UiError::Layout { source } => {
                write!(f, "Layout error: {}", source)
            }
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::Layout { source } => Some(source),
            _ => None,
        }
    }
}

impl From<taffy::TaffyError> for UiError {
    fn from(err: taffy::TaffyError) -> Self {
        UiError::Layout { source: err }
    }
}

/// Result type alias for element tree operations.
pub type UiResult<T> = Result<T, UiError>;
