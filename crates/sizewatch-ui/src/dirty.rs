//! Dirty flag tracking for elements.

use bitflags::bitflags;

bitflags! {
    /// What changed on an element since the last layout pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DirtyFlags: u8 {
        /// No changes
        const NONE              = 0b0000_0000;

        /// Style replaced
        const STYLE             = 0b0000_0001;

        /// Layout-affecting properties changed.
        /// Requires Taffy recomputation.
        const LAYOUT            = 0b0000_0010;

        /// Children were added, removed, or reordered.
        /// Requires layout recomputation and a child-list notification.
        const CHILDREN_ORDER    = 0b0000_0100;
    }
}

impl DirtyFlags {
    /// Returns true if any layout-affecting flags are set.
    #[inline]
    pub fn needs_layout(&self) -> bool {
        self.intersects(Self::LAYOUT | Self::CHILDREN_ORDER | Self::STYLE)
    }

    /// Returns true if the element should propagate dirty flags to ancestors.
    #[inline]
    pub fn should_propagate_to_parent(&self) -> bool {
        self.intersects(Self::LAYOUT | Self::CHILDREN_ORDER | Self::STYLE)
    }

    /// Flags that ancestors inherit: a child's change only affects their layout.
    #[inline]
    pub fn propagation_flags(&self) -> Self {
        if self.should_propagate_to_parent() {
            Self::LAYOUT
        } else {
            Self::NONE
        }
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        Self::NONE
    }
}
