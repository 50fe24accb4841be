//! Element tree with Taffy layout integration.

use indexmap::IndexMap;
use sizewatch_core::Size;
use sizewatch_core::alloc::HashSet;
use sizewatch_core::profiling::profile_function;
use taffy::{AvailableSpace, Style, TaffyTree};

use crate::dirty::DirtyFlags;
use crate::error::{UiError, UiResult};
use crate::observers::{DeliveryStats, TreeObservers};

/// Element identifier in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Layout information computed by Taffy, relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutRect {
    pub fn size(&self) -> Size<f32> {
        Size::new(self.width, self.height)
    }
}

/// Tree-wide settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    /// Space available to the root element.
    pub viewport: Size<f32>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            viewport: Size::new(800.0, 600.0),
        }
    }
}

/// An element in the tree.
pub struct Element {
    pub style: Style,
    pub taffy_node: taffy::NodeId,
    pub layout: LayoutRect,
    /// Whether `layout` comes from the last layout pass.
    pub laid_out: bool,
    pub dirty_flags: DirtyFlags,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Bumped whenever the element's layout is invalidated
    pub layout_version: u32,
}

/// Retained element tree.
///
/// Structural edits are mirrored into Taffy and queued as child-list
/// notifications; [`update`](ElementTree::update) lays the tree out and
/// delivers notifications to [`TreeObservers`].
pub struct ElementTree {
    taffy: TaffyTree<()>,
    nodes: IndexMap<NodeId, Element>,
    root: Option<NodeId>,
    next_id: usize,
    /// Elements with pending dirty flags
    dirty_nodes: HashSet<NodeId>,
    config: TreeConfig,
    observers: TreeObservers,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            taffy: TaffyTree::new(),
            nodes: IndexMap::new(),
            root: None,
            next_id: 0,
            dirty_nodes: HashSet::new(),
            config,
            observers: TreeObservers::new(),
        }
    }

    /// Handle for observing sizes and child lists of this tree's elements.
    pub fn observers(&self) -> TreeObservers {
        self.observers.clone()
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn set_viewport(&mut self, viewport: Size<f32>) {
        if self.config.viewport != viewport {
            self.config.viewport = viewport;
            if let Some(root) = self.root {
                self.mark_dirty_flags(root, DirtyFlags::LAYOUT);
            }
        }
    }

    /// Create a detached element.
    pub fn add_element(&mut self, style: Style) -> UiResult<NodeId> {
        let node_id = NodeId(self.next_id);
        self.next_id += 1;

        let taffy_node = self.taffy.new_leaf(style.clone())?;
        self.nodes.insert(
            node_id,
            Element {
                style,
                taffy_node,
                layout: LayoutRect::default(),
                laid_out: false,
                dirty_flags: DirtyFlags::NONE,
                parent: None,
                children: Vec::new(),
                layout_version: 0,
            },
        );
        self.mark_dirty_flags(node_id, DirtyFlags::LAYOUT | DirtyFlags::STYLE);

        Ok(node_id)
    }

    /// Append `child` to `parent`, detaching it from its current parent first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> UiResult<()> {
        let len = self.element(parent)?.children.len();
        let len = if self.parent(child) == Some(parent) {
            len - 1
        } else {
            len
        };
        self.insert_child(parent, len, child)
    }

    /// Insert `child` at `index` among `parent`'s children, detaching it from
    /// its current parent first.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> UiResult<()> {
        self.element(child)?;
        self.check_no_cycle(parent, child)?;

        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child)?;
        }

        let parent_element = self.element(parent)?;
        let len = parent_element.children.len();
        if index > len {
            return Err(UiError::IndexOutOfBounds { parent, index, len });
        }
        let parent_taffy = parent_element.taffy_node;
        let child_taffy = self.element(child)?.taffy_node;

        self.taffy
            .insert_child_at_index(parent_taffy, index, child_taffy)?;

        if let Some(element) = self.nodes.get_mut(&parent) {
            element.children.insert(index, child);
        }
        if let Some(element) = self.nodes.get_mut(&child) {
            element.parent = Some(parent);
        }
        self.observers.set_parent(child, Some(parent));
        self.observers.record_child_list_change(parent);
        self.mark_dirty_flags(parent, DirtyFlags::CHILDREN_ORDER);

        Ok(())
    }

    /// Detach `child` from `parent`. The child stays in the tree, unattached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> UiResult<()> {
        let parent_element = self.element(parent)?;
        let Some(position) = parent_element.children.iter().position(|id| *id == child) else {
            return Err(UiError::NotAChild { parent, child });
        };
        let parent_taffy = parent_element.taffy_node;
        let child_taffy = self.element(child)?.taffy_node;

        self.taffy.remove_child(parent_taffy, child_taffy)?;

        if let Some(element) = self.nodes.get_mut(&parent) {
            element.children.remove(position);
        }
        if let Some(element) = self.nodes.get_mut(&child) {
            element.parent = None;
        }
        self.observers.set_parent(child, None);
        self.observers.record_child_list_change(parent);
        self.mark_dirty_flags(parent, DirtyFlags::CHILDREN_ORDER);

        Ok(())
    }

    /// Replace the children of `parent`.
    ///
    /// Each new child is detached from its previous parent. Former children not
    /// in `children` become unattached.
    pub fn set_children(&mut self, parent: NodeId, children: &[NodeId]) -> UiResult<()> {
        let current = self.element(parent)?.children.clone();
        if current == children {
            return Ok(());
        }

        for &child in children {
            self.element(child)?;
            self.check_no_cycle(parent, child)?;
        }

        for child in current {
            self.remove_child(parent, child)?;
        }
        for &child in children {
            if let Some(old_parent) = self.parent(child) {
                self.remove_child(old_parent, child)?;
            }
        }

        let parent_taffy = self.element(parent)?.taffy_node;
        let taffy_children: Vec<taffy::NodeId> = children
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|element| element.taffy_node))
            .collect();
        self.taffy.set_children(parent_taffy, &taffy_children)?;

        for &child in children {
            if let Some(element) = self.nodes.get_mut(&child) {
                element.parent = Some(parent);
            }
            self.observers.set_parent(child, Some(parent));
        }
        if let Some(element) = self.nodes.get_mut(&parent) {
            element.children = children.to_vec();
        }
        self.observers.record_child_list_change(parent);
        self.mark_dirty_flags(parent, DirtyFlags::CHILDREN_ORDER);

        Ok(())
    }

    /// Remove `node` and its whole subtree from the tree.
    pub fn remove(&mut self, node: NodeId) -> UiResult<()> {
        if let Some(parent) = self.element(node)?.parent {
            self.remove_child(parent, node)?;
        }

        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(element) = self.nodes.shift_remove(&id) {
                self.taffy.remove(element.taffy_node)?;
                self.observers.set_parent(id, None);
                self.dirty_nodes.remove(&id);
                stack.extend(element.children);
            }
        }

        if self.root == Some(node) {
            self.root = None;
        }
        tracing::trace!(?node, "element removed");
        Ok(())
    }

    /// Set the root element, laid out against the viewport.
    pub fn set_root(&mut self, node_id: NodeId) -> UiResult<()> {
        self.element(node_id)?;
        self.root = Some(node_id);
        self.mark_dirty_flags(node_id, DirtyFlags::LAYOUT);
        Ok(())
    }

    /// Replace an element's style.
    pub fn set_style(&mut self, node_id: NodeId, style: Style) -> UiResult<()> {
        let taffy_node = self.element(node_id)?.taffy_node;
        self.taffy.set_style(taffy_node, style.clone())?;
        if let Some(element) = self.nodes.get_mut(&node_id) {
            element.style = style;
        }
        self.mark_dirty_flags(node_id, DirtyFlags::STYLE | DirtyFlags::LAYOUT);
        Ok(())
    }

    /// Mark an element with dirty flags and propagate layout dirtiness to
    /// its ancestors.
    pub fn mark_dirty_flags(&mut self, node_id: NodeId, flags: DirtyFlags) {
        if flags.is_empty() {
            return;
        }

        let Some(element) = self.nodes.get_mut(&node_id) else {
            return;
        };
        self.dirty_nodes.insert(node_id);
        element.dirty_flags |= flags;
        if flags.needs_layout() {
            element.layout_version = element.layout_version.wrapping_add(1);
        }

        let propagation_flags = flags.propagation_flags();
        if propagation_flags.is_empty() {
            return;
        }

        let mut current_parent = element.parent;
        while let Some(parent_id) = current_parent {
            let Some(parent) = self.nodes.get_mut(&parent_id) else {
                break;
            };
            if parent.dirty_flags.contains(propagation_flags) {
                // Already marked, ancestors are too.
                break;
            }
            parent.dirty_flags |= propagation_flags;
            parent.layout_version = parent.layout_version.wrapping_add(1);
            self.dirty_nodes.insert(parent_id);
            current_parent = parent.parent;
        }
    }

    /// Check if any element needs layout recomputation.
    pub fn has_layout_dirty(&self) -> bool {
        self.dirty_nodes.iter().any(|id| {
            self.nodes
                .get(id)
                .is_some_and(|element| element.dirty_flags.needs_layout())
        })
    }

    /// Lay out the tree from the root if anything layout-affecting changed.
    ///
    /// Returns whether a layout pass ran. Without a root nothing is laid out.
    pub fn compute_layout(&mut self) -> UiResult<bool> {
        profile_function!();

        let Some(root) = self.root else {
            return Ok(false);
        };
        if !self.has_layout_dirty() {
            return Ok(false);
        }

        let root_taffy = self.element(root)?.taffy_node;
        let viewport = self.config.viewport;
        self.taffy.compute_layout(
            root_taffy,
            taffy::Size {
                width: AvailableSpace::Definite(viewport.width),
                height: AvailableSpace::Definite(viewport.height),
            },
        )?;

        for element in self.nodes.values_mut() {
            element.laid_out = false;
        }
        self.update_subtree_layout(root)?;
        self.clear_dirty_flags();

        tracing::debug!(elements = self.nodes.len(), "layout computed");
        Ok(true)
    }

    /// Lay out, then deliver child-list and size notifications.
    pub fn update(&mut self) -> UiResult<DeliveryStats> {
        self.compute_layout()?;
        Ok(self.observers.deliver(|id| self.size_of(id)))
    }

    /// Copy Taffy results into the elements under `root_id`.
    fn update_subtree_layout(&mut self, root_id: NodeId) -> UiResult<()> {
        let mut stack = vec![root_id];
        while let Some(node_id) = stack.pop() {
            let Some(element) = self.nodes.get_mut(&node_id) else {
                continue;
            };
            let layout = self.taffy.layout(element.taffy_node)?;
            element.layout = LayoutRect {
                x: layout.location.x,
                y: layout.location.y,
                width: layout.size.width,
                height: layout.size.height,
            };
            element.laid_out = true;
            stack.extend(element.children.iter().copied());
        }
        Ok(())
    }

    fn clear_dirty_flags(&mut self) {
        for id in self.dirty_nodes.drain() {
            if let Some(element) = self.nodes.get_mut(&id) {
                element.dirty_flags = DirtyFlags::NONE;
            }
        }
    }

    fn check_no_cycle(&self, parent: NodeId, child: NodeId) -> UiResult<()> {
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return Err(UiError::WouldCycle { parent, child });
            }
            current = self.parent(id);
        }
        Ok(())
    }

    fn element(&self, node: NodeId) -> UiResult<&Element> {
        self.nodes.get(&node).ok_or(UiError::UnknownNode { node })
    }

    /// Get the root element.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, node: NodeId) -> Option<&Element> {
        self.nodes.get(&node)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(&node).and_then(|element| element.parent)
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(&node)
            .map(|element| element.children.as_slice())
            .unwrap_or(&[])
    }

    /// Layout from the last pass, if the element was part of it.
    pub fn get_layout(&self, node: NodeId) -> Option<LayoutRect> {
        self.nodes
            .get(&node)
            .filter(|element| element.laid_out)
            .map(|element| element.layout)
    }

    /// Laid-out size of an element.
    pub fn size_of(&self, node: NodeId) -> Option<Size<f32>> {
        self.get_layout(node).map(|layout| layout.size())
    }

    /// Check if any element has pending changes.
    pub fn is_dirty(&self) -> bool {
        !self.dirty_nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all elements in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.nodes.iter().map(|(id, element)| (*id, element))
    }

    /// Clear the entire tree. Live observations stay registered but will not
    /// be notified for the removed elements; ids are never handed out again.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.taffy.clear();
        self.root = None;
        self.dirty_nodes.clear();
        self.observers.clear();
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}
