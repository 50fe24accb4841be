//! Layout and structure tests for the element tree.

use sizewatch_core::Size;
use sizewatch_ui::taffy;
use sizewatch_ui::{DirtyFlags, ElementTree, FlexDirection, NodeId, Style, TreeConfig, length};

fn row(width: f32, height: f32) -> Style {
    Style {
        flex_direction: FlexDirection::Row,
        size: taffy::Size {
            width: length(width),
            height: length(height),
        },
        ..Default::default()
    }
}

fn grow() -> Style {
    Style {
        flex_grow: 1.0,
        flex_basis: length(0.0),
        ..Default::default()
    }
}

fn row_with_children(count: usize) -> (ElementTree, NodeId, Vec<NodeId>) {
    let mut tree = ElementTree::new();
    let root = tree.add_element(row(300.0, 40.0)).unwrap();
    tree.set_root(root).unwrap();
    let children = (0..count)
        .map(|_| {
            let child = tree.add_element(grow()).unwrap();
            tree.add_child(root, child).unwrap();
            child
        })
        .collect();
    (tree, root, children)
}

#[test]
fn test_flex_row_splits_width() {
    let (mut tree, root, children) = row_with_children(2);
    assert!(tree.compute_layout().unwrap());

    assert_eq!(tree.size_of(root), Some(Size::new(300.0, 40.0)));
    for child in &children {
        assert_eq!(tree.size_of(*child), Some(Size::new(150.0, 40.0)));
    }

    let second = tree.get_layout(children[1]).unwrap();
    assert_eq!(second.x, 150.0);
    assert_eq!(second.y, 0.0);
}

#[test]
fn test_appending_sibling_relayouts() {
    let (mut tree, root, mut children) = row_with_children(2);
    tree.compute_layout().unwrap();

    let third = tree.add_element(grow()).unwrap();
    tree.add_child(root, third).unwrap();
    children.push(third);

    assert!(tree.is_dirty());
    assert!(tree.compute_layout().unwrap());
    for child in &children {
        assert_eq!(tree.size_of(*child), Some(Size::new(100.0, 40.0)));
    }
}

#[test]
fn test_insert_child_order() {
    let (mut tree, root, children) = row_with_children(2);
    let first = tree.add_element(grow()).unwrap();
    tree.insert_child(root, 0, first).unwrap();

    assert_eq!(tree.children(root), &[first, children[0], children[1]]);
    tree.compute_layout().unwrap();
    assert_eq!(tree.get_layout(first).unwrap().x, 0.0);
}

#[test]
fn test_set_children_replaces_list() {
    let (mut tree, root, children) = row_with_children(3);
    tree.set_children(root, &[children[2], children[0]]).unwrap();

    assert_eq!(tree.children(root), &[children[2], children[0]]);
    assert_eq!(tree.parent(children[1]), None);

    tree.compute_layout().unwrap();
    assert_eq!(tree.size_of(children[2]), Some(Size::new(150.0, 40.0)));
    assert_eq!(tree.size_of(children[1]), None);
}

#[test]
fn test_set_style_marks_layout_dirty() {
    let (mut tree, root, _) = row_with_children(1);
    tree.compute_layout().unwrap();
    assert!(!tree.has_layout_dirty());

    tree.set_style(root, row(200.0, 20.0)).unwrap();
    let flags = tree.get(root).unwrap().dirty_flags;
    assert!(flags.contains(DirtyFlags::STYLE | DirtyFlags::LAYOUT));

    tree.compute_layout().unwrap();
    assert_eq!(tree.size_of(root), Some(Size::new(200.0, 20.0)));
}

#[test]
fn test_viewport_bounds_percent_root() {
    let mut tree = ElementTree::with_config(TreeConfig {
        viewport: Size::new(400.0, 200.0),
    });
    let root = tree
        .add_element(Style {
            size: taffy::Size {
                width: sizewatch_ui::percent(0.5),
                height: sizewatch_ui::percent(1.0),
            },
            ..Default::default()
        })
        .unwrap();
    tree.set_root(root).unwrap();
    tree.compute_layout().unwrap();
    assert_eq!(tree.size_of(root), Some(Size::new(200.0, 200.0)));

    tree.set_viewport(Size::new(800.0, 200.0));
    assert!(tree.compute_layout().unwrap());
    assert_eq!(tree.size_of(root), Some(Size::new(400.0, 200.0)));
}

#[test]
fn test_no_root_no_layout() {
    let mut tree = ElementTree::new();
    let node = tree.add_element(row(10.0, 10.0)).unwrap();
    assert!(!tree.compute_layout().unwrap());
    assert_eq!(tree.size_of(node), None);
}

#[test]
fn test_remove_root_clears_it() {
    let (mut tree, root, children) = row_with_children(2);
    tree.remove(root).unwrap();

    assert_eq!(tree.root(), None);
    assert!(tree.is_empty());
    assert!(!tree.contains(children[0]));
}

#[test]
fn test_clear() {
    let (mut tree, _, _) = row_with_children(4);
    assert_eq!(tree.len(), 5);
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.iter().count(), 0);
}
