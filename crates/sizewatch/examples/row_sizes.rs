//! Row Sizes Demo - Tracking Items of a Growing Row
//!
//! Builds a flex row, tracks the size of each item, then appends and removes
//! items frame by frame. Run with `RUST_LOG=sizewatch=trace` to see each
//! subscription cycle.

use std::cell::RefCell;
use std::rc::Rc;

use sizewatch::{Size, track_sizes};
use sizewatch_core::{Config, logging, profiling};
use sizewatch_ui::taffy;
use sizewatch_ui::{ElementTree, FlexDirection, NodeId, Style, UiResult, length};

fn item() -> Style {
    Style {
        flex_grow: 1.0,
        flex_basis: length(0.0),
        ..Default::default()
    }
}

fn frame(tree: &mut ElementTree, tracker: &mut sizewatch::SizeTracker<NodeId>) -> UiResult<()> {
    let stats = tree.update()?;
    if tracker.flush() {
        // New items were subscribed; deliver their first sizes.
        tree.update()?;
    }
    profiling::new_frame();
    tracing::info!(?stats, epoch = tracker.epoch(), "frame");
    Ok(())
}

fn print_sizes(label: &str, sizes: &[Option<Size<f32>>]) {
    let widths: Vec<String> = sizes
        .iter()
        .map(|size| match size {
            Some(size) => format!("{}x{}", size.width, size.height),
            None => "-".to_string(),
        })
        .collect();
    println!("{label}: [{}]", widths.join(", "));
}

fn main() -> UiResult<()> {
    logging::init_from_config(&Config::default());

    let mut tree = ElementTree::new();
    let row = tree.add_element(Style {
        flex_direction: FlexDirection::Row,
        size: taffy::Size {
            width: length(600.0),
            height: length(48.0),
        },
        ..Default::default()
    })?;
    tree.set_root(row)?;

    let items: Rc<RefCell<Vec<Option<NodeId>>>> = Rc::new(RefCell::new(Vec::new()));
    for _ in 0..2 {
        let node = tree.add_element(item())?;
        tree.add_child(row, node)?;
        items.borrow_mut().push(Some(node));
    }
    tree.update()?;

    let accessor = Rc::clone(&items);
    let mut tracker = track_sizes(move || accessor.borrow().clone(), tree.observers());
    let _rerender = tracker.on_change(|| tracing::debug!("re-render requested"));

    frame(&mut tree, &mut tracker)?;
    print_sizes("two items", &tracker.sizes());

    for _ in 0..2 {
        let node = tree.add_element(item())?;
        tree.add_child(row, node)?;
        items.borrow_mut().push(Some(node));
    }
    frame(&mut tree, &mut tracker)?;
    print_sizes("four items", &tracker.sizes());

    let removed = items.borrow_mut().remove(0);
    if let Some(node) = removed {
        tree.remove(node)?;
    }
    frame(&mut tree, &mut tracker)?;
    print_sizes("three items", &tracker.sizes());

    tracker.unmount();
    println!(
        "observers after unmount: {} resize, {} child-list",
        tree.observers().resize_observer_count(),
        tree.observers().mutation_observer_count()
    );
    Ok(())
}
