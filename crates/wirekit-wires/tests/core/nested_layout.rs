use wirekit_core::{BoundingBox, Point};
use wirekit_wires::{ContainerConfig, Layout, LayoutContainer, LayoutId, LayoutKind, Wires};

fn nested(w: &mut Wires, rows: u32, columns: u32) -> LayoutId {
    w.create_layout(LayoutKind::Nested { rows, columns }).unwrap()
}

#[test]
fn test_grid_of_grids() {
    let mut w = Wires::new();
    let outer = nested(&mut w, 1, 2);
    w.layout_set_size(outer, 200.0, 100.0).unwrap();
    let inner = nested(&mut w, 2, 1);
    w.layout_set_size(inner, 100.0, 100.0).unwrap();
    let leaf = w.scene_mut().create_primitive(BoundingBox::zero());

    w.layout_add(outer, inner, Some(0), Some(1)).unwrap();
    w.layout_add(inner, leaf, Some(1), Some(0)).unwrap();

    let inner_group = w.layout(inner).unwrap().group();
    assert_eq!(w.scene().position(inner_group).unwrap(), Point::new(100.0, 0.0));
    assert_eq!(w.scene().position(leaf).unwrap(), Point::new(0.0, 50.0));
    assert_eq!(
        w.scene().computed_location(leaf).unwrap(),
        Point::new(100.0, 50.0)
    );
}

#[test]
fn test_set_moves_nested_layout_child() {
    let mut w = Wires::new();
    let outer = nested(&mut w, 1, 2);
    w.layout_set_size(outer, 200.0, 100.0).unwrap();
    let inner = nested(&mut w, 1, 1);
    w.layout_add(outer, inner, Some(0), Some(1)).unwrap();

    w.layout_set(outer, inner, Some(0), Some(0)).unwrap();

    let inner_group = w.layout(inner).unwrap().group();
    assert_eq!(w.scene().position(inner_group).unwrap(), Point::zero());
}

#[test]
fn test_child_change_refreshes_only_that_entry() {
    let mut w = Wires::new();
    let layout = nested(&mut w, 1, 2);
    w.layout_set_size(layout, 100.0, 100.0).unwrap();
    let a = w.scene_mut().create_primitive(BoundingBox::zero());
    let b = w.scene_mut().create_primitive(BoundingBox::zero());
    w.layout_add(layout, a, Some(0), Some(0)).unwrap();
    w.layout_add(layout, b, Some(0), Some(1)).unwrap();
    w.settle();

    w.scene_mut().set_position(b, Point::new(77.0, 77.0)).unwrap();
    w.scene_mut().cancel_pending(b);
    w.scene_mut().set_position(a, Point::new(5.0, 5.0)).unwrap();
    w.settle();

    assert_eq!(w.scene().position(a).unwrap(), Point::zero());
    assert_eq!(w.scene().position(b).unwrap(), Point::new(77.0, 77.0));
}

#[test]
fn test_group_resize_refreshes_bounds() {
    let mut w = Wires::new();
    let layout = nested(&mut w, 1, 2);
    let group = w.layout(layout).unwrap().group();
    w.scene_mut().set_size(group, 100.0, 100.0).unwrap();
    let a = w.scene_mut().create_primitive(BoundingBox::zero());
    w.layout_add(layout, a, Some(0), Some(1)).unwrap();
    w.settle();
    assert_eq!(w.scene().position(a).unwrap(), Point::new(50.0, 0.0));

    w.scene_mut().set_size(group, 200.0, 100.0).unwrap();
    w.settle();

    assert_eq!(w.scene().position(a).unwrap(), Point::new(100.0, 0.0));
}

#[test]
fn test_explicit_size_overrides_group_frame() {
    let mut w = Wires::new();
    let layout = nested(&mut w, 1, 1);
    let group = w.layout(layout).unwrap().group();
    w.scene_mut().set_size(group, 10.0, 10.0).unwrap();
    assert_eq!(w.layout_bounding_box(layout).unwrap().width, 10.0);

    w.layout_set_size(layout, 40.0, 30.0).unwrap();
    assert_eq!(
        w.layout_bounding_box(layout).unwrap(),
        BoundingBox::new(0.0, 0.0, 40.0, 30.0)
    );
    let Layout::Nested(n) = w.layout(layout).unwrap() else {
        panic!("expected a nested layout");
    };
    assert!(!n.has_cached_cell_size());
}

#[test]
fn test_nesting_a_layout_inside_itself_is_rejected() {
    let mut w = Wires::new();
    let outer = nested(&mut w, 1, 1);
    let inner = nested(&mut w, 1, 1);
    w.layout_add(outer, inner, Some(0), Some(0)).unwrap();
    let outer_group = w.layout(outer).unwrap().group();

    assert!(w
        .layout_add(inner, outer, Some(0), Some(0))
        .unwrap_err()
        .is_invalid_argument());
    assert!(w
        .layout_add(outer, outer, Some(0), Some(0))
        .unwrap_err()
        .is_invalid_argument());
    // Rejected adds leave the node unnamed and untracked.
    assert_eq!(w.scene().id(outer_group).unwrap(), None);
    assert!(w.layout(inner).unwrap().entries().is_empty());
}

#[test]
fn test_auto_placed_sibling_follows_when_its_cell_is_taken() {
    let mut w = Wires::new();
    let layout = nested(&mut w, 1, 2);
    w.layout_set_size(layout, 100.0, 100.0).unwrap();
    let a = w.scene_mut().create_primitive(BoundingBox::zero());
    let b = w.scene_mut().create_primitive(BoundingBox::zero());
    w.layout_add(layout, a, None, None).unwrap();
    w.layout_add(layout, b, None, None).unwrap();
    assert_eq!(w.scene().position(b).unwrap(), Point::new(50.0, 0.0));

    w.layout_set(layout, a, Some(0), Some(1)).unwrap();
    w.settle();

    assert_eq!(w.scene().position(a).unwrap(), Point::new(50.0, 0.0));
    assert_eq!(w.scene().position(b).unwrap(), Point::zero());
}

#[test]
fn test_destroyed_layout_cannot_be_nested() {
    let mut w = Wires::new();
    let outer = nested(&mut w, 1, 1);
    let inner = nested(&mut w, 1, 1);
    w.layout_destroy(inner).unwrap();

    assert!(w
        .layout_add(outer, inner, Some(0), Some(0))
        .unwrap_err()
        .is_lifecycle());
}

#[test]
fn test_nested_container_layout() {
    let mut w = Wires::new();
    let board = w
        .create_container(
            ContainerConfig::new()
                .with_layout(LayoutKind::Nested {
                    rows: 2,
                    columns: 2,
                })
                .with_size(100.0, 100.0),
        )
        .unwrap();
    let first = w.create_shape(ContainerConfig::new(), 10.0, 10.0).unwrap();
    let second = w.create_shape(ContainerConfig::new(), 10.0, 10.0).unwrap();

    w.add_at(board, first, None, None).unwrap();
    w.add_at(board, second, None, None).unwrap();

    assert_eq!(w.location(first).unwrap(), Point::zero());
    assert_eq!(w.location(second).unwrap(), Point::new(50.0, 0.0));
    assert!(w.layout(w.container(board).unwrap().layout()).unwrap().is_nested());
}
