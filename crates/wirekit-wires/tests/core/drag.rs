use parking_lot::Mutex;
use std::sync::Arc;
use wirekit_core::{EventFilter, Point};
use wirekit_wires::{ContainerConfig, ContainerId, LayoutKind, Wires, WiresEventKind};

fn record_all(w: &Wires, id: ContainerId) -> Arc<Mutex<Vec<WiresEventKind>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    w.container(id)
        .unwrap()
        .add_handler(EventFilter::All, move |event| sink.lock().push(event.kind()))
        .unwrap();
    log
}

#[test]
fn test_drag_suppresses_plain_move_events() {
    let mut w = Wires::new();
    let c = w
        .create_container(ContainerConfig::new().interactive(true))
        .unwrap();
    let group = w.container(c).unwrap().group();
    let log = record_all(&w, c);

    assert_eq!(w.begin_drag(group).unwrap(), 1);
    assert!(w.container(c).unwrap().is_dragging());
    w.drag_to(group, 5.0, 5.0).unwrap();
    w.drag_to(group, 9.0, 12.0).unwrap();
    w.end_drag(group).unwrap();

    assert_eq!(
        *log.lock(),
        vec![
            WiresEventKind::DragStart,
            WiresEventKind::DragMove,
            WiresEventKind::DragMove,
            WiresEventKind::DragEnd,
        ]
    );
    assert!(!w.container(c).unwrap().is_dragging());
    assert_eq!(w.location(c).unwrap(), Point::new(9.0, 12.0));

    // Outside a drag, a position change is a plain move again.
    w.set_location(c, Point::new(20.0, 20.0)).unwrap();
    w.tick();
    assert_eq!(log.lock().last(), Some(&WiresEventKind::Move));
}

#[test]
fn test_drag_events_carry_location() {
    let mut w = Wires::new();
    let c = w
        .create_container(ContainerConfig::new().interactive(true))
        .unwrap();
    let group = w.container(c).unwrap().group();
    let locations = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&locations);
    w.container(c)
        .unwrap()
        .add_drag_move_handler(move |event| sink.lock().push(event.location()))
        .unwrap();

    w.begin_drag(group).unwrap();
    w.drag_to(group, 3.0, 4.0).unwrap();
    w.end_drag(group).unwrap();

    assert_eq!(*locations.lock(), vec![Point::new(3.0, 4.0)]);
}

#[test]
fn test_passive_container_is_not_draggable() {
    let mut w = Wires::new();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let group = w.container(c).unwrap().group();
    let log = record_all(&w, c);

    assert_eq!(w.begin_drag(group).unwrap(), 0);
    assert_eq!(w.drag_to(group, 5.0, 5.0).unwrap(), 0);
    assert!(log.lock().is_empty());
    assert_eq!(w.location(c).unwrap(), Point::zero());
}

#[test]
fn test_set_draggable_false_stops_new_drags() {
    let mut w = Wires::new();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let group = w.container(c).unwrap().group();
    w.set_draggable(c, true).unwrap();
    w.set_draggable(c, false).unwrap();

    assert_eq!(w.begin_drag(group).unwrap(), 0);
    assert!(!w.container(c).unwrap().is_dragging());
}

#[test]
fn test_dragged_child_snaps_back_into_its_cell() {
    let mut w = Wires::new();
    let board = w
        .create_container(
            ContainerConfig::new()
                .with_layout(LayoutKind::Flat {
                    rows: 1,
                    columns: 2,
                })
                .with_size(200.0, 100.0),
        )
        .unwrap();
    let card = w
        .create_shape(ContainerConfig::new().interactive(true), 20.0, 20.0)
        .unwrap();
    w.add_at(board, card, Some(0), Some(1)).unwrap();
    let group = w.container(card).unwrap().group();

    w.begin_drag(group).unwrap();
    w.drag_to(group, 40.0, 40.0).unwrap();
    w.end_drag(group).unwrap();
    w.settle();

    assert_eq!(w.location(card).unwrap(), Point::new(100.0, 0.0));
}
