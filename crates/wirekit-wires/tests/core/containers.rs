use parking_lot::Mutex;
use std::sync::Arc;
use wirekit_core::{Point, SequentialAllocator};
use wirekit_settings::Config;
use wirekit_wires::{
    AlignmentIndex, ContainerConfig, ContainerId, LayoutContainer, LayoutKind, Wires, WiresEvent,
    WiresEventKind,
};

fn wires() -> Wires {
    Wires::new().with_id_allocator(SequentialAllocator::new("n"))
}

fn shape(w: &mut Wires) -> ContainerId {
    w.create_shape(ContainerConfig::new(), 10.0, 10.0).unwrap()
}

fn record_moves(w: &Wires, id: ContainerId, log: &Arc<Mutex<Vec<ContainerId>>>) {
    let log = Arc::clone(log);
    w.container(id)
        .unwrap()
        .add_move_handler(move |event: WiresEvent| log.lock().push(event.container()))
        .unwrap();
}

#[test]
fn test_add_and_remove_keep_parent_bookkeeping() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let s = shape(&mut w);

    w.add(c, s).unwrap();
    assert_eq!(w.container(s).unwrap().parent(), Some(c));
    assert_eq!(w.container(c).unwrap().child_shapes(), &[s]);
    let (c_group, s_group) = (w.container(c).unwrap().group(), w.container(s).unwrap().group());
    assert_eq!(w.scene().parent_group(s_group).unwrap(), Some(c_group));

    w.remove(c, s).unwrap();
    assert_eq!(w.container(s).unwrap().parent(), None);
    assert!(w.container(c).unwrap().child_shapes().is_empty());
    assert_eq!(w.scene().parent_group(s_group).unwrap(), None);
}

#[test]
fn test_readding_is_a_noop() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let a = shape(&mut w);
    let b = shape(&mut w);

    w.add(c, a).unwrap();
    w.add(c, b).unwrap();
    w.add(c, a).unwrap();

    assert_eq!(w.container(c).unwrap().child_shapes(), &[a, b]);
}

#[test]
fn test_adding_to_another_parent_reparents() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let d = w.create_container(ContainerConfig::new()).unwrap();
    let s = shape(&mut w);

    w.add(d, s).unwrap();
    w.add(c, s).unwrap();

    assert!(!w.container(d).unwrap().child_shapes().contains(&s));
    assert_eq!(w.container(c).unwrap().child_shapes(), &[s]);
    assert_eq!(w.container(s).unwrap().parent(), Some(c));
}

#[test]
fn test_reparenting_drops_old_layout_entry() {
    let mut w = wires();
    let grid = ContainerConfig::new()
        .with_layout(LayoutKind::Flat {
            rows: 1,
            columns: 2,
        })
        .with_size(100.0, 50.0);
    let old = w.create_container(grid.clone()).unwrap();
    let new = w.create_container(grid).unwrap();
    let s = shape(&mut w);

    w.add_at(old, s, Some(0), Some(1)).unwrap();
    let old_layout = w.container(old).unwrap().layout();
    assert_eq!(w.layout(old_layout).unwrap().entries().len(), 1);

    w.add(new, s).unwrap();
    assert!(w.layout(old_layout).unwrap().entries().is_empty());
}

#[test]
fn test_add_at_rejects_bad_cell_without_reparenting() {
    let mut w = wires();
    let old = w.create_container(ContainerConfig::new()).unwrap();
    let board = w
        .create_container(
            ContainerConfig::new()
                .with_layout(LayoutKind::Flat {
                    rows: 2,
                    columns: 3,
                })
                .with_size(300.0, 200.0),
        )
        .unwrap();
    let card = shape(&mut w);
    w.add(old, card).unwrap();

    let err = w.add_at(board, card, Some(5), Some(0)).unwrap_err();
    assert!(err.is_invalid_argument());
    assert!(w.add_at(board, card, Some(0), Some(3)).is_err());

    assert_eq!(w.container(card).unwrap().parent(), Some(old));
    assert_eq!(w.container(old).unwrap().child_shapes(), &[card]);
    assert!(w.container(board).unwrap().child_shapes().is_empty());
    let (old_group, card_group) = (
        w.container(old).unwrap().group(),
        w.container(card).unwrap().group(),
    );
    assert_eq!(w.scene().parent_group(card_group).unwrap(), Some(old_group));
}

#[test]
fn test_shape_moved_notifies_children_first() {
    let mut w = wires();
    let root = w.create_container(ContainerConfig::new()).unwrap();
    let mid = shape(&mut w);
    let leaf = shape(&mut w);
    w.add(root, mid).unwrap();
    w.add(mid, leaf).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    for id in [root, mid, leaf] {
        record_moves(&w, id, &log);
    }

    w.shape_moved(root).unwrap();
    assert_eq!(*log.lock(), vec![leaf, mid, root]);
}

#[test]
fn test_add_announces_move_of_the_shape() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let s = shape(&mut w);
    let log = Arc::new(Mutex::new(Vec::new()));
    record_moves(&w, s, &log);

    w.add(c, s).unwrap();
    assert_eq!(*log.lock(), vec![s]);
}

#[test]
fn test_add_rejects_cycles() {
    let mut w = wires();
    let a = shape(&mut w);
    let b = shape(&mut w);
    w.add(a, b).unwrap();

    assert!(w.add(b, a).unwrap_err().is_invalid_argument());
    assert!(w.add(a, a).unwrap_err().is_invalid_argument());
    assert_eq!(w.container(b).unwrap().child_shapes(), &[] as &[ContainerId]);
}

#[test]
fn test_destroy_twice_is_safe() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();

    w.destroy(c).unwrap();
    w.destroy(c).unwrap();
    assert!(w.container(c).unwrap().is_destroyed());
}

#[test]
fn test_operations_after_destroy_fail_fast() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let s = shape(&mut w);
    w.destroy(c).unwrap();

    assert!(w.add(c, s).unwrap_err().is_lifecycle());
    assert!(w.set_draggable(c, true).unwrap_err().is_lifecycle());
    assert!(w
        .container(c)
        .unwrap()
        .add_move_handler(|_| {})
        .unwrap_err()
        .is_lifecycle());
    let layout = w.container(c).unwrap().layout();
    assert!(w.layout_execute(layout).unwrap_err().is_lifecycle());
}

#[test]
fn test_destroy_releases_children_and_leaves_parent() {
    let mut w = wires();
    let root = w.create_container(ContainerConfig::new()).unwrap();
    let c = shape(&mut w);
    let child = shape(&mut w);
    w.add(root, c).unwrap();
    w.add(c, child).unwrap();
    let child_group = w.container(child).unwrap().group();

    w.destroy(c).unwrap();

    assert_eq!(w.container(child).unwrap().parent(), None);
    assert!(w.container(root).unwrap().child_shapes().is_empty());
    assert_eq!(w.container(c).unwrap().parent(), None);
    // Child geometry stays in the scene.
    assert!(w.scene().contains(child_group));
}

#[test]
fn test_destroy_runs_hook_once_and_cancels_pending_changes() {
    let mut w = wires();
    let c = w
        .create_container(ContainerConfig::new().interactive(true))
        .unwrap();
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    w.container_mut(c)
        .unwrap()
        .set_pre_destroy_hook(move |_| *counter.lock() += 1)
        .unwrap();

    w.set_location(c, Point::new(4.0, 4.0)).unwrap();
    let group = w.container(c).unwrap().group();
    assert!(w.scene().batcher().is_pending(group));

    w.destroy(c).unwrap();
    w.destroy(c).unwrap();

    assert_eq!(*calls.lock(), 1);
    assert!(!w.scene().batcher().is_pending(group));
    assert_eq!(w.container(c).unwrap().handler_count(), 0);
}

#[test]
fn test_docking_is_a_pure_relation() {
    let mut w = wires();
    let a = shape(&mut w);
    let b = shape(&mut w);

    w.set_docked_to(a, Some(b)).unwrap();
    assert_eq!(w.container(a).unwrap().docked_to(), Some(b));
    assert!(w.container(b).unwrap().child_shapes().is_empty());
    assert!(!w.scene().has_pending_changes());

    w.set_docked_to(a, None).unwrap();
    assert_eq!(w.container(a).unwrap().docked_to(), None);
}

#[test]
fn test_interactive_container_emits_move_on_position_change() {
    let mut w = wires();
    let c = w
        .create_container(ContainerConfig::new().interactive(true))
        .unwrap();
    let locations = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&locations);
    w.container(c)
        .unwrap()
        .add_move_handler(move |event| sink.lock().push(event.location()))
        .unwrap();

    w.set_location(c, Point::new(10.0, 20.0)).unwrap();
    w.tick();

    assert_eq!(*locations.lock(), vec![Point::new(10.0, 20.0)]);
}

#[test]
fn test_passive_container_ignores_position_changes() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    record_moves(&w, c, &log);

    w.set_location(c, Point::new(10.0, 20.0)).unwrap();
    w.settle();

    assert!(log.lock().is_empty());
    assert!(!w.container(c).unwrap().is_interactive());
}

#[test]
fn test_set_draggable_installs_listeners_once() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let group = w.container(c).unwrap().group();

    w.set_draggable(c, true).unwrap();
    let installed = w.scene().subscription_count();
    assert!(w.container(c).unwrap().is_interactive());
    assert!(w.scene().is_draggable(group).unwrap());

    w.set_draggable(c, false).unwrap();
    w.set_draggable(c, true).unwrap();
    assert_eq!(w.scene().subscription_count(), installed);
}

#[test]
fn test_removed_handler_is_not_called() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let id = w
        .container(c)
        .unwrap()
        .add_move_handler(move |event| sink.lock().push(event.kind()))
        .unwrap();

    w.shape_moved(c).unwrap();
    assert!(w.container(c).unwrap().remove_handler(id));
    w.shape_moved(c).unwrap();

    assert_eq!(*log.lock(), vec![WiresEventKind::Move]);
}

struct RecordingIndex {
    indexed: Vec<String>,
    refreshed: Arc<Mutex<Vec<String>>>,
}

impl AlignmentIndex for RecordingIndex {
    fn is_indexed(&self, id: &str) -> bool {
        self.indexed.iter().any(|i| i == id)
    }

    fn refresh_control(&mut self, id: &str) {
        self.refreshed.lock().push(id.to_string());
    }
}

#[test]
fn test_alignment_index_is_refreshed_for_indexed_shapes() {
    let mut w = wires();
    let refreshed = Arc::new(Mutex::new(Vec::new()));
    w.set_alignment_index(RecordingIndex {
        indexed: vec!["card".to_string()],
        refreshed: Arc::clone(&refreshed),
    });
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let card = w
        .create_shape(ContainerConfig::new().with_id("card"), 10.0, 10.0)
        .unwrap();
    let other = shape(&mut w);

    w.add(c, card).unwrap();
    w.add(c, other).unwrap();

    assert_eq!(*refreshed.lock(), vec!["card".to_string()]);
}

#[test]
fn test_uuid_and_locations() {
    let mut w = wires();
    let root = w
        .create_container(ContainerConfig::new().with_id("root").at(100.0, 50.0))
        .unwrap();
    let s = w
        .create_shape(ContainerConfig::new().at(5.0, 5.0), 10.0, 10.0)
        .unwrap();
    w.add(root, s).unwrap();

    assert_eq!(w.uuid(root).unwrap().as_deref(), Some("root"));
    assert_eq!(w.uuid(s).unwrap().as_deref(), Some("n-1"));
    assert_eq!(w.location(s).unwrap(), Point::new(5.0, 5.0));
    assert_eq!(w.computed_location(s).unwrap(), Point::new(105.0, 55.0));

    let geometry = w.geometry(s).unwrap();
    assert_eq!(geometry.bounding_box.width, 10.0);
}

#[test]
fn test_primitives_attach_without_layout_entries() {
    let mut w = wires();
    let c = w.create_container(ContainerConfig::new()).unwrap();
    let node = w
        .scene_mut()
        .create_primitive(wirekit_core::BoundingBox::new(0.0, 0.0, 4.0, 4.0));

    w.add_primitive(c, node).unwrap();
    let group = w.container(c).unwrap().group();
    let layout = w.container(c).unwrap().layout();
    assert_eq!(w.scene().parent_group(node).unwrap(), Some(group));
    assert!(w.layout(layout).unwrap().entries().is_empty());

    assert!(w.remove_primitive(c, node).unwrap());
    assert!(!w.remove_primitive(c, node).unwrap());
}

#[test]
fn test_event_history_follows_config() {
    let mut config = Config::default();
    config.events.enable_history = true;
    let mut w = Wires::with_config(config);
    let c = w.create_container(ContainerConfig::new()).unwrap();

    w.shape_moved(c).unwrap();

    let history = w.container(c).unwrap().event_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind(), WiresEventKind::Move);
}
