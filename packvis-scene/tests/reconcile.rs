//! End-to-end reconciliation behavior against hand-built snapshots.

use approx::assert_relative_eq;
use packvis_core::{
    Color, ColorClass, PackedBox, Point3f, Primitive, SceneNode, Snapshot, Vector3f,
};
use packvis_scene::{ReconcilerConfig, SceneReconciler};

fn unit_box(x: f32, y: f32, z: f32) -> PackedBox {
    PackedBox {
        position: Point3f::new(x, y, z),
        size: Vector3f::new(1.0, 1.0, 1.0),
        mass: 1.0,
    }
}

fn reconciler() -> SceneReconciler {
    SceneReconciler::with_seed(ReconcilerConfig::default(), 7)
}

fn fills(reconciler: &SceneReconciler) -> Vec<&SceneNode> {
    reconciler
        .scene()
        .group
        .iter()
        .filter(|(_, n)| matches!(n.primitive, Primitive::Cuboid { .. }))
        .map(|(_, n)| n)
        .collect()
}

fn arrows(reconciler: &SceneReconciler) -> Vec<&SceneNode> {
    reconciler
        .scene()
        .group
        .iter()
        .filter(|(_, n)| matches!(n.primitive, Primitive::Arrow { .. }))
        .map(|(_, n)| n)
        .collect()
}

#[test]
fn renders_one_box_per_entry_with_exact_placement() {
    let mut snapshot = Snapshot::default();
    snapshot.boxes.insert(3, unit_box(0.5, 0.5, 0.5));
    snapshot.boxes.insert(9, {
        PackedBox {
            position: Point3f::new(2.0, 4.0, 6.0),
            size: Vector3f::new(3.0, 2.0, 1.0),
            mass: 0.0,
        }
    });

    let mut r = reconciler();
    r.reconcile(&snapshot);

    let fills = fills(&r);
    assert_eq!(fills.len(), snapshot.boxes.len());
    let big = fills
        .iter()
        .find(|n| n.position == Point3f::new(2.0, 4.0, 6.0))
        .expect("box 9 rendered at its streamed position");
    assert_eq!(
        big.primitive,
        Primitive::Cuboid {
            extents: Vector3f::new(3.0, 2.0, 1.0)
        }
    );
}

#[test]
fn classification_overlap_renders_removable_red() {
    let mut snapshot = Snapshot::default();
    snapshot.boxes.insert(1, unit_box(0.0, 0.0, 0.0));
    snapshot.removable.insert(1);
    snapshot.blocked.insert(1);
    snapshot.last_placed = Some(1);

    let mut r = reconciler();
    r.reconcile(&snapshot);

    assert_eq!(fills(&r)[0].color, ColorClass::Removable.color());
    assert_eq!(fills(&r)[0].color, Color::from_hex(0xff0000));
}

#[test]
fn dangling_edge_endpoints_are_skipped_silently() {
    let mut snapshot = Snapshot::default();
    snapshot.boxes.insert(1, unit_box(0.0, 0.0, 0.0));
    snapshot.boxes.insert(2, unit_box(3.0, 0.0, 0.0));
    // 99 never appears in the box map; 5 exists only as a source of nothing.
    snapshot.adjacency.insert(1, vec![99, 2]);
    snapshot.adjacency.insert(99, vec![1]);

    let mut r = reconciler();
    r.reconcile(&snapshot);

    // Only the (1 -> 2) edge survives; the dangling pairs produce nothing
    // and do not abort the remaining edges.
    assert_eq!(arrows(&r).len(), 1);
}

#[test]
fn self_loop_renders_one_degenerate_arrow() {
    let mut snapshot = Snapshot::default();
    snapshot.boxes.insert(4, unit_box(1.0, 2.0, 3.0));
    snapshot.adjacency.insert(4, vec![4]);

    let mut r = reconciler();
    r.reconcile(&snapshot);

    let arrows = arrows(&r);
    assert_eq!(arrows.len(), 1);
    match arrows[0].primitive {
        Primitive::Arrow {
            shaft_length,
            head_length,
            ..
        } => {
            assert_relative_eq!(shaft_length, 0.0);
            assert_relative_eq!(head_length, 0.0);
        }
        ref other => panic!("expected arrow, got {other:?}"),
    }
}

#[test]
fn reconciling_twice_is_idempotent() {
    let mut snapshot = Snapshot::default();
    snapshot.boxes.insert(1, unit_box(0.0, 0.0, 0.0));
    snapshot.boxes.insert(2, unit_box(1.0, 0.0, 0.0));
    snapshot.adjacency.insert(1, vec![2]);

    let mut r = reconciler();
    r.reconcile(&snapshot);
    let first: Vec<(Point3f, Color)> = fills(&r).iter().map(|n| (n.position, n.color)).collect();
    let first_total = r.scene().group.len();

    r.reconcile(&snapshot);
    let second: Vec<(Point3f, Color)> = fills(&r).iter().map(|n| (n.position, n.color)).collect();

    assert_eq!(first, second);
    assert_eq!(r.scene().group.len(), first_total);
}

#[test]
fn empty_slot_vector_renders_nothing() {
    let mut snapshot = Snapshot::default();
    snapshot.item_buffer = vec![Some(Vector3f::new(1.0, 1.0, 1.0))];
    let mut r = reconciler();
    r.reconcile_staging_areas(&snapshot);
    assert!(!r.scene().item_buffer.group.is_empty());

    snapshot.item_buffer = Vec::new();
    r.reconcile_staging_areas(&snapshot);
    assert_eq!(r.scene().item_buffer.group.len(), 0);
    assert!(r.scene().item_buffer.slot_boxes.is_empty());
}

#[test]
fn null_slots_keep_their_index_in_the_spacing() {
    let mut snapshot = Snapshot::default();
    snapshot.temporary_save = vec![None, Some(Vector3f::new(2.0, 2.0, 2.0)), None];

    let mut r = reconciler();
    r.reconcile_staging_areas(&snapshot);

    let area = &r.scene().temporary_save;
    assert_eq!(area.slot_boxes.len(), 1);
    let (fill, _) = area.slot_boxes[0];
    let node = area.group.get(fill).unwrap();
    // start = -(3 - 1) / 2 * spacing = -spacing; index 1 lands back at 0.
    assert_relative_eq!(node.position.y, 0.0);
    assert_relative_eq!(node.position.z, 1.0);
    assert_eq!(node.color, area.color);
}

#[test]
fn two_box_scenario_renders_colors_and_edge() {
    let mut snapshot = Snapshot::default();
    snapshot.boxes.insert(1, unit_box(0.0, 0.0, 0.0));
    snapshot.boxes.insert(2, unit_box(1.0, 0.0, 0.0));
    snapshot.adjacency.insert(1, vec![2]);
    snapshot.last_placed = Some(2);

    let mut r = reconciler();
    r.reconcile(&snapshot);

    let fills = fills(&r);
    assert_eq!(fills.len(), 2);
    let first = fills
        .iter()
        .find(|n| n.position == Point3f::origin())
        .unwrap();
    let second = fills
        .iter()
        .find(|n| n.position == Point3f::new(1.0, 0.0, 0.0))
        .unwrap();
    assert_eq!(first.color, Color::from_hex(0x0000ff));
    assert_eq!(second.color, Color::from_hex(0xff00ff));

    let arrows = arrows(&r);
    assert_eq!(arrows.len(), 1);
    let arrow = arrows[0];
    assert_eq!(arrow.position, Point3f::origin());
    let forward = arrow.rotation * Vector3f::z();
    assert_relative_eq!(forward.x, 1.0, epsilon = 1e-5);
    match arrow.primitive {
        Primitive::Arrow {
            shaft_length,
            head_length,
            ..
        } => assert_relative_eq!(shaft_length + head_length, 1.0),
        ref other => panic!("expected arrow, got {other:?}"),
    }
}

#[test]
fn config_change_applies_on_next_reconciliation() {
    let mut snapshot = Snapshot::default();
    snapshot.boxes.insert(1, unit_box(0.0, 0.0, 0.0));

    let mut r = reconciler();
    r.reconcile(&snapshot);
    assert_eq!(fills(&r)[0].opacity, 1.0);

    // Flipping the flag leaves the rendered node untouched until the next
    // snapshot is reconciled.
    r.config.box_transparent = true;
    assert_eq!(fills(&r)[0].opacity, 1.0);
    r.reconcile(&snapshot);
    assert_relative_eq!(fills(&r)[0].opacity, 0.9);
}
