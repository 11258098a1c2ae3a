//! Scene reconciliation
//!
//! The reconciler owns the retained scene and replaces the previous rendered
//! representation with one consistent with each incoming snapshot. Every
//! category of object (boxes, center markers, graph arrows, staging boxes)
//! is torn down wholesale and rebuilt: there is no incremental diff by id,
//! and no cross-snapshot identity.
//!
//! Reconciliation runs synchronously to completion inside the snapshot
//! handler; the shell only ever reads the scene between calls.

use crate::arrow::build_arrow;
use crate::primitives::build_box;
use packvis_core::{
    BoxRecord, Color, ColorClass, Point3f, Primitive, RenderedScene, SceneNode, SlotSize,
    Snapshot, StagingArea, Vector3f, BIN_SIZE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Radius of the center-marker spheres.
const CENTER_MARKER_RADIUS: f32 = 0.2;
/// Head radius of the placement-order arrows.
const ARROW_HEAD_RADIUS: f32 = 0.2;
/// Pitch between neighboring staging slots along the slot axis.
const SLOT_SPACING: f32 = BIN_SIZE / 2.0;

/// Display toggles, read once at the start of every reconciliation entry
/// point.
///
/// The shell may flip these between calls; a change takes effect on the next
/// reconciliation, never retroactively on already-rendered objects.
#[derive(Debug, Clone, Copy)]
pub struct ReconcilerConfig {
    pub show_centers: bool,
    pub show_graph: bool,
    pub show_outer: bool,
    pub random_color: bool,
    pub box_transparent: bool,
    pub box_edge_line_width: f32,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            show_centers: true,
            show_graph: true,
            show_outer: true,
            random_color: false,
            box_transparent: false,
            box_edge_line_width: 2.0,
        }
    }
}

/// Keeps the retained scene consistent with streamed snapshots.
pub struct SceneReconciler {
    /// Live configuration record the shell toggles between calls.
    pub config: ReconcilerConfig,
    scene: RenderedScene,
    rng: StdRng,
}

impl SceneReconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self {
            config,
            scene: RenderedScene::new(),
            rng: StdRng::from_entropy(),
        }
    }

    /// Reconciler with a deterministic random-color stream, for tests and
    /// reproducible captures.
    pub fn with_seed(config: ReconcilerConfig, seed: u64) -> Self {
        Self {
            config,
            scene: RenderedScene::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The aggregate scene the presentation shell reads each frame. Shells
    /// hold this borrow transiently and never mutate individual nodes.
    pub fn scene(&self) -> &RenderedScene {
        &self.scene
    }

    /// Top-level entry point: rebuild the packed boxes, then conditionally
    /// the center markers and the placement-order graph.
    ///
    /// Staging areas are deliberately not touched here; they have their own
    /// entry point, [`SceneReconciler::reconcile_staging_areas`], and the
    /// two are independently callable.
    pub fn reconcile(&mut self, snapshot: &Snapshot) {
        let config = self.config;
        let box_list = self.rebuild_boxes(snapshot, config);
        if config.show_centers {
            self.rebuild_centers(&box_list);
        }
        if config.show_graph {
            self.rebuild_graph(snapshot, &box_list);
        }
    }

    /// Tear down and rebuild only the packed-box primitives.
    ///
    /// Returns the resolved records so dependent passes (centers, graph) can
    /// be driven from the same classification.
    pub fn reconcile_boxes(&mut self, snapshot: &Snapshot) -> Vec<BoxRecord> {
        let config = self.config;
        self.rebuild_boxes(snapshot, config)
    }

    /// Reconcile both staging areas against the snapshot's slot vectors.
    ///
    /// With `show_outer` off, both areas are emptied entirely and nothing is
    /// rebuilt until the flag is on again.
    pub fn reconcile_staging_areas(&mut self, snapshot: &Snapshot) {
        let config = self.config;
        if !config.show_outer {
            self.scene.item_buffer.clear();
            self.scene.temporary_save.clear();
            return;
        }
        reconcile_staging(&mut self.scene.item_buffer, &snapshot.item_buffer, config);
        reconcile_staging(
            &mut self.scene.temporary_save,
            &snapshot.temporary_save,
            config,
        );
    }

    fn rebuild_boxes(&mut self, snapshot: &Snapshot, config: ReconcilerConfig) -> Vec<BoxRecord> {
        for (fill, edges) in self.scene.boxes.drain(..) {
            self.scene.group.remove(fill);
            self.scene.group.remove(edges);
        }

        let records: Vec<BoxRecord> = snapshot
            .boxes
            .iter()
            .map(|(&id, packed)| BoxRecord {
                id,
                center: packed.position,
                size: packed.size,
                mass: packed.mass,
                color: if config.random_color {
                    Color::from_hex(self.rng.gen_range(0..=0xffffff))
                } else {
                    ColorClass::classify(id, snapshot).color()
                },
            })
            .collect();

        for record in &records {
            let pair = build_box(
                &mut self.scene.group,
                record.size,
                record.center,
                record.color,
                config.box_transparent,
                config.box_edge_line_width,
            );
            self.scene.boxes.push(pair);
        }
        records
    }

    /// Rebuild the center markers, one sphere per box in its box's color.
    ///
    /// Callers skip this entirely when `show_centers` is off, which leaves
    /// stale markers from an earlier enabled reconciliation in place until
    /// the flag is on again. Inherited behavior, kept as written.
    fn rebuild_centers(&mut self, box_list: &[BoxRecord]) {
        for id in self.scene.centers.drain(..) {
            self.scene.group.remove(id);
        }
        for record in box_list {
            let id = self.scene.group.insert(SceneNode::new(
                Primitive::Sphere {
                    radius: CENTER_MARKER_RADIUS,
                },
                record.center,
                record.color,
            ));
            self.scene.centers.push(id);
        }
    }

    /// Rebuild the placement-order arrows.
    ///
    /// Destinations are visited in sequence order. An edge with either
    /// endpoint missing from the box list is skipped silently and the rest
    /// of the graph still renders; a self-loop yields one zero-length arrow.
    fn rebuild_graph(&mut self, snapshot: &Snapshot, box_list: &[BoxRecord]) {
        for id in self.scene.edges.drain(..) {
            self.scene.group.remove(id);
        }
        for (&src_id, dst_ids) in &snapshot.adjacency {
            let Some(src) = box_list.iter().find(|b| b.id == src_id) else {
                continue;
            };
            for &dst_id in dst_ids {
                let Some(dst) = box_list.iter().find(|b| b.id == dst_id) else {
                    continue;
                };
                let offset = dst.center - src.center;
                let length = offset.norm();
                let direction = if length > 0.0 {
                    offset / length
                } else {
                    Vector3f::z()
                };
                let id = build_arrow(
                    &mut self.scene.group,
                    src.center,
                    direction,
                    length,
                    Color::BLACK,
                    ARROW_HEAD_RADIUS,
                );
                self.scene.edges.push(id);
            }
        }
    }
}

/// Rebuild one staging area from its slot vector.
///
/// An empty slot vector clears the whole area: an empty staging area renders
/// as nothing, not as a zero-height placeholder. Otherwise the backdrop slab
/// is preserved (installed on first use) and stretched to the slot count,
/// prior slot boxes are dropped, and each non-null slot gets one box at its
/// index-derived offset. Slots are centered symmetrically around the area
/// origin; a `None` slot contributes no box but keeps its index, so gaps
/// stay visible.
fn reconcile_staging(area: &mut StagingArea, slots: &[Option<SlotSize>], config: ReconcilerConfig) {
    if slots.is_empty() {
        area.clear();
        return;
    }

    area.ensure_backdrop();
    if let Some(id) = area.backdrop {
        if let Some(node) = area.group.get_mut(id) {
            if let Primitive::Plane { scale, .. } = &mut node.primitive {
                scale.y = slots.len() as f32;
            }
        }
    }

    for (fill, edges) in area.slot_boxes.drain(..) {
        area.group.remove(fill);
        area.group.remove(edges);
    }

    let start = -((slots.len() - 1) as f32) / 2.0 * SLOT_SPACING;
    for (index, slot) in slots.iter().enumerate() {
        let Some(size) = slot else { continue };
        let y = start + index as f32 * SLOT_SPACING;
        let position = Point3f::new(0.0, y, size.z / 2.0);
        let pair = build_box(
            &mut area.group,
            *size,
            position,
            area.color,
            config.box_transparent,
            config.box_edge_line_width,
        );
        area.slot_boxes.push(pair);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packvis_core::PackedBox;

    fn snapshot_with_boxes(count: u32) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for id in 0..count {
            snapshot.boxes.insert(
                id,
                PackedBox {
                    position: Point3f::new(id as f32, 0.0, 0.0),
                    size: Vector3f::new(1.0, 1.0, 1.0),
                    mass: 1.0,
                },
            );
        }
        snapshot
    }

    #[test]
    fn seeded_random_colors_are_reproducible() {
        let config = ReconcilerConfig {
            random_color: true,
            ..Default::default()
        };
        let snapshot = snapshot_with_boxes(4);

        let mut first = SceneReconciler::with_seed(config, 42);
        let mut second = SceneReconciler::with_seed(config, 42);
        let colors_a: Vec<Color> = first
            .reconcile_boxes(&snapshot)
            .iter()
            .map(|r| r.color)
            .collect();
        let colors_b: Vec<Color> = second
            .reconcile_boxes(&snapshot)
            .iter()
            .map(|r| r.color)
            .collect();
        assert_eq!(colors_a, colors_b);

        // Colors are independent per box.
        let mut distinct = colors_a.clone();
        distinct.dedup();
        assert!(distinct.len() > 1);
    }

    #[test]
    fn stale_center_markers_persist_while_disabled() {
        let mut reconciler = SceneReconciler::with_seed(ReconcilerConfig::default(), 0);
        let snapshot = snapshot_with_boxes(3);
        reconciler.reconcile(&snapshot);

        let count_spheres = |r: &SceneReconciler| {
            r.scene()
                .group
                .iter()
                .filter(|(_, n)| matches!(n.primitive, Primitive::Sphere { .. }))
                .count()
        };
        assert_eq!(count_spheres(&reconciler), 3);

        // Disabling the flag skips the marker pass entirely; the old spheres
        // survive even though the boxes were rebuilt.
        reconciler.config.show_centers = false;
        reconciler.reconcile(&snapshot_with_boxes(1));
        assert_eq!(count_spheres(&reconciler), 3);

        // Re-enabling clears the stale set and rebuilds from the new list.
        reconciler.config.show_centers = true;
        reconciler.reconcile(&snapshot_with_boxes(1));
        assert_eq!(count_spheres(&reconciler), 1);
    }

    #[test]
    fn backdrop_survives_slot_rebuild_and_rescales() {
        let mut reconciler = SceneReconciler::with_seed(ReconcilerConfig::default(), 0);
        let mut snapshot = Snapshot::default();
        snapshot.item_buffer = vec![Some(Vector3f::new(1.0, 1.0, 1.0)), None];
        reconciler.reconcile_staging_areas(&snapshot);

        let backdrop = reconciler.scene().item_buffer.backdrop.unwrap();

        snapshot.item_buffer = vec![None, None, Some(Vector3f::new(2.0, 2.0, 2.0))];
        reconciler.reconcile_staging_areas(&snapshot);

        let area = &reconciler.scene().item_buffer;
        assert_eq!(area.backdrop, Some(backdrop));
        match area.group.get(backdrop).unwrap().primitive {
            Primitive::Plane { scale, .. } => assert_eq!(scale.y, 3.0),
            ref other => panic!("expected plane backdrop, got {other:?}"),
        }
    }

    #[test]
    fn hiding_outer_areas_clears_both_groups() {
        let mut reconciler = SceneReconciler::with_seed(ReconcilerConfig::default(), 0);
        let mut snapshot = Snapshot::default();
        snapshot.item_buffer = vec![Some(Vector3f::new(1.0, 1.0, 1.0))];
        snapshot.temporary_save = vec![Some(Vector3f::new(1.0, 1.0, 1.0))];
        reconciler.reconcile_staging_areas(&snapshot);
        assert!(!reconciler.scene().item_buffer.group.is_empty());
        assert!(!reconciler.scene().temporary_save.group.is_empty());

        reconciler.config.show_outer = false;
        reconciler.reconcile_staging_areas(&snapshot);
        assert!(reconciler.scene().item_buffer.group.is_empty());
        assert!(reconciler.scene().temporary_save.group.is_empty());
    }
}
