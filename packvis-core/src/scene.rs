//! Retained scene graph
//!
//! Reconciliation owns these structures exclusively; the presentation shell
//! only reads them to draw each frame. Nodes are plain data, so the whole
//! scene can be built and inspected without a live rendering context.

use crate::color::Color;
use crate::{Point3f, Vector3f, BIN_SIZE};
use nalgebra::UnitQuaternion;
use std::collections::BTreeMap;

/// Fixed staging-area palette (backdrop and staged boxes), `0xRRGGBB`.
pub const ITEM_BUFFER_COLOR: u32 = 0x87ceeb;
pub const TEMPORARY_SAVE_COLOR: u32 = 0xadff2f;

/// Handle to a node registered in a [`SceneGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u64);

/// Renderable shapes a scene node can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled axis-aligned cuboid.
    Cuboid { extents: Vector3f },
    /// The 12-edge outline of a cuboid.
    CuboidEdges { extents: Vector3f, line_width: f32 },
    Sphere { radius: f32 },
    /// Cylinder shaft plus cone head, pointing along local +Z.
    Arrow {
        shaft_radius: f32,
        shaft_length: f32,
        head_radius: f32,
        head_length: f32,
    },
    /// Thin backdrop slab; `scale` stretches it along the slot axis.
    Plane { extents: Vector3f, scale: Vector3f },
    /// Square line grid in the local XZ plane.
    GridLines { size: f32, divisions: u32 },
}

/// One renderable object in a group.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub primitive: Primitive,
    pub position: Point3f,
    pub rotation: UnitQuaternion<f32>,
    pub color: Color,
    pub opacity: f32,
}

impl SceneNode {
    /// Node with no rotation and full opacity.
    pub fn new(primitive: Primitive, position: Point3f, color: Color) -> Self {
        Self {
            primitive,
            position,
            rotation: UnitQuaternion::identity(),
            color,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }
}

/// An ordered set of live scene nodes sharing a world-space origin.
///
/// Ids grow monotonically and are never reused, so a handle kept past its
/// node's disposal stays inert: removing or looking up a stale id is a no-op.
#[derive(Debug, Default)]
pub struct SceneGroup {
    /// World-space offset applied to every node in the group.
    pub origin: Vector3f,
    nodes: BTreeMap<NodeId, SceneNode>,
    next_id: u64,
}

impl SceneGroup {
    /// Create an empty group at the world origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty group at the given world offset.
    pub fn with_origin(origin: Vector3f) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Register a node and transfer its ownership to the group.
    pub fn insert(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    /// Dispose of a node. Stale ids return `None`.
    pub fn remove(&mut self, id: NodeId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    /// Iterate live nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Dispose of every node. Previously handed-out ids all go stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// A fixed-slot staging region beside the packing volume.
#[derive(Debug)]
pub struct StagingArea {
    pub group: SceneGroup,
    /// Fixed color shared by the backdrop and every staged box.
    pub color: Color,
    /// Backdrop slab preserved across slot rebuilds, when present.
    pub backdrop: Option<NodeId>,
    /// Live fill/edge pairs for the staged boxes.
    pub slot_boxes: Vec<(NodeId, NodeId)>,
}

impl StagingArea {
    pub fn new(origin: Vector3f, color: Color) -> Self {
        Self {
            group: SceneGroup::with_origin(origin),
            color,
            backdrop: None,
            slot_boxes: Vec::new(),
        }
    }

    /// Insert the backdrop slab if the area does not currently have one.
    ///
    /// The slab is one slot tall; reconciliation stretches it along the slot
    /// axis to match the current slot count.
    pub fn ensure_backdrop(&mut self) {
        if self.backdrop.is_some() {
            return;
        }
        let thickness = BIN_SIZE / 100.0;
        let node = SceneNode::new(
            Primitive::Plane {
                extents: Vector3f::new(BIN_SIZE / 2.0, BIN_SIZE / 2.0, thickness),
                scale: Vector3f::new(1.0, 1.0, 1.0),
            },
            Point3f::new(0.0, 0.0, -thickness / 2.0),
            self.color,
        )
        .with_opacity(0.6);
        self.backdrop = Some(self.group.insert(node));
    }

    /// Dispose of every node in the area, backdrop included.
    pub fn clear(&mut self) {
        self.group.clear();
        self.backdrop = None;
        self.slot_boxes.clear();
    }
}

/// The live scene owned by reconciliation.
///
/// `group` holds the packed boxes, center markers, and graph edges; each
/// staging area carries its own group with a world offset beside the bin.
#[derive(Debug)]
pub struct RenderedScene {
    pub group: SceneGroup,
    pub item_buffer: StagingArea,
    pub temporary_save: StagingArea,
    /// Fill/edge pairs for the packed boxes, torn down wholesale per update.
    pub boxes: Vec<(NodeId, NodeId)>,
    /// Center-marker spheres.
    pub centers: Vec<NodeId>,
    /// Placement-order arrows.
    pub edges: Vec<NodeId>,
}

impl RenderedScene {
    /// Empty scene with the staging areas at their fixed offsets beside the
    /// bin: item buffer to the left, temporary save to the right, both at
    /// bin half-height.
    pub fn new() -> Self {
        Self {
            group: SceneGroup::new(),
            item_buffer: StagingArea::new(
                Vector3f::new(-0.8 * BIN_SIZE, BIN_SIZE / 2.0, 0.0),
                Color::from_hex(ITEM_BUFFER_COLOR),
            ),
            temporary_save: StagingArea::new(
                Vector3f::new(1.8 * BIN_SIZE, BIN_SIZE / 2.0, 0.0),
                Color::from_hex(TEMPORARY_SAVE_COLOR),
            ),
            boxes: Vec::new(),
            centers: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl Default for RenderedScene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(extent: f32) -> SceneNode {
        SceneNode::new(
            Primitive::Cuboid {
                extents: Vector3f::new(extent, extent, extent),
            },
            Point3f::origin(),
            Color::WHITE,
        )
    }

    #[test]
    fn ids_are_never_reused() {
        let mut group = SceneGroup::new();
        let first = group.insert(cube(1.0));
        group.remove(first);
        let second = group.insert(cube(2.0));
        assert_ne!(first, second);
        assert!(group.get(first).is_none());
        assert!(group.get(second).is_some());
    }

    #[test]
    fn removing_stale_id_is_a_noop() {
        let mut group = SceneGroup::new();
        let id = group.insert(cube(1.0));
        assert!(group.remove(id).is_some());
        assert!(group.remove(id).is_none());
        assert!(group.is_empty());
    }

    #[test]
    fn clear_invalidates_all_handles() {
        let mut group = SceneGroup::new();
        let a = group.insert(cube(1.0));
        let b = group.insert(cube(2.0));
        group.clear();
        assert!(group.get(a).is_none());
        assert!(group.get(b).is_none());
        assert_eq!(group.len(), 0);
    }

    #[test]
    fn backdrop_installed_once_and_cleared_with_area() {
        let mut area = StagingArea::new(Vector3f::zeros(), Color::WHITE);
        area.ensure_backdrop();
        let first = area.backdrop;
        area.ensure_backdrop();
        assert_eq!(area.backdrop, first);
        assert_eq!(area.group.len(), 1);

        area.clear();
        assert!(area.backdrop.is_none());
        assert!(area.group.is_empty());
    }
}
