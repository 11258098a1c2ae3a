//! Static bin scenery
//!
//! The packing volume itself never changes with snapshots: a floor slab, a
//! wireframe outline of the bin, and optional translucent surface grids on
//! four of its faces. The shell owns this group; reconciliation never
//! touches it.

use nalgebra::UnitQuaternion;
use packvis_core::{Color, Point3f, Primitive, SceneGroup, SceneNode, Vector3f, BIN_SIZE};
use std::f32::consts::FRAC_PI_2;

const FLOOR_COLOR: u32 = 0x555555;
const OUTLINE_COLOR: u32 = 0x444444;
const GRID_COLOR: u32 = 0xbbbbbb;

/// Build the static scenery group, with or without the surface grids.
pub fn build_scenery(show_grid: bool) -> SceneGroup {
    let bin = BIN_SIZE;
    let thickness = bin / 100.0;
    let mut group = SceneGroup::new();

    // Floor slab just below z = 0.
    group.insert(
        SceneNode::new(
            Primitive::Cuboid {
                extents: Vector3f::new(bin, bin, thickness),
            },
            Point3f::new(bin / 2.0, bin / 2.0, -thickness / 2.0),
            Color::from_hex(FLOOR_COLOR),
        )
        .with_opacity(0.8),
    );

    // Bin outline.
    group.insert(
        SceneNode::new(
            Primitive::CuboidEdges {
                extents: Vector3f::new(bin, bin, bin),
                line_width: 1.0,
            },
            Point3f::new(bin / 2.0, bin / 2.0, bin / 2.0),
            Color::from_hex(OUTLINE_COLOR),
        )
        .with_opacity(0.5),
    );

    if show_grid {
        for (position, rotation) in grid_placements() {
            group.insert(
                SceneNode::new(
                    Primitive::GridLines {
                        size: bin,
                        divisions: bin as u32,
                    },
                    position,
                    Color::from_hex(GRID_COLOR),
                )
                .with_rotation(rotation)
                .with_opacity(0.8),
            );
        }
    }

    group
}

/// Grid helpers on the bottom, back, left, and right bin faces. The grid
/// primitive lies in its local XZ plane, so each face is a position plus an
/// Euler rotation.
fn grid_placements() -> [(Point3f, UnitQuaternion<f32>); 4] {
    let bin = BIN_SIZE;
    [
        (
            Point3f::new(bin / 2.0, bin / 2.0, 0.0),
            UnitQuaternion::from_euler_angles(FRAC_PI_2, 0.0, 0.0),
        ),
        (
            Point3f::new(bin / 2.0, bin, bin / 2.0),
            UnitQuaternion::identity(),
        ),
        (
            Point3f::new(0.0, bin / 2.0, bin / 2.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2),
        ),
        (
            Point3f::new(bin, bin / 2.0, bin / 2.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, FRAC_PI_2),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grids_are_optional() {
        assert_eq!(build_scenery(false).len(), 2);
        assert_eq!(build_scenery(true).len(), 6);
    }
}
