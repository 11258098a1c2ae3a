//! CPU tessellation of the retained scene into vertex batches
//!
//! Runs every frame over the scene groups; vertex batches are rebuilt on
//! each redraw rather than cached, which is cheap at this scene size.
//! Triangle geometry goes to the mesh batch, outlines and grids to the
//! line batch.

use crate::renderer::{LineVertex, MeshVertex};
use nalgebra::UnitQuaternion;
use packvis_core::{Primitive, SceneGroup, SceneNode, Vector3f};
use std::f32::consts::{PI, TAU};

const SPHERE_RINGS: u32 = 16;
const SPHERE_SEGMENTS: u32 = 24;
const ARROW_SEGMENTS: u32 = 32;

/// World placement of one node: group origin plus node transform.
struct Placement {
    offset: Vector3f,
    rotation: UnitQuaternion<f32>,
}

impl Placement {
    fn point(&self, local: Vector3f) -> [f32; 3] {
        let world = self.offset + self.rotation * local;
        [world.x, world.y, world.z]
    }

    fn direction(&self, local: Vector3f) -> [f32; 3] {
        let world = self.rotation * local;
        [world.x, world.y, world.z]
    }
}

fn rgba(node: &SceneNode) -> [f32; 4] {
    let [r, g, b] = node.color.to_array();
    [r, g, b, node.opacity]
}

/// Append every node of `group` to the frame's vertex batches.
pub fn tessellate_group(
    group: &SceneGroup,
    meshes: &mut Vec<MeshVertex>,
    lines: &mut Vec<LineVertex>,
) {
    for (_, node) in group.iter() {
        let placement = Placement {
            offset: group.origin + node.position.coords,
            rotation: node.rotation,
        };
        let color = rgba(node);
        match node.primitive {
            Primitive::Cuboid { extents } => {
                push_cuboid(meshes, &placement, extents / 2.0, color);
            }
            Primitive::Plane { extents, scale } => {
                push_cuboid(meshes, &placement, extents.component_mul(&scale) / 2.0, color);
            }
            Primitive::CuboidEdges { extents, .. } => {
                push_cuboid_edges(lines, &placement, extents / 2.0, color);
            }
            Primitive::Sphere { radius } => {
                push_sphere(meshes, &placement, radius, color);
            }
            Primitive::Arrow {
                shaft_radius,
                shaft_length,
                head_radius,
                head_length,
            } => {
                push_cylinder(meshes, &placement, shaft_radius, 0.0, shaft_length, color);
                push_cone(
                    meshes,
                    &placement,
                    head_radius,
                    shaft_length,
                    head_length,
                    color,
                );
            }
            Primitive::GridLines { size, divisions } => {
                push_grid(lines, &placement, size, divisions, color);
            }
        }
    }
}

fn push_quad(
    meshes: &mut Vec<MeshVertex>,
    placement: &Placement,
    corners: [Vector3f; 4],
    normal: Vector3f,
    color: [f32; 4],
) {
    let normal = placement.direction(normal);
    let positions = corners.map(|c| placement.point(c));
    for &index in &[0usize, 1, 2, 0, 2, 3] {
        meshes.push(MeshVertex {
            position: positions[index],
            normal,
            color,
        });
    }
}

fn push_cuboid(
    meshes: &mut Vec<MeshVertex>,
    placement: &Placement,
    half: Vector3f,
    color: [f32; 4],
) {
    let (hx, hy, hz) = (half.x, half.y, half.z);
    let v = |x: f32, y: f32, z: f32| Vector3f::new(x, y, z);

    // One quad per face, wound counter-clockwise seen from outside.
    push_quad(
        meshes,
        placement,
        [v(hx, -hy, -hz), v(hx, hy, -hz), v(hx, hy, hz), v(hx, -hy, hz)],
        Vector3f::x(),
        color,
    );
    push_quad(
        meshes,
        placement,
        [v(-hx, hy, -hz), v(-hx, -hy, -hz), v(-hx, -hy, hz), v(-hx, hy, hz)],
        -Vector3f::x(),
        color,
    );
    push_quad(
        meshes,
        placement,
        [v(hx, hy, -hz), v(-hx, hy, -hz), v(-hx, hy, hz), v(hx, hy, hz)],
        Vector3f::y(),
        color,
    );
    push_quad(
        meshes,
        placement,
        [v(-hx, -hy, -hz), v(hx, -hy, -hz), v(hx, -hy, hz), v(-hx, -hy, hz)],
        -Vector3f::y(),
        color,
    );
    push_quad(
        meshes,
        placement,
        [v(-hx, -hy, hz), v(hx, -hy, hz), v(hx, hy, hz), v(-hx, hy, hz)],
        Vector3f::z(),
        color,
    );
    push_quad(
        meshes,
        placement,
        [v(-hx, hy, -hz), v(hx, hy, -hz), v(hx, -hy, -hz), v(-hx, -hy, -hz)],
        -Vector3f::z(),
        color,
    );
}

fn push_cuboid_edges(
    lines: &mut Vec<LineVertex>,
    placement: &Placement,
    half: Vector3f,
    color: [f32; 4],
) {
    let corner = |i: usize| {
        Vector3f::new(
            if i & 1 == 0 { -half.x } else { half.x },
            if i & 2 == 0 { -half.y } else { half.y },
            if i & 4 == 0 { -half.z } else { half.z },
        )
    };
    // Pairs of corner indices differing in exactly one axis bit.
    const EDGES: [(usize, usize); 12] = [
        (0, 1),
        (2, 3),
        (4, 5),
        (6, 7),
        (0, 2),
        (1, 3),
        (4, 6),
        (5, 7),
        (0, 4),
        (1, 5),
        (2, 6),
        (3, 7),
    ];
    for (a, b) in EDGES {
        lines.push(LineVertex {
            position: placement.point(corner(a)),
            color,
        });
        lines.push(LineVertex {
            position: placement.point(corner(b)),
            color,
        });
    }
}

fn push_sphere(meshes: &mut Vec<MeshVertex>, placement: &Placement, radius: f32, color: [f32; 4]) {
    let surface = |ring: u32, segment: u32| {
        let phi = PI * ring as f32 / SPHERE_RINGS as f32;
        let theta = TAU * segment as f32 / SPHERE_SEGMENTS as f32;
        Vector3f::new(
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
            phi.cos(),
        )
    };
    for ring in 0..SPHERE_RINGS {
        for segment in 0..SPHERE_SEGMENTS {
            let quad = [
                surface(ring, segment),
                surface(ring + 1, segment),
                surface(ring + 1, segment + 1),
                surface(ring, segment + 1),
            ];
            for &index in &[0usize, 1, 2, 0, 2, 3] {
                let unit = quad[index];
                meshes.push(MeshVertex {
                    position: placement.point(unit * radius),
                    normal: placement.direction(unit),
                    color,
                });
            }
        }
    }
}

fn push_cylinder(
    meshes: &mut Vec<MeshVertex>,
    placement: &Placement,
    radius: f32,
    z_start: f32,
    length: f32,
    color: [f32; 4],
) {
    for segment in 0..ARROW_SEGMENTS {
        let theta0 = TAU * segment as f32 / ARROW_SEGMENTS as f32;
        let theta1 = TAU * (segment + 1) as f32 / ARROW_SEGMENTS as f32;
        let rim = |theta: f32, z: f32| Vector3f::new(radius * theta.cos(), radius * theta.sin(), z);
        let normal0 = Vector3f::new(theta0.cos(), theta0.sin(), 0.0);
        let normal1 = Vector3f::new(theta1.cos(), theta1.sin(), 0.0);
        let quad = [
            (rim(theta0, z_start), normal0),
            (rim(theta1, z_start), normal1),
            (rim(theta1, z_start + length), normal1),
            (rim(theta0, z_start + length), normal0),
        ];
        for &index in &[0usize, 1, 2, 0, 2, 3] {
            let (position, normal) = quad[index];
            meshes.push(MeshVertex {
                position: placement.point(position),
                normal: placement.direction(normal),
                color,
            });
        }
    }
}

fn push_cone(
    meshes: &mut Vec<MeshVertex>,
    placement: &Placement,
    radius: f32,
    z_start: f32,
    length: f32,
    color: [f32; 4],
) {
    let apex = Vector3f::new(0.0, 0.0, z_start + length);
    let slope = if length > 0.0 { radius / length } else { 0.0 };
    for segment in 0..ARROW_SEGMENTS {
        let theta0 = TAU * segment as f32 / ARROW_SEGMENTS as f32;
        let theta1 = TAU * (segment + 1) as f32 / ARROW_SEGMENTS as f32;
        let theta_mid = (theta0 + theta1) / 2.0;
        let base = |theta: f32| Vector3f::new(radius * theta.cos(), radius * theta.sin(), z_start);
        let normal = Vector3f::new(theta_mid.cos(), theta_mid.sin(), slope)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3f::z);
        for position in [base(theta0), base(theta1), apex] {
            meshes.push(MeshVertex {
                position: placement.point(position),
                normal: placement.direction(normal),
                color,
            });
        }
    }
}

fn push_grid(
    lines: &mut Vec<LineVertex>,
    placement: &Placement,
    size: f32,
    divisions: u32,
    color: [f32; 4],
) {
    let half = size / 2.0;
    let step = size / divisions as f32;
    for i in 0..=divisions {
        let t = -half + i as f32 * step;
        // Lines in the local XZ plane, the layout grid helpers use.
        for (start, end) in [
            (Vector3f::new(t, 0.0, -half), Vector3f::new(t, 0.0, half)),
            (Vector3f::new(-half, 0.0, t), Vector3f::new(half, 0.0, t)),
        ] {
            lines.push(LineVertex {
                position: placement.point(start),
                color,
            });
            lines.push(LineVertex {
                position: placement.point(end),
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packvis_core::{Color, Point3f, SceneNode};

    #[test]
    fn cuboid_tessellates_to_twelve_triangles() {
        let mut group = SceneGroup::new();
        group.insert(SceneNode::new(
            Primitive::Cuboid {
                extents: Vector3f::new(2.0, 2.0, 2.0),
            },
            Point3f::origin(),
            Color::WHITE,
        ));
        let mut meshes = Vec::new();
        let mut lines = Vec::new();
        tessellate_group(&group, &mut meshes, &mut lines);
        assert_eq!(meshes.len(), 36);
        assert!(lines.is_empty());
    }

    #[test]
    fn edges_tessellate_to_twelve_segments() {
        let mut group = SceneGroup::new();
        group.insert(SceneNode::new(
            Primitive::CuboidEdges {
                extents: Vector3f::new(1.0, 1.0, 1.0),
                line_width: 2.0,
            },
            Point3f::origin(),
            Color::BLACK,
        ));
        let mut meshes = Vec::new();
        let mut lines = Vec::new();
        tessellate_group(&group, &mut meshes, &mut lines);
        assert!(meshes.is_empty());
        assert_eq!(lines.len(), 24);
    }

    #[test]
    fn group_origin_offsets_every_vertex() {
        let mut group = SceneGroup::with_origin(Vector3f::new(10.0, 0.0, 0.0));
        group.insert(SceneNode::new(
            Primitive::Cuboid {
                extents: Vector3f::new(2.0, 2.0, 2.0),
            },
            Point3f::origin(),
            Color::WHITE,
        ));
        let mut meshes = Vec::new();
        let mut lines = Vec::new();
        tessellate_group(&group, &mut meshes, &mut lines);
        assert!(meshes.iter().all(|v| v.position[0] >= 9.0));
    }
}
