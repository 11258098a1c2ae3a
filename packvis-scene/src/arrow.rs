//! Directed arrow construction

use nalgebra::UnitQuaternion;
use packvis_core::{Color, NodeId, Point3f, Primitive, SceneGroup, SceneNode, Vector3f};

/// Build a shaft-plus-head arrow anchored at `origin`, pointing along
/// `direction`.
///
/// `direction` must be a unit vector. The head takes the final quarter of
/// `length` and the shaft radius is half the head radius. A zero `length`
/// degenerates to a zero-length shaft instead of an error; self-loop edges
/// rely on that.
pub fn build_arrow(
    group: &mut SceneGroup,
    origin: Point3f,
    direction: Vector3f,
    length: f32,
    color: Color,
    head_radius: f32,
) -> NodeId {
    let head_length = length / 4.0;
    let shaft_length = length - head_length;
    // Arrow geometry points along local +Z; antiparallel directions have no
    // unique rotation, so pick the flip around X.
    let rotation = if length > 0.0 {
        UnitQuaternion::rotation_between(&Vector3f::z(), &direction).unwrap_or_else(|| {
            UnitQuaternion::from_axis_angle(&Vector3f::x_axis(), std::f32::consts::PI)
        })
    } else {
        UnitQuaternion::identity()
    };

    group.insert(
        SceneNode::new(
            Primitive::Arrow {
                shaft_radius: head_radius / 2.0,
                shaft_length,
                head_radius,
                head_length,
            },
            origin,
            color,
        )
        .with_rotation(rotation),
    )
}
