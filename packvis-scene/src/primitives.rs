//! Box primitive construction

use packvis_core::{Color, NodeId, Point3f, Primitive, SceneGroup, SceneNode, Vector3f};

/// Build the filled cuboid and black edge outline for one box.
///
/// Both nodes are registered into `group` at the same position; disposal
/// responsibility transfers to the caller through the returned handles. The
/// fill renders at 0.9 opacity when `transparent` is set, fully opaque
/// otherwise. Numeric input is taken on trust per the upstream contract;
/// there is no defensive validation.
pub fn build_box(
    group: &mut SceneGroup,
    size: Vector3f,
    position: Point3f,
    color: Color,
    transparent: bool,
    edge_line_width: f32,
) -> (NodeId, NodeId) {
    let opacity = if transparent { 0.9 } else { 1.0 };
    let fill = group.insert(
        SceneNode::new(Primitive::Cuboid { extents: size }, position, color).with_opacity(opacity),
    );
    let edges = group.insert(SceneNode::new(
        Primitive::CuboidEdges {
            extents: size,
            line_width: edge_line_width,
        },
        position,
        Color::BLACK,
    ));
    (fill, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_fill_and_outline_at_same_position() {
        let mut group = SceneGroup::new();
        let position = Point3f::new(1.0, 2.0, 3.0);
        let size = Vector3f::new(2.0, 1.0, 0.5);
        let (fill, edges) = build_box(&mut group, size, position, Color::WHITE, false, 2.0);

        assert_eq!(group.len(), 2);
        let fill_node = group.get(fill).unwrap();
        let edge_node = group.get(edges).unwrap();
        assert_eq!(fill_node.position, position);
        assert_eq!(edge_node.position, position);
        assert_eq!(fill_node.primitive, Primitive::Cuboid { extents: size });
        assert_eq!(edge_node.color, Color::BLACK);
        assert_eq!(fill_node.opacity, 1.0);
    }

    #[test]
    fn transparent_flag_lowers_fill_opacity() {
        let mut group = SceneGroup::new();
        let (fill, edges) = build_box(
            &mut group,
            Vector3f::new(1.0, 1.0, 1.0),
            Point3f::origin(),
            Color::WHITE,
            true,
            1.0,
        );
        assert_eq!(group.get(fill).unwrap().opacity, 0.9);
        // The outline never blends.
        assert_eq!(group.get(edges).unwrap().opacity, 1.0);
    }
}
