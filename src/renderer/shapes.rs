//! Shape generation for 2D primitives
//!
//! Screen-space pixel coordinates, y down. Rotations are in degrees,
//! clockwise on screen.

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::platform::Rect;

/// Vertices for `dest`, rotated by `rotation_deg` around `dest.pos()` with the
/// quad's corners offset by `-origin`. `uv` is the (min, max) texture window.
pub fn textured_quad(
    dest: Rect,
    origin: Vec2,
    rotation_deg: f32,
    uv: (Vec2, Vec2),
    color: [f32; 4],
) -> [Vertex; 6] {
    let (sin, cos) = rotation_deg.to_radians().sin_cos();
    let anchor = dest.pos();
    let corner = |local: Vec2| {
        let p = local - origin;
        anchor + Vec2::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos)
    };

    let tl = corner(Vec2::ZERO);
    let tr = corner(Vec2::new(dest.width, 0.0));
    let bl = corner(Vec2::new(0.0, dest.height));
    let br = corner(dest.size());

    let (uv_min, uv_max) = uv;

    // Two triangles
    [
        Vertex::new(tl.x, tl.y, uv_min.x, uv_min.y, color),
        Vertex::new(bl.x, bl.y, uv_min.x, uv_max.y, color),
        Vertex::new(tr.x, tr.y, uv_max.x, uv_min.y, color),
        Vertex::new(tr.x, tr.y, uv_max.x, uv_min.y, color),
        Vertex::new(bl.x, bl.y, uv_min.x, uv_max.y, color),
        Vertex::new(br.x, br.y, uv_max.x, uv_max.y, color),
    ]
}

/// Texture window for `source` inside a `width` x `height` texture
pub fn source_uv(source: Rect, width: u32, height: u32) -> (Vec2, Vec2) {
    let size = Vec2::new(width.max(1) as f32, height.max(1) as f32);
    (source.pos() / size, (source.pos() + source.size()) / size)
}

/// Axis-aligned solid rectangle (sampled from a white texel)
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    textured_quad(
        Rect::from_pos_size(pos, size),
        Vec2::ZERO,
        0.0,
        (Vec2::ZERO, Vec2::ONE),
        color,
    )
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, 0.5, 0.5, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            0.5,
            0.5,
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            0.5,
            0.5,
            color,
        ));
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(v: &Vertex) -> Vec2 {
        Vec2::from(v.position)
    }

    #[test]
    fn test_unrotated_quad_corners() {
        let quad = textured_quad(
            Rect::new(10.0, 20.0, 30.0, 40.0),
            Vec2::ZERO,
            0.0,
            (Vec2::ZERO, Vec2::ONE),
            [1.0; 4],
        );
        assert_eq!(pos(&quad[0]), Vec2::new(10.0, 20.0));
        assert_eq!(pos(&quad[5]), Vec2::new(40.0, 60.0));
        assert_eq!(quad[5].uv, [1.0, 1.0]);
    }

    #[test]
    fn test_origin_centers_quad_on_position() {
        // Bird-style placement: dest at the center, origin half the size
        let quad = textured_quad(
            Rect::new(100.0, 100.0, 50.0, 30.0),
            Vec2::new(25.0, 15.0),
            0.0,
            (Vec2::ZERO, Vec2::ONE),
            [1.0; 4],
        );
        assert_eq!(pos(&quad[0]), Vec2::new(75.0, 85.0));
        assert_eq!(pos(&quad[5]), Vec2::new(125.0, 115.0));
    }

    #[test]
    fn test_rotation_is_clockwise_on_screen() {
        let quad = textured_quad(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Vec2::new(5.0, 5.0),
            90.0,
            (Vec2::ZERO, Vec2::ONE),
            [1.0; 4],
        );
        // Top-left corner swings to the top-right
        let tl = pos(&quad[0]);
        assert!((tl - Vec2::new(5.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_source_uv() {
        let (min, max) = source_uv(Rect::new(0.0, 0.0, 17.0, 24.0), 34, 24);
        assert_eq!(min, Vec2::ZERO);
        assert_eq!(max, Vec2::new(0.5, 1.0));
    }

    #[test]
    fn test_circle_vertex_count() {
        assert_eq!(circle(Vec2::ZERO, 2.0, [1.0; 4], 12).len(), 36);
    }
}
