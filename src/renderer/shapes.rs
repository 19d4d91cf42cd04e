//! Shape generation for 2D primitives

use glam::Vec2;
use std::f32::consts::PI;

use super::draw_list::DrawList;
use super::vertex::Vertex;

/// Segments for circles this size and under
const MIN_SEGMENTS: u32 = 16;
const MAX_SEGMENTS: u32 = 48;

/// Segment count that keeps edges smooth without wasting triangles on gems
pub fn segments_for(radius: f32) -> u32 {
    ((radius * 1.5) as u32).clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let max = min + size;
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Triangle list for a whole frame, in draw order
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    for r in &list.rects {
        vertices.extend_from_slice(&rect(r.min, r.size, r.color));
    }
    for c in &list.circles {
        vertices.extend(circle(c.center, c.radius, c.color, segments_for(c.radius)));
    }

    vertices
}
