//! Shape generation for 2D primitives
//!
//! Everything is built from axis-aligned quads in screen pixels, two triangles
//! each, counter-clockwise in y-down space.

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::Rect;

/// Generate vertices for a filled axis-aligned quad
pub fn quad(min: Vec2, max: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    [
        Vertex::new(min.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(max.x, min.y, color),
        Vertex::new(min.x, max.y, color),
        Vertex::new(max.x, max.y, color),
    ]
}

/// Generate vertices for a filled rectangle
pub fn filled_rect(rect: Rect, color: [f32; 4]) -> Vec<Vertex> {
    if rect.width() <= 0 || rect.height() <= 0 {
        return Vec::new();
    }
    quad(rect.pos.as_vec2(), (rect.pos + rect.size).as_vec2(), color).to_vec()
}

/// Generate vertices for a rectangle outline of `width` pixels, drawn inside
/// the rectangle's edges (four bands, corners not doubled)
pub fn outlined_rect(rect: Rect, color: [f32; 4], width: i32) -> Vec<Vertex> {
    if width <= 0 || rect.width() <= 0 || rect.height() <= 0 {
        return Vec::new();
    }
    // A border thick enough to meet in the middle is just a filled rect
    if width * 2 >= rect.width() || width * 2 >= rect.height() {
        return filled_rect(rect, color);
    }

    let (l, t, r, b) = (rect.left(), rect.top(), rect.right(), rect.bottom());
    let bands = [
        Rect::new(l, t, rect.width(), width),
        Rect::new(l, b - width, rect.width(), width),
        Rect::new(l, t + width, width, rect.height() - 2 * width),
        Rect::new(r - width, t + width, width, rect.height() - 2 * width),
    ];

    let mut vertices = Vec::with_capacity(bands.len() * 6);
    for band in bands {
        vertices.extend(filled_rect(band, color));
    }
    vertices
}

/// Simple car silhouette: body plus darker windshield and rear window
pub fn car(rect: Rect, color: [f32; 4]) -> Vec<Vertex> {
    let mut vertices = filled_rect(rect, color);
    let glass = [color[0] * 0.35, color[1] * 0.35, color[2] * 0.35, color[3]];
    let inset = rect.width() / 6;
    let window_h = rect.height() / 6;
    if inset > 0 && window_h > 0 {
        vertices.extend(filled_rect(
            Rect::new(
                rect.left() + inset,
                rect.top() + window_h,
                rect.width() - 2 * inset,
                window_h,
            ),
            glass,
        ));
        vertices.extend(filled_rect(
            Rect::new(
                rect.left() + inset,
                rect.bottom() - 2 * window_h,
                rect.width() - 2 * inset,
                window_h,
            ),
            glass,
        ));
    }
    vertices
}
