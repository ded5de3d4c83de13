//! Render primitives: the paint-ready description of a shape.
//!
//! A primitive is derived from a shape's kind, coordinates, and text, and is
//! handed to the external drawing-primitive library as-is. It carries no
//! identity of its own; two shapes with equal fields derive equal primitives,
//! and it is recomputed every time those fields change.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::camera::Point;
use crate::consts::TEXT_LINE_HEIGHT;
use crate::doc::ShapeKind;

/// Paint description for one shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RenderPrimitive {
    /// Nothing to paint yet.
    #[default]
    Empty,
    /// Straight segment.
    Line { from: Point, to: Point },
    /// Rectangle anchored at `origin`. Width and height may be negative while
    /// the shape is still being drawn toward the top-left.
    Rectangle { origin: Point, width: f64, height: f64 },
    /// Circle given by center and diameter.
    Circle { center: Point, diameter: f64 },
    /// Single-line label with a top baseline.
    Text { origin: Point, text: String, font_px: f64 },
}

/// Derive the primitive for a shape from its numeric fields and text.
#[must_use]
pub fn derive(kind: ShapeKind, x1: f64, y1: f64, x2: f64, y2: f64, text: Option<&str>) -> RenderPrimitive {
    match kind {
        ShapeKind::Line => RenderPrimitive::Line { from: Point::new(x1, y1), to: Point::new(x2, y2) },
        ShapeKind::Rectangle => RenderPrimitive::Rectangle {
            origin: Point::new(x1, y1),
            width: x2 - x1,
            height: y2 - y1,
        },
        ShapeKind::Circle => {
            let radius = Point::new(x1, y1).distance(Point::new(x2, y2));
            RenderPrimitive::Circle { center: Point::new(x1, y1), diameter: radius * 2.0 }
        }
        ShapeKind::Text => RenderPrimitive::Text {
            origin: Point::new(x1, y1),
            text: text.unwrap_or_default().to_owned(),
            font_px: TEXT_LINE_HEIGHT,
        },
    }
}
