//! Geometry kernel: normalization, hit-testing, resizing, and cursor affordances.
//!
//! Everything here is a pure function of its arguments. Dispatch on
//! [`ShapeKind`] is exhaustive, so adding a kind forces every operation to
//! decide how it treats it.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::{HANDLE_TOLERANCE, LINE_HIT_EPSILON};
use crate::doc::{Shape, ShapeId, ShapeKind};

/// Which part of a shape a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Position {
    /// First endpoint of a line.
    Start,
    /// Second endpoint of a line.
    End,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// On the boundary of a circle.
    NearEdge,
    /// On the body of the shape.
    Inside,
}

impl Position {
    /// Whether grabbing this position resizes rather than moves.
    #[must_use]
    pub fn is_handle(self) -> bool {
        !matches!(self, Self::Inside)
    }
}

/// Canonical corner order for a shape.
///
/// Lines put the lexicographically smaller endpoint (by x, then y) first;
/// rectangles become `(min x, min y)-(max x, max y)`; circles and text are
/// returned unchanged. Idempotent.
#[must_use]
pub fn normalize(shape: &Shape) -> Shape {
    let (x1, y1, x2, y2) = (shape.x1, shape.y1, shape.x2, shape.y2);
    match shape.kind {
        ShapeKind::Line => {
            if x1 < x2 || (x1 == x2 && y1 <= y2) {
                shape.with_coords(x1, y1, x2, y2)
            } else {
                shape.with_coords(x2, y2, x1, y1)
            }
        }
        ShapeKind::Rectangle => shape.with_coords(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)),
        ShapeKind::Circle | ShapeKind::Text => shape.clone(),
    }
}

fn near(p: Point, target: Point, tolerance: f64, pos: Position) -> Option<Position> {
    ((p.x - target.x).abs() < tolerance && (p.y - target.y).abs() < tolerance).then_some(pos)
}

fn within_box(p: Point, shape: &Shape) -> bool {
    p.x >= shape.x1.min(shape.x2)
        && p.x <= shape.x1.max(shape.x2)
        && p.y >= shape.y1.min(shape.y2)
        && p.y <= shape.y1.max(shape.y2)
}

/// Classify `point` against `shape` at unit scale, or `None` if it misses.
#[must_use]
pub fn hit_test(point: Point, shape: &Shape) -> Option<Position> {
    hit_test_within(point, shape, HANDLE_TOLERANCE)
}

/// Classify `point` against `shape` with handle and edge slop of `tolerance`
/// document units.
///
/// Callers holding a viewport pass `HANDLE_TOLERANCE` converted from device
/// pixels, so the slop stays constant on screen at any zoom.
#[must_use]
pub fn hit_test_within(point: Point, shape: &Shape, tolerance: f64) -> Option<Position> {
    let a = shape.origin();
    let b = shape.far();
    match shape.kind {
        ShapeKind::Line => {
            let slack = point.distance(a) + point.distance(b) - a.distance(b);
            near(point, a, tolerance, Position::Start)
                .or_else(|| near(point, b, tolerance, Position::End))
                .or_else(|| (slack < LINE_HIT_EPSILON).then_some(Position::Inside))
        }
        // Corner slop only reaches inward: a point outside the box never hits.
        ShapeKind::Rectangle => within_box(point, shape).then(|| {
            near(point, a, tolerance, Position::TopLeft)
                .or_else(|| near(point, Point::new(b.x, a.y), tolerance, Position::TopRight))
                .or_else(|| near(point, Point::new(a.x, b.y), tolerance, Position::BottomLeft))
                .or_else(|| near(point, b, tolerance, Position::BottomRight))
                .unwrap_or(Position::Inside)
        }),
        ShapeKind::Circle => {
            let radius = a.distance(b);
            let d = point.distance(a);
            if (d - radius).abs() < tolerance {
                Some(Position::NearEdge)
            } else if d < radius {
                Some(Position::Inside)
            } else {
                None
            }
        }
        ShapeKind::Text => within_box(point, shape).then_some(Position::Inside),
    }
}

/// First shape in paint order that `point` hits, with the part it hit.
///
/// Walks bottom-to-top, so where shapes overlap the earliest-drawn wins.
/// `tolerance` is the handle slop in document units, as for [`hit_test_within`].
#[must_use]
pub fn element_at(point: Point, shapes: &[Shape], tolerance: f64) -> Option<(ShapeId, Position)> {
    shapes
        .iter()
        .find_map(|s| hit_test_within(point, s, tolerance).map(|pos| (s.id, pos)))
}

/// Move the corner named by `handle` to `point`.
///
/// `Inside` is not a handle and leaves the shape unchanged.
#[must_use]
pub fn resize(shape: &Shape, point: Point, handle: Position) -> Shape {
    let (x1, y1, x2, y2) = (shape.x1, shape.y1, shape.x2, shape.y2);
    match handle {
        Position::TopLeft | Position::Start => shape.with_coords(point.x, point.y, x2, y2),
        Position::TopRight => shape.with_coords(x1, point.y, point.x, y2),
        Position::BottomLeft => shape.with_coords(point.x, y1, x2, point.y),
        Position::BottomRight | Position::End | Position::NearEdge => shape.with_coords(x1, y1, point.x, point.y),
        Position::Inside => shape.clone(),
    }
}

/// Mapping from hit position to a UI cursor label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorTable {
    pub start: String,
    pub end: String,
    pub top_left: String,
    pub top_right: String,
    pub bottom_left: String,
    pub bottom_right: String,
    pub near_edge: String,
    pub inside: String,
    /// Label when nothing is under the pointer.
    pub none: String,
}

impl Default for CursorTable {
    fn default() -> Self {
        let label = |position| cursor_affordance(position).to_owned();
        Self {
            start: label(Some(Position::Start)),
            end: label(Some(Position::End)),
            top_left: label(Some(Position::TopLeft)),
            top_right: label(Some(Position::TopRight)),
            bottom_left: label(Some(Position::BottomLeft)),
            bottom_right: label(Some(Position::BottomRight)),
            near_edge: label(Some(Position::NearEdge)),
            inside: label(Some(Position::Inside)),
            none: label(None),
        }
    }
}

impl CursorTable {
    /// Cursor label for a hover position.
    #[must_use]
    pub fn affordance(&self, position: Option<Position>) -> &str {
        match position {
            Some(Position::Start) => &self.start,
            Some(Position::End) => &self.end,
            Some(Position::TopLeft) => &self.top_left,
            Some(Position::TopRight) => &self.top_right,
            Some(Position::BottomLeft) => &self.bottom_left,
            Some(Position::BottomRight) => &self.bottom_right,
            Some(Position::NearEdge) => &self.near_edge,
            Some(Position::Inside) => &self.inside,
            None => &self.none,
        }
    }
}

/// Built-in cursor label for a hover position. Seeds [`CursorTable::default`].
#[must_use]
pub fn cursor_affordance(position: Option<Position>) -> &'static str {
    match position {
        Some(Position::Start | Position::End | Position::TopLeft | Position::BottomRight) => "nwse-resize",
        Some(Position::TopRight | Position::BottomLeft) => "nesw-resize",
        Some(Position::Inside) => "move",
        Some(Position::NearEdge) | None => "default",
    }
}
