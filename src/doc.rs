//! Document model: shapes and the ordered element store.
//!
//! A document is an ordered sequence of [`Shape`]s. Order is paint order
//! (later shapes paint on top) and also the order hit-testing walks. The
//! store only ever grows by [`DocStore::append`] and changes existing rows by
//! id; there is no per-shape delete, only a wholesale [`DocStore::clear`].
//!
//! Shapes cross the wire as plain JSON records. The derived render primitive
//! is never serialized and never compared: every deserialized shape derives
//! its own from the numeric fields.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::geometry;
use crate::render::{self, RenderPrimitive};

/// Identifier of a shape, unique within a document.
pub type ShapeId = i64;

/// The kind of a shape. Fixed for the lifetime of the shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeKind {
    /// Segment between `(x1,y1)` and `(x2,y2)`.
    Line,
    /// Axis-aligned box with opposite corners `(x1,y1)` and `(x2,y2)`.
    Rectangle,
    /// Circle centered at `(x1,y1)` passing through `(x2,y2)`.
    Circle,
    /// Text label anchored at `(x1,y1)`; `(x2,y2)` is the derived bottom-right bound.
    Text,
}

/// A drawable unit of the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ShapeRecord", into = "ShapeRecord")]
pub struct Shape {
    pub id: ShapeId,
    pub kind: ShapeKind,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    /// Label content; only TEXT shapes carry one.
    pub text: Option<String>,
    render: RenderPrimitive,
}

/// Wire form of a [`Shape`].
#[derive(Serialize, Deserialize)]
struct ShapeRecord {
    id: ShapeId,
    #[serde(rename = "type")]
    kind: ShapeKind,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

impl From<ShapeRecord> for Shape {
    fn from(r: ShapeRecord) -> Self {
        let mut shape = Shape {
            id: r.id,
            kind: r.kind,
            x1: r.x1,
            y1: r.y1,
            x2: r.x2,
            y2: r.y2,
            text: r.text,
            render: RenderPrimitive::Empty,
        };
        shape.rerender();
        shape
    }
}

impl From<Shape> for ShapeRecord {
    fn from(s: Shape) -> Self {
        ShapeRecord { id: s.id, kind: s.kind, x1: s.x1, y1: s.y1, x2: s.x2, y2: s.y2, text: s.text }
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.kind == other.kind
            && self.x1 == other.x1
            && self.y1 == other.y1
            && self.x2 == other.x2
            && self.y2 == other.y2
            && self.text == other.text
    }
}

impl Shape {
    /// Create a shape with the given corners and a freshly derived primitive.
    #[must_use]
    pub fn new(id: ShapeId, kind: ShapeKind, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let text = (kind == ShapeKind::Text).then(String::new);
        ShapeRecord { id, kind, x1, y1, x2, y2, text }.into()
    }

    /// Create a TEXT shape anchored at `at` with zero extent.
    #[must_use]
    pub fn text(id: ShapeId, at: Point, text: impl Into<String>) -> Self {
        ShapeRecord { id, kind: ShapeKind::Text, x1: at.x, y1: at.y, x2: at.x, y2: at.y, text: Some(text.into()) }
            .into()
    }

    /// Copy of this shape with new corners.
    #[must_use]
    pub fn with_coords(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let mut shape = self.clone();
        shape.x1 = x1;
        shape.y1 = y1;
        shape.x2 = x2;
        shape.y2 = y2;
        shape.rerender();
        shape
    }

    /// The first corner, used as the anchor when moving.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    /// The second corner.
    #[must_use]
    pub fn far(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    /// Derived paint description. Not part of the shape's identity.
    #[must_use]
    pub fn render(&self) -> &RenderPrimitive {
        &self.render
    }

    /// Recompute the render primitive from the current fields.
    pub fn rerender(&mut self) {
        self.render = render::derive(self.kind, self.x1, self.y1, self.x2, self.y2, self.text.as_deref());
    }
}

/// Ordered in-memory store of the document's shapes.
#[derive(Debug, Default)]
pub struct DocStore {
    shapes: Vec<Shape>,
    /// Bumped on every mutation so observers can detect change cheaply.
    revision: u64,
}

impl DocStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape on top of the paint order.
    ///
    /// No uniqueness check is made on `id`. Callers guarantee it; if they
    /// don't, id lookups and updates only ever see the first such row.
    pub fn append(&mut self, shape: Shape) {
        self.shapes.push(shape);
        self.revision += 1;
    }

    /// Apply an incoming record to the shape with the same id.
    ///
    /// The coordinates and text are replaced wholesale (never merged), then
    /// normalized for the stored shape's kind and re-rendered. Unknown ids
    /// are ignored. Returns whether a row was updated.
    pub fn replace_by_id(&mut self, incoming: &Shape) -> bool {
        let Some(existing) = self.shapes.iter_mut().find(|s| s.id == incoming.id) else {
            return false;
        };
        existing.x1 = incoming.x1;
        existing.y1 = incoming.y1;
        existing.x2 = incoming.x2;
        existing.y2 = incoming.y2;
        existing.text.clone_from(&incoming.text);
        *existing = geometry::normalize(existing);
        self.revision += 1;
        true
    }

    /// Overwrite the mutable fields of the shape with the same id exactly as
    /// given, without normalizing. Used while a local gesture is in flight.
    pub fn overwrite(&mut self, incoming: &Shape) -> bool {
        let Some(existing) = self.shapes.iter_mut().find(|s| s.id == incoming.id) else {
            return false;
        };
        existing.x1 = incoming.x1;
        existing.y1 = incoming.y1;
        existing.x2 = incoming.x2;
        existing.y2 = incoming.y2;
        existing.text.clone_from(&incoming.text);
        existing.rerender();
        self.revision += 1;
        true
    }

    /// Normalize the shape with `id` in place. Returns the normalized shape.
    pub fn normalize_in_place(&mut self, id: ShapeId) -> Option<&Shape> {
        let idx = self.shapes.iter().position(|s| s.id == id)?;
        self.shapes[idx] = geometry::normalize(&self.shapes[idx]);
        self.revision += 1;
        Some(&self.shapes[idx])
    }

    /// Remove every shape.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.revision += 1;
    }

    /// Replace the whole document with a snapshot.
    pub fn load_snapshot(&mut self, shapes: Vec<Shape>) {
        self.shapes = shapes;
        self.revision += 1;
    }

    /// First shape with the given id.
    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// All shapes in paint order.
    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Largest id present, if any.
    #[must_use]
    pub fn max_id(&self) -> Option<ShapeId> {
        self.shapes.iter().map(|s| s.id).max()
    }

    /// Mutation counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of shapes in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the document holds no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
