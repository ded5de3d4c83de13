//! Input model: tools, modifier keys, wheel deltas, and the gesture state value.
//!
//! `Tool` captures what a pointer-down should mean. [`ActionState`] is the
//! gesture currently in progress. It also carries the selection: the shape a
//! gesture acts on lives inside the variant, so there is no separate
//! "selected element" field that could drift out of step with it.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::camera::Point;
use crate::doc::{ShapeId, ShapeKind};
use crate::geometry::Position;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    /// Drag the canvas.
    Pan,
    /// Move or resize existing shapes.
    Transform,
    /// Place a text label.
    Text,
    /// Draw a line.
    #[default]
    Line,
    /// Draw a rectangle.
    Rectangle,
    /// Draw a circle.
    Circle,
}

impl Tool {
    /// The shape kind a drag with this tool draws, if it draws one.
    #[must_use]
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Line => Some(ShapeKind::Line),
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Pan | Self::Transform | Self::Text => None,
        }
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Ctrl key is held.
    pub ctrl: bool,
    /// Alt / Option key is held.
    pub alt: bool,
    /// Meta / Command key is held.
    pub meta: bool,
}

impl Modifiers {
    /// Whether a wheel event should zoom instead of pan.
    #[must_use]
    pub fn zooms(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// The gesture in progress. Owned by the local client; never transmitted.
///
/// Every variant but `Writing` lasts one pointer-down to pointer-up cycle.
/// `Writing` lasts until the text input loses focus.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActionState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A new shape is being stretched from its first corner.
    Drawing {
        id: ShapeId,
    },
    /// A shape is being dragged.
    Moving {
        id: ShapeId,
        /// Pointer position minus the shape's first corner at grab time.
        offset: Point,
    },
    /// One handle of a shape is being dragged.
    Resizing {
        id: ShapeId,
        handle: Position,
    },
    /// The canvas is being dragged.
    Panning {
        /// Device position of the previous pointer event.
        last_device: Point,
    },
    /// A text label is waiting for its content.
    Writing {
        id: ShapeId,
    },
}

impl ActionState {
    /// The shape this gesture acts on, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<ShapeId> {
        match self {
            Self::Drawing { id } | Self::Moving { id, .. } | Self::Resizing { id, .. } | Self::Writing { id } => {
                Some(*id)
            }
            Self::Idle | Self::Panning { .. } => None,
        }
    }

    /// Whether no gesture is in progress.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}
