//! Viewport transform: pan offset, zoom scale, and device/document conversion.
//!
//! Device points are pointer positions in canvas pixels. Document points are
//! the coordinates shapes are stored in. The conversion is
//!
//! ```text
//! document = (device - pan * scale + scale_offset) / scale
//! ```
//!
//! where `scale_offset` is half the growth of the canvas extent under the
//! current scale, so zooming stays centered on the canvas.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE};

/// A point in either device or document space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

/// Pan/zoom state for the infinite canvas. Owned by the local client only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pan offset in document units.
    pub pan: Point,
    /// Zoom factor, kept within `[MIN_SCALE, MAX_SCALE]`.
    scale: f64,
    /// Half the difference between scaled and unscaled canvas extents.
    scale_offset: Point,
    canvas_width: f64,
    canvas_height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            pan: Point::default(),
            scale: 1.0,
            scale_offset: Point::default(),
            canvas_width: 0.0,
            canvas_height: 0.0,
        }
    }
}

impl Viewport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Current centering offset derived from the canvas size and scale.
    #[must_use]
    pub fn scale_offset(&self) -> Point {
        self.scale_offset
    }

    /// Record the canvas extent in device pixels and recompute the centering offset.
    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.canvas_width = width;
        self.canvas_height = height;
        self.recompute_scale_offset();
    }

    /// Add `delta` to the scale, clamped to `[MIN_SCALE, MAX_SCALE]`.
    pub fn zoom(&mut self, delta: f64) {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
        self.recompute_scale_offset();
    }

    /// Shift the pan offset by a device-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan.x += dx;
        self.pan.y += dy;
    }

    /// Convert a device-space point to document coordinates.
    #[must_use]
    pub fn to_document(&self, device: Point) -> Point {
        Point {
            x: (device.x - self.pan.x * self.scale + self.scale_offset.x) / self.scale,
            y: (device.y - self.pan.y * self.scale + self.scale_offset.y) / self.scale,
        }
    }

    /// Convert a document-space point back to device coordinates.
    #[must_use]
    pub fn to_device(&self, document: Point) -> Point {
        Point {
            x: document.x * self.scale + self.pan.x * self.scale - self.scale_offset.x,
            y: document.y * self.scale + self.pan.y * self.scale - self.scale_offset.y,
        }
    }

    /// Convert a device-space length (pixels) to document units.
    #[must_use]
    pub fn device_dist_to_document(&self, distance: f64) -> f64 {
        distance / self.scale
    }

    fn recompute_scale_offset(&mut self) {
        self.scale_offset = Point {
            x: (self.canvas_width * self.scale - self.canvas_width) / 2.0,
            y: (self.canvas_height * self.scale - self.canvas_height) / 2.0,
        };
    }
}
