//! Shared numeric constants for the drawing core.

// ── Hit-testing ─────────────────────────────────────────────────

/// Per-axis slop, in device pixels, around a handle (line endpoint,
/// rectangle corner) and around a circle's boundary.
pub const HANDLE_TOLERANCE: f64 = 5.0;

/// How far `|p-a| + |p-b| - |a-b|` may exceed zero for a point to count as
/// lying on segment `ab`.
pub const LINE_HIT_EPSILON: f64 = 2.0;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest allowed zoom scale.
pub const MIN_SCALE: f64 = 0.1;

/// Largest allowed zoom scale.
pub const MAX_SCALE: f64 = 20.0;

/// Scale change per wheel pixel when zooming with ctrl/meta held.
pub const WHEEL_ZOOM_FACTOR: f64 = 0.01;

// ── Text metrics ────────────────────────────────────────────────

/// Approximate advance of one character of label text.
pub const TEXT_CHAR_WIDTH: f64 = 10.0;

/// Height of a single line of label text (matches the 20px font).
pub const TEXT_LINE_HEIGHT: f64 = 20.0;

// ── Persistence ─────────────────────────────────────────────────

/// Key under which the document is stored in the local key-value slot.
pub const ELEMENTS_KEY: &str = "elements";
