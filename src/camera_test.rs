#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-10;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

// --- Point ---

#[test]
fn point_distance() {
    assert!(approx_eq(Point::new(0.0, 0.0).distance(Point::new(3.0, 4.0)), 5.0));
}

#[test]
fn point_sub() {
    let d = Point::new(5.0, 7.0).sub(Point::new(2.0, 3.0));
    assert_eq!(d, Point::new(3.0, 4.0));
}

// --- Viewport defaults ---

#[test]
fn viewport_default_is_identity() {
    let vp = Viewport::default();
    assert_eq!(vp.scale(), 1.0);
    assert_eq!(vp.pan, Point::default());
    let doc = vp.to_document(Point::new(50.0, 75.0));
    assert!(point_approx_eq(doc, Point::new(50.0, 75.0)));
}

// --- zoom ---

#[test]
fn zoom_adds_delta() {
    let mut vp = Viewport::new();
    vp.zoom(5.0);
    assert!(approx_eq(vp.scale(), 6.0));
}

#[test]
fn zoom_clamps_to_max() {
    let mut vp = Viewport::new();
    vp.zoom(100.0);
    assert_eq!(vp.scale(), MAX_SCALE);
}

#[test]
fn zoom_clamps_to_min() {
    let mut vp = Viewport::new();
    vp.zoom(-100.0);
    assert_eq!(vp.scale(), MIN_SCALE);
}

#[test]
fn zoom_recomputes_scale_offset() {
    let mut vp = Viewport::new();
    vp.set_canvas_size(800.0, 600.0);
    assert_eq!(vp.scale_offset(), Point::default());
    vp.zoom(1.0);
    assert!(point_approx_eq(vp.scale_offset(), Point::new(400.0, 300.0)));
}

// --- device_dist_to_document ---

#[test]
fn device_dist_shrinks_when_zoomed_in() {
    let mut vp = Viewport::new();
    assert!(approx_eq(vp.device_dist_to_document(5.0), 5.0));
    vp.zoom(3.0);
    assert!(approx_eq(vp.device_dist_to_document(5.0), 1.25));
}

#[test]
fn device_dist_ignores_pan() {
    let mut vp = Viewport::new();
    vp.set_canvas_size(800.0, 600.0);
    vp.pan_by(40.0, -20.0);
    vp.zoom(-0.5);
    assert!(approx_eq(vp.device_dist_to_document(5.0), 10.0));
}

// --- to_document / to_device ---

#[test]
fn to_document_with_pan() {
    let mut vp = Viewport::new();
    vp.pan_by(10.0, -20.0);
    let doc = vp.to_document(Point::new(10.0, 0.0));
    assert!(point_approx_eq(doc, Point::new(0.0, 20.0)));
}

#[test]
fn zoom_keeps_canvas_center_fixed() {
    let mut vp = Viewport::new();
    vp.set_canvas_size(800.0, 600.0);
    let center = Point::new(400.0, 300.0);
    let before = vp.to_document(center);
    vp.zoom(1.0);
    let after = vp.to_document(center);
    assert!(point_approx_eq(before, after));
}

#[test]
fn to_device_inverts_to_document() {
    let mut vp = Viewport::new();
    vp.set_canvas_size(1024.0, 768.0);
    vp.zoom(1.5);
    vp.pan_by(-33.0, 12.5);
    let device = Point::new(123.0, 456.0);
    let back = vp.to_device(vp.to_document(device));
    assert!(point_approx_eq(back, device));
}
