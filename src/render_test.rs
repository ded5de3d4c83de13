#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn line_primitive_uses_endpoints() {
    let p = derive(ShapeKind::Line, 1.0, 2.0, 3.0, 4.0, None);
    assert_eq!(p, RenderPrimitive::Line { from: Point::new(1.0, 2.0), to: Point::new(3.0, 4.0) });
}

#[test]
fn rectangle_primitive_keeps_signed_extent() {
    let p = derive(ShapeKind::Rectangle, 10.0, 10.0, 4.0, 20.0, None);
    assert_eq!(p, RenderPrimitive::Rectangle { origin: Point::new(10.0, 10.0), width: -6.0, height: 10.0 });
}

#[test]
fn circle_primitive_diameter_is_twice_radius() {
    let p = derive(ShapeKind::Circle, 0.0, 0.0, 3.0, 4.0, None);
    assert_eq!(p, RenderPrimitive::Circle { center: Point::new(0.0, 0.0), diameter: 10.0 });
}

#[test]
fn text_primitive_carries_text() {
    let p = derive(ShapeKind::Text, 5.0, 6.0, 55.0, 26.0, Some("hello"));
    let RenderPrimitive::Text { origin, text, font_px } = p else {
        panic!("expected text primitive");
    };
    assert_eq!(origin, Point::new(5.0, 6.0));
    assert_eq!(text, "hello");
    assert_eq!(font_px, 20.0);
}

#[test]
fn text_primitive_without_text_is_empty_string() {
    let p = derive(ShapeKind::Text, 0.0, 0.0, 0.0, 0.0, None);
    assert!(matches!(p, RenderPrimitive::Text { ref text, .. } if text.is_empty()));
}
