#![allow(clippy::float_cmp)]

use serde_json::json;

use super::*;

fn make_shape(id: ShapeId, kind: ShapeKind) -> Shape {
    Shape::new(id, kind, 0.0, 0.0, 10.0, 10.0)
}

// =============================================================
// ShapeKind serde
// =============================================================

#[test]
fn kind_serde_all_variants() {
    let cases = [
        (ShapeKind::Line, "\"LINE\""),
        (ShapeKind::Rectangle, "\"RECTANGLE\""),
        (ShapeKind::Circle, "\"CIRCLE\""),
        (ShapeKind::Text, "\"TEXT\""),
    ];
    for (kind, expected) in cases {
        assert_eq!(serde_json::to_string(&kind).unwrap(), expected);
        let back: ShapeKind = serde_json::from_str(expected).unwrap();
        assert_eq!(back, kind);
    }
}

// =============================================================
// Shape wire record
// =============================================================

#[test]
fn shape_serializes_without_render_primitive() {
    let s = Shape::new(4, ShapeKind::Line, 1.0, 2.0, 3.0, 4.0);
    let value = serde_json::to_value(&s).unwrap();
    assert_eq!(value, json!({ "id": 4, "type": "LINE", "x1": 1.0, "y1": 2.0, "x2": 3.0, "y2": 4.0 }));
}

#[test]
fn text_shape_serializes_text() {
    let s = Shape::text(5, Point::new(1.0, 1.0), "hi");
    let value = serde_json::to_value(&s).unwrap();
    assert_eq!(value["text"], json!("hi"));
    assert_eq!(value["type"], json!("TEXT"));
}

#[test]
fn deserialized_shape_derives_its_own_primitive() {
    let s: Shape = serde_json::from_value(json!({
        "id": 9, "type": "RECTANGLE", "x1": 0, "y1": 0, "x2": 5, "y2": 6,
        "roughElement": { "opaque": true }
    }))
    .unwrap();
    assert_eq!(
        s.render(),
        &RenderPrimitive::Rectangle { origin: Point::new(0.0, 0.0), width: 5.0, height: 6.0 }
    );
}

#[test]
fn shape_equality_ignores_render_primitive() {
    let a = make_shape(1, ShapeKind::Circle);
    let mut b = a.clone();
    b.x2 = 50.0;
    assert_ne!(a, b);
    b.x2 = 10.0;
    assert_eq!(a, b);
}

#[test]
fn new_text_shape_starts_with_empty_text() {
    let s = Shape::new(1, ShapeKind::Text, 0.0, 0.0, 0.0, 0.0);
    assert_eq!(s.text.as_deref(), Some(""));
    let l = Shape::new(2, ShapeKind::Line, 0.0, 0.0, 0.0, 0.0);
    assert!(l.text.is_none());
}

// =============================================================
// DocStore: append / get
// =============================================================

#[test]
fn store_starts_empty() {
    let store = DocStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
    assert_eq!(store.max_id(), None);
}

#[test]
fn append_keeps_insertion_order() {
    let mut store = DocStore::new();
    store.append(make_shape(3, ShapeKind::Line));
    store.append(make_shape(1, ShapeKind::Rectangle));
    let ids: Vec<ShapeId> = store.shapes().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(store.max_id(), Some(3));
}

#[test]
fn append_does_not_check_uniqueness() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Line));
    store.append(make_shape(1, ShapeKind::Line));
    assert_eq!(store.len(), 2);
}

// =============================================================
// DocStore: replace_by_id
// =============================================================

#[test]
fn replace_by_id_replaces_coordinates_and_normalizes() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Rectangle));
    let incoming = Shape::new(1, ShapeKind::Rectangle, 30.0, 40.0, 10.0, 20.0);
    assert!(store.replace_by_id(&incoming));
    let s = store.get(1).unwrap();
    assert_eq!((s.x1, s.y1, s.x2, s.y2), (10.0, 20.0, 30.0, 40.0));
    assert_eq!(
        s.render(),
        &RenderPrimitive::Rectangle { origin: Point::new(10.0, 20.0), width: 20.0, height: 20.0 }
    );
}

#[test]
fn replace_by_id_unknown_is_noop() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Line));
    let before = store.revision();
    assert!(!store.replace_by_id(&make_shape(42, ShapeKind::Line)));
    assert_eq!(store.revision(), before);
    assert_eq!(store.len(), 1);
}

#[test]
fn replace_by_id_is_idempotent() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Line));
    let incoming = Shape::new(1, ShapeKind::Line, 50.0, 50.0, 5.0, 5.0);
    store.replace_by_id(&incoming);
    let once = store.shapes().to_vec();
    store.replace_by_id(&incoming);
    assert_eq!(store.shapes(), once.as_slice());
}

#[test]
fn replace_by_id_with_duplicate_ids_touches_first_only() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Line));
    store.append(make_shape(1, ShapeKind::Line));
    store.replace_by_id(&Shape::new(1, ShapeKind::Line, 0.0, 0.0, 99.0, 99.0));
    assert_eq!(store.shapes()[0].x2, 99.0);
    assert_eq!(store.shapes()[1].x2, 10.0);
}

#[test]
fn replace_by_id_replaces_text_wholesale() {
    let mut store = DocStore::new();
    store.append(Shape::text(1, Point::new(0.0, 0.0), "old"));
    let incoming = Shape::text(1, Point::new(0.0, 0.0), "new").with_coords(0.0, 0.0, 30.0, 20.0);
    store.replace_by_id(&incoming);
    assert_eq!(store.get(1).unwrap().text.as_deref(), Some("new"));
    assert_eq!(store.get(1).unwrap().x2, 30.0);
}

#[test]
fn replace_by_id_keeps_stored_kind() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Circle));
    store.replace_by_id(&Shape::new(1, ShapeKind::Rectangle, 5.0, 5.0, 0.0, 0.0));
    let s = store.get(1).unwrap();
    assert_eq!(s.kind, ShapeKind::Circle);
    assert_eq!((s.x1, s.y1, s.x2, s.y2), (5.0, 5.0, 0.0, 0.0));
}

// =============================================================
// DocStore: overwrite / normalize_in_place / clear / snapshot
// =============================================================

#[test]
fn overwrite_does_not_normalize() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Rectangle));
    store.overwrite(&Shape::new(1, ShapeKind::Rectangle, 10.0, 10.0, 0.0, 0.0));
    assert_eq!(store.get(1).unwrap().x1, 10.0);
    let n = store.normalize_in_place(1).unwrap();
    assert_eq!(n.x1, 0.0);
}

#[test]
fn normalize_in_place_unknown_is_none() {
    let mut store = DocStore::new();
    assert!(store.normalize_in_place(5).is_none());
}

#[test]
fn clear_empties_store() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Line));
    store.clear();
    assert!(store.is_empty());
}

#[test]
fn load_snapshot_replaces_existing() {
    let mut store = DocStore::new();
    store.append(make_shape(1, ShapeKind::Line));
    store.load_snapshot(vec![make_shape(7, ShapeKind::Circle), make_shape(8, ShapeKind::Text)]);
    assert_eq!(store.len(), 2);
    assert!(store.get(1).is_none());
    assert_eq!(store.get(7).unwrap().kind, ShapeKind::Circle);
}

#[test]
fn every_mutation_bumps_revision() {
    let mut store = DocStore::new();
    let r0 = store.revision();
    store.append(make_shape(1, ShapeKind::Line));
    let r1 = store.revision();
    store.overwrite(&make_shape(1, ShapeKind::Line));
    let r2 = store.revision();
    store.clear();
    let r3 = store.revision();
    assert!(r0 < r1 && r1 < r2 && r2 < r3);
}
