use super::*;
use crate::doc::ShapeKind;

fn shapes() -> Vec<Shape> {
    vec![
        Shape::new(1, ShapeKind::Line, 0.0, 0.0, 5.0, 5.0),
        Shape::text(2, crate::camera::Point::new(1.0, 1.0), "hi"),
    ]
}

#[test]
fn memory_store_missing_key_is_none() {
    let store = MemoryStore::new();
    assert!(store.get("nope").unwrap().is_none());
    assert!(load_elements(&store).unwrap().is_none());
}

#[test]
fn memory_store_saves_and_loads_elements() {
    let mut store = MemoryStore::new();
    save_elements(&mut store, &shapes()).unwrap();
    assert_eq!(load_elements(&store).unwrap().unwrap(), shapes());
}

#[test]
fn elements_live_under_elements_key() {
    let mut store = MemoryStore::new();
    save_elements(&mut store, &shapes()).unwrap();
    let raw = store.get(ELEMENTS_KEY).unwrap().unwrap();
    assert!(raw.starts_with('['));
    assert!(raw.contains("\"type\":\"TEXT\""));
}

#[test]
fn corrupt_slot_is_a_serialization_error() {
    let mut store = MemoryStore::new();
    store.set(ELEMENTS_KEY, "not json".into()).unwrap();
    assert!(matches!(load_elements(&store), Err(StorageError::Serialization(_))));
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    save_elements(&mut store, &shapes()).unwrap();

    let reopened = FileStore::open(dir.path()).unwrap();
    assert_eq!(load_elements(&reopened).unwrap().unwrap(), shapes());
}

#[test]
fn file_store_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = FileStore::open(&nested).unwrap();
    assert!(nested.is_dir());
    assert!(store.get(ELEMENTS_KEY).unwrap().is_none());
}

#[test]
fn file_store_sanitizes_keys() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileStore::open(dir.path()).unwrap();
    store.set("../escape", "x".into()).unwrap();
    assert!(dir.path().join("___escape.json").is_file());
    assert_eq!(store.get("../escape").unwrap().as_deref(), Some("x"));
}
