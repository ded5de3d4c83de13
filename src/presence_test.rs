#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn first_event_creates_entry() {
    let mut cursors = RemoteCursors::new();
    assert!(cursors.is_empty());
    assert!(cursors.upsert("bob", Point::new(1.0, 2.0)));
    assert_eq!(cursors.get("bob"), Some(Point::new(1.0, 2.0)));
    assert_eq!(cursors.len(), 1);
}

#[test]
fn later_events_overwrite() {
    let mut cursors = RemoteCursors::new();
    cursors.upsert("bob", Point::new(1.0, 2.0));
    assert!(!cursors.upsert("bob", Point::new(5.0, 6.0)));
    assert_eq!(cursors.get("bob"), Some(Point::new(5.0, 6.0)));
    assert_eq!(cursors.len(), 1);
}

#[test]
fn apply_reads_cursor_event() {
    let mut cursors = RemoteCursors::new();
    cursors.apply(&CursorEvent { user_id: "carol".into(), x: 7.0, y: 8.0 });
    let (id, at) = cursors.iter().next().unwrap();
    assert_eq!(id, "carol");
    assert_eq!(at.x, 7.0);
}

#[test]
fn unknown_peer_has_no_cursor() {
    assert_eq!(RemoteCursors::new().get("nobody"), None);
}
