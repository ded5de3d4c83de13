//! Remote cursor positions.
//!
//! Cursor events are ephemeral and never touch the document. Entries are
//! created on a peer's first cursor event and overwritten afterwards; they
//! are not expired, so a departed peer's cursor stays until the map is
//! dropped.

#[cfg(test)]
#[path = "presence_test.rs"]
mod presence_test;

use std::collections::HashMap;

use crate::camera::Point;
use crate::sync::CursorEvent;

/// Last known document-space pointer of each peer.
#[derive(Debug, Default, Clone)]
pub struct RemoteCursors {
    cursors: HashMap<String, Point>,
}

impl RemoteCursors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a peer's position. Returns `true` if the peer was new.
    pub fn upsert(&mut self, user_id: &str, at: Point) -> bool {
        self.cursors.insert(user_id.to_owned(), at).is_none()
    }

    /// Record the position carried by a cursor event.
    pub fn apply(&mut self, event: &CursorEvent) -> bool {
        self.upsert(&event.user_id, event.point())
    }

    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<Point> {
        self.cursors.get(user_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Point)> {
        self.cursors.iter().map(|(id, p)| (id.as_str(), *p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }
}
