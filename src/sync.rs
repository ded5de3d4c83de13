//! Synchronization channel: wire events, topics, and the room subscription.
//!
//! DESIGN
//! ======
//! Every local mutation becomes a [`DrawEvent`] published to the room's draw
//! topic; pointer motion becomes a [`CursorEvent`] on the cursor topic. The
//! pub/sub substrate is abstracted as a [`Transport`], which echoes every
//! publish back to all subscribers, the sender included. Inbound events
//! carrying the local user id are therefore discarded here, before they can
//! reach the document.
//!
//! Sends are best-effort. While disconnected they are dropped without error,
//! and a failing publish is logged rather than surfaced.
//!
//! ERROR HANDLING
//! ==============
//! Inbound payloads that fail to parse are reported as [`SyncError`] by
//! [`decode_draw`] / [`decode_cursor`] and dropped by the channel with a
//! warning. Subscription failures surface as [`TransportError`] from
//! [`SyncChannel::connect`].

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, info, warn};

use crate::api::RoomId;
use crate::camera::Point;
use crate::doc::Shape;

// =============================================================================
// WIRE
// =============================================================================

/// Kind of document mutation carried by a [`DrawEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DrawEventType {
    Create,
    Update,
}

/// One shape mutation as published on a room's draw topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawEvent {
    pub element: Shape,
    #[serde(rename = "type")]
    pub kind: DrawEventType,
    #[serde(rename = "userId")]
    pub user_id: String,
}

impl DrawEvent {
    #[must_use]
    pub fn create(element: Shape, user_id: impl Into<String>) -> Self {
        Self { element, kind: DrawEventType::Create, user_id: user_id.into() }
    }

    #[must_use]
    pub fn update(element: Shape, user_id: impl Into<String>) -> Self {
        Self { element, kind: DrawEventType::Update, user_id: user_id.into() }
    }
}

/// A peer's pointer position in document space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorEvent {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub x: f64,
    pub y: f64,
}

impl CursorEvent {
    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Topic carrying draw events for `room_id`.
#[must_use]
pub fn draw_topic(room_id: &str) -> String {
    format!("draw/{room_id}")
}

/// Topic carrying cursor events for `room_id`.
#[must_use]
pub fn cursor_topic(room_id: &str) -> String {
    format!("cursor/{room_id}")
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Parse a draw payload, returning `None` for the local user's own echo.
///
/// # Errors
///
/// Returns [`SyncError::Malformed`] if the payload is not a draw event.
pub fn decode_draw(payload: &str, local_user: &str) -> Result<Option<DrawEvent>, SyncError> {
    let event: DrawEvent = serde_json::from_str(payload)?;
    if event.user_id == local_user {
        debug!(id = event.element.id, kind = ?event.kind, "sync: self-echo discarded");
        return Ok(None);
    }
    Ok(Some(event))
}

/// Parse a cursor payload, returning `None` for the local user's own echo.
///
/// # Errors
///
/// Returns [`SyncError::Malformed`] if the payload is not a cursor event.
pub fn decode_cursor(payload: &str, local_user: &str) -> Result<Option<CursorEvent>, SyncError> {
    let event: CursorEvent = serde_json::from_str(payload)?;
    Ok((event.user_id != local_user).then_some(event))
}

// =============================================================================
// TRANSPORT
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Topic-based pub/sub substrate.
///
/// A publish is delivered to every current subscriber of the topic,
/// including the publisher's own subscription.
pub trait Transport: Send + Sync {
    /// Publish a serialized message to `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the message cannot be handed off.
    fn publish(&self, topic: &str, payload: String) -> Result<(), TransportError>;

    /// Subscribe to `topic`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if the subscription cannot be opened.
    fn subscribe(&self, topic: &str) -> Result<broadcast::Receiver<String>, TransportError>;
}

// =============================================================================
// CHANNEL
// =============================================================================

/// An accepted remote event.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Draw(DrawEvent),
    Cursor(CursorEvent),
}

struct Subscription {
    room_id: RoomId,
    draw_rx: broadcast::Receiver<String>,
    cursor_rx: broadcast::Receiver<String>,
}

/// Bidirectional event pipe for one client.
pub struct SyncChannel<T> {
    transport: T,
    user_id: String,
    subscription: Option<Subscription>,
}

impl<T: Transport> SyncChannel<T> {
    pub fn new(transport: T, user_id: impl Into<String>) -> Self {
        Self { transport, user_id: user_id.into(), subscription: None }
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    /// Room currently subscribed to.
    #[must_use]
    pub fn room_id(&self) -> Option<&str> {
        self.subscription.as_ref().map(|s| s.room_id.as_str())
    }

    /// Subscribe to both topics of `room_id`, replacing any previous room.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] if either subscription fails; the channel
    /// is left disconnected.
    pub fn connect(&mut self, room_id: &str) -> Result<(), TransportError> {
        self.subscription = None;
        let draw_rx = self.transport.subscribe(&draw_topic(room_id))?;
        let cursor_rx = self.transport.subscribe(&cursor_topic(room_id))?;
        self.subscription = Some(Subscription { room_id: room_id.to_owned(), draw_rx, cursor_rx });
        info!(%room_id, user_id = %self.user_id, "sync: connected");
        Ok(())
    }

    /// Drop the room subscription. No-op when already disconnected.
    pub fn disconnect(&mut self) {
        if let Some(sub) = self.subscription.take() {
            info!(room_id = %sub.room_id, user_id = %self.user_id, "sync: disconnected");
        }
    }

    /// Publish a shape mutation tagged with the local user id.
    pub fn send_draw(&self, event: &DrawEvent) {
        let Some(sub) = &self.subscription else {
            debug!(id = event.element.id, "sync: draw send dropped, not connected");
            return;
        };
        match serde_json::to_string(event) {
            Ok(payload) => self.publish(&draw_topic(&sub.room_id), payload),
            Err(e) => warn!(error = %e, "sync: draw event serialization failed"),
        }
    }

    /// Publish the local pointer position in document space.
    pub fn send_cursor(&self, at: Point) {
        let Some(sub) = &self.subscription else {
            return;
        };
        let event = CursorEvent { user_id: self.user_id.clone(), x: at.x, y: at.y };
        match serde_json::to_string(&event) {
            Ok(payload) => self.publish(&cursor_topic(&sub.room_id), payload),
            Err(e) => warn!(error = %e, "sync: cursor event serialization failed"),
        }
    }

    fn publish(&self, topic: &str, payload: String) {
        if let Err(e) = self.transport.publish(topic, payload) {
            warn!(%topic, error = %e, "sync: publish failed");
        }
    }

    /// Drain every pending inbound event without waiting.
    ///
    /// Draw events are returned before cursor events. Self-echoes and
    /// malformed payloads are dropped.
    pub fn poll(&mut self) -> Vec<Inbound> {
        let Some(sub) = self.subscription.as_mut() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for payload in drain(&mut sub.draw_rx) {
            if let Some(event) = accept_draw(&payload, &self.user_id) {
                out.push(Inbound::Draw(event));
            }
        }
        for payload in drain(&mut sub.cursor_rx) {
            if let Some(event) = accept_cursor(&payload, &self.user_id) {
                out.push(Inbound::Cursor(event));
            }
        }
        out
    }

    /// Wait for the next accepted inbound event.
    ///
    /// Returns `None` when disconnected or when the transport closes.
    pub async fn recv(&mut self) -> Option<Inbound> {
        let sub = self.subscription.as_mut()?;
        let user_id = self.user_id.as_str();
        loop {
            tokio::select! {
                msg = sub.draw_rx.recv() => {
                    if let Some(payload) = received(msg)? {
                        if let Some(event) = accept_draw(&payload, user_id) {
                            return Some(Inbound::Draw(event));
                        }
                    }
                }
                msg = sub.cursor_rx.recv() => {
                    if let Some(payload) = received(msg)? {
                        if let Some(event) = accept_cursor(&payload, user_id) {
                            return Some(Inbound::Cursor(event));
                        }
                    }
                }
            }
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn drain(rx: &mut broadcast::Receiver<String>) -> Vec<String> {
    let mut out = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(payload) => out.push(payload),
            Err(TryRecvError::Lagged(skipped)) => warn!(skipped, "sync: receiver lagged"),
            Err(TryRecvError::Empty | TryRecvError::Closed) => return out,
        }
    }
}

/// `Some(None)` on lag so the caller keeps waiting; `None` once closed.
fn received(msg: Result<String, RecvError>) -> Option<Option<String>> {
    match msg {
        Ok(payload) => Some(Some(payload)),
        Err(RecvError::Lagged(skipped)) => {
            warn!(skipped, "sync: receiver lagged");
            Some(None)
        }
        Err(RecvError::Closed) => None,
    }
}

fn accept_draw(payload: &str, user_id: &str) -> Option<DrawEvent> {
    match decode_draw(payload, user_id) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "sync: dropping draw payload");
            None
        }
    }
}

fn accept_cursor(payload: &str, user_id: &str) -> Option<CursorEvent> {
    match decode_cursor(payload, user_id) {
        Ok(event) => event,
        Err(e) => {
            warn!(error = %e, "sync: dropping cursor payload");
            None
        }
    }
}
