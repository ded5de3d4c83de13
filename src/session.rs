//! Session orchestration: local drafting versus a shared room.
//!
//! DESIGN
//! ======
//! A [`Session`] owns one [`EngineCore`] and routes what it produces. Outside
//! a room, each mutation is persisted to the local key-value store and
//! nothing is published. Inside a room, broadcasts and cursor positions go to
//! the [`SyncChannel`], new ids come from the room server, and inbound peer
//! events are applied through [`Session::pump`] or [`Session::recv`].
//!
//! Entering a room replaces the document wholesale with the server's board.
//! Leaving keeps the board as the new local draft and resumes local ids
//! past its largest id.
//!
//! ERROR HANDLING
//! ==============
//! Room entry surfaces [`SessionError`]; on failure the channel is torn
//! down and the document is untouched. Persistence failures during a
//! gesture are logged and never fail the gesture.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::{ApiError, RoomApi, RoomId};
use crate::camera::Point;
use crate::config::ConfigError;
use crate::doc::Shape;
use crate::engine::{Action, EngineCore};
use crate::identity::{LocalIds, RemoteIds};
use crate::input::{Modifiers, Tool, WheelDelta};
use crate::presence::RemoteCursors;
use crate::storage::{self, KeyValueStore, StorageError};
use crate::sync::{Inbound, SyncChannel, Transport, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("room api: {0}")]
    Api(#[from] ApiError),
    #[error("transport: {0}")]
    Transport(#[from] TransportError),
    #[error("storage: {0}")]
    Storage(#[from] StorageError),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("the document cannot be cleared while collaborating")]
    ClearWhileCollaborating,
}

/// Whether the session is drafting alone or editing a shared room.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Local,
    Collaborating { room_id: RoomId },
}

pub struct Session<T: Transport> {
    engine: EngineCore,
    channel: SyncChannel<T>,
    api: Arc<dyn RoomApi>,
    storage: Option<Box<dyn KeyValueStore>>,
    cursors: RemoteCursors,
    mode: Mode,
    persisted_revision: u64,
}

impl<T: Transport> Session<T> {
    /// A local session for `user_id` with no persistence.
    pub fn new(user_id: impl Into<String>, transport: T, api: Arc<dyn RoomApi>) -> Self {
        let user_id = user_id.into();
        let engine = EngineCore::new(user_id.clone());
        let persisted_revision = engine.doc.revision();
        Self {
            engine,
            channel: SyncChannel::new(transport, user_id),
            api,
            storage: None,
            cursors: RemoteCursors::new(),
            mode: Mode::Local,
            persisted_revision,
        }
    }

    /// Attach local persistence and hydrate the document from it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Storage`] if a saved document exists but
    /// cannot be read.
    pub fn with_storage(mut self, store: Box<dyn KeyValueStore>) -> Result<Self, SessionError> {
        if let Some(shapes) = storage::load_elements(store.as_ref())? {
            info!(shapes = shapes.len(), "session: hydrated local document");
            self.engine.load_snapshot(shapes);
            self.engine.set_identity_source(Box::new(LocalIds::after(self.engine.doc.max_id())));
        }
        self.persisted_revision = self.engine.doc.revision();
        self.storage = Some(store);
        Ok(self)
    }

    // --- Queries ---

    #[must_use]
    pub fn user_id(&self) -> &str {
        self.channel.user_id()
    }

    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    #[must_use]
    pub fn room_id(&self) -> Option<&str> {
        match &self.mode {
            Mode::Collaborating { room_id } => Some(room_id.as_str()),
            Mode::Local => None,
        }
    }

    #[must_use]
    pub fn is_collaborating(&self) -> bool {
        matches!(self.mode, Mode::Collaborating { .. })
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        self.engine.doc.shapes()
    }

    #[must_use]
    pub fn cursors(&self) -> &RemoteCursors {
        &self.cursors
    }

    // --- Room lifecycle ---

    /// Publish the current document as a new room and enter it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the room cannot be created or entered.
    pub async fn start_collaboration(&mut self) -> Result<RoomId, SessionError> {
        let room_id = self.api.create_room(self.engine.doc.shapes()).await?;
        info!(%room_id, shapes = self.engine.doc.len(), "session: room created");
        self.join_room(&room_id).await?;
        Ok(room_id)
    }

    /// Enter an existing room, replacing the document with its board.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if subscribing or fetching the board fails.
    /// The document and mode are unchanged in that case, and a session that
    /// was already in a room is resubscribed to it.
    pub async fn join_room(&mut self, room_id: &str) -> Result<(), SessionError> {
        let previous = self.room_id().map(str::to_owned);
        if let Err(e) = self.channel.connect(room_id) {
            warn!(%room_id, error = %e, "session: subscribe failed");
            self.restore_channel(previous.as_deref());
            return Err(e.into());
        }
        let shapes = match self.api.load_board(room_id).await {
            Ok(shapes) => shapes,
            Err(e) => {
                warn!(%room_id, error = %e, "session: board fetch failed");
                self.restore_channel(previous.as_deref());
                return Err(e.into());
            }
        };

        info!(%room_id, shapes = shapes.len(), user_id = %self.user_id(), "session: joined room");
        self.engine.load_snapshot(shapes);
        self.engine.set_identity_source(Box::new(RemoteIds::new(Arc::clone(&self.api))));
        self.mode = Mode::Collaborating { room_id: room_id.to_owned() };
        Ok(())
    }

    /// Leave the room and keep drafting locally on the current board.
    pub fn leave_room(&mut self) {
        let Mode::Collaborating { room_id } = std::mem::take(&mut self.mode) else {
            return;
        };
        self.channel.disconnect();
        self.go_local();
        info!(%room_id, "session: left room");
        self.persist();
    }

    /// Empty the local document.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::ClearWhileCollaborating`] inside a room.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        if self.is_collaborating() {
            return Err(SessionError::ClearWhileCollaborating);
        }
        self.engine.clear();
        self.persist();
        Ok(())
    }

    // --- Local input ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.engine.set_tool(tool);
    }

    pub fn set_canvas_size(&mut self, width: f64, height: f64) {
        self.engine.viewport.set_canvas_size(width, height);
    }

    pub fn zoom(&mut self, delta: f64) -> Vec<Action> {
        self.engine.zoom(delta)
    }

    pub async fn pointer_down(&mut self, device: Point) -> Vec<Action> {
        let actions = self.engine.on_pointer_down(device).await;
        self.dispatch(&actions);
        actions
    }

    pub fn pointer_move(&mut self, device: Point) -> Vec<Action> {
        let actions = self.engine.on_pointer_move(device);
        self.dispatch(&actions);
        actions
    }

    pub fn pointer_up(&mut self) -> Vec<Action> {
        let actions = self.engine.on_pointer_up();
        self.dispatch(&actions);
        actions
    }

    pub fn text_blur(&mut self, text: &str) -> Vec<Action> {
        let actions = self.engine.on_text_blur(text);
        self.dispatch(&actions);
        actions
    }

    pub fn wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        self.engine.on_wheel(delta, modifiers)
    }

    // --- Remote input ---

    /// Apply every pending peer event. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        let inbound = self.channel.poll();
        let count = inbound.len();
        for event in inbound {
            self.apply_inbound(event);
        }
        count
    }

    /// Wait for the next peer event and apply it.
    ///
    /// Returns `None` outside a room or once the transport closes.
    pub async fn recv(&mut self) -> Option<Inbound> {
        let event = self.channel.recv().await?;
        self.apply_inbound(event.clone());
        Some(event)
    }

    // --- Helpers ---

    /// Put the channel back the way it was before a failed join.
    ///
    /// If the old room can no longer be subscribed to, the session drops to
    /// local mode rather than claim a room it cannot hear.
    fn restore_channel(&mut self, previous: Option<&str>) {
        let Some(room_id) = previous else {
            self.channel.disconnect();
            return;
        };
        if let Err(e) = self.channel.connect(room_id) {
            warn!(%room_id, error = %e, "session: resubscribe failed, continuing locally");
            self.mode = Mode::Local;
            self.go_local();
            self.persist();
        }
    }

    /// Mint ids locally again, past everything already in the document.
    fn go_local(&mut self) {
        self.engine.set_identity_source(Box::new(LocalIds::after(self.engine.doc.max_id())));
    }

    fn apply_inbound(&mut self, event: Inbound) {
        match event {
            Inbound::Draw(draw) => {
                self.engine.apply_remote(&draw);
            }
            Inbound::Cursor(cursor) => {
                self.cursors.apply(&cursor);
            }
        }
    }

    fn dispatch(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::Broadcast(event) => self.channel.send_draw(event),
                Action::CursorMoved(at) => self.channel.send_cursor(*at),
                Action::FocusTextInput { .. } | Action::SetCursor(_) | Action::RenderNeeded => {}
            }
        }
        self.persist();
    }

    /// Save the document if it changed since the last save. Local mode only.
    fn persist(&mut self) {
        if self.is_collaborating() {
            return;
        }
        let revision = self.engine.doc.revision();
        if revision == self.persisted_revision {
            return;
        }
        let Some(store) = self.storage.as_mut() else {
            return;
        };
        match storage::save_elements(store.as_mut(), self.engine.doc.shapes()) {
            Ok(()) => self.persisted_revision = revision,
            Err(e) => warn!(error = %e, "session: local save failed"),
        }
    }
}
