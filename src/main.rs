//! Two clients sharing one room through the in-process hub.
//!
//! The first client drafts a rectangle locally (persisted under the
//! configured storage directory), publishes it as a room, and draws a line
//! once a second client has joined. The second client's view of the room is
//! printed as JSON.

use std::sync::Arc;

use sketchboard::api::MemoryRoomApi;
use sketchboard::camera::Point;
use sketchboard::config::ClientConfig;
use sketchboard::hub::LocalHub;
use sketchboard::input::Tool;
use sketchboard::session::{Session, SessionError};
use sketchboard::storage::FileStore;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to encode board: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<sketchboard::config::ConfigError> for DemoError {
    fn from(e: sketchboard::config::ConfigError) -> Self {
        Self::Session(e.into())
    }
}

impl From<sketchboard::storage::StorageError> for DemoError {
    fn from(e: sketchboard::storage::StorageError) -> Self {
        Self::Session(e.into())
    }
}

#[tokio::main]
async fn main() -> Result<(), DemoError> {
    tracing_subscriber::fmt::init();

    let config = ClientConfig::from_env()?;
    let hub = LocalHub::new();
    let api = Arc::new(MemoryRoomApi::new());

    let store = FileStore::open(&config.storage_dir)?;
    let mut host = Session::new(config.user_id.clone(), hub.clone(), api.clone()).with_storage(Box::new(store))?;
    let mut guest = Session::new(format!("{}-guest", config.user_id), hub.clone(), api.clone());

    host.set_tool(Tool::Rectangle);
    host.pointer_down(Point::new(10.0, 10.0)).await;
    host.pointer_move(Point::new(110.0, 60.0));
    host.pointer_up();

    let room_id = host.start_collaboration().await?;
    guest.join_room(&room_id).await?;
    tracing::info!(%room_id, "demo: both clients in room");

    host.set_tool(Tool::Line);
    host.pointer_down(Point::new(0.0, 0.0)).await;
    host.pointer_move(Point::new(50.0, 50.0));
    host.pointer_up();

    let applied = guest.pump();
    tracing::info!(applied, "demo: guest caught up");

    println!("{}", serde_json::to_string_pretty(guest.shapes())?);
    if let Some(at) = guest.cursors().get(host.user_id()) {
        eprintln!("{} cursor at ({}, {})", host.user_id(), at.x, at.y);
    }
    Ok(())
}
