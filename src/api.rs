//! Room server endpoints: room creation, board snapshot, and id issuance.
//!
//! DESIGN
//! ======
//! The drawing core only needs three calls from the room server, so they sit
//! behind one [`RoomApi`] trait. [`HttpRoomApi`] talks to the real endpoints
//! over `reqwest`; [`MemoryRoomApi`] keeps rooms in process for tests and the
//! demo binary.
//!
//! ERROR HANDLING
//! ==============
//! Every failure surfaces as an [`ApiError`]. Nothing here retries; callers
//! decide whether a failed call abandons a gesture or a room join.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::doc::{Shape, ShapeId};

/// Identifier of a shared room.
pub type RoomId = String;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("room not found: {0}")]
    RoomNotFound(RoomId),
    #[error("room api unavailable: {0}")]
    Unavailable(String),
}

/// The room server as seen from a client.
#[async_trait]
pub trait RoomApi: Send + Sync {
    /// Create a room seeded with `shapes` and return its id.
    async fn create_room(&self, shapes: &[Shape]) -> Result<RoomId, ApiError>;

    /// Fetch the current board of a room.
    async fn load_board(&self, room_id: &str) -> Result<Vec<Shape>, ApiError>;

    /// Issue a shape id unique across the server.
    async fn generate_id(&self) -> Result<ShapeId, ApiError>;
}

// =============================================================================
// HTTP
// =============================================================================

#[derive(Deserialize)]
struct RoomResponse {
    #[serde(rename = "roomId")]
    room_id: RoomId,
}

/// [`RoomApi`] over HTTP.
///
/// Endpoints, relative to the configured base URL:
/// - `POST /draw/room` with the shapes as body, answering `{ "roomId": ... }`
/// - `GET /draw/board/{roomId}` answering a shape array
/// - `GET /draw/generateId` answering a bare integer
pub struct HttpRoomApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRoomApi {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self { client, base_url: config.api_base_url.trim_end_matches('/').to_owned() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn check_status(resp: reqwest::Response, url: &str) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(ApiError::Status { status: status.as_u16(), url: url.to_owned() })
    }
}

#[async_trait]
impl RoomApi for HttpRoomApi {
    async fn create_room(&self, shapes: &[Shape]) -> Result<RoomId, ApiError> {
        let url = self.url("/draw/room");
        let resp = self.client.post(&url).json(shapes).send().await?;
        let body: RoomResponse = check_status(resp, &url)?.json().await?;
        info!(room_id = %body.room_id, shapes = shapes.len(), "api: room created");
        Ok(body.room_id)
    }

    async fn load_board(&self, room_id: &str) -> Result<Vec<Shape>, ApiError> {
        let url = self.url(&format!("/draw/board/{room_id}"));
        let resp = self.client.get(&url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::RoomNotFound(room_id.to_owned()));
        }
        Ok(check_status(resp, &url)?.json().await?)
    }

    async fn generate_id(&self) -> Result<ShapeId, ApiError> {
        let url = self.url("/draw/generateId");
        let resp = self.client.get(&url).send().await?;
        Ok(check_status(resp, &url)?.json().await?)
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// [`RoomApi`] that keeps rooms in process memory.
#[derive(Debug, Default)]
pub struct MemoryRoomApi {
    rooms: Mutex<HashMap<RoomId, Vec<Shape>>>,
    last_id: AtomicI64,
}

impl MemoryRoomApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rooms created so far.
    #[must_use]
    pub fn room_count(&self) -> usize {
        self.rooms.lock().map_or(0, |rooms| rooms.len())
    }
}

#[async_trait]
impl RoomApi for MemoryRoomApi {
    async fn create_room(&self, shapes: &[Shape]) -> Result<RoomId, ApiError> {
        let room_id = Uuid::new_v4().to_string();
        let mut rooms = self.rooms.lock().map_err(|e| ApiError::Unavailable(e.to_string()))?;
        rooms.insert(room_id.clone(), shapes.to_vec());
        if let Some(max) = shapes.iter().map(|s| s.id).max() {
            self.last_id.fetch_max(max, Ordering::SeqCst);
        }
        Ok(room_id)
    }

    async fn load_board(&self, room_id: &str) -> Result<Vec<Shape>, ApiError> {
        let rooms = self.rooms.lock().map_err(|e| ApiError::Unavailable(e.to_string()))?;
        rooms
            .get(room_id)
            .cloned()
            .ok_or_else(|| ApiError::RoomNotFound(room_id.to_owned()))
    }

    async fn generate_id(&self) -> Result<ShapeId, ApiError> {
        Ok(self.last_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}
