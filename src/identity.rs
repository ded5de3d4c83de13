//! Shape id sources.
//!
//! A new shape cannot be materialized until it has an id. Outside a room the
//! id comes from a per-document counter; inside a room it is issued by the
//! room server so that peers never collide. Both sit behind
//! [`IdentitySource`], which the engine awaits on every creating gesture.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, RoomApi};
use crate::doc::ShapeId;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("id request failed: {0}")]
    Request(#[from] ApiError),
    #[error("local id space exhausted")]
    Exhausted,
}

/// Capability that hands out fresh shape ids.
#[async_trait]
pub trait IdentitySource: Send {
    /// Produce an id not yet used in the document.
    async fn next_id(&mut self) -> Result<ShapeId, IdentityError>;

    /// Note an id that arrived from elsewhere (a remote CREATE).
    fn observe(&mut self, _id: ShapeId) {}
}

/// Per-document monotonic counter.
#[derive(Debug, Default, Clone)]
pub struct LocalIds {
    last: ShapeId,
}

impl LocalIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter that continues past `last`, typically the document's largest id.
    #[must_use]
    pub fn after(last: Option<ShapeId>) -> Self {
        Self { last: last.unwrap_or_default().max(0) }
    }

    /// Most recently issued or observed id.
    #[must_use]
    pub fn last(&self) -> ShapeId {
        self.last
    }
}

#[async_trait]
impl IdentitySource for LocalIds {
    async fn next_id(&mut self) -> Result<ShapeId, IdentityError> {
        self.last = self.last.checked_add(1).ok_or(IdentityError::Exhausted)?;
        Ok(self.last)
    }

    fn observe(&mut self, id: ShapeId) {
        self.last = self.last.max(id);
    }
}

/// Ids issued by the room server's id endpoint.
pub struct RemoteIds {
    api: Arc<dyn RoomApi>,
}

impl RemoteIds {
    #[must_use]
    pub fn new(api: Arc<dyn RoomApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl IdentitySource for RemoteIds {
    async fn next_id(&mut self) -> Result<ShapeId, IdentityError> {
        Ok(self.api.generate_id().await?)
    }
}
