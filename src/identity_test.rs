use super::*;
use crate::api::MemoryRoomApi;
use crate::doc::Shape;

struct DownApi;

#[async_trait]
impl RoomApi for DownApi {
    async fn create_room(&self, _shapes: &[Shape]) -> Result<String, ApiError> {
        Err(ApiError::Unavailable("down".into()))
    }

    async fn load_board(&self, _room_id: &str) -> Result<Vec<Shape>, ApiError> {
        Err(ApiError::Unavailable("down".into()))
    }

    async fn generate_id(&self) -> Result<ShapeId, ApiError> {
        Err(ApiError::Unavailable("down".into()))
    }
}

// =============================================================
// LocalIds
// =============================================================

#[tokio::test]
async fn local_ids_start_at_one() {
    let mut ids = LocalIds::new();
    assert_eq!(ids.next_id().await.unwrap(), 1);
    assert_eq!(ids.next_id().await.unwrap(), 2);
    assert_eq!(ids.last(), 2);
}

#[tokio::test]
async fn local_ids_continue_after_seed() {
    let mut ids = LocalIds::after(Some(41));
    assert_eq!(ids.next_id().await.unwrap(), 42);
}

#[tokio::test]
async fn local_ids_after_none_starts_fresh() {
    let mut ids = LocalIds::after(None);
    assert_eq!(ids.next_id().await.unwrap(), 1);
}

#[tokio::test]
async fn observe_larger_id_skips_ahead() {
    let mut ids = LocalIds::new();
    ids.observe(10);
    assert_eq!(ids.next_id().await.unwrap(), 11);
}

#[tokio::test]
async fn observe_smaller_id_is_ignored() {
    let mut ids = LocalIds::after(Some(10));
    ids.observe(3);
    assert_eq!(ids.next_id().await.unwrap(), 11);
}

#[tokio::test]
async fn local_ids_report_exhaustion() {
    let mut ids = LocalIds::after(Some(ShapeId::MAX));
    assert!(matches!(ids.next_id().await, Err(IdentityError::Exhausted)));
}

// =============================================================
// RemoteIds
// =============================================================

#[tokio::test]
async fn remote_ids_come_from_api() {
    let api = Arc::new(MemoryRoomApi::new());
    let mut ids = RemoteIds::new(api.clone());
    assert_eq!(ids.next_id().await.unwrap(), 1);
    assert_eq!(ids.next_id().await.unwrap(), 2);
}

#[tokio::test]
async fn remote_failure_surfaces_as_request_error() {
    let mut ids = RemoteIds::new(Arc::new(DownApi));
    assert!(matches!(ids.next_id().await, Err(IdentityError::Request(_))));
}
