use super::*;
use crate::doc::ShapeKind;

fn shape(id: ShapeId) -> Shape {
    Shape::new(id, ShapeKind::Rectangle, 0.0, 0.0, 10.0, 10.0)
}

// =============================================================
// MemoryRoomApi
// =============================================================

#[tokio::test]
async fn create_room_then_load_board_returns_seed() {
    let api = MemoryRoomApi::new();
    let room = api.create_room(&[shape(1), shape(2)]).await.unwrap();
    let board = api.load_board(&room).await.unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].id, 1);
    assert_eq!(api.room_count(), 1);
}

#[tokio::test]
async fn rooms_get_distinct_ids() {
    let api = MemoryRoomApi::new();
    let a = api.create_room(&[]).await.unwrap();
    let b = api.create_room(&[]).await.unwrap();
    assert_ne!(a, b);
}

#[tokio::test]
async fn load_unknown_room_fails() {
    let api = MemoryRoomApi::new();
    let err = api.load_board("nope").await.unwrap_err();
    assert!(matches!(err, ApiError::RoomNotFound(ref id) if id == "nope"));
}

#[tokio::test]
async fn generate_id_is_monotonic() {
    let api = MemoryRoomApi::new();
    let a = api.generate_id().await.unwrap();
    let b = api.generate_id().await.unwrap();
    assert_eq!(a, 1);
    assert_eq!(b, 2);
}

#[tokio::test]
async fn generate_id_continues_past_seeded_shapes() {
    let api = MemoryRoomApi::new();
    api.create_room(&[shape(40), shape(7)]).await.unwrap();
    assert_eq!(api.generate_id().await.unwrap(), 41);
}

// =============================================================
// HttpRoomApi
// =============================================================

#[test]
fn http_api_joins_base_url_and_path() {
    let config = ClientConfig { api_base_url: "http://localhost:8080/api/".into(), ..ClientConfig::default() };
    let api = HttpRoomApi::new(&config).unwrap();
    assert_eq!(api.url("/draw/generateId"), "http://localhost:8080/api/draw/generateId");
}

#[test]
fn room_response_reads_camel_case_id() {
    let body: RoomResponse = serde_json::from_str(r#"{"roomId":"abc"}"#).unwrap();
    assert_eq!(body.room_id, "abc");
}
