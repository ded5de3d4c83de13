//! Element/action core for a real-time collaborative drawing surface.
//!
//! The crate owns everything between raw pointer input and the shared
//! document: the shape model, the geometry used to interpret the pointer
//! against it, the gesture state machine, the viewport transform, and the
//! event protocol that keeps every peer's copy of a room in step. Painting,
//! UI chrome, and the HTTP/pub-sub servers are external; they are reached
//! through the [`api::RoomApi`] and [`sync::Transport`] seams.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Local vs collaborating mode; routes engine actions to the channel and storage |
//! | [`engine`] | Gesture state machine ([`engine::EngineCore`]) |
//! | [`doc`] | Shapes and the ordered element store |
//! | [`geometry`] | Normalization, hit-testing, resize handles, cursor affordances |
//! | [`render`] | Derived render primitive for a shape |
//! | [`camera`] | Pan/zoom viewport and coordinate conversions |
//! | [`input`] | Tools, modifiers, and the gesture state value |
//! | [`identity`] | Shape id sources (local counter or remote endpoint) |
//! | [`sync`] | Wire events, topics, and the synchronization channel |
//! | [`hub`] | In-process pub/sub transport |
//! | [`presence`] | Remote cursor positions |
//! | [`api`] | Room creation, board snapshot, and id endpoints |
//! | [`storage`] | Local persistence of the document |
//! | [`config`] | Client configuration from the environment |
//! | [`consts`] | Shared numeric constants |

pub mod api;
pub mod camera;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hub;
pub mod identity;
pub mod input;
pub mod presence;
pub mod render;
pub mod session;
pub mod storage;
pub mod sync;
