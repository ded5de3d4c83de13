use tracing::{debug, warn};

use crate::camera::{Point, Viewport};
use crate::consts::{HANDLE_TOLERANCE, TEXT_CHAR_WIDTH, TEXT_LINE_HEIGHT, WHEEL_ZOOM_FACTOR};
use crate::doc::{DocStore, Shape, ShapeId};
use crate::geometry::{self, CursorTable};
use crate::identity::{IdentitySource, LocalIds};
use crate::input::{ActionState, Modifiers, Tool, WheelDelta};
use crate::sync::{DrawEvent, DrawEventType};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Publish this mutation to the room.
    Broadcast(DrawEvent),
    /// The local pointer moved to this document-space point.
    CursorMoved(Point),
    /// Open a text editor for the shape at this device-space point.
    FocusTextInput { id: ShapeId, at: Point },
    SetCursor(String),
    RenderNeeded,
}

/// Gesture state machine over one document.
///
/// Pointer events arrive in device coordinates and are mapped through the
/// viewport. Local mutations are applied to `doc` immediately and reported
/// as [`Action::Broadcast`]; remote ones come in through
/// [`EngineCore::apply_remote`].
pub struct EngineCore {
    pub doc: DocStore,
    pub viewport: Viewport,
    state: ActionState,
    tool: Tool,
    user_id: String,
    ids: Box<dyn IdentitySource>,
    cursor_table: CursorTable,
}

impl EngineCore {
    /// Engine for `user_id` drawing with a fresh local id counter.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::with_ids(user_id, Box::new(LocalIds::new()))
    }

    #[must_use]
    pub fn with_ids(user_id: impl Into<String>, ids: Box<dyn IdentitySource>) -> Self {
        Self {
            doc: DocStore::new(),
            viewport: Viewport::new(),
            state: ActionState::Idle,
            tool: Tool::default(),
            user_id: user_id.into(),
            ids,
            cursor_table: CursorTable::default(),
        }
    }

    // --- Data inputs ---

    /// Replace the document wholesale. Any gesture in progress is dropped.
    pub fn load_snapshot(&mut self, shapes: Vec<Shape>) {
        self.doc.load_snapshot(shapes);
        self.state = ActionState::Idle;
    }

    /// Empty the document. Any gesture in progress is dropped.
    pub fn clear(&mut self) {
        self.doc.clear();
        self.state = ActionState::Idle;
    }

    /// Apply a mutation received from a peer. Returns whether the document changed.
    ///
    /// Events tagged with the local user id are ignored.
    pub fn apply_remote(&mut self, event: &DrawEvent) -> bool {
        if event.user_id == self.user_id {
            debug!(id = event.element.id, "engine: ignoring own event");
            return false;
        }
        match event.kind {
            DrawEventType::Create => {
                let mut shape = event.element.clone();
                shape.rerender();
                self.ids.observe(shape.id);
                self.doc.append(shape);
                true
            }
            DrawEventType::Update => self.doc.replace_by_id(&event.element),
        }
    }

    // --- Configuration ---

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Swap where new shape ids come from.
    pub fn set_identity_source(&mut self, ids: Box<dyn IdentitySource>) {
        self.ids = ids;
    }

    pub fn set_cursor_table(&mut self, table: CursorTable) {
        self.cursor_table = table;
    }

    /// Adjust the zoom scale by `delta`, as an explicit zoom control would.
    pub fn zoom(&mut self, delta: f64) -> Vec<Action> {
        self.viewport.zoom(delta);
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &ActionState {
        &self.state
    }

    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tool
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The shape the current gesture acts on.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.state.selected_id()
    }

    // --- Input events ---

    /// Begin a gesture. Ignored while another gesture is in progress.
    ///
    /// Creating tools wait for a fresh id before anything is added. If the
    /// id source fails the gesture is abandoned and the document is left
    /// untouched.
    pub async fn on_pointer_down(&mut self, device: Point) -> Vec<Action> {
        if !self.state.is_idle() {
            return Vec::new();
        }
        let point = self.viewport.to_document(device);

        match self.tool {
            Tool::Pan => {
                self.state = ActionState::Panning { last_device: device };
                Vec::new()
            }
            Tool::Transform => {
                let Some((id, position)) = self.element_at(point) else {
                    return Vec::new();
                };
                let Some(shape) = self.doc.get(id) else {
                    return Vec::new();
                };
                self.state = if position.is_handle() {
                    ActionState::Resizing { id, handle: position }
                } else {
                    ActionState::Moving { id, offset: point.sub(shape.origin()) }
                };
                Vec::new()
            }
            Tool::Text => {
                let Some(id) = self.next_id().await else {
                    return Vec::new();
                };
                self.doc.append(Shape::text(id, point, ""));
                self.state = ActionState::Writing { id };
                vec![Action::FocusTextInput { id, at: device }, Action::RenderNeeded]
            }
            tool => {
                let Some(kind) = tool.shape_kind() else {
                    return Vec::new();
                };
                let Some(id) = self.next_id().await else {
                    return Vec::new();
                };
                let shape = Shape::new(id, kind, point.x, point.y, point.x, point.y);
                self.doc.append(shape.clone());
                self.state = ActionState::Drawing { id };
                vec![Action::Broadcast(DrawEvent::create(shape, self.user_id.clone())), Action::RenderNeeded]
            }
        }
    }

    /// Advance the current gesture. Always reports the cursor position.
    pub fn on_pointer_move(&mut self, device: Point) -> Vec<Action> {
        let point = self.viewport.to_document(device);
        let mut actions = vec![Action::CursorMoved(point)];

        match self.state.clone() {
            ActionState::Idle => {
                if self.tool == Tool::Transform {
                    let hover = self.element_at(point).map(|(_, position)| position);
                    actions.push(Action::SetCursor(self.cursor_table.affordance(hover).to_owned()));
                }
            }
            ActionState::Panning { last_device } => {
                let delta = device.sub(last_device);
                self.viewport.pan_by(delta.x, delta.y);
                self.state = ActionState::Panning { last_device: device };
                actions.push(Action::RenderNeeded);
            }
            ActionState::Moving { id, offset } => {
                if let Some(shape) = self.doc.get(id) {
                    let target = point.sub(offset);
                    let delta = target.sub(shape.origin());
                    let moved = shape.with_coords(
                        shape.x1 + delta.x,
                        shape.y1 + delta.y,
                        shape.x2 + delta.x,
                        shape.y2 + delta.y,
                    );
                    self.commit_update(moved, &mut actions);
                }
            }
            ActionState::Resizing { id, handle } => {
                if let Some(shape) = self.doc.get(id) {
                    let resized = geometry::resize(shape, point, handle);
                    self.commit_update(resized, &mut actions);
                }
            }
            ActionState::Drawing { id } => {
                if let Some(shape) = self.doc.get(id) {
                    let stretched = shape.with_coords(shape.x1, shape.y1, point.x, point.y);
                    self.commit_update(stretched, &mut actions);
                }
            }
            ActionState::Writing { .. } => {}
        }
        actions
    }

    /// End the current gesture. Edited shapes are normalized in place.
    ///
    /// `Writing` survives pointer-up; it ends on [`EngineCore::on_text_blur`].
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        match self.state.clone() {
            ActionState::Drawing { id } | ActionState::Moving { id, .. } | ActionState::Resizing { id, .. } => {
                self.doc.normalize_in_place(id);
                self.state = ActionState::Idle;
                vec![Action::RenderNeeded]
            }
            ActionState::Panning { .. } => {
                self.state = ActionState::Idle;
                Vec::new()
            }
            ActionState::Idle | ActionState::Writing { .. } => Vec::new(),
        }
    }

    /// Commit the text of the label being written.
    ///
    /// The label's far corner is sized from the text and the finished shape
    /// is announced as a CREATE.
    pub fn on_text_blur(&mut self, text: &str) -> Vec<Action> {
        let ActionState::Writing { id } = self.state else {
            return Vec::new();
        };
        self.state = ActionState::Idle;
        let Some(shape) = self.doc.get(id) else {
            return Vec::new();
        };

        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        let origin = shape.origin();
        let mut label = Shape::text(id, origin, text).with_coords(
            origin.x,
            origin.y,
            origin.x + TEXT_CHAR_WIDTH * f64::from(chars),
            origin.y + TEXT_LINE_HEIGHT,
        );
        label = geometry::normalize(&label);
        self.doc.overwrite(&label);
        vec![Action::Broadcast(DrawEvent::create(label, self.user_id.clone())), Action::RenderNeeded]
    }

    /// Ctrl/meta wheel zooms; a plain wheel scrolls the canvas.
    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) -> Vec<Action> {
        if modifiers.zooms() {
            self.viewport.zoom(-delta.dy * WHEEL_ZOOM_FACTOR);
        } else {
            self.viewport.pan_by(-delta.dx, -delta.dy);
        }
        vec![Action::RenderNeeded]
    }

    // --- Helpers ---

    /// First hit under a document point, with handle slop held constant in
    /// device pixels.
    fn element_at(&self, point: Point) -> Option<(ShapeId, geometry::Position)> {
        let tolerance = self.viewport.device_dist_to_document(HANDLE_TOLERANCE);
        geometry::element_at(point, self.doc.shapes(), tolerance)
    }

    async fn next_id(&mut self) -> Option<ShapeId> {
        match self.ids.next_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, tool = ?self.tool, "engine: id request failed, gesture abandoned");
                None
            }
        }
    }

    fn commit_update(&mut self, shape: Shape, actions: &mut Vec<Action>) {
        self.doc.overwrite(&shape);
        actions.push(Action::Broadcast(DrawEvent::update(shape, self.user_id.clone())));
        actions.push(Action::RenderNeeded);
    }
}
