//! Board engine: the reducer that turns discrete UI events into mutations.
//!
//! DESIGN
//! ======
//! `BoardCore` is a plain state container: the object store, UI chrome state,
//! the single pointer session, and the countdown timer. Every input goes
//! through one `&mut self` transition function (`apply`, or the per-event
//! `on_*` methods it dispatches to) and returns the `Action`s it caused, so a
//! recorded event stream replays deterministically without a renderer.
//!
//! The AI flows are split into a synchronous "begin" step that records
//! placeholder/loading state and a "finish" step that applies the result.
//! The async glue in [`crate::ai`] runs the request between the two.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::AiError;
use crate::consts::{
    DEFAULT_FONT_SIZE, DEFAULT_SHAPE_COLOR, DEFAULT_TEXT_COLOR, ERASER_SLOP_PX, ICEBREAKER_FAILED_PREFIX,
    ICEBREAKER_PLACEHOLDER, ICEBREAKER_PREFIX, LOCAL_USER_ID, STICKY_PLACEMENT_OFFSET, SYSTEM_AUTHOR,
};
use crate::doc::{
    ChatMessage, DrawPath, FontFamily, ObjectId, ObjectKind, ObjectRef, ObjectStore, Shape, StickyColor, StickyNote,
    StickyPatch, TextObject, TextPatch, clamp_font_size,
};
use crate::geom::{Bounds, Point};
use crate::hit::hit_test_erasable;
use crate::input::{PressBehavior, Session, Tool};
use crate::render::BoardSnapshot;
use crate::timer::{SessionTimer, Tick};

// =============================================================================
// EVENTS AND ACTIONS
// =============================================================================

/// A discrete input from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Press on the canvas. `target` is the sticky/text under the pointer,
    /// if the presentation layer hit one.
    PointerDown { point: Point, target: Option<ObjectRef> },
    PointerMove { point: Point },
    /// Release, or the pointer leaving the canvas.
    PointerUp,
    SetTool(Tool),
    /// Toolbar default size for new text; clamped.
    SetDefaultFontSize(i64),
    EditSticky { id: ObjectId, patch: StickyPatch },
    EditText { id: ObjectId, patch: TextPatch },
    AdjustFontSize { id: ObjectId, delta: i64 },
    Vote { id: ObjectId },
    Delete(ObjectRef),
    BeginEdit(ObjectRef),
    EndEdit,
    SendMessage { text: String, at_ms: i64 },
    ToggleTimer,
    /// One second elapsed.
    TimerTick,
}

/// What changed as a result of an event. The host re-renders on any action.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ObjectCreated(ObjectRef),
    ObjectUpdated(ObjectRef),
    ObjectDeleted(ObjectRef),
    MessagePosted(ObjectId),
    MessageUpdated(ObjectId),
    ToolChanged(Tool),
    EditStarted(ObjectRef),
    EditEnded(ObjectRef),
    TimerChanged(Option<u32>),
    TimerExpired,
    ReportChanged,
}

// =============================================================================
// UI STATE
// =============================================================================

/// Lifecycle of the session report.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "lowercase")]
pub enum ReportState {
    /// Never requested, or reset.
    #[default]
    Empty,
    /// A request is in flight.
    Loading,
    /// Cached for the rest of the session.
    Ready(String),
    /// Last request failed; the next open retries.
    Failed(String),
}

/// Everything the report request needs, captured when the modal opens.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    /// Report generation this request belongs to; echoed back to
    /// [`BoardCore::finish_report`].
    pub generation: u64,
    pub topic: String,
    pub stickies: Vec<StickyNote>,
    pub messages: Vec<ChatMessage>,
}

/// Board chrome state that is not part of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub tool: Tool,
    /// Font size given to newly placed text.
    pub default_font_size: u32,
    /// Sticky or text currently open for editing.
    pub editing: Option<ObjectRef>,
    pub report: ReportState,
    pub report_open: bool,
    /// Bumped on every report request and reset, so a result can be matched
    /// to the request that produced it.
    pub report_generation: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tool: Tool::Select,
            default_font_size: DEFAULT_FONT_SIZE,
            editing: None,
            report: ReportState::Empty,
            report_open: false,
            report_generation: 0,
        }
    }
}

// =============================================================================
// BOARD CORE
// =============================================================================

/// The board interaction controller.
#[derive(Debug, Clone)]
pub struct BoardCore {
    pub doc: ObjectStore,
    pub ui: UiState,
    pub session: Session,
    pub timer: SessionTimer,
    /// Roster id stamped on everything the local user creates.
    author_id: String,
}

impl Default for BoardCore {
    fn default() -> Self {
        Self {
            doc: ObjectStore::new(),
            ui: UiState::default(),
            session: Session::Idle,
            timer: SessionTimer::new(),
            author_id: LOCAL_USER_ID.into(),
        }
    }
}

impl BoardCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A board seeded with the two welcome stickies.
    #[must_use]
    pub fn with_welcome_content() -> Self {
        let mut core = Self::new();
        let seed = |x: f64, y: f64, content: &str, color: StickyColor, votes: u32| StickyNote {
            id: Uuid::new_v4(),
            x,
            y,
            content: content.into(),
            color,
            author_id: SYSTEM_AUTHOR.into(),
            votes,
        };
        core.doc.insert_sticky(seed(100.0, 100.0, "Welcome to JamBoard AI!", StickyColor::Yellow, 5));
        core.doc.insert_sticky(seed(350.0, 150.0, "Try dragging me around", StickyColor::Blue, 2));
        core
    }

    #[must_use]
    pub fn author_id(&self) -> &str {
        &self.author_id
    }

    /// Reduce one event.
    pub fn apply(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::PointerDown { point, target } => self.on_pointer_down(point, target),
            Event::PointerMove { point } => self.on_pointer_move(point),
            Event::PointerUp => self.on_pointer_up(),
            Event::SetTool(tool) => self.set_tool(tool),
            Event::SetDefaultFontSize(size) => self.set_default_font_size(size),
            Event::EditSticky { id, patch } => self.edit_sticky(&id, &patch),
            Event::EditText { id, patch } => self.edit_text(&id, &patch),
            Event::AdjustFontSize { id, delta } => self.adjust_font_size(&id, delta),
            Event::Vote { id } => self.vote(&id),
            Event::Delete(target) => self.delete(target),
            Event::BeginEdit(target) => self.begin_edit(target),
            Event::EndEdit => self.end_edit(),
            Event::SendMessage { text, at_ms } => self.send_message(&text, at_ms),
            Event::ToggleTimer => self.toggle_timer(),
            Event::TimerTick => self.timer_tick(),
        }
    }

    // --- Tool ---

    #[must_use]
    pub fn current_tool(&self) -> Tool {
        self.ui.tool
    }

    /// Switch tools. Closes any open gesture and edit.
    pub fn set_tool(&mut self, tool: Tool) -> Vec<Action> {
        let mut actions = self.end_edit();
        self.session = Session::Idle;
        if self.ui.tool != tool {
            debug!(from = ?self.ui.tool, to = ?tool, "tool changed");
            self.ui.tool = tool;
            actions.push(Action::ToolChanged(tool));
        }
        actions
    }

    pub fn set_default_font_size(&mut self, size: i64) -> Vec<Action> {
        self.ui.default_font_size = clamp_font_size(size);
        Vec::new()
    }

    // --- Pointer session ---

    /// Pointer pressed. Starts a drag, a draw, an erase, or a one-shot placement
    /// depending on the active tool's `PressBehavior`.
    pub fn on_pointer_down(&mut self, point: Point, target: Option<ObjectRef>) -> Vec<Action> {
        if self.session.is_active() {
            debug!(session = ?self.session, "press ignored: session already open");
            return Vec::new();
        }

        let spec = self.ui.tool.spec();
        let mut actions = match spec.press {
            PressBehavior::Select => {
                // A press anywhere but the open editor closes it, like a blur.
                let actions =
                    if target.is_some_and(|t| self.ui.editing == Some(t)) { Vec::new() } else { self.end_edit() };
                self.start_drag(point, target);
                actions
            }
            PressBehavior::PlaceSticky => vec![self.place_sticky(point)],
            PressBehavior::PlaceText => {
                let created = self.place_text(point);
                self.ui.editing = Some(created);
                vec![Action::ObjectCreated(created), Action::EditStarted(created)]
            }
            PressBehavior::Ink(style) => {
                let id = Uuid::new_v4();
                self.doc.insert_path(DrawPath {
                    id,
                    points: vec![point],
                    color: style.color.into(),
                    width: style.width,
                    opacity: style.opacity,
                });
                self.session = Session::DrawingPath { id };
                vec![Action::ObjectCreated(ObjectRef::new(ObjectKind::Path, id))]
            }
            PressBehavior::Shape(kind) => {
                let id = Uuid::new_v4();
                self.doc.insert_shape(Shape {
                    id,
                    kind,
                    x: point.x,
                    y: point.y,
                    width: 0.0,
                    height: 0.0,
                    color: DEFAULT_SHAPE_COLOR.into(),
                });
                self.session = Session::DrawingShape { id, anchor: point };
                vec![Action::ObjectCreated(ObjectRef::new(ObjectKind::Shape, id))]
            }
            PressBehavior::Erase => {
                self.session = Session::Erasing;
                self.erase_at(point)
            }
        };

        if spec.one_shot {
            self.ui.tool = Tool::Select;
            actions.push(Action::ToolChanged(Tool::Select));
        }
        actions
    }

    /// Pointer moved. Updates the session target, re-resolved by id.
    pub fn on_pointer_move(&mut self, point: Point) -> Vec<Action> {
        match self.session {
            Session::Idle => Vec::new(),
            Session::Dragging { target, offset } => {
                let origin = point.sub(offset);
                if self.doc.move_object(target, origin.x, origin.y) {
                    vec![Action::ObjectUpdated(target)]
                } else {
                    Vec::new()
                }
            }
            Session::DrawingPath { id } => {
                if self.doc.append_point(&id, point) {
                    vec![Action::ObjectUpdated(ObjectRef::new(ObjectKind::Path, id))]
                } else {
                    Vec::new()
                }
            }
            Session::DrawingShape { id, anchor } => {
                if self.doc.set_shape_bounds(&id, Bounds::from_corners(anchor, point)) {
                    vec![Action::ObjectUpdated(ObjectRef::new(ObjectKind::Shape, id))]
                } else {
                    Vec::new()
                }
            }
            Session::Erasing => self.erase_at(point),
        }
    }

    /// Pointer released. Finalizes whatever was in progress.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if self.session.is_active() {
            debug!(session = ?self.session, "session closed");
        }
        self.session = Session::Idle;
        Vec::new()
    }

    fn start_drag(&mut self, point: Point, target: Option<ObjectRef>) {
        let Some(target) = target.filter(ObjectRef::is_draggable) else {
            return;
        };
        if self.ui.editing == Some(target) {
            return;
        }
        let Some(origin) = self.doc.origin(target) else {
            return;
        };
        self.session = Session::Dragging { target, offset: point.sub(origin) };
    }

    fn place_sticky(&mut self, point: Point) -> Action {
        let id = Uuid::new_v4();
        self.doc.insert_sticky(StickyNote {
            id,
            x: point.x - STICKY_PLACEMENT_OFFSET,
            y: point.y - STICKY_PLACEMENT_OFFSET,
            content: String::new(),
            color: StickyColor::Yellow,
            author_id: self.author_id.clone(),
            votes: 0,
        });
        debug!(%id, "sticky placed");
        Action::ObjectCreated(ObjectRef::sticky(id))
    }

    fn place_text(&mut self, point: Point) -> ObjectRef {
        let id = Uuid::new_v4();
        self.doc.insert_text(TextObject {
            id,
            x: point.x,
            y: point.y,
            content: String::new(),
            color: DEFAULT_TEXT_COLOR.into(),
            font_size: self.ui.default_font_size,
            font_family: FontFamily::Handwriting,
            author_id: self.author_id.clone(),
        });
        debug!(%id, "text placed");
        ObjectRef::text(id)
    }

    fn erase_at(&mut self, point: Point) -> Vec<Action> {
        let Some(hit) = hit_test_erasable(point, &self.doc, ERASER_SLOP_PX) else {
            return Vec::new();
        };
        if self.doc.delete(hit) {
            debug!(kind = ?hit.kind, id = %hit.id, "erased");
            vec![Action::ObjectDeleted(hit)]
        } else {
            Vec::new()
        }
    }

    // --- Object edits ---

    pub fn edit_sticky(&mut self, id: &ObjectId, patch: &StickyPatch) -> Vec<Action> {
        if self.doc.update_sticky(id, patch) { vec![Action::ObjectUpdated(ObjectRef::sticky(*id))] } else { Vec::new() }
    }

    pub fn edit_text(&mut self, id: &ObjectId, patch: &TextPatch) -> Vec<Action> {
        if self.doc.update_text(id, patch) { vec![Action::ObjectUpdated(ObjectRef::text(*id))] } else { Vec::new() }
    }

    /// Nudge a text object's font size; the result is clamped.
    pub fn adjust_font_size(&mut self, id: &ObjectId, delta: i64) -> Vec<Action> {
        let Some(current) = self.doc.text(id).map(|t| t.font_size) else {
            return Vec::new();
        };
        let patch = TextPatch { font_size: Some(i64::from(current).saturating_add(delta)), ..Default::default() };
        self.edit_text(id, &patch)
    }

    pub fn vote(&mut self, id: &ObjectId) -> Vec<Action> {
        if self.doc.increment_vote(id) { vec![Action::ObjectUpdated(ObjectRef::sticky(*id))] } else { Vec::new() }
    }

    /// Delete an object. Drops any session or edit pointing at it.
    pub fn delete(&mut self, target: ObjectRef) -> Vec<Action> {
        if !self.doc.delete(target) {
            return Vec::new();
        }
        if self.session_target() == Some(target) {
            self.session = Session::Idle;
        }
        if self.ui.editing == Some(target) {
            self.ui.editing = None;
        }
        vec![Action::ObjectDeleted(target)]
    }

    fn session_target(&self) -> Option<ObjectRef> {
        match self.session {
            Session::Dragging { target, .. } => Some(target),
            Session::DrawingPath { id } => Some(ObjectRef::new(ObjectKind::Path, id)),
            Session::DrawingShape { id, .. } => Some(ObjectRef::new(ObjectKind::Shape, id)),
            Session::Idle | Session::Erasing => None,
        }
    }

    // --- Editing ---

    /// Open a sticky or text object for editing. Only the select tool edits.
    pub fn begin_edit(&mut self, target: ObjectRef) -> Vec<Action> {
        if self.ui.tool != Tool::Select || !target.is_draggable() || !self.doc.contains(target) {
            return Vec::new();
        }
        if self.ui.editing == Some(target) {
            return Vec::new();
        }
        let mut actions = self.end_edit();
        self.ui.editing = Some(target);
        actions.push(Action::EditStarted(target));
        actions
    }

    /// Close the open editor. Text left blank is removed.
    pub fn end_edit(&mut self) -> Vec<Action> {
        let Some(target) = self.ui.editing.take() else {
            return Vec::new();
        };
        let mut actions = vec![Action::EditEnded(target)];
        let blank_text =
            target.kind == ObjectKind::Text && self.doc.text(&target.id).is_some_and(|t| t.content.trim().is_empty());
        if blank_text && self.doc.delete(target) {
            debug!(id = %target.id, "empty text removed");
            actions.push(Action::ObjectDeleted(target));
        }
        actions
    }

    // --- Chat ---

    /// Post a chat message from the local user. Blank text is ignored.
    pub fn send_message(&mut self, text: &str, at_ms: i64) -> Vec<Action> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        let id = Uuid::new_v4();
        self.doc.push_message(ChatMessage {
            id,
            author_id: self.author_id.clone(),
            content: text.into(),
            timestamp: at_ms,
            reactions: Vec::new(),
        });
        vec![Action::MessagePosted(id)]
    }

    // --- Timer ---

    pub fn toggle_timer(&mut self) -> Vec<Action> {
        self.timer.toggle();
        vec![Action::TimerChanged(self.timer.remaining())]
    }

    pub fn timer_tick(&mut self) -> Vec<Action> {
        match self.timer.tick() {
            Tick::Stopped => Vec::new(),
            Tick::Running { remaining } => vec![Action::TimerChanged(Some(remaining))],
            Tick::Expired => {
                info!("session timer expired");
                vec![Action::TimerChanged(None), Action::TimerExpired]
            }
        }
    }

    // --- AI: icebreaker ---

    /// Post the icebreaker placeholder and return its id.
    pub fn begin_icebreaker(&mut self, at_ms: i64) -> ObjectId {
        let id = Uuid::new_v4();
        self.doc.push_message(ChatMessage {
            id,
            author_id: SYSTEM_AUTHOR.into(),
            content: ICEBREAKER_PLACEHOLDER.into(),
            timestamp: at_ms,
            reactions: Vec::new(),
        });
        id
    }

    /// Rewrite the placeholder in place with the question or the failure.
    pub fn finish_icebreaker(&mut self, id: &ObjectId, result: &Result<String, AiError>) -> Vec<Action> {
        let content = match result {
            Ok(question) => format!("{ICEBREAKER_PREFIX}{question}"),
            Err(e) => format!("{ICEBREAKER_FAILED_PREFIX}{e}"),
        };
        if self.doc.set_message_content(id, content) { vec![Action::MessageUpdated(*id)] } else { Vec::new() }
    }

    // --- AI: session report ---

    /// Open the report modal. Returns the request to run when nothing is
    /// cached and nothing is in flight.
    pub fn open_report(&mut self, topic: &str) -> Option<ReportRequest> {
        self.ui.report_open = true;
        match self.ui.report {
            ReportState::Loading | ReportState::Ready(_) => None,
            ReportState::Empty | ReportState::Failed(_) => {
                self.ui.report = ReportState::Loading;
                self.ui.report_generation += 1;
                Some(ReportRequest {
                    generation: self.ui.report_generation,
                    topic: topic.into(),
                    stickies: self.doc.stickies().as_slice().to_vec(),
                    messages: self.doc.messages().as_slice().to_vec(),
                })
            }
        }
    }

    /// Hide the modal. An in-flight request keeps running.
    pub fn close_report(&mut self) {
        self.ui.report_open = false;
    }

    /// Apply a finished report request. Ignored unless `generation` is the
    /// request currently in flight.
    pub fn finish_report(&mut self, generation: u64, result: Result<String, AiError>) -> Vec<Action> {
        if self.ui.report != ReportState::Loading || generation != self.ui.report_generation {
            debug!(generation, current = self.ui.report_generation, "stale report result dropped");
            return Vec::new();
        }
        self.ui.report = match result {
            Ok(text) => ReportState::Ready(text),
            Err(e) => ReportState::Failed(e.to_string()),
        };
        vec![Action::ReportChanged]
    }

    /// Drop the cached report so the next open regenerates it.
    pub fn reset_report(&mut self) -> Vec<Action> {
        self.ui.report = ReportState::Empty;
        self.ui.report_generation += 1;
        vec![Action::ReportChanged]
    }

    // --- Queries ---

    /// Full state for the presentation layer.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(self)
    }
}
