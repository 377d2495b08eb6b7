//! Document model: board objects, chat messages, and the in-memory store.
//!
//! This module defines the plain value records that make up a board
//! (`StickyNote`, `TextObject`, `Shape`, `DrawPath`, `ChatMessage`), sparse
//! patch types for field edits (`StickyPatch`, `TextPatch`), and the store
//! that exclusively owns them (`ObjectStore`).
//!
//! Each kind lives in its own `Collection`, an ordered list keyed by id.
//! Insertion order is draw order. Every mutation resolves its target by id
//! and replaces that entry in place; an id that is not present leaves the
//! store untouched and reports `false`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{LOCAL_USER_ID, MAX_FONT_SIZE, MIN_FONT_SIZE, SYSTEM_AUTHOR};
use crate::geom::{Bounds, Point};

/// Unique identifier for a board object or chat message.
pub type ObjectId = Uuid;

// =============================================================================
// OBJECT TYPES
// =============================================================================

/// Sticky note palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StickyColor {
    #[default]
    Yellow,
    Blue,
    Green,
    Pink,
    Orange,
}

/// A sticky note on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickyNote {
    pub id: ObjectId,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    pub content: String,
    pub color: StickyColor,
    pub author_id: String,
    /// Only ever raised through [`ObjectStore::increment_vote`].
    pub votes: u32,
}

/// Typeface family for free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Sans,
    Serif,
    #[default]
    Handwriting,
}

/// Free-standing text on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextObject {
    pub id: ObjectId,
    pub x: f64,
    pub y: f64,
    pub content: String,
    /// CSS color string.
    pub color: String,
    /// Always within `[MIN_FONT_SIZE, MAX_FONT_SIZE]`.
    pub font_size: u32,
    pub font_family: FontFamily,
    pub author_id: String,
}

/// Outline kind for a drawn shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Ellipse inscribed in the bounding box.
    Circle,
}

/// A drawn rectangle or ellipse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub color: String,
}

impl Shape {
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds { x: self.x, y: self.y, width: self.width, height: self.height }
    }
}

/// A freehand ink stroke. Points are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawPath {
    pub id: ObjectId,
    pub points: Vec<Point>,
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

/// A chat message on the scribble wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: ObjectId,
    pub author_id: String,
    pub content: String,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    pub reactions: Vec<String>,
}

impl ChatMessage {
    /// Whether the board itself authored this message (AI placeholders).
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.author_id == SYSTEM_AUTHOR
    }
}

/// A session participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// The static participant roster. Index 0 is the local user.
#[must_use]
pub fn roster() -> Vec<User> {
    let user = |id: &str, name: &str, color: &str, avatar: Option<&str>| User {
        id: id.into(),
        name: name.into(),
        color: color.into(),
        avatar: avatar.map(Into::into),
    };
    vec![
        user(LOCAL_USER_ID, "Me", "bg-indigo-600", None),
        user("u1", "Guest Panda", "bg-emerald-500", Some("https://picsum.photos/32/32?random=1")),
        user("u2", "Guest Llama", "bg-orange-500", Some("https://picsum.photos/32/32?random=2")),
    ]
}

/// Resolve an author id against the roster. Unknown ids get a grey
/// "Unknown" placeholder so transcripts never drop a line.
#[must_use]
pub fn lookup_user(id: &str) -> User {
    roster().into_iter().find(|u| u.id == id).unwrap_or_else(|| User {
        id: id.into(),
        name: "Unknown".into(),
        color: "bg-gray-400".into(),
        avatar: None,
    })
}

/// Clamp a requested font size into the supported range.
#[must_use]
pub fn clamp_font_size(size: i64) -> u32 {
    let clamped = size.clamp(i64::from(MIN_FONT_SIZE), i64::from(MAX_FONT_SIZE));
    u32::try_from(clamped).unwrap_or(MIN_FONT_SIZE)
}

// =============================================================================
// REFERENCES AND PATCHES
// =============================================================================

/// Which collection an [`ObjectRef`] points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Sticky,
    Text,
    Shape,
    Path,
}

/// A typed handle to a stored object. Holds no object data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub kind: ObjectKind,
    pub id: ObjectId,
}

impl ObjectRef {
    #[must_use]
    pub fn new(kind: ObjectKind, id: ObjectId) -> Self {
        Self { kind, id }
    }

    #[must_use]
    pub fn sticky(id: ObjectId) -> Self {
        Self::new(ObjectKind::Sticky, id)
    }

    #[must_use]
    pub fn text(id: ObjectId) -> Self {
        Self::new(ObjectKind::Text, id)
    }

    /// Stickies and text can be picked up and dragged; ink and shapes cannot.
    #[must_use]
    pub fn is_draggable(&self) -> bool {
        matches!(self.kind, ObjectKind::Sticky | ObjectKind::Text)
    }
}

/// Sparse edit for a sticky note. Votes are deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StickyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<StickyColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// Sparse edit for a text object. `font_size` is clamped on apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<FontFamily>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

// =============================================================================
// COLLECTION
// =============================================================================

/// Anything stored in a [`Collection`].
pub trait Keyed {
    fn id(&self) -> ObjectId;
}

macro_rules! impl_keyed {
    ($($ty:ty),*) => {
        $(impl Keyed for $ty {
            fn id(&self) -> ObjectId {
                self.id
            }
        })*
    };
}

impl_keyed!(StickyNote, TextObject, Shape, DrawPath, ChatMessage);

/// Ordered, append-friendly list of records with unique ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> Collection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item`. Rejected when its id is already present.
    pub fn insert(&mut self, item: T) -> bool {
        if self.contains(&item.id()) {
            return false;
        }
        self.items.push(item);
        true
    }

    #[must_use]
    pub fn get(&self, id: &ObjectId) -> Option<&T> {
        self.items.iter().find(|item| item.id() == *id)
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Replace the entry with `id` by running `f` on it. Returns false if absent.
    pub fn update(&mut self, id: &ObjectId, f: impl FnOnce(&mut T)) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id() == *id) else {
            return false;
        };
        f(item);
        true
    }

    /// Remove an entry by id, returning it if it was present.
    pub fn remove(&mut self, id: &ObjectId) -> Option<T> {
        let idx = self.items.iter().position(|item| item.id() == *id)?;
        Some(self.items.remove(idx))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<'a, T: Keyed> IntoIterator for &'a Collection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// OBJECT STORE
// =============================================================================

/// Authoritative in-memory store for everything on the board.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    stickies: Collection<StickyNote>,
    texts: Collection<TextObject>,
    shapes: Collection<Shape>,
    paths: Collection<DrawPath>,
    messages: Collection<ChatMessage>,
}

impl ObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Create ---

    pub fn insert_sticky(&mut self, sticky: StickyNote) -> bool {
        self.stickies.insert(sticky)
    }

    pub fn insert_text(&mut self, text: TextObject) -> bool {
        self.texts.insert(text)
    }

    pub fn insert_shape(&mut self, shape: Shape) -> bool {
        self.shapes.insert(shape)
    }

    pub fn insert_path(&mut self, path: DrawPath) -> bool {
        self.paths.insert(path)
    }

    pub fn push_message(&mut self, message: ChatMessage) -> bool {
        self.messages.insert(message)
    }

    // --- Update ---

    /// Apply a sparse edit to a sticky note.
    pub fn update_sticky(&mut self, id: &ObjectId, patch: &StickyPatch) -> bool {
        self.stickies.update(id, |s| {
            if let Some(ref content) = patch.content {
                s.content.clone_from(content);
            }
            if let Some(color) = patch.color {
                s.color = color;
            }
            if let Some(x) = patch.x {
                s.x = x;
            }
            if let Some(y) = patch.y {
                s.y = y;
            }
        })
    }

    /// Apply a sparse edit to a text object, clamping the font size.
    pub fn update_text(&mut self, id: &ObjectId, patch: &TextPatch) -> bool {
        self.texts.update(id, |t| {
            if let Some(ref content) = patch.content {
                t.content.clone_from(content);
            }
            if let Some(ref color) = patch.color {
                t.color.clone_from(color);
            }
            if let Some(size) = patch.font_size {
                t.font_size = clamp_font_size(size);
            }
            if let Some(family) = patch.font_family {
                t.font_family = family;
            }
            if let Some(x) = patch.x {
                t.x = x;
            }
            if let Some(y) = patch.y {
                t.y = y;
            }
        })
    }

    /// Move a draggable object's origin. Shapes and ink are not positioned
    /// this way and report `false`.
    pub fn move_object(&mut self, target: ObjectRef, x: f64, y: f64) -> bool {
        match target.kind {
            ObjectKind::Sticky => self.stickies.update(&target.id, |s| {
                s.x = x;
                s.y = y;
            }),
            ObjectKind::Text => self.texts.update(&target.id, |t| {
                t.x = x;
                t.y = y;
            }),
            ObjectKind::Shape | ObjectKind::Path => false,
        }
    }

    pub fn set_shape_bounds(&mut self, id: &ObjectId, bounds: Bounds) -> bool {
        self.shapes.update(id, |s| {
            s.x = bounds.x;
            s.y = bounds.y;
            s.width = bounds.width;
            s.height = bounds.height;
        })
    }

    pub fn append_point(&mut self, id: &ObjectId, point: Point) -> bool {
        self.paths.update(id, |p| p.points.push(point))
    }

    /// Add one vote to a sticky. Saturates rather than wrapping.
    pub fn increment_vote(&mut self, id: &ObjectId) -> bool {
        self.stickies.update(id, |s| s.votes = s.votes.saturating_add(1))
    }

    pub fn set_message_content(&mut self, id: &ObjectId, content: String) -> bool {
        self.messages.update(id, |m| m.content = content)
    }

    // --- Delete ---

    /// Remove any board object by reference.
    pub fn delete(&mut self, target: ObjectRef) -> bool {
        match target.kind {
            ObjectKind::Sticky => self.stickies.remove(&target.id).is_some(),
            ObjectKind::Text => self.texts.remove(&target.id).is_some(),
            ObjectKind::Shape => self.shapes.remove(&target.id).is_some(),
            ObjectKind::Path => self.paths.remove(&target.id).is_some(),
        }
    }

    // --- Queries ---

    /// Current origin of a draggable object.
    #[must_use]
    pub fn origin(&self, target: ObjectRef) -> Option<Point> {
        match target.kind {
            ObjectKind::Sticky => self.stickies.get(&target.id).map(|s| Point::new(s.x, s.y)),
            ObjectKind::Text => self.texts.get(&target.id).map(|t| Point::new(t.x, t.y)),
            ObjectKind::Shape | ObjectKind::Path => None,
        }
    }

    #[must_use]
    pub fn contains(&self, target: ObjectRef) -> bool {
        match target.kind {
            ObjectKind::Sticky => self.stickies.contains(&target.id),
            ObjectKind::Text => self.texts.contains(&target.id),
            ObjectKind::Shape => self.shapes.contains(&target.id),
            ObjectKind::Path => self.paths.contains(&target.id),
        }
    }

    #[must_use]
    pub fn sticky(&self, id: &ObjectId) -> Option<&StickyNote> {
        self.stickies.get(id)
    }

    #[must_use]
    pub fn text(&self, id: &ObjectId) -> Option<&TextObject> {
        self.texts.get(id)
    }

    #[must_use]
    pub fn shape(&self, id: &ObjectId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    #[must_use]
    pub fn path(&self, id: &ObjectId) -> Option<&DrawPath> {
        self.paths.get(id)
    }

    #[must_use]
    pub fn message(&self, id: &ObjectId) -> Option<&ChatMessage> {
        self.messages.get(id)
    }

    #[must_use]
    pub fn stickies(&self) -> &Collection<StickyNote> {
        &self.stickies
    }

    #[must_use]
    pub fn texts(&self) -> &Collection<TextObject> {
        &self.texts
    }

    #[must_use]
    pub fn shapes(&self) -> &Collection<Shape> {
        &self.shapes
    }

    #[must_use]
    pub fn paths(&self) -> &Collection<DrawPath> {
        &self.paths
    }

    #[must_use]
    pub fn messages(&self) -> &Collection<ChatMessage> {
        &self.messages
    }

    /// Returns `true` if nothing has been placed on the canvas. Chat does
    /// not count.
    #[must_use]
    pub fn canvas_is_empty(&self) -> bool {
        self.stickies.is_empty() && self.texts.is_empty() && self.shapes.is_empty() && self.paths.is_empty()
    }
}
