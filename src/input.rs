//! Input model: tools, the per-tool metadata table, and the pointer session.
//!
//! `Tool` is the user's selected intent. What a tool does on press is looked
//! up in a static `ToolSpec` table rather than special-cased in the engine,
//! so adding a tool means adding a row. `Session` is the single gesture
//! tracked between pointer-down and pointer-up; it carries only ids and
//! anchor geometry, never copies of object data.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::{HIGHLIGHTER_INK, InkStyle, MARKER_INK, PEN_INK};
use crate::doc::{ObjectId, ObjectRef, ShapeKind};
use crate::geom::Point;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tool {
    /// Pointer / selection tool (default).
    #[default]
    Select,
    Sticky,
    Text,
    Pen,
    Marker,
    Highlighter,
    Rectangle,
    Circle,
    Eraser,
}

/// What a press on empty canvas does with a given tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PressBehavior {
    /// Presses on items start a drag; presses on empty canvas do nothing.
    Select,
    /// Drop a new sticky note.
    PlaceSticky,
    /// Drop a new text object and start editing it.
    PlaceText,
    /// Start a freehand stroke with this style.
    Ink(InkStyle),
    /// Start sizing a new shape from the press point.
    Shape(ShapeKind),
    /// Remove ink and shapes under the pointer.
    Erase,
}

/// Static metadata for one tool.
#[derive(Debug, Clone, Copy)]
pub struct ToolSpec {
    pub tool: Tool,
    /// Toolbar label.
    pub label: &'static str,
    /// Reverts to `Select` right after one object is placed.
    pub one_shot: bool,
    /// Canvas shows a crosshair cursor while this tool is active.
    pub crosshair: bool,
    pub press: PressBehavior,
}

const TOOL_SPECS: [ToolSpec; 9] = [
    ToolSpec { tool: Tool::Select, label: "Select", one_shot: false, crosshair: false, press: PressBehavior::Select },
    ToolSpec {
        tool: Tool::Sticky,
        label: "Sticky",
        one_shot: true,
        crosshair: false,
        press: PressBehavior::PlaceSticky,
    },
    ToolSpec { tool: Tool::Text, label: "Text", one_shot: true, crosshair: true, press: PressBehavior::PlaceText },
    ToolSpec { tool: Tool::Pen, label: "Pen", one_shot: false, crosshair: true, press: PressBehavior::Ink(PEN_INK) },
    ToolSpec {
        tool: Tool::Marker,
        label: "Marker",
        one_shot: false,
        crosshair: true,
        press: PressBehavior::Ink(MARKER_INK),
    },
    ToolSpec {
        tool: Tool::Highlighter,
        label: "Highlight",
        one_shot: false,
        crosshair: true,
        press: PressBehavior::Ink(HIGHLIGHTER_INK),
    },
    ToolSpec {
        tool: Tool::Rectangle,
        label: "Rectangle",
        one_shot: false,
        crosshair: true,
        press: PressBehavior::Shape(ShapeKind::Rect),
    },
    ToolSpec {
        tool: Tool::Circle,
        label: "Circle",
        one_shot: false,
        crosshair: true,
        press: PressBehavior::Shape(ShapeKind::Circle),
    },
    ToolSpec { tool: Tool::Eraser, label: "Eraser", one_shot: false, crosshair: true, press: PressBehavior::Erase },
];

impl Tool {
    /// Every tool in toolbar order.
    pub const ALL: [Tool; 9] = [
        Tool::Select,
        Tool::Sticky,
        Tool::Text,
        Tool::Pen,
        Tool::Marker,
        Tool::Highlighter,
        Tool::Rectangle,
        Tool::Circle,
        Tool::Eraser,
    ];

    /// Metadata row for this tool.
    #[must_use]
    pub fn spec(self) -> &'static ToolSpec {
        // TOOL_SPECS is laid out in declaration order.
        &TOOL_SPECS[self as usize]
    }

    #[must_use]
    pub fn is_one_shot(self) -> bool {
        self.spec().one_shot
    }

    /// Toolbar label shown for this tool.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.spec().label
    }

    /// CSS cursor for the canvas while this tool is active.
    #[must_use]
    pub fn cursor(self) -> &'static str {
        if self.spec().crosshair { "crosshair" } else { "default" }
    }
}

/// The gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Session {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Moving an existing sticky or text object.
    Dragging {
        target: ObjectRef,
        /// Pointer position minus object origin at press time.
        offset: Point,
    },
    /// Appending points to a new ink stroke.
    DrawingPath { id: ObjectId },
    /// Sizing a new shape from the corner where the drag began.
    DrawingShape { id: ObjectId, anchor: Point },
    /// Sweeping the eraser across the canvas.
    Erasing,
}

impl Session {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}
