//! Shared constants for the board core.

// ── Placement ───────────────────────────────────────────────────

/// Offset subtracted from the press point so a new sticky sits roughly
/// centered under the pointer.
pub const STICKY_PLACEMENT_OFFSET: f64 = 100.0;

/// Default ink color for new text objects.
pub const DEFAULT_TEXT_COLOR: &str = "#1f2937";

/// Fill for newly drawn shapes (wireframe).
pub const DEFAULT_SHAPE_COLOR: &str = "transparent";

// ── Fonts ───────────────────────────────────────────────────────

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 128;
pub const DEFAULT_FONT_SIZE: u32 = 24;

// ── Ink ─────────────────────────────────────────────────────────

/// Stroke color, width and opacity for a freehand ink tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkStyle {
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
}

pub const PEN_INK: InkStyle = InkStyle { color: "#1e293b", width: 3.0, opacity: 1.0 };
pub const MARKER_INK: InkStyle = InkStyle { color: "#334155", width: 8.0, opacity: 1.0 };
pub const HIGHLIGHTER_INK: InkStyle = InkStyle { color: "#facc15", width: 24.0, opacity: 0.4 };

// ── Shapes (render) ─────────────────────────────────────────────

pub const SHAPE_STROKE: &str = "#334155";
pub const SHAPE_STROKE_WIDTH: f64 = 3.0;
pub const RECT_CORNER_RADIUS: f64 = 4.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Extra slop in pixels around ink and shape outlines for the eraser.
pub const ERASER_SLOP_PX: f64 = 6.0;

// ── Timer ───────────────────────────────────────────────────────

/// Length of one timed jam round in seconds.
pub const TIMER_DURATION_SECS: u32 = 5 * 60;

// ── Chat / AI ───────────────────────────────────────────────────

/// Id of the local participant in the static roster.
pub const LOCAL_USER_ID: &str = "me";

/// Author id used for messages the board itself posts.
pub const SYSTEM_AUTHOR: &str = "system";

pub const ICEBREAKER_PLACEHOLDER: &str = "🧊 Breaking the ice...";
pub const ICEBREAKER_PREFIX: &str = "🧊 Icebreaker: ";
pub const ICEBREAKER_FAILED_PREFIX: &str = "🧊 Icebreaker unavailable: ";

pub const DEFAULT_REPORT_TOPIC: &str = "Design Sprint Q1";
