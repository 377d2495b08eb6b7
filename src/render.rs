//! Rendering boundary: the snapshot handed to the presentation layer and the
//! SVG markup for the drawing layer.
//!
//! Stickies and text are positioned boxes the host lays out itself; ink and
//! shapes share one SVG layer underneath them. `svg_layer` emits that layer
//! in draw order: every path, then every shape.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::Serialize;

use crate::consts::{RECT_CORNER_RADIUS, SHAPE_STROKE, SHAPE_STROKE_WIDTH};
use crate::doc::{ChatMessage, DrawPath, ObjectRef, Shape, ShapeKind, StickyNote, TextObject};
use crate::engine::{BoardCore, ReportState};
use crate::input::Tool;

/// Everything the presentation layer needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub stickies: Vec<StickyNote>,
    pub shapes: Vec<Shape>,
    pub texts: Vec<TextObject>,
    pub paths: Vec<DrawPath>,
    pub messages: Vec<ChatMessage>,
    pub tool: Tool,
    pub tool_label: &'static str,
    /// CSS cursor for the canvas.
    pub cursor: &'static str,
    pub default_font_size: u32,
    pub editing: Option<ObjectRef>,
    /// Seconds left on the jam timer, if running.
    pub timer: Option<u32>,
    pub report: ReportState,
    pub report_open: bool,
    /// Canvas has nothing on it; the host shows its "Start jamming!" hint.
    pub show_empty_hint: bool,
}

impl BoardSnapshot {
    #[must_use]
    pub fn capture(core: &BoardCore) -> Self {
        let doc = &core.doc;
        Self {
            stickies: doc.stickies().as_slice().to_vec(),
            shapes: doc.shapes().as_slice().to_vec(),
            texts: doc.texts().as_slice().to_vec(),
            paths: doc.paths().as_slice().to_vec(),
            messages: doc.messages().as_slice().to_vec(),
            tool: core.ui.tool,
            tool_label: core.ui.tool.label(),
            cursor: core.ui.tool.cursor(),
            default_font_size: core.ui.default_font_size,
            editing: core.ui.editing,
            timer: core.timer.remaining(),
            report: core.ui.report.clone(),
            report_open: core.ui.report_open,
            show_empty_hint: doc.canvas_is_empty(),
        }
    }
}

/// `points` attribute for an SVG polyline: `x,y` pairs separated by spaces.
#[must_use]
pub fn polyline_points(path: &DrawPath) -> String {
    path.points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One `<polyline>` element for an ink stroke.
#[must_use]
pub fn path_element(path: &DrawPath) -> String {
    format!(
        r#"<polyline points="{}" stroke="{}" stroke-width="{}" stroke-opacity="{}" fill="none" stroke-linecap="round" stroke-linejoin="round"/>"#,
        polyline_points(path),
        escape_attr(&path.color),
        path.width,
        path.opacity,
    )
}

/// One `<rect>` or `<ellipse>` element for a wireframe shape.
#[must_use]
pub fn shape_element(shape: &Shape) -> String {
    match shape.kind {
        ShapeKind::Rect => format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{SHAPE_STROKE}" stroke-width="{SHAPE_STROKE_WIDTH}" stroke-linecap="round" rx="{RECT_CORNER_RADIUS}"/>"#,
            shape.x,
            shape.y,
            shape.width,
            shape.height,
            escape_attr(&shape.color),
        ),
        ShapeKind::Circle => {
            let c = shape.bounds().center();
            format!(
                r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{}" stroke="{SHAPE_STROKE}" stroke-width="{SHAPE_STROKE_WIDTH}"/>"#,
                c.x,
                c.y,
                shape.width / 2.0,
                shape.height / 2.0,
                escape_attr(&shape.color),
            )
        }
    }
}

/// The whole drawing layer as one `<svg>` element.
#[must_use]
pub fn svg_layer(snapshot: &BoardSnapshot) -> String {
    let mut out = String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%">"#);
    for path in &snapshot.paths {
        out.push_str(&path_element(path));
    }
    for shape in &snapshot.shapes {
        out.push_str(&shape_element(shape));
    }
    out.push_str("</svg>");
    out
}

fn escape_attr(raw: &str) -> String {
    raw.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}
