#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{DrawPath, ObjectKind, ObjectRef, ObjectStore, Shape, ShapeKind};
use crate::geom::{Point, segment_distance};

/// Find the topmost ink stroke or shape outline within `slop` of `pt`.
///
/// Shapes render above ink, and later objects above earlier ones, so shapes
/// are checked first, each collection back to front.
#[must_use]
pub fn hit_test_erasable(pt: Point, doc: &ObjectStore, slop: f64) -> Option<ObjectRef> {
    if let Some(shape) = doc.shapes().as_slice().iter().rev().find(|s| shape_hit(s, pt, slop)) {
        return Some(ObjectRef::new(ObjectKind::Shape, shape.id));
    }
    doc.paths()
        .as_slice()
        .iter()
        .rev()
        .find(|p| path_hit(p, pt, slop))
        .map(|p| ObjectRef::new(ObjectKind::Path, p.id))
}

/// Whether `pt` lies on the stroke of `path`, widened by `slop`.
#[must_use]
pub fn path_hit(path: &DrawPath, pt: Point, slop: f64) -> bool {
    let reach = path.width / 2.0 + slop;
    match path.points.as_slice() {
        [] => false,
        [only] => only.distance(pt) <= reach,
        points => points
            .windows(2)
            .any(|seg| segment_distance(pt, seg[0], seg[1]) <= reach),
    }
}

/// Whether `pt` lies on the outline of `shape`. Shapes are wireframes, so
/// the interior does not count.
#[must_use]
pub fn shape_hit(shape: &Shape, pt: Point, slop: f64) -> bool {
    let b = shape.bounds();
    if !b.contains_padded(pt, slop) {
        return false;
    }
    match shape.kind {
        ShapeKind::Rect => {
            let dx = (pt.x - b.x).abs().min((pt.x - (b.x + b.width)).abs());
            let dy = (pt.y - b.y).abs().min((pt.y - (b.y + b.height)).abs());
            dx <= slop || dy <= slop
        }
        ShapeKind::Circle => {
            let rx = b.width / 2.0;
            let ry = b.height / 2.0;
            if rx <= slop || ry <= slop {
                // Degenerate ellipse: the padded box is already a tight fit.
                return true;
            }
            let c = b.center();
            let nx = (pt.x - c.x) / rx;
            let ny = (pt.y - c.y) / ry;
            let radial = nx.hypot(ny);
            (radial - 1.0).abs() * rx.min(ry) <= slop
        }
    }
}
