#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{DocStore, Element};
use crate::geom::{Point, Viewport};

/// Topmost element whose bounding box contains `pt` (canvas coordinates).
/// Edges count as inside. Among equal layers the later insertion wins.
#[must_use]
pub fn element_at(doc: &DocStore, pt: Point) -> Option<&Element> {
    doc.sorted_elements().into_iter().rev().find(|e| e.bounds().contains(pt))
}

/// First booth, in insertion order, whose bounding box contains `pt`.
#[must_use]
pub fn booth_at(doc: &DocStore, pt: Point) -> Option<&Element> {
    doc.booths().map(|(e, _)| e).find(|e| e.bounds().contains(pt))
}

/// [`element_at`] for a point in screen coordinates.
#[must_use]
pub fn element_at_screen<'d>(doc: &'d DocStore, viewport: &Viewport, screen_pt: Point) -> Option<&'d Element> {
    element_at(doc, viewport.screen_to_canvas(screen_pt))
}

/// [`booth_at`] for a point in screen coordinates.
#[must_use]
pub fn booth_at_screen<'d>(doc: &'d DocStore, viewport: &Viewport, screen_pt: Point) -> Option<&'d Element> {
    booth_at(doc, viewport.screen_to_canvas(screen_pt))
}
