use super::*;
use crate::doc::{ElementDetail, ElementDraft, ElementId, TextDetail};
use crate::geom::Rect;

fn label(doc: &mut DocStore, rect: Rect, layer: i64) -> ElementId {
    let draft = ElementDraft::new(ElementDetail::Text(TextDetail::default()), rect).with_layer(layer);
    doc.add(draft).unwrap().id
}

fn booth(doc: &mut DocStore, number: &str, rect: Rect, layer: i64) -> ElementId {
    doc.add(ElementDraft::booth(number, rect).with_layer(layer)).unwrap().id
}

// =============================================================
// element_at
// =============================================================

#[test]
fn empty_doc_hits_nothing() {
    let doc = DocStore::new();
    assert!(element_at(&doc, Point::new(10.0, 10.0)).is_none());
}

#[test]
fn topmost_layer_wins() {
    let mut doc = DocStore::new();
    let high = label(&mut doc, Rect::new(0.0, 0.0, 100.0, 100.0), 5);
    let _low = booth(&mut doc, "A1", Rect::new(0.0, 0.0, 100.0, 100.0), 1);
    assert_eq!(element_at(&doc, Point::new(50.0, 50.0)).map(|e| e.id.clone()), Some(high));
}

#[test]
fn equal_layers_prefer_later_insertion() {
    let mut doc = DocStore::new();
    booth(&mut doc, "A1", Rect::new(0.0, 0.0, 100.0, 100.0), 0);
    let second = booth(&mut doc, "A2", Rect::new(50.0, 50.0, 100.0, 100.0), 0);
    assert_eq!(element_at(&doc, Point::new(75.0, 75.0)).map(|e| e.id.clone()), Some(second));
}

#[test]
fn edges_are_inclusive() {
    let mut doc = DocStore::new();
    let id = booth(&mut doc, "A1", Rect::new(10.0, 10.0, 20.0, 20.0), 0);
    assert_eq!(element_at(&doc, Point::new(30.0, 30.0)).map(|e| e.id.clone()), Some(id));
    assert!(element_at(&doc, Point::new(30.1, 30.0)).is_none());
}

// =============================================================
// booth_at
// =============================================================

#[test]
fn booth_at_skips_other_kinds() {
    let mut doc = DocStore::new();
    let b = booth(&mut doc, "A1", Rect::new(0.0, 0.0, 100.0, 100.0), 0);
    label(&mut doc, Rect::new(0.0, 0.0, 100.0, 100.0), 9);
    assert_eq!(booth_at(&doc, Point::new(50.0, 50.0)).map(|e| e.id.clone()), Some(b));
}

#[test]
fn booth_at_uses_insertion_order() {
    let mut doc = DocStore::new();
    let first = booth(&mut doc, "A1", Rect::new(0.0, 0.0, 100.0, 100.0), 0);
    booth(&mut doc, "A2", Rect::new(0.0, 0.0, 100.0, 100.0), 7);
    assert_eq!(booth_at(&doc, Point::new(10.0, 10.0)).map(|e| e.id.clone()), Some(first));
}

// =============================================================
// Screen variants
// =============================================================

#[test]
fn screen_point_is_converted_through_viewport() {
    let mut doc = DocStore::new();
    let id = booth(&mut doc, "A1", Rect::new(100.0, 100.0, 100.0, 100.0), 0);
    let viewport = Viewport { offset_x: 50.0, offset_y: -20.0, zoom: 2.0 };
    // canvas (150, 150) -> screen (350, 280)
    let screen = Point::new(350.0, 280.0);
    assert_eq!(booth_at_screen(&doc, &viewport, screen).map(|e| e.id.clone()), Some(id.clone()));
    assert_eq!(element_at_screen(&doc, &viewport, screen).map(|e| e.id.clone()), Some(id));
    assert!(booth_at_screen(&doc, &viewport, Point::new(150.0, 150.0)).is_none());
}
