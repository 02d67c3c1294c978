#![allow(clippy::float_cmp)]

use super::*;
use crate::doc::{ElementDetail, ElementDraft, PlantDetail};
use crate::geom::{Rect, Size};
use crate::session::SessionState;

// =============================================================
// Helpers
// =============================================================

fn booth(ed: &mut EditorCore, number: &str, x: f64, y: f64) -> ElementId {
    ed.doc.add(ElementDraft::booth(number, Rect::new(x, y, 100.0, 100.0))).unwrap().id
}

fn two_booths() -> (EditorCore, ElementId, ElementId) {
    let mut ed = EditorCore::new();
    let a = booth(&mut ed, "A1", 100.0, 100.0);
    let b = booth(&mut ed, "A2", 400.0, 100.0);
    ed.doc.deselect_all();
    (ed, a, b)
}

// =============================================================
// Selection clicks
// =============================================================

#[test]
fn click_selects_element_under_point() {
    let (mut ed, a, _) = two_booths();
    assert_eq!(ed.click(Point::new(150.0, 150.0), false), ClickOutcome::Selected(a.clone()));
    assert_eq!(ed.selection(), vec![a]);
}

#[test]
fn additive_click_toggles_membership() {
    let (mut ed, a, b) = two_booths();
    ed.click(Point::new(150.0, 150.0), false);
    assert_eq!(ed.click(Point::new(450.0, 150.0), true), ClickOutcome::Toggled(b.clone()));
    assert_eq!(ed.selection().len(), 2);
    ed.click(Point::new(150.0, 150.0), true);
    assert_eq!(ed.selection(), vec![b]);
    assert!(!ed.doc.get(&a).unwrap().selected);
}

#[test]
fn click_on_empty_canvas_deselects() {
    let (mut ed, _, _) = two_booths();
    ed.click(Point::new(150.0, 150.0), false);
    assert_eq!(ed.click(Point::new(1000.0, 1000.0), false), ClickOutcome::Deselected);
    assert!(ed.selection().is_empty());
    assert_eq!(ed.click(Point::new(1000.0, 1000.0), true), ClickOutcome::Ignored);
}

#[test]
fn click_honours_viewport() {
    let (mut ed, a, _) = two_booths();
    ed.viewport = Viewport { offset_x: 100.0, offset_y: 0.0, zoom: 0.5 };
    // canvas (150, 150) -> screen (175, 75)
    assert_eq!(ed.click(Point::new(175.0, 75.0), false), ClickOutcome::Selected(a));
}

// =============================================================
// Path mode
// =============================================================

#[test]
fn path_mode_clicks_build_a_route() {
    let (mut ed, a, b) = two_booths();
    ed.toggle_path_mode();
    assert_eq!(ed.click(Point::new(150.0, 150.0), false), ClickOutcome::Routed { id: a, accepted: true });
    assert_eq!(ed.click(Point::new(450.0, 150.0), false), ClickOutcome::Routed { id: b, accepted: true });
    assert_eq!(ed.route.state(), SessionState::Resolved);
    assert!(!ed.path_points().is_empty());
    assert!(ed.selection().is_empty());
}

#[test]
fn path_mode_ignores_clicks_off_booths() {
    let (mut ed, _, _) = two_booths();
    ed.doc.add(ElementDraft::new(ElementDetail::Plant(PlantDetail::default()), Rect::new(800.0, 800.0, 40.0, 40.0)));
    ed.toggle_path_mode();
    assert_eq!(ed.click(Point::new(820.0, 820.0), false), ClickOutcome::Ignored);
    assert_eq!(ed.route.state(), SessionState::AwaitingStart);
}

#[test]
fn deleting_route_booth_clears_route() {
    let (mut ed, a, b) = two_booths();
    ed.toggle_path_mode();
    ed.click(Point::new(150.0, 150.0), false);
    ed.click(Point::new(450.0, 150.0), false);

    ed.doc.select(std::slice::from_ref(&a));
    assert_eq!(ed.delete_selected(), 1);
    assert_eq!(ed.route.start_element_id(), None);
    assert_eq!(ed.route.end_element_id(), Some(b.as_str()));
    assert!(ed.path_points().is_empty());
}

#[test]
fn moving_a_booth_refreshes_route() {
    let (mut ed, a, b) = two_booths();
    ed.toggle_path_mode();
    ed.route.element_picked(&ed.doc, &a);
    ed.route.element_picked(&ed.doc, &b);
    let before = ed.route.path_length();

    assert!(ed.update(&b, &ElementPatch::position(900.0, 100.0)));
    assert!(ed.route.path_length() > before);

    assert!(ed.undo());
    assert!((ed.route.path_length() - before).abs() < 1e-9);
    assert!(ed.redo());
    assert!(ed.route.path_length() > before);
}

#[test]
fn load_ends_route_session() {
    let (mut ed, a, b) = two_booths();
    ed.toggle_path_mode();
    ed.route.element_picked(&ed.doc, &a);
    ed.route.element_picked(&ed.doc, &b);

    ed.load(FloorPlan { canvas_size: Size::new(800.0, 600.0), grid_size: 10.0, ..FloorPlan::default() });
    assert_eq!(ed.route.state(), SessionState::Idle);
    assert!(ed.doc.is_empty());
    assert_eq!(ed.route_cell_size(), 10.0);
}

#[test]
fn explicit_cell_size_overrides_grid() {
    let ed = EditorCore::with_config(RouteConfig { cell_size: Some(5.0), ..RouteConfig::default() }, 10);
    assert_eq!(ed.route_cell_size(), 5.0);
}
