use tracing::debug;

use crate::doc::{DocStore, ElementId, ElementPatch, FloorPlan};
use crate::geom::{Point, Viewport};
use crate::hit::{booth_at_screen, element_at_screen};
use crate::session::{PathController, RouteConfig};

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Path mode: the booth was offered to the route session.
    Routed { id: ElementId, accepted: bool },
    /// The element became the only selection.
    Selected(ElementId),
    /// The element was added to or removed from the selection.
    Toggled(ElementId),
    /// Clicked empty canvas; selection cleared.
    Deselected,
    /// Nothing happened.
    Ignored,
}

/// Document, route session and viewport wired together.
///
/// Host-independent: the embedding UI forwards clicks and commands here and
/// reads the results back.
#[derive(Debug, Default)]
pub struct EditorCore {
    pub doc: DocStore,
    pub route: PathController,
    pub viewport: Viewport,
}

impl EditorCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(route: RouteConfig, history_depth: usize) -> Self {
        Self { doc: DocStore::with_history_depth(history_depth), route: PathController::new(route), viewport: Viewport::default() }
    }

    // --- Input ---

    /// Handle a click at `screen_pt`. `additive` is the shift/ctrl modifier.
    pub fn click(&mut self, screen_pt: Point, additive: bool) -> ClickOutcome {
        if self.route.path_mode_enabled() {
            let Some(id) = booth_at_screen(&self.doc, &self.viewport, screen_pt).map(|e| e.id.clone()) else {
                debug!(?screen_pt, "path mode click missed every booth");
                return ClickOutcome::Ignored;
            };
            let accepted = self.route.element_picked(&self.doc, &id);
            return ClickOutcome::Routed { id, accepted };
        }

        let hit = element_at_screen(&self.doc, &self.viewport, screen_pt).map(|e| e.id.clone());
        match (hit, additive) {
            (Some(id), false) => {
                self.doc.select(std::slice::from_ref(&id));
                ClickOutcome::Selected(id)
            }
            (Some(id), true) => {
                let mut selection = self.doc.selection();
                if let Some(pos) = selection.iter().position(|s| *s == id) {
                    selection.remove(pos);
                } else {
                    selection.push(id.clone());
                }
                self.doc.select(&selection);
                ClickOutcome::Toggled(id)
            }
            (None, false) => {
                self.doc.deselect_all();
                ClickOutcome::Deselected
            }
            (None, true) => ClickOutcome::Ignored,
        }
    }

    pub fn toggle_path_mode(&mut self) {
        self.route.toggle_mode();
    }

    // --- Document commands ---

    /// Replace the document and end any route session.
    pub fn load(&mut self, plan: FloorPlan) {
        self.doc.load(plan);
        self.route = PathController::new(self.route.config());
    }

    /// Patch an element and refresh a resolved route.
    pub fn update(&mut self, id: &str, patch: &ElementPatch) -> bool {
        let changed = self.doc.update(id, patch);
        if changed {
            self.route.recompute(&self.doc);
        }
        changed
    }

    /// Delete elements, dropping any route endpoint among them.
    pub fn delete(&mut self, ids: &[ElementId]) -> usize {
        let removed = self.doc.delete(ids);
        if removed > 0 {
            self.route.forget_elements(ids);
            self.route.recompute(&self.doc);
        }
        removed
    }

    pub fn delete_selected(&mut self) -> usize {
        let selection = self.doc.selection();
        self.delete(&selection)
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.doc.undo();
        if changed {
            self.route.recompute(&self.doc);
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.doc.redo();
        if changed {
            self.route.recompute(&self.doc);
        }
        changed
    }

    // --- Queries ---

    /// Cell size the next route computation will use.
    #[must_use]
    pub fn route_cell_size(&self) -> f64 {
        self.route.config().cell_size.unwrap_or_else(|| self.doc.grid_size())
    }

    #[must_use]
    pub fn selection(&self) -> Vec<ElementId> {
        self.doc.selection()
    }

    /// Current route as a flat `x, y, ...` list.
    #[must_use]
    pub fn path_points(&self) -> Vec<f64> {
        self.route.path_points()
    }
}
