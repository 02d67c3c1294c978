//! Route session: pick two booths, compute the walking route between them.
//!
//! The controller is a small state machine driven by two inputs:
//! `toggle_mode` and `element_picked`. The document is passed in on each call
//! that needs geometry; the controller never holds on to it.
//!
//! ```text
//! Idle ──toggle──▶ AwaitingStart ──pick booth──▶ AwaitingEnd ──pick booth──▶ Resolved
//!  ▲                                                  ▲                        │
//!  └──────────── toggle (from any state) ─────────────┼──── pick booth ────────┘
//! ```
//!
//! Picks that do not resolve to a booth are ignored. Computation failures
//! (missing booth, bad cell size) are logged and leave an empty polyline.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::consts::DEFAULT_MAX_GRID_CELLS;
use crate::doc::{DocStore, Element, ElementId};
use crate::error::PlanError;
use crate::geom::Point;
use crate::grid::{GridError, rasterize_with_limit};
use crate::path::{cells_to_points, find_path, flatten_points, polyline_length};

/// Where the session is in the pick sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Path mode is off.
    #[default]
    Idle,
    /// Path mode is on; waiting for the first booth.
    AwaitingStart,
    /// Start booth chosen; waiting for the destination.
    AwaitingEnd,
    /// Both booths chosen and a route computed (possibly empty).
    Resolved,
}

/// The two endpoints and the last computed route.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathSession {
    pub state: SessionState,
    pub start: Option<ElementId>,
    pub end: Option<ElementId>,
    /// Route in canvas coordinates, one point per grid cell.
    pub polyline: Vec<Point>,
}

/// Routing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteConfig {
    /// Grid cell size. `None` follows the document's grid spacing.
    pub cell_size: Option<f64>,
    /// Refuse to rasterize grids with more cells than this.
    pub max_cells: usize,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { cell_size: None, max_cells: DEFAULT_MAX_GRID_CELLS }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("no {0} booth selected")]
    MissingEndpoint(&'static str),
    #[error(transparent)]
    Plan(#[from] PlanError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Owns the route session and reacts to picks.
#[derive(Debug, Default)]
pub struct PathController {
    session: PathSession,
    config: RouteConfig,
}

impl PathController {
    #[must_use]
    pub fn new(config: RouteConfig) -> Self {
        Self { session: PathSession::default(), config }
    }

    // --- Inputs ---

    /// Enter path mode from `Idle`; from any other state leave it, clearing
    /// both endpoints and the route.
    pub fn toggle_mode(&mut self) {
        if self.session.state == SessionState::Idle {
            self.session.state = SessionState::AwaitingStart;
        } else {
            self.session = PathSession::default();
        }
        debug!(state = ?self.session.state, "path mode toggled");
    }

    /// React to a click on element `id`. Returns `true` if the session moved.
    pub fn element_picked(&mut self, doc: &DocStore, id: &str) -> bool {
        if self.session.state == SessionState::Idle {
            return false;
        }
        if !is_booth(doc, id) {
            debug!(%id, "ignoring pick of non-booth element");
            return false;
        }
        match self.session.state {
            SessionState::Idle => return false,
            SessionState::AwaitingStart => {
                self.session.start = Some(id.to_owned());
                if self.session.end.is_some() {
                    self.compute(doc);
                } else {
                    self.session.state = SessionState::AwaitingEnd;
                }
            }
            SessionState::AwaitingEnd if self.session.start.is_none() => {
                self.session.start = Some(id.to_owned());
            }
            SessionState::AwaitingEnd => {
                self.session.end = Some(id.to_owned());
                self.compute(doc);
            }
            SessionState::Resolved => {
                self.session.start = Some(id.to_owned());
                self.session.end = None;
                self.session.polyline.clear();
                self.session.state = SessionState::AwaitingEnd;
            }
        }
        true
    }

    /// Choose the start booth directly. Computes immediately when the end is
    /// already known. Ignored outside path mode.
    pub fn set_start(&mut self, doc: &DocStore, id: &str) -> bool {
        if !self.accepts_direct_pick(doc, id) {
            return false;
        }
        self.session.start = Some(id.to_owned());
        if self.session.end.is_some() {
            self.compute(doc);
        } else {
            self.session.polyline.clear();
            self.session.state = SessionState::AwaitingEnd;
        }
        true
    }

    /// Choose the end booth directly. Computes immediately when the start is
    /// already known. Ignored outside path mode.
    pub fn set_end(&mut self, doc: &DocStore, id: &str) -> bool {
        if !self.accepts_direct_pick(doc, id) {
            return false;
        }
        self.session.end = Some(id.to_owned());
        if self.session.start.is_some() {
            self.compute(doc);
        } else {
            self.session.polyline.clear();
            self.session.state = SessionState::AwaitingStart;
        }
        true
    }

    fn accepts_direct_pick(&self, doc: &DocStore, id: &str) -> bool {
        if self.session.state == SessionState::Idle {
            debug!(%id, "path mode is off");
            return false;
        }
        if !is_booth(doc, id) {
            debug!(%id, "ignoring non-booth route endpoint");
            return false;
        }
        true
    }

    /// Drop both endpoints and the route, staying in path mode.
    pub fn clear_path(&mut self) {
        if self.session.state != SessionState::Idle {
            self.session = PathSession { state: SessionState::AwaitingStart, ..PathSession::default() };
        }
    }

    /// Recompute the route for the current endpoints, e.g. after the
    /// document changed. Only meaningful once resolved.
    pub fn recompute(&mut self, doc: &DocStore) -> bool {
        if self.session.state != SessionState::Resolved {
            return false;
        }
        self.compute(doc);
        !self.session.polyline.is_empty()
    }

    /// Forget endpoints that refer to deleted elements. The state is kept, so
    /// a resolved session recomputes to an empty route.
    pub fn forget_elements(&mut self, ids: &[ElementId]) {
        let gone = |slot: &Option<ElementId>| slot.as_ref().is_some_and(|id| ids.contains(id));
        let mut touched = false;
        if gone(&self.session.start) {
            self.session.start = None;
            touched = true;
        }
        if gone(&self.session.end) {
            self.session.end = None;
            touched = true;
        }
        if touched {
            self.session.polyline.clear();
            debug!(state = ?self.session.state, "route endpoint deleted");
        }
    }

    // --- Computation ---

    fn compute(&mut self, doc: &DocStore) {
        self.session.state = SessionState::Resolved;
        self.session.polyline = match self.route(doc) {
            Ok(points) => points,
            Err(e) => {
                warn!(error = %e, "route computation failed");
                Vec::new()
            }
        };
    }

    fn route(&self, doc: &DocStore) -> Result<Vec<Point>, RouteError> {
        let start_id = self.session.start.as_deref().ok_or(RouteError::MissingEndpoint("start"))?;
        let end_id = self.session.end.as_deref().ok_or(RouteError::MissingEndpoint("end"))?;
        let start = booth(doc, start_id)?;
        let end = booth(doc, end_id)?;

        let cell_size = self.config.cell_size.unwrap_or_else(|| doc.grid_size());
        let exclude: HashSet<&str> = [start_id, end_id].into_iter().collect();
        let mut grid = rasterize_with_limit(doc.elements(), doc.canvas_size(), cell_size, &exclude, self.config.max_cells)?;

        // Labels or logos drawn over a booth must not seal it in.
        let (from, to) = (grid.cell_at(start.center()), grid.cell_at(end.center()));
        let cells: Vec<_> = [from, to].into_iter().filter_map(|c| grid.clamp(c)).collect();
        for cell in cells {
            grid.set_walkable(cell, true);
        }

        let cells = find_path(&grid, from, to);
        if cells.is_empty() {
            debug!(start = %start_id, end = %end_id, "no walkable route between booths");
        }
        Ok(cells_to_points(&grid, &cells))
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session.state
    }

    #[must_use]
    pub fn session(&self) -> &PathSession {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> RouteConfig {
        self.config
    }

    #[must_use]
    pub fn path_mode_enabled(&self) -> bool {
        self.session.state != SessionState::Idle
    }

    #[must_use]
    pub fn start_element_id(&self) -> Option<&str> {
        self.session.start.as_deref()
    }

    #[must_use]
    pub fn end_element_id(&self) -> Option<&str> {
        self.session.end.as_deref()
    }

    /// The current route as canvas points.
    #[must_use]
    pub fn polyline(&self) -> &[Point] {
        &self.session.polyline
    }

    /// The current route as a flat `x, y, ...` list, empty when there is none.
    #[must_use]
    pub fn path_points(&self) -> Vec<f64> {
        flatten_points(&self.session.polyline)
    }

    /// Walking distance of the current route in canvas units.
    #[must_use]
    pub fn path_length(&self) -> f64 {
        polyline_length(&self.session.polyline)
    }
}

fn is_booth(doc: &DocStore, id: &str) -> bool {
    doc.get(id).is_some_and(Element::is_booth)
}

fn booth<'d>(doc: &'d DocStore, id: &str) -> Result<&'d Element, PlanError> {
    let element = doc.get(id).ok_or_else(|| PlanError::ElementNotFound(id.to_owned()))?;
    if element.is_booth() { Ok(element) } else { Err(PlanError::NotABooth(id.to_owned())) }
}
