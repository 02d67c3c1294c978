//! Shared numeric constants for the plan crate.

// ── Canvas ──────────────────────────────────────────────────────

/// Default canvas width in canvas units.
pub const DEFAULT_CANVAS_WIDTH: f64 = 2000.0;

/// Default canvas height in canvas units.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1500.0;

/// Default grid spacing; also the default routing cell size.
pub const DEFAULT_GRID_SIZE: f64 = 20.0;

/// Default opacity of the flooring layer.
pub const DEFAULT_FLOORING_OPACITY: f64 = 0.8;

// ── Editing ─────────────────────────────────────────────────────

/// Offset applied along both axes to duplicated elements.
pub const DUPLICATE_OFFSET: f64 = 20.0;

/// Number of undo snapshots retained before the oldest is dropped.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

// ── Routing ─────────────────────────────────────────────────────

/// Upper bound on `rows * cols` for a single rasterization.
pub const DEFAULT_MAX_GRID_CELLS: usize = 4_000_000;

/// Cost of a diagonal step relative to an orthogonal one.
pub const DIAGONAL_COST: f64 = std::f64::consts::SQRT_2;
