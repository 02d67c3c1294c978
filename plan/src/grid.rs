//! Walkability grid and the rasterizer that builds it from element geometry.
//!
//! A grid covers the canvas with square cells of `cell_size` canvas units,
//! anchored at `origin`. Each element that is not excluded blocks every cell
//! its bounding box touches: on each axis the covered range is
//! `floor(start / cell) .. ceil(end / cell)`, clamped to the grid. Blocking is
//! monotonic; nothing ever un-blocks a cell. Grids are built fresh for every
//! route request and never cached.

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;

use std::collections::HashSet;

use crate::consts::DEFAULT_MAX_GRID_CELLS;
use crate::doc::Element;
use crate::geom::{Point, Rect, Size};

/// Integer cell coordinate. May lie outside a grid until clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub col: i64,
    pub row: i64,
}

impl Cell {
    #[must_use]
    pub fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    /// Cells that share an edge or a corner.
    #[must_use]
    pub fn is_adjacent(self, other: Cell) -> bool {
        let dc = (self.col - other.col).abs();
        let dr = (self.row - other.row).abs();
        dc <= 1 && dr <= 1 && (dc, dr) != (0, 0)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    #[error("cell size must be finite and positive, got {0}")]
    InvalidCellSize(f64),
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },
    #[error("grid of {rows}x{cols} cells exceeds the limit of {max}")]
    TooLarge { rows: f64, cols: f64, max: usize },
}

/// Row-major boolean walkability matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cell_size: f64,
    origin: Point,
    walkable: Vec<bool>,
}

impl Grid {
    /// All-walkable grid covering `canvas` with `rows = ceil(height / cell)`
    /// and `cols = ceil(width / cell)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCellSize` for a non-positive or non-finite cell size,
    /// `InvalidCanvas` for a negative or non-finite canvas, and `TooLarge`
    /// when the cell count would exceed `max_cells`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn new(canvas: Size, cell_size: f64, max_cells: usize) -> Result<Self, GridError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidCellSize(cell_size));
        }
        if !canvas.is_valid() {
            return Err(GridError::InvalidCanvas { width: canvas.width, height: canvas.height });
        }
        let rows = (canvas.height / cell_size).ceil();
        let cols = (canvas.width / cell_size).ceil();
        if rows * cols > max_cells as f64 {
            return Err(GridError::TooLarge { rows, cols, max: max_cells });
        }
        let (rows, cols) = (rows as usize, cols as usize);
        Ok(Self { rows, cols, cell_size, origin: Point::new(0.0, 0.0), walkable: vec![true; rows * cols] })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Canvas-space position of the top-left corner of cell (0, 0).
    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// A grid with no cells (zero-size canvas).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.walkable.is_empty()
    }

    #[must_use]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    /// Out-of-bounds cells are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.walkable[i])
    }

    /// Set a cell's walkability. Out-of-bounds cells are ignored.
    pub fn set_walkable(&mut self, cell: Cell, walkable: bool) {
        if let Some(i) = self.index(cell) {
            self.walkable[i] = walkable;
        }
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|w| **w).count()
    }

    /// Nearest in-bounds cell, or `None` for an empty grid.
    #[must_use]
    pub fn clamp(&self, cell: Cell) -> Option<Cell> {
        if self.is_empty() {
            return None;
        }
        #[allow(clippy::cast_possible_wrap)]
        let (max_col, max_row) = (self.cols as i64 - 1, self.rows as i64 - 1);
        Some(Cell::new(cell.col.clamp(0, max_col), cell.row.clamp(0, max_row)))
    }

    /// Cell containing `pt`. May be out of bounds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at(&self, pt: Point) -> Cell {
        Cell::new(
            ((pt.x - self.origin.x) / self.cell_size).floor() as i64,
            ((pt.y - self.origin.y) / self.cell_size).floor() as i64,
        )
    }

    /// Canvas-space center of `cell`: `index * cell_size + cell_size / 2`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_center(&self, cell: Cell) -> Point {
        let half = self.cell_size / 2.0;
        Point::new(
            self.origin.x + cell.col as f64 * self.cell_size + half,
            self.origin.y + cell.row as f64 * self.cell_size + half,
        )
    }

    /// Canvas-space square covered by `cell`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cell_rect(&self, cell: Cell) -> Rect {
        Rect::new(
            self.origin.x + cell.col as f64 * self.cell_size,
            self.origin.y + cell.row as f64 * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Mark every cell touched by `rect` as blocked.
    pub fn block_rect(&mut self, rect: Rect) {
        let (c0, c1) = self.span(rect.x - self.origin.x, rect.right() - self.origin.x, self.cols);
        let (r0, r1) = self.span(rect.y - self.origin.y, rect.bottom() - self.origin.y, self.rows);
        for row in r0..r1 {
            let base = row * self.cols;
            self.walkable[base + c0..base + c1].fill(false);
        }
    }

    /// Covered index range `[floor(lo / cell), ceil(hi / cell))`, clamped to `0..=n`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn span(&self, lo: f64, hi: f64, n: usize) -> (usize, usize) {
        let limit = n as f64;
        let start = (lo / self.cell_size).floor().clamp(0.0, limit) as usize;
        let end = (hi / self.cell_size).ceil().clamp(0.0, limit) as usize;
        (start, end.max(start))
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let (Ok(col), Ok(row)) = (usize::try_from(cell.col), usize::try_from(cell.row)) else {
            return None;
        };
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }
}

/// Build a walkability grid over `canvas`, blocking every element whose id
/// is not in `exclude`.
///
/// # Errors
///
/// See [`Grid::new`].
pub fn rasterize(elements: &[Element], canvas: Size, cell_size: f64, exclude: &HashSet<&str>) -> Result<Grid, GridError> {
    rasterize_with_limit(elements, canvas, cell_size, exclude, DEFAULT_MAX_GRID_CELLS)
}

/// [`rasterize`] with an explicit cap on the number of cells.
///
/// # Errors
///
/// See [`Grid::new`].
pub fn rasterize_with_limit(
    elements: &[Element],
    canvas: Size,
    cell_size: f64,
    exclude: &HashSet<&str>,
    max_cells: usize,
) -> Result<Grid, GridError> {
    let mut grid = Grid::new(canvas, cell_size, max_cells)?;
    for element in elements.iter().filter(|e| !exclude.contains(e.id.as_str())) {
        grid.block_rect(element.bounds());
    }
    Ok(grid)
}
