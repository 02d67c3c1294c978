//! A* search over a walkability grid.
//!
//! Orthogonal steps cost 1 and diagonal steps cost √2, with the octile
//! distance as heuristic. A diagonal step is allowed only when both cells it
//! squeezes between are walkable, so routes never clip an obstacle corner.
//! "No route" is an ordinary outcome and comes back as an empty path.

#[cfg(test)]
#[path = "path_test.rs"]
mod path_test;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::consts::DIAGONAL_COST;
use crate::geom::Point;
use crate::grid::{Cell, Grid};

/// Neighbor offsets, orthogonal first so equal-cost ties prefer straight moves.
const STEPS: [(i64, i64); 8] = [(0, -1), (1, 0), (0, 1), (-1, 0), (1, -1), (1, 1), (-1, 1), (-1, -1)];

/// Frontier entry. Ordered so that `BinaryHeap` pops the lowest `f`, then the
/// lowest `h`, then the earliest pushed.
#[derive(Debug, Clone, Copy)]
struct Open {
    f: f64,
    h: f64,
    g: f64,
    seq: u64,
    cell: Cell,
}

impl Ord for Open {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Open {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Open {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Open {}

#[allow(clippy::cast_precision_loss)]
fn octile(a: Cell, b: Cell) -> f64 {
    let dx = (a.col - b.col).abs() as f64;
    let dy = (a.row - b.row).abs() as f64;
    dx.max(dy) + (DIAGONAL_COST - 1.0) * dx.min(dy)
}

/// Walkable neighbors of `cell` with their step cost.
fn neighbors(grid: &Grid, cell: Cell) -> impl Iterator<Item = (Cell, f64)> + '_ {
    STEPS.iter().filter_map(move |&(dc, dr)| {
        let next = Cell::new(cell.col + dc, cell.row + dr);
        if !grid.is_walkable(next) {
            return None;
        }
        if dc != 0 && dr != 0 {
            let flank_a = Cell::new(cell.col + dc, cell.row);
            let flank_b = Cell::new(cell.col, cell.row + dr);
            if !grid.is_walkable(flank_a) || !grid.is_walkable(flank_b) {
                return None;
            }
            return Some((next, DIAGONAL_COST));
        }
        Some((next, 1.0))
    })
}

/// Shortest walkable route from `start` to `end`, both inclusive.
///
/// Out-of-bounds endpoints are clamped into the grid first. Returns an empty
/// path when the grid is empty, when both endpoints land in the same cell,
/// when either endpoint is blocked, or when no route exists.
#[must_use]
pub fn find_path(grid: &Grid, start: Cell, end: Cell) -> Vec<Cell> {
    let (Some(start), Some(end)) = (grid.clamp(start), grid.clamp(end)) else {
        debug!("route requested on an empty grid");
        return Vec::new();
    };
    if start == end {
        return Vec::new();
    }
    if !grid.is_walkable(start) || !grid.is_walkable(end) {
        debug!(?start, ?end, "route endpoint is blocked");
        return Vec::new();
    }

    let mut open = BinaryHeap::new();
    let mut best: HashMap<Cell, f64> = HashMap::new();
    let mut parent: HashMap<Cell, Cell> = HashMap::new();
    let mut seq = 0u64;

    best.insert(start, 0.0);
    let h = octile(start, end);
    open.push(Open { f: h, h, g: 0.0, seq, cell: start });

    while let Some(Open { cell, g, .. }) = open.pop() {
        if cell == end {
            return unwind(&parent, start, end);
        }
        // Stale entry: a cheaper route to this cell was queued later.
        if best.get(&cell).is_some_and(|&known| known < g) {
            continue;
        }
        for (next, cost) in neighbors(grid, cell) {
            let tentative = g + cost;
            if best.get(&next).is_some_and(|&known| known <= tentative) {
                continue;
            }
            best.insert(next, tentative);
            parent.insert(next, cell);
            seq += 1;
            let h = octile(next, end);
            open.push(Open { f: tentative + h, h, g: tentative, seq, cell: next });
        }
    }

    debug!(?start, ?end, "no route");
    Vec::new()
}

fn unwind(parent: &HashMap<Cell, Cell>, start: Cell, end: Cell) -> Vec<Cell> {
    let mut path = vec![end];
    let mut cursor = end;
    while cursor != start {
        let Some(&prev) = parent.get(&cursor) else {
            return Vec::new();
        };
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}

/// Canvas-space centers of `cells`.
#[must_use]
pub fn cells_to_points(grid: &Grid, cells: &[Cell]) -> Vec<Point> {
    cells.iter().map(|&c| grid.cell_center(c)).collect()
}

/// Flatten points into an alternating `x, y, x, y, ...` sequence.
#[must_use]
pub fn flatten_points(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

/// Total Euclidean length of a polyline.
#[must_use]
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
