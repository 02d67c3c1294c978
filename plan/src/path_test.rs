#![allow(clippy::float_cmp)]

use std::collections::{HashSet, VecDeque};

use super::*;
use crate::geom::Size;

const EPSILON: f64 = 1e-9;

fn open_grid(cols: usize, rows: usize) -> Grid {
    #[allow(clippy::cast_precision_loss)]
    let canvas = Size::new(cols as f64 * 10.0, rows as f64 * 10.0);
    Grid::new(canvas, 10.0, usize::MAX).unwrap()
}

/// Build a grid from an ASCII map: `#` blocked, anything else walkable.
fn grid_from(map: &[&str]) -> Grid {
    let mut g = open_grid(map[0].len(), map.len());
    for (row, line) in map.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            if ch == '#' {
                g.set_walkable(Cell::new(col as i64, row as i64), false);
            }
        }
    }
    g
}

fn cost(path: &[Cell]) -> f64 {
    path.windows(2)
        .map(|w| if w[0].col != w[1].col && w[0].row != w[1].row { DIAGONAL_COST } else { 1.0 })
        .sum()
}

fn assert_valid(grid: &Grid, path: &[Cell]) {
    for cell in path {
        assert!(grid.is_walkable(*cell), "path crosses blocked cell {cell:?}");
    }
    for w in path.windows(2) {
        assert!(w[0].is_adjacent(w[1]), "non-adjacent step {:?} -> {:?}", w[0], w[1]);
        let (dc, dr) = (w[1].col - w[0].col, w[1].row - w[0].row);
        if dc != 0 && dr != 0 {
            assert!(grid.is_walkable(Cell::new(w[0].col + dc, w[0].row)), "corner cut at {:?}", w[0]);
            assert!(grid.is_walkable(Cell::new(w[0].col, w[0].row + dr)), "corner cut at {:?}", w[0]);
        }
    }
}

/// Breadth-first reachability under the same movement rules.
fn reachable(grid: &Grid, start: Cell, end: Cell) -> bool {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(cell) = queue.pop_front() {
        if cell == end {
            return true;
        }
        for (next, _) in neighbors(grid, cell) {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    false
}

/// Small deterministic xorshift so property checks need no extra crates.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

// --- basic routes ---

#[test]
fn straight_line_on_open_grid() {
    let g = open_grid(10, 3);
    let path = find_path(&g, Cell::new(0, 1), Cell::new(9, 1));
    assert_eq!(path.first(), Some(&Cell::new(0, 1)));
    assert_eq!(path.last(), Some(&Cell::new(9, 1)));
    assert_eq!(path.len(), 10);
    assert!((cost(&path) - 9.0).abs() < EPSILON);
}

#[test]
fn diagonal_route_uses_octile_cost() {
    let g = open_grid(6, 6);
    let path = find_path(&g, Cell::new(0, 0), Cell::new(5, 3));
    assert_valid(&g, &path);
    assert!((cost(&path) - (2.0 + 3.0 * DIAGONAL_COST)).abs() < EPSILON);
}

#[test]
fn same_cell_returns_empty() {
    let g = open_grid(5, 5);
    assert!(find_path(&g, Cell::new(2, 2), Cell::new(2, 2)).is_empty());
}

#[test]
fn endpoints_clamped_to_same_cell_return_empty() {
    let g = open_grid(5, 5);
    assert!(find_path(&g, Cell::new(9, 9), Cell::new(40, 7)).is_empty());
}

#[test]
fn out_of_bounds_endpoints_are_clamped() {
    let g = open_grid(5, 5);
    let path = find_path(&g, Cell::new(-3, -3), Cell::new(99, 2));
    assert_eq!(path.first(), Some(&Cell::new(0, 0)));
    assert_eq!(path.last(), Some(&Cell::new(4, 2)));
    assert_valid(&g, &path);
}

#[test]
fn empty_grid_returns_empty() {
    let g = Grid::new(Size::new(0.0, 0.0), 10.0, usize::MAX).unwrap();
    assert!(find_path(&g, Cell::new(0, 0), Cell::new(1, 1)).is_empty());
}

#[test]
fn blocked_endpoint_returns_empty() {
    let g = grid_from(&["..#", "...", "..."]);
    assert!(find_path(&g, Cell::new(0, 0), Cell::new(2, 0)).is_empty());
    assert!(find_path(&g, Cell::new(2, 0), Cell::new(0, 0)).is_empty());
}

// --- obstacles ---

#[test]
fn diagonal_never_cuts_a_corner() {
    let g = grid_from(&[".#", ".."]);
    let path = find_path(&g, Cell::new(0, 0), Cell::new(1, 1));
    assert_eq!(path, vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 1)]);
}

#[test]
fn diagonal_squeeze_between_two_blocks_is_refused() {
    let g = grid_from(&[".#", "#."]);
    assert!(find_path(&g, Cell::new(0, 0), Cell::new(1, 1)).is_empty());
}

#[test]
fn detours_around_wall() {
    let g = grid_from(&[
        "..........",
        "....#.....",
        "....#.....",
        "....#.....",
        "..........",
    ]);
    let path = find_path(&g, Cell::new(0, 2), Cell::new(9, 2));
    assert!(!path.is_empty());
    assert_valid(&g, &path);
    assert!(path.iter().all(|c| c.col != 4 || c.row == 0 || c.row == 4));
}

#[test]
fn fully_separated_regions_have_no_route() {
    let g = grid_from(&[
        "...#....",
        "...#....",
        "...#....",
        "...#....",
    ]);
    assert!(find_path(&g, Cell::new(0, 0), Cell::new(7, 3)).is_empty());
}

#[test]
fn enclosed_target_has_no_route() {
    let g = grid_from(&[
        ".......",
        "..###..",
        "..#.#..",
        "..###..",
        ".......",
    ]);
    assert!(find_path(&g, Cell::new(0, 0), Cell::new(3, 2)).is_empty());
}

#[test]
fn search_is_deterministic() {
    let g = grid_from(&[
        "........",
        "..##....",
        "....##..",
        "........",
    ]);
    let first = find_path(&g, Cell::new(0, 0), Cell::new(7, 3));
    for _ in 0..5 {
        assert_eq!(find_path(&g, Cell::new(0, 0), Cell::new(7, 3)), first);
    }
}

#[test]
fn random_grids_agree_with_reachability() {
    let mut rng = XorShift(0x9E37_79B9_7F4A_7C15);
    for _ in 0..200 {
        let mut g = open_grid(12, 9);
        for row in 0..9 {
            for col in 0..12 {
                if rng.next() % 100 < 30 {
                    g.set_walkable(Cell::new(col, row), false);
                }
            }
        }
        let start = Cell::new(0, 0);
        let end = Cell::new(11, 8);
        g.set_walkable(start, true);
        g.set_walkable(end, true);

        let path = find_path(&g, start, end);
        if reachable(&g, start, end) {
            assert_eq!(path.first(), Some(&start));
            assert_eq!(path.last(), Some(&end));
            assert_valid(&g, &path);
        } else {
            assert!(path.is_empty());
        }
    }
}

// --- conversions ---

#[test]
fn cells_convert_to_centers_and_flatten() {
    let g = Grid::new(Size::new(100.0, 100.0), 20.0, usize::MAX).unwrap();
    let points = cells_to_points(&g, &[Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 1)]);
    assert_eq!(points, vec![Point::new(10.0, 10.0), Point::new(30.0, 10.0), Point::new(50.0, 30.0)]);
    assert_eq!(flatten_points(&points), vec![10.0, 10.0, 30.0, 10.0, 50.0, 30.0]);
}

#[test]
fn polyline_length_sums_segments() {
    let pts = [Point::new(0.0, 0.0), Point::new(3.0, 4.0), Point::new(3.0, 10.0)];
    assert!((polyline_length(&pts) - 11.0).abs() < EPSILON);
    assert_eq!(polyline_length(&pts[..1]), 0.0);
    assert_eq!(polyline_length(&[]), 0.0);
}
