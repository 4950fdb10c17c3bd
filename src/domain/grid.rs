/// The board: a fixed 20×16 grid of `Cell` values.
///
/// The grid is the single source of truth for occupancy. The player and
/// robot position records in `WorldState` are a cached index into it and
/// must be kept consistent on every mutation.
///
/// All access goes through `get()` / `set()`, which check bounds and fail
/// loudly on out-of-range coordinates. Callers validate candidate moves
/// with `in_bounds()` before touching the grid.

use super::cell::Cell;

pub const GRID_W: i32 = 20;
pub const GRID_H: i32 = 16;

/// Roster capacity, derived from the board width as in the original game.
pub const MAX_ROBOTS: usize = (GRID_W / 2) as usize;

/// A board coordinate. Deltas are signed, so coordinates are too;
/// anything derived from a move is bounds-checked before grid access.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    /// One step toward `target`, each axis clamped to ±1 independently.
    /// Diagonal when both axes differ; no tie-break is needed.
    pub fn step_toward(self, target: Pos) -> Pos {
        Pos {
            x: self.x + (target.x - self.x).signum(),
            y: self.y + (target.y - self.y).signum(),
        }
    }

    /// Chebyshev distance: the number of king-moves between two positions.
    #[allow(dead_code)]
    pub fn chebyshev(self, other: Pos) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

#[derive(Clone)]
pub struct Grid {
    cells: [[Cell; GRID_W as usize]; GRID_H as usize],
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            cells: [[Cell::Empty; GRID_W as usize]; GRID_H as usize],
        }
    }

    #[inline]
    pub fn in_bounds(&self, p: Pos) -> bool {
        p.x >= 0 && p.x < GRID_W && p.y >= 0 && p.y < GRID_H
    }

    /// Content at `p`. Panics on out-of-range access.
    #[inline]
    pub fn get(&self, p: Pos) -> Cell {
        debug_assert!(self.in_bounds(p), "grid read out of bounds: {:?}", p);
        self.cells[p.y as usize][p.x as usize]
    }

    /// Overwrite the content at `p`. Panics on out-of-range access.
    #[inline]
    pub fn set(&mut self, p: Pos, cell: Cell) {
        debug_assert!(self.in_bounds(p), "grid write out of bounds: {:?}", p);
        self.cells[p.y as usize][p.x as usize] = cell;
    }

    /// Visit every coordinate, column-major (x outer, y inner).
    /// Generation iterates in this order so seeded boards are reproducible.
    pub fn coords() -> impl Iterator<Item = Pos> {
        (0..GRID_W).flat_map(|x| (0..GRID_H).map(move |y| Pos::new(x, y)))
    }

    /// Number of cells currently holding `cell`.
    pub fn count(&self, cell: Cell) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&c| c == cell)
            .count()
    }
}
