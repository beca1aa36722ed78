//! Grid module - settled cells of the board
//!
//! Flat row-major storage, sized at runtime. Coordinates: `(x, y)` where x
//! runs left to right and y runs top to bottom, both starting at 0.
//!
//! The grid only ever stores `Empty` or `Locked`. The falling piece is not
//! written here; the board overlays it when answering cell queries.

use blockfall_types::Cell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
    /// Row-major cells (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width as usize * height as usize],
        }
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Stored cell, `None` when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn is_locked(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Cell::Locked))
    }

    /// Whether a piece cell may sit at `(x, y)`: in bounds and not locked
    #[inline(always)]
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Cell::Empty))
    }

    /// Settle a cell. Locking is one-way; there is no unlock.
    /// Returns false if out of bounds or already locked.
    pub fn lock(&mut self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some(i) if self.cells[i].is_empty() => {
                self.cells[i] = Cell::Locked;
                true
            }
            _ => false,
        }
    }

    pub fn locked_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_locked()).count()
    }

    /// Coordinates of every locked cell, row-major
    pub fn iter_locked(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_locked())
            .map(move |(i, _)| ((i % width) as i32, (i / width) as i32))
    }
}
