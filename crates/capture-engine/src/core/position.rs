use std::fmt;

use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// An exact grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    #[must_use]
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn manhattan(self, other: Self) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Neighbouring cell in `dir`, or `None` when it would leave the coordinate space.
    #[must_use]
    pub fn neighbor(self, dir: Direction) -> Option<Self> {
        let (dx, dy) = dir.vector();
        Some(Self {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A unit position, measured in half cells.
///
/// Units normally sit on exact cells, but a unit moving at half speed spends one move
/// between two cells. Storing coordinates doubled keeps those positions exact and hashable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    hx: usize,
    hy: usize,
}

impl From<Cell> for Position {
    fn from(cell: Cell) -> Self {
        Self::from_cell(cell)
    }
}

impl Position {
    #[must_use]
    pub const fn from_cell(cell: Cell) -> Self {
        Self {
            hx: cell.x * 2,
            hy: cell.y * 2,
        }
    }

    /// Returns the cell this position sits on, or `None` while in transit between cells.
    #[must_use]
    pub const fn cell(self) -> Option<Cell> {
        if self.hx % 2 == 0 && self.hy % 2 == 0 {
            Some(Cell::new(self.hx / 2, self.hy / 2))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn is_cell(self) -> bool {
        self.cell().is_some()
    }

    /// Rounds a half-step position to a cell; halves round towards +x / +y.
    #[must_use]
    pub const fn nearest_cell(self) -> Cell {
        Cell::new(self.hx.div_ceil(2), self.hy.div_ceil(2))
    }

    /// Moves half a cell (`half_steps == 1`) or a whole cell (`half_steps == 2`) in `dir`.
    #[must_use]
    pub fn step(self, dir: Direction, half_steps: isize) -> Option<Self> {
        let (dx, dy) = dir.vector();
        Some(Self {
            hx: self.hx.checked_add_signed(dx * half_steps)?,
            hy: self.hy.checked_add_signed(dy * half_steps)?,
        })
    }

    /// Manhattan distance in half cells.
    #[must_use]
    pub fn half_distance(self, other: Self) -> usize {
        self.hx.abs_diff(other.hx) + self.hy.abs_diff(other.hy)
    }
}

impl fmt::Display for Position {
    #[expect(clippy::cast_precision_loss)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell() {
            Some(cell) => cell.fmt(f),
            None => write!(f, "({}, {})", self.hx as f32 / 2.0, self.hy as f32 / 2.0),
        }
    }
}
