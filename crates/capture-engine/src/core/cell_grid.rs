use super::position::Cell;

/// A fixed-size boolean grid (walls, food).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl CellGrid {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        (cell.x < self.width && cell.y < self.height).then(|| cell.y * self.width + cell.x)
    }

    /// Out-of-range cells read as `false`.
    #[must_use]
    pub fn get(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.cells[i])
    }

    /// Returns the previous value. Out-of-range writes are ignored.
    pub fn set(&mut self, cell: Cell, value: bool) -> bool {
        match self.index(cell) {
            Some(i) => std::mem::replace(&mut self.cells[i], value),
            None => false,
        }
    }

    /// Set cells in column-major order (x outer, y inner).
    pub fn iter_set(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.width)
            .flat_map(move |x| (0..self.height).map(move |y| Cell::new(x, y)))
            .filter(|cell| self.get(*cell))
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }
}
