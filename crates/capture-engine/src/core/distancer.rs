use std::collections::{HashMap, VecDeque};

use super::{direction::Direction, layout::Layout, position::Cell};

/// Shortest-path distance between two cells of a maze.
///
/// Implementations must return non-negative, symmetric distances that satisfy the
/// triangle inequality. Callers treat the oracle as a black box.
pub trait DistanceOracle: Send + Sync {
    fn maze_distance(&self, from: Cell, to: Cell) -> u32;
}

/// All-pairs maze distances precomputed by breadth-first search.
///
/// Walls and cells outside the layout are not indexed; queries involving them, and
/// queries between disconnected regions, return [`MazeDistancer::UNREACHABLE`].
#[derive(Debug, Clone)]
pub struct MazeDistancer {
    index: HashMap<Cell, usize>,
    distances: Vec<u32>,
}

impl MazeDistancer {
    pub const UNREACHABLE: u32 = 100_000;

    #[must_use]
    pub fn new(layout: &Layout) -> Self {
        let cells: Vec<Cell> = layout.open_cells().collect();
        let index: HashMap<Cell, usize> = cells.iter().enumerate().map(|(i, c)| (*c, i)).collect();
        let n = cells.len();
        let mut distances = vec![Self::UNREACHABLE; n * n];

        let mut queue = VecDeque::new();
        for (source, &start) in cells.iter().enumerate() {
            let row = &mut distances[source * n..(source + 1) * n];
            row[source] = 0;
            queue.clear();
            queue.push_back(start);
            while let Some(cell) = queue.pop_front() {
                let d = row[index[&cell]];
                for dir in Direction::MOVES {
                    let Some(next) = cell.neighbor(dir) else {
                        continue;
                    };
                    let Some(&i) = index.get(&next) else {
                        continue;
                    };
                    if row[i] == Self::UNREACHABLE {
                        row[i] = d + 1;
                        queue.push_back(next);
                    }
                }
            }
        }

        Self { index, distances }
    }
}

impl DistanceOracle for MazeDistancer {
    fn maze_distance(&self, from: Cell, to: Cell) -> u32 {
        match (self.index.get(&from), self.index.get(&to)) {
            (Some(&a), Some(&b)) => self.distances[a * self.index.len() + b],
            _ => Self::UNREACHABLE,
        }
    }
}
