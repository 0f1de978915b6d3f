use serde::{Deserialize, Serialize};

/// One of the five moves a unit can make in a turn.
///
/// The grid uses screen coordinates: `North` decreases `y`, `East` increases `x`.
/// `Stop` keeps the unit in place; the engine keeps the previous heading when a unit stops.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Direction {
    North,
    South,
    East,
    West,
    Stop,
}

impl Direction {
    pub const LEN: usize = 5;

    pub const ALL: [Self; Self::LEN] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Stop,
    ];

    pub const MOVES: [Self; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Returns the opposite heading. `Stop` is its own reverse.
    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::Stop => Direction::Stop,
        }
    }

    /// Unit step `(dx, dy)` for this direction.
    #[must_use]
    pub const fn vector(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::Stop => (0, 0),
        }
    }

    #[must_use]
    pub const fn is_stop(self) -> bool {
        matches!(self, Direction::Stop)
    }
}
