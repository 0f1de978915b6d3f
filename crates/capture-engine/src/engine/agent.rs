use serde::{Deserialize, Serialize};

use crate::core::{Direction, Position};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display, derive_more::IsVariant,
)]
pub enum Team {
    Red,
    Blue,
}

impl Team {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Team::Red => Team::Blue,
            Team::Blue => Team::Red,
        }
    }

    /// Converts a red-positive score into this team's perspective.
    #[must_use]
    pub const fn signed(self, red_score: i32) -> i32 {
        match self {
            Team::Red => red_score,
            Team::Blue => -red_score,
        }
    }
}

/// Index of a unit within a match. Even indices play for red, odd indices for blue.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[display("#{_0}")]
pub struct AgentIndex(pub usize);

impl AgentIndex {
    #[must_use]
    pub const fn team(self) -> Team {
        if self.0 % 2 == 0 { Team::Red } else { Team::Blue }
    }

    /// Indices of every unit of `team` in a match with `num_agents` units.
    pub fn of_team(team: Team, num_agents: usize) -> impl Iterator<Item = Self> {
        (0..num_agents)
            .map(AgentIndex)
            .filter(move |index| index.team() == team)
    }

    /// Indices of this unit's opponents, in ascending order.
    pub fn opponents(self, num_agents: usize) -> impl Iterator<Item = Self> {
        Self::of_team(self.team().opponent(), num_agents)
    }
}

/// Per-unit state as seen by an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentState {
    start: Position,
    position: Option<Position>,
    direction: Direction,
    is_pacman: bool,
    scared_timer: u32,
}

impl AgentState {
    #[must_use]
    pub fn new(start: Position) -> Self {
        Self {
            start,
            position: Some(start),
            direction: Direction::Stop,
            is_pacman: false,
            scared_timer: 0,
        }
    }

    #[must_use]
    pub fn start(&self) -> Position {
        self.start
    }

    /// Current position, or `None` when the observer cannot see this unit.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Last heading. A unit that stops keeps the heading it had before.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether the unit is attacking (inside the opponent's half).
    #[must_use]
    pub fn is_pacman(&self) -> bool {
        self.is_pacman
    }

    /// Remaining moves during which this unit can be eliminated by attackers it touches.
    #[must_use]
    pub fn scared_timer(&self) -> u32 {
        self.scared_timer
    }

    #[must_use]
    pub fn is_scared(&self) -> bool {
        self.scared_timer > 0
    }

    pub fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn set_pacman(&mut self, is_pacman: bool) {
        self.is_pacman = is_pacman;
    }

    pub fn set_scared_timer(&mut self, scared_timer: u32) {
        self.scared_timer = scared_timer;
    }

    /// Sends the unit back to its spawn cell as a non-scared defender.
    pub fn respawn(&mut self) {
        self.position = Some(self.start);
        self.direction = Direction::Stop;
        self.is_pacman = false;
        self.scared_timer = 0;
    }
}
