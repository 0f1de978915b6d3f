use capture_engine::{
    AgentIndex, AgentState, Cell, Direction, DistanceOracle, GameView, Position, Team,
};

use crate::successor::project_successor;

/// Everything one decision is made from.
pub struct DecisionContext<'a, S> {
    /// The unit that is choosing an action.
    pub agent: AgentIndex,
    /// The unit's current observation.
    pub state: &'a S,
    /// The observation of the unit's previous turn, if any.
    pub previous: Option<&'a S>,
    pub distancer: &'a dyn DistanceOracle,
}

impl<'a, S> DecisionContext<'a, S>
where
    S: GameView,
{
    #[must_use]
    pub fn new(
        agent: AgentIndex,
        state: &'a S,
        previous: Option<&'a S>,
        distancer: &'a dyn DistanceOracle,
    ) -> Self {
        Self {
            agent,
            state,
            previous,
            distancer,
        }
    }

    #[must_use]
    pub fn team(&self) -> Team {
        self.agent.team()
    }

    pub fn opponents(&self) -> impl Iterator<Item = AgentIndex> + use<'a, S> {
        self.agent.opponents(self.state.num_agents())
    }

    #[must_use]
    pub fn successor(&self, action: Direction) -> S {
        project_successor(self.state, self.agent, action)
    }

    #[must_use]
    pub fn distance(&self, from: Cell, to: Cell) -> u32 {
        self.distancer.maze_distance(from, to)
    }

    /// The first of `cells` at minimal maze distance from `from`, with that distance.
    pub fn nearest<I>(&self, from: Cell, cells: I) -> Option<(Cell, u32)>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut best: Option<(Cell, u32)> = None;
        for cell in cells {
            let d = self.distance(from, cell);
            if best.is_none_or(|(_, best_d)| d < best_d) {
                best = Some((cell, d));
            }
        }
        best
    }
}

/// The cell a unit occupies, falling back to its spawn when its position is unknown.
pub(crate) fn cell_of(state: &AgentState) -> Cell {
    state.position().unwrap_or(state.start()).nearest_cell()
}

/// The cell of a visible unit.
pub(crate) fn visible_cell(state: &AgentState) -> Option<Cell> {
    state.position().map(Position::nearest_cell)
}
