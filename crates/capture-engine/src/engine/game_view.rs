//! The engine capability consumed by decision-making code.
//!
//! A [`GameView`] is one observer's snapshot of a match: it answers queries about units,
//! food, capsules and score, enumerates legal actions, and projects successor states.
//! Policies depend only on this trait, so they can be driven by [`CaptureState`](super::CaptureState)
//! or by any stub that implements it.

use arrayvec::ArrayVec;

use crate::core::{Cell, Direction, Position};

use super::agent::{AgentIndex, AgentState, Team};

/// Legal actions of a unit; never empty.
pub type LegalActions = ArrayVec<Direction, { Direction::LEN }>;

pub trait GameView: Clone {
    /// Number of units in the match.
    fn num_agents(&self) -> usize;

    /// Actions `agent` may take. Always contains at least one action.
    fn legal_actions(&self, agent: AgentIndex) -> LegalActions;

    /// State after `agent` performs `action`. `action` must be legal.
    #[must_use]
    fn generate_successor(&self, agent: AgentIndex, action: Direction) -> Self;

    fn agent_state(&self, agent: AgentIndex) -> &AgentState;

    /// Noisy distance readings from the observer to each unit, indexed by unit.
    fn agent_distances(&self) -> &[Option<u32>];

    /// Red-positive score.
    fn score(&self) -> i32;

    /// Food lying in `side`'s half, i.e. the food `side` defends, in column-major order.
    fn food(&self, side: Team) -> Vec<Cell>;

    /// Whether any food lies on `cell`.
    fn has_food(&self, cell: Cell) -> bool;

    /// Capsules lying in `side`'s half.
    fn capsules(&self, side: Team) -> Vec<Cell>;

    fn initial_position(&self, agent: AgentIndex) -> Position;

    /// Score from `team`'s perspective.
    fn team_score(&self, team: Team) -> i32 {
        team.signed(self.score())
    }
}
