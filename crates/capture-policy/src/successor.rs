use capture_engine::{AgentIndex, Direction, GameView};

/// Projects the state after `agent` performs `action`.
///
/// Slowed units can end a move between two cells. Features are only meaningful on whole
/// cells, so a half-step result is advanced once more with the same action. A successor
/// that already lies on a cell is returned as is.
#[must_use]
pub fn project_successor<S>(state: &S, agent: AgentIndex, action: Direction) -> S
where
    S: GameView,
{
    let successor = state.generate_successor(agent, action);
    let on_cell = successor
        .agent_state(agent)
        .position()
        .is_none_or(|p| p.is_cell());
    if on_cell {
        successor
    } else {
        successor.generate_successor(agent, action)
    }
}
