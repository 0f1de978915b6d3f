use std::{fmt, sync::Arc};

use rand::Rng;

use crate::core::{Cell, CellGrid, Direction, Layout, Position};

use super::{
    agent::{AgentIndex, AgentState, Team},
    game_view::{GameView, LegalActions},
};

/// Manhattan radius within which a team sees opponents exactly.
pub const SIGHT_RANGE: usize = 5;
/// Distance readings are perturbed by a uniform integer in `-SONAR_NOISE..=SONAR_NOISE`.
pub const SONAR_NOISE: i64 = 6;
/// Moves an opposing unit stays scared after a capsule is eaten.
pub const SCARED_TIME: u32 = 40;
/// Total moves (all units combined) before the match ends.
pub const DEFAULT_MOVE_LIMIT: u32 = 1200;
/// The match ends once a side has this little food left.
pub const MIN_FOOD: usize = 2;
/// Units whose positions are this close (in half cells) collide.
const COLLISION_HALF_DISTANCE: usize = 1;

/// Reference capture-the-flag simulation.
///
/// A `CaptureState` is either the ground truth of a match or one unit's observation of it
/// (see [`CaptureState::observe`]), in which distant opponents are hidden and distance
/// readings are noisy.
///
/// # Rules
///
/// - Units move one cell per move; a scared defender moves half a cell, and while between
///   cells it can only keep going in its current heading.
/// - A unit on the opponent's half is a pacman. Pacmen eat food for one point each, and
///   eating a capsule scares every opposing unit for [`SCARED_TIME`] moves.
/// - A pacman touching a non-scared defender respawns; a scared defender touched by a
///   pacman respawns instead.
/// - The match ends after the move limit or when either side has [`MIN_FOOD`] food or less.
#[derive(Debug, Clone)]
pub struct CaptureState {
    layout: Arc<Layout>,
    food: CellGrid,
    capsules: Vec<Cell>,
    agents: Vec<AgentState>,
    distances: Vec<Option<u32>>,
    score: i32,
    moves_left: u32,
}

impl CaptureState {
    #[must_use]
    pub fn new(layout: Layout) -> Self {
        Self::with_move_limit(layout, DEFAULT_MOVE_LIMIT)
    }

    #[must_use]
    pub fn with_move_limit(layout: Layout, move_limit: u32) -> Self {
        let agents = (0..layout.num_agents())
            .map(|i| AgentState::new(Position::from_cell(layout.spawn(i))))
            .collect();
        Self {
            food: layout.food().clone(),
            capsules: layout.capsules().to_vec(),
            distances: vec![None; layout.num_agents()],
            agents,
            score: 0,
            moves_left: move_limit,
            layout: Arc::new(layout),
        }
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub fn moves_left(&self) -> u32 {
        self.moves_left
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.moves_left == 0
            || self.food(Team::Red).len() <= MIN_FOOD
            || self.food(Team::Blue).len() <= MIN_FOOD
    }

    /// Team owning the half `cell` lies in.
    #[must_use]
    pub fn side_of(&self, cell: Cell) -> Team {
        if self.layout.is_red_side(cell) {
            Team::Red
        } else {
            Team::Blue
        }
    }

    #[must_use]
    pub fn is_legal(&self, agent: AgentIndex, action: Direction) -> bool {
        self.legal_actions(agent).contains(&action)
    }

    pub fn agent_state_mut(&mut self, agent: AgentIndex) -> &mut AgentState {
        &mut self.agents[agent.0]
    }

    /// Moves `agent` to `position`, updating its pacman flag from the side it lands on.
    pub fn place_agent(&mut self, agent: AgentIndex, position: Position) {
        let is_pacman = self.side_of(position.nearest_cell()) != agent.team();
        let state = &mut self.agents[agent.0];
        state.set_position(Some(position));
        state.set_pacman(is_pacman);
    }

    pub fn set_agent_distances(&mut self, distances: Vec<Option<u32>>) {
        self.distances = distances;
    }

    /// Removes the food on `cell`, returning whether there was any.
    pub fn remove_food(&mut self, cell: Cell) -> bool {
        self.food.set(cell, false)
    }

    /// Applies `action` for `agent` in place.
    ///
    /// # Panics
    ///
    /// Panics if `action` is not legal for `agent`.
    pub fn apply_action(&mut self, agent: AgentIndex, action: Direction) {
        assert!(
            self.is_legal(agent, action),
            "illegal action {action} for agent {agent}"
        );
        let Some(position) = self.agents[agent.0].position() else {
            return;
        };

        let state = &self.agents[agent.0];
        let half_steps = if state.is_scared() && !state.is_pacman() {
            1
        } else {
            2
        };
        let next = position.step(action, half_steps).unwrap_or(position);

        let state = &mut self.agents[agent.0];
        state.set_position(Some(next));
        if !action.is_stop() {
            state.set_direction(action);
        }

        if let Some(cell) = next.cell() {
            self.place_agent(agent, next);
            self.consume(agent, cell);
        }
        self.check_collisions(agent);

        let state = &mut self.agents[agent.0];
        let timer = state.scared_timer();
        if timer == 1 {
            let snapped = state.position().map(|p| Position::from_cell(p.nearest_cell()));
            state.set_position(snapped);
        }
        state.set_scared_timer(timer.saturating_sub(1));

        self.moves_left = self.moves_left.saturating_sub(1);
    }

    fn consume(&mut self, agent: AgentIndex, cell: Cell) {
        if !self.agents[agent.0].is_pacman() {
            return;
        }
        let team = agent.team();
        if self.food.set(cell, false) {
            self.score += team.signed(1);
            tracing::trace!(%agent, %cell, score = self.score, "food eaten");
        }
        if let Some(i) = self.capsules.iter().position(|c| *c == cell) {
            self.capsules.swap_remove(i);
            for opponent in agent.opponents(self.agents.len()) {
                self.agents[opponent.0].set_scared_timer(SCARED_TIME);
            }
            tracing::debug!(%agent, %cell, "capsule eaten");
        }
    }

    fn check_collisions(&mut self, agent: AgentIndex) {
        let Some(position) = self.agents[agent.0].position() else {
            return;
        };
        for opponent in agent.opponents(self.agents.len()) {
            let Some(other) = self.agents[opponent.0].position() else {
                continue;
            };
            if position.half_distance(other) > COLLISION_HALF_DISTANCE {
                continue;
            }
            let (pacman, ghost) = if self.agents[agent.0].is_pacman() {
                (agent, opponent)
            } else if self.agents[opponent.0].is_pacman() {
                (opponent, agent)
            } else {
                continue;
            };
            let victim = if self.agents[ghost.0].is_scared() {
                ghost
            } else {
                pacman
            };
            tracing::debug!(%victim, "unit eliminated");
            self.agents[victim.0].respawn();
            if victim == agent {
                return;
            }
        }
    }

    /// Builds what `observer` sees: opponents out of every teammate's sight are hidden and
    /// each unit gets a noisy distance reading.
    #[must_use]
    pub fn observe<R>(&self, observer: AgentIndex, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut observation = self.clone();
        let num_agents = self.agents.len();
        let teammates: Vec<Cell> = AgentIndex::of_team(observer.team(), num_agents)
            .filter_map(|i| self.agents[i.0].position())
            .map(Position::nearest_cell)
            .collect();
        for opponent in observer.opponents(num_agents) {
            let visible = self.agents[opponent.0].position().is_some_and(|p| {
                let cell = p.nearest_cell();
                teammates.iter().any(|t| t.manhattan(cell) <= SIGHT_RANGE)
            });
            if !visible {
                observation.agents[opponent.0].set_position(None);
            }
        }

        let origin = self.agents[observer.0].position().map(Position::nearest_cell);
        observation.distances = self
            .agents
            .iter()
            .map(|state| {
                let (origin, target) = (origin?, state.position()?.nearest_cell());
                let exact = i64::try_from(origin.manhattan(target)).ok()?;
                let noisy = exact + rng.random_range(-SONAR_NOISE..=SONAR_NOISE);
                u32::try_from(noisy.max(0)).ok()
            })
            .collect();
        observation
    }
}

impl GameView for CaptureState {
    fn num_agents(&self) -> usize {
        self.agents.len()
    }

    fn legal_actions(&self, agent: AgentIndex) -> LegalActions {
        let mut actions = LegalActions::new();
        let state = &self.agents[agent.0];
        let Some(position) = state.position() else {
            actions.push(Direction::Stop);
            return actions;
        };
        let Some(cell) = position.cell() else {
            actions.push(state.direction());
            return actions;
        };
        for dir in Direction::MOVES {
            if cell
                .neighbor(dir)
                .is_some_and(|next| !self.layout.is_wall(next))
            {
                actions.push(dir);
            }
        }
        actions.push(Direction::Stop);
        actions
    }

    fn generate_successor(&self, agent: AgentIndex, action: Direction) -> Self {
        let mut successor = self.clone();
        successor.apply_action(agent, action);
        successor
    }

    fn agent_state(&self, agent: AgentIndex) -> &AgentState {
        &self.agents[agent.0]
    }

    fn agent_distances(&self) -> &[Option<u32>] {
        &self.distances
    }

    fn score(&self) -> i32 {
        self.score
    }

    fn food(&self, side: Team) -> Vec<Cell> {
        self.food
            .iter_set()
            .filter(|cell| self.side_of(*cell) == side)
            .collect()
    }

    fn has_food(&self, cell: Cell) -> bool {
        self.food.get(cell)
    }

    fn capsules(&self, side: Team) -> Vec<Cell> {
        self.capsules
            .iter()
            .copied()
            .filter(|cell| self.side_of(*cell) == side)
            .collect()
    }

    fn initial_position(&self, agent: AgentIndex) -> Position {
        self.agents[agent.0].start()
    }
}

impl fmt::Display for CaptureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.layout.height() {
            for x in 0..self.layout.width() {
                let cell = Cell::new(x, y);
                let unit = self
                    .agents
                    .iter()
                    .position(|a| a.position().is_some_and(|p| p.nearest_cell() == cell));
                let ch = if let Some(i) = unit {
                    char::from_digit(u32::try_from(i + 1).unwrap_or(0), 10).unwrap_or('?')
                } else if self.layout.is_wall(cell) {
                    '%'
                } else if self.capsules.contains(&cell) {
                    'o'
                } else if self.food.get(cell) {
                    '.'
                } else {
                    ' '
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "score {} / {} moves left", self.score, self.moves_left)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    const RED: AgentIndex = AgentIndex(0);
    const BLUE: AgentIndex = AgentIndex(1);

    fn arena() -> CaptureState {
        CaptureState::new(
            Layout::from_ascii(
                "
                %%%%%%%%%%
                %1..  .o.%
                %.%%  %%.%
                %.o.  ..2%
                %%%%%%%%%%
                ",
            )
            .unwrap(),
        )
    }

    fn cell(x: usize, y: usize) -> Position {
        Position::from_cell(Cell::new(x, y))
    }

    #[test]
    fn test_initial_legal_actions() {
        let state = arena();
        let actions = state.legal_actions(RED);
        assert_eq!(
            actions.as_slice(),
            [Direction::South, Direction::East, Direction::Stop]
        );
    }

    #[test]
    fn test_stop_keeps_heading() {
        let state = arena()
            .generate_successor(RED, Direction::East)
            .generate_successor(RED, Direction::Stop);
        assert_eq!(state.agent_state(RED).direction(), Direction::East);
        assert_eq!(state.agent_state(RED).position(), Some(cell(2, 1)));
    }

    #[test]
    fn test_crossing_makes_pacman_and_eats_food() {
        let mut state = arena();
        state.place_agent(RED, cell(5, 1));
        assert!(state.agent_state(RED).is_pacman());
        let before = state.food(Team::Blue).len();
        let state = state.generate_successor(RED, Direction::East);
        assert_eq!(state.food(Team::Blue).len(), before - 1);
        assert_eq!(state.score(), 1);
        assert_eq!(state.team_score(Team::Blue), -1);
    }

    #[test]
    fn test_own_food_is_not_eaten() {
        let state = arena().generate_successor(RED, Direction::East);
        assert_eq!(state.score(), 0);
        assert!(state.has_food(Cell::new(2, 1)));
    }

    #[test]
    fn test_capsule_scares_opponents() {
        let mut state = arena();
        state.place_agent(RED, cell(6, 1));
        let state = state.generate_successor(RED, Direction::East);
        assert!(state.capsules(Team::Blue).is_empty());
        assert_eq!(state.agent_state(BLUE).scared_timer(), SCARED_TIME);
    }

    #[test]
    fn test_scared_ghost_moves_half_steps() {
        let mut state = arena();
        state.agent_state_mut(BLUE).set_scared_timer(10);
        let state = state.generate_successor(BLUE, Direction::West);
        let position = state.agent_state(BLUE).position().unwrap();
        assert!(!position.is_cell());
        assert_eq!(state.legal_actions(BLUE).as_slice(), [Direction::West]);
        let state = state.generate_successor(BLUE, Direction::West);
        assert_eq!(state.agent_state(BLUE).position(), Some(cell(7, 3)));
    }

    #[test]
    fn test_pacman_touching_ghost_respawns() {
        let mut state = arena();
        state.place_agent(RED, cell(7, 3));
        let state = state.generate_successor(RED, Direction::East);
        assert_eq!(state.agent_state(RED).position(), Some(cell(1, 1)));
        assert!(!state.agent_state(RED).is_pacman());
        assert_eq!(state.agent_state(BLUE).position(), Some(cell(8, 3)));
    }

    #[test]
    fn test_pacman_eats_scared_ghost() {
        let mut state = arena();
        state.place_agent(RED, cell(6, 3));
        state.place_agent(BLUE, cell(7, 3));
        state.agent_state_mut(BLUE).set_scared_timer(5);
        let state = state.generate_successor(RED, Direction::East);
        assert_eq!(state.agent_state(BLUE).position(), Some(cell(8, 3)));
        assert!(!state.agent_state(BLUE).is_scared());
        assert_eq!(state.agent_state(RED).position(), Some(cell(7, 3)));
        assert_eq!(state.score(), 1);
    }

    #[test]
    #[should_panic(expected = "illegal action")]
    fn test_illegal_action_panics() {
        let _ = arena().generate_successor(RED, Direction::North);
    }

    #[test]
    fn test_observe_hides_distant_opponents() {
        let state = arena();
        let mut rng = Pcg32::seed_from_u64(7);
        let observation = state.observe(RED, &mut rng);
        assert_eq!(observation.agent_state(BLUE).position(), None);
        assert_eq!(observation.agent_state(RED).position(), Some(cell(1, 1)));

        let exact = Cell::new(1, 1).manhattan(Cell::new(8, 3));
        let reading = observation.agent_distances()[BLUE.0].unwrap() as usize;
        assert!(reading.abs_diff(exact) <= 6);
        assert_eq!(observation.agent_distances()[RED.0].map(|d| d <= 6), Some(true));
    }

    #[test]
    fn test_observe_keeps_close_opponents() {
        let mut state = arena();
        state.place_agent(RED, cell(5, 3));
        let mut rng = Pcg32::seed_from_u64(7);
        let observation = state.observe(RED, &mut rng);
        assert_eq!(observation.agent_state(BLUE).position(), Some(cell(8, 3)));
    }

    #[test]
    fn test_match_ends_when_food_runs_low() {
        let mut state = arena();
        assert!(!state.is_over());
        for food in state.food(Team::Blue) {
            state.remove_food(food);
        }
        assert!(state.is_over());
    }

    #[test]
    fn test_display() {
        let rendered = arena().to_string();
        assert!(rendered.starts_with("%%%%%%%%%%\n%1..  .o.%\n"));
        assert!(rendered.ends_with("score 0 / 1200 moves left"));
    }
}
