use rand_pcg::Pcg32;

use crate::core::Direction;

use super::{
    agent::{AgentIndex, Team},
    capture_state::CaptureState,
    game_view::GameView,
    match_seed::MatchSeed,
};

/// A unit controller driven by [`CaptureMatch`].
pub trait Agent {
    /// Chooses the next action from this unit's observation of the match.
    fn choose_action(&mut self, observation: &CaptureState) -> Direction;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MatchResult {
    Winner(Team),
    Tie,
}

#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub score: i32,
    pub moves: usize,
    pub result: MatchResult,
}

/// Runs a match: units act in index order, each from its own noisy observation.
pub struct CaptureMatch {
    state: CaptureState,
    agents: Vec<Box<dyn Agent>>,
    rng: Pcg32,
    moves: usize,
}

impl CaptureMatch {
    /// # Panics
    ///
    /// Panics if the number of agents differs from the layout's number of spawns.
    #[must_use]
    pub fn new(state: CaptureState, agents: Vec<Box<dyn Agent>>, seed: MatchSeed) -> Self {
        assert_eq!(state.num_agents(), agents.len());
        Self {
            state,
            agents,
            rng: seed.rng(),
            moves: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// The unit that acts on the next call to [`Self::play_move`].
    #[must_use]
    pub fn next_agent(&self) -> AgentIndex {
        AgentIndex(self.moves % self.agents.len())
    }

    /// Lets the next unit act. Returns the acting unit and its action.
    ///
    /// An illegal choice is replaced by the unit's first legal action.
    pub fn play_move(&mut self) -> (AgentIndex, Direction) {
        let agent = self.next_agent();
        let observation = self.state.observe(agent, &mut self.rng);
        let mut action = self.agents[agent.0].choose_action(&observation);
        if !self.state.is_legal(agent, action) {
            let fallback = self.state.legal_actions(agent)[0];
            tracing::warn!(%agent, %action, %fallback, "illegal action replaced");
            action = fallback;
        }
        self.state.apply_action(agent, action);
        self.moves += 1;
        (agent, action)
    }

    /// Plays until the match is over.
    pub fn run(&mut self) -> MatchOutcome {
        while !self.is_over() {
            self.play_move();
        }
        self.outcome()
    }

    #[must_use]
    pub fn outcome(&self) -> MatchOutcome {
        let score = self.state.score();
        let result = match score.signum() {
            1 => MatchResult::Winner(Team::Red),
            -1 => MatchResult::Winner(Team::Blue),
            _ => MatchResult::Tie,
        };
        tracing::info!(score, moves = self.moves, ?result, "match finished");
        MatchOutcome {
            score,
            moves: self.moves,
            result,
        }
    }
}
