use std::sync::Arc;

use capture_engine::{Agent, AgentIndex, CaptureState, Direction, DistanceOracle, MatchSeed};
use rand::Rng as _;
use rand_pcg::Pcg32;

use crate::{
    policy::{ObservationMemory, Policy, PolicyMode},
    weights::TeamWeights,
};

/// A [`Policy`] playing in a [`CaptureMatch`](capture_engine::CaptureMatch).
///
/// Owns the unit's observation memory and its tie-breaking random number generator.
#[derive(Debug)]
pub struct PolicyAgent {
    policy: Policy<CaptureState>,
    memory: ObservationMemory<CaptureState>,
    rng: Pcg32,
}

impl PolicyAgent {
    #[must_use]
    pub fn new(policy: Policy<CaptureState>, seed: MatchSeed) -> Self {
        Self {
            policy,
            memory: ObservationMemory::new(),
            rng: seed.rng(),
        }
    }

    #[must_use]
    pub fn policy(&self) -> &Policy<CaptureState> {
        &self.policy
    }
}

impl Agent for PolicyAgent {
    fn choose_action(&mut self, observation: &CaptureState) -> Direction {
        let (action, memory) = self
            .policy
            .choose_action(observation, &self.memory, &mut self.rng);
        self.memory = memory;
        action
    }
}

/// Creates a two-unit team: `first` plays offense and `second` plays defense.
#[must_use]
pub fn create_team(
    first: AgentIndex,
    second: AgentIndex,
    weights: &TeamWeights,
    distancer: &Arc<dyn DistanceOracle>,
    seed: MatchSeed,
) -> [PolicyAgent; 2] {
    let mut rng = seed.rng();
    let offense = Policy::new(first, PolicyMode::Offensive, weights, Arc::clone(distancer));
    let defense = Policy::new(second, PolicyMode::Defensive, weights, Arc::clone(distancer));
    [
        PolicyAgent::new(offense, rng.random()),
        PolicyAgent::new(defense, rng.random()),
    ]
}

#[cfg(test)]
mod tests {
    use capture_engine::{AgentIndex, CaptureMatch, DEFAULT_MOVE_LIMIT, Layout, MatchOutcome, MazeDistancer, Team};

    use super::*;

    fn play(seed: u128) -> MatchOutcome {
        let layout = Layout::default_capture().unwrap();
        let distancer: Arc<dyn DistanceOracle> = Arc::new(MazeDistancer::new(&layout));
        let state = CaptureState::new(layout);
        let weights = TeamWeights::default();

        let seed = MatchSeed::from_u128(seed);
        let [red_offense, red_defense] =
            create_team(AgentIndex(0), AgentIndex(2), &weights, &distancer, MatchSeed::from_u128(1));
        let [blue_offense, blue_defense] =
            create_team(AgentIndex(1), AgentIndex(3), &weights, &distancer, MatchSeed::from_u128(2));
        let agents: Vec<Box<dyn Agent>> = vec![
            Box::new(red_offense),
            Box::new(blue_offense),
            Box::new(red_defense),
            Box::new(blue_defense),
        ];
        CaptureMatch::new(state, agents, seed).run()
    }

    #[test]
    fn test_team_roles() {
        let layout = Layout::default_capture().unwrap();
        let distancer: Arc<dyn DistanceOracle> = Arc::new(MazeDistancer::new(&layout));
        let [first, second] = create_team(
            AgentIndex(1),
            AgentIndex(3),
            &TeamWeights::default(),
            &distancer,
            MatchSeed::from_u128(0),
        );
        assert_eq!(first.policy().agent(), AgentIndex(1));
        assert_eq!(first.policy().mode(), PolicyMode::Offensive);
        assert_eq!(second.policy().agent(), AgentIndex(3));
        assert_eq!(second.policy().mode(), PolicyMode::Defensive);
        assert_eq!(first.policy().agent().team(), Team::Blue);
    }

    #[test]
    fn test_match_runs_to_completion() {
        let outcome = play(11);
        assert!(outcome.moves > 0);
        assert!(outcome.moves <= DEFAULT_MOVE_LIMIT as usize);
    }

    #[test]
    fn test_same_seed_same_match() {
        let a = play(7);
        let b = play(7);
        assert_eq!(a.score, b.score);
        assert_eq!(a.moves, b.moves);
        assert_eq!(a.result, b.result);
    }
}
