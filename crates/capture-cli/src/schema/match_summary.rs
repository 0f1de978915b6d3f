use capture_engine::{MatchOutcome, MatchResult, MatchSeed, Team};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchSummary {
    pub seed: MatchSeed,
    pub layout: String,
    pub red: String,
    pub blue: String,
    /// Red-positive final score.
    pub score: i32,
    pub moves: usize,
    /// `None` for a tie.
    pub winner: Option<Team>,
}

impl MatchSummary {
    pub fn new(seed: MatchSeed, layout: String, red: String, blue: String, outcome: &MatchOutcome) -> Self {
        let winner = match outcome.result {
            MatchResult::Winner(team) => Some(team),
            MatchResult::Tie => None,
        };
        Self {
            seed,
            layout,
            red,
            blue,
            score: outcome.score,
            moves: outcome.moves,
            winner,
        }
    }
}
