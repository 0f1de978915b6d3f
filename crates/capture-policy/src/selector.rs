//! Action selection: choosing one action for the current turn.
//!
//! The [`ActionSelector`] enumerates the legal actions of the deciding unit, scores each
//! with an [`ActionEvaluator`], and picks uniformly at random among the actions whose
//! score equals the maximum. Nothing is cached between turns.
//!
//! # Design: Greedy One-Step Lookahead
//!
//! Each action is judged by the state it leads to, never by the moves after that. The
//! reflex rules in the extractors make up for the short horizon (dead-end detection, loop
//! guards, threat distances).
//!
//! Ties are compared exactly. Equal features and equal weights give bit-identical scores,
//! and breaking those ties randomly keeps a unit from oscillating between two equally
//! good cells.

use arrayvec::ArrayVec;
use capture_engine::{Direction, GameView};
use rand::{Rng, seq::IndexedRandom as _};

use crate::{context::DecisionContext, evaluator::ActionEvaluator};

/// Scores of every legal action, in legal-action order.
pub type ActionScores = ArrayVec<(Direction, f32), { Direction::LEN }>;

#[derive(Debug)]
pub struct ActionSelector<'a, S> {
    evaluator: Box<dyn ActionEvaluator<S> + 'a>,
}

impl<'a, S> ActionSelector<'a, S>
where
    S: GameView,
{
    #[must_use]
    pub fn new(evaluator: Box<dyn ActionEvaluator<S> + 'a>) -> Self {
        Self { evaluator }
    }

    #[must_use]
    pub fn evaluator(&self) -> &dyn ActionEvaluator<S> {
        self.evaluator.as_ref()
    }

    #[must_use]
    pub fn score_actions(&self, ctx: &DecisionContext<'_, S>) -> ActionScores {
        ctx.state
            .legal_actions(ctx.agent)
            .into_iter()
            .map(|action| (action, self.evaluator.evaluate_action(ctx, action)))
            .collect()
    }

    /// Actions sharing the maximal score.
    #[must_use]
    pub fn best_actions(&self, ctx: &DecisionContext<'_, S>) -> ArrayVec<Direction, { Direction::LEN }> {
        best_of(&self.score_actions(ctx))
    }

    /// Chooses an action for the unit of `ctx`.
    pub fn select_action<R>(&self, ctx: &DecisionContext<'_, S>, rng: &mut R) -> Direction
    where
        R: Rng + ?Sized,
    {
        let scores = self.score_actions(ctx);
        let best = best_of(&scores);
        let action = best
            .choose(rng)
            .or_else(|| scores.first().map(|(action, _)| action))
            .copied()
            .unwrap_or(Direction::Stop);
        tracing::debug!(agent = %ctx.agent, ?scores, %action, "action selected");
        action
    }
}

#[expect(clippy::float_cmp)]
fn best_of(scores: &ActionScores) -> ArrayVec<Direction, { Direction::LEN }> {
    let max = scores
        .iter()
        .map(|(_, score)| *score)
        .fold(f32::NEG_INFINITY, f32::max);
    scores
        .iter()
        .filter(|(_, score)| *score == max)
        .map(|(action, _)| *action)
        .collect()
}
