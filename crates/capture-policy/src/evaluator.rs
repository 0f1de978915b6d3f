//! Action evaluation: scoring one candidate action of one unit.
//!
//! An evaluator maps a [`DecisionContext`] and a legal action to a score, higher being
//! better. The [`ActionSelector`](crate::selector::ActionSelector) scores every legal action
//! with the same evaluator and keeps the best ones.
//!
//! # Design: Linear Weighted Sum
//!
//! [`LinearEvaluator`] combines a [`FeatureExtractor`] with a [`WeightTable`]:
//!
//! ```text
//! score = Σ featureᵢ × weightᵢ   (over the features emitted for this action)
//! ```
//!
//! Extractors are hand-written reflex rules. They inspect the successor of the action and
//! emit only the features that apply, so most scores are a handful of terms. A feature that
//! is not emitted contributes nothing, regardless of its weight.
//!
//! # Usage
//!
//! ```
//! use capture_engine::{AgentIndex, CaptureState, Direction, Layout, MazeDistancer};
//! use capture_policy::{
//!     context::DecisionContext,
//!     evaluator::{ActionEvaluator, LinearEvaluator},
//!     offense::OffenseExtractor,
//!     weights::WeightTable,
//! };
//!
//! let layout = Layout::default_capture().unwrap();
//! let distancer = MazeDistancer::new(&layout);
//! let state = CaptureState::new(layout);
//!
//! let evaluator = LinearEvaluator::new(OffenseExtractor, WeightTable::offense());
//! let ctx = DecisionContext::new(AgentIndex(0), &state, None, &distancer);
//! let score = evaluator.evaluate_action(&ctx, Direction::Stop);
//! assert!(score < 0.0);
//! ```

use std::fmt;

use capture_engine::{Direction, GameView};
use serde::Serialize;

use crate::{
    context::DecisionContext,
    feature::{FeatureKey, FeatureVector},
    weights::WeightTable,
};

/// Scores candidate actions.
pub trait ActionEvaluator<S>: fmt::Debug + Send + Sync {
    /// Scores `action` for the unit of `ctx`. `action` must be legal.
    fn evaluate_action(&self, ctx: &DecisionContext<'_, S>, action: Direction) -> f32;

    /// Scores `action` and reports how each feature contributed.
    fn explain_action(&self, ctx: &DecisionContext<'_, S>, action: Direction) -> ActionExplanation {
        ActionExplanation {
            action,
            score: self.evaluate_action(ctx, action),
            features: Vec::new(),
        }
    }
}

/// Emits the features of one candidate action.
pub trait FeatureExtractor: fmt::Debug + Send + Sync {
    type Key: FeatureKey;

    fn extract<S>(&self, ctx: &DecisionContext<'_, S>, action: Direction) -> FeatureVector<Self::Key>
    where
        S: GameView;
}

/// One feature's share of an action score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub feature: &'static str,
    pub value: f32,
    pub weight: f32,
}

/// An action score together with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionExplanation {
    pub action: Direction,
    pub score: f32,
    pub features: Vec<FeatureContribution>,
}

/// Scores actions as the dot product of extracted features and fixed weights.
#[derive(Debug, Clone)]
pub struct LinearEvaluator<X>
where
    X: FeatureExtractor,
{
    extractor: X,
    weights: WeightTable<X::Key>,
}

impl<X> LinearEvaluator<X>
where
    X: FeatureExtractor,
{
    #[must_use]
    pub fn new(extractor: X, weights: WeightTable<X::Key>) -> Self {
        Self { extractor, weights }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightTable<X::Key> {
        &self.weights
    }

    #[must_use]
    pub fn features<S>(&self, ctx: &DecisionContext<'_, S>, action: Direction) -> FeatureVector<X::Key>
    where
        S: GameView,
    {
        self.extractor.extract(ctx, action)
    }
}

impl<S, X> ActionEvaluator<S> for LinearEvaluator<X>
where
    S: GameView,
    X: FeatureExtractor,
{
    fn evaluate_action(&self, ctx: &DecisionContext<'_, S>, action: Direction) -> f32 {
        let features = self.features(ctx, action);
        let score = features.dot(&self.weights);
        tracing::trace!(agent = %ctx.agent, %action, %features, score, "features extracted");
        score
    }

    fn explain_action(&self, ctx: &DecisionContext<'_, S>, action: Direction) -> ActionExplanation {
        let features = self.features(ctx, action);
        ActionExplanation {
            action,
            score: features.dot(&self.weights),
            features: features
                .iter()
                .map(|(key, value)| FeatureContribution {
                    feature: key.name(),
                    value,
                    weight: self.weights.weight(key),
                })
                .collect(),
        }
    }
}
