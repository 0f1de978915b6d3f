use std::{fmt, sync::Arc};

use capture_engine::{AgentIndex, Direction, DistanceOracle, GameView};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    context::DecisionContext,
    defense::DefenseExtractor,
    evaluator::{ActionEvaluator, ActionExplanation, LinearEvaluator},
    offense::OffenseExtractor,
    selector::{ActionScores, ActionSelector},
    weights::TeamWeights,
};

#[derive(
    Default,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::FromStr,
)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    #[default]
    Offensive,
    Defensive,
}

/// The observation a unit saw on its previous turn.
///
/// A policy never keeps state of its own; the caller threads the memory returned by
/// [`Policy::choose_action`] into the next call.
#[derive(Debug, Clone)]
pub struct ObservationMemory<S> {
    previous: Option<S>,
}

impl<S> Default for ObservationMemory<S> {
    fn default() -> Self {
        Self { previous: None }
    }
}

impl<S> ObservationMemory<S>
where
    S: Clone,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn remember(state: &S) -> Self {
        Self {
            previous: Some(state.clone()),
        }
    }

    #[must_use]
    pub fn previous(&self) -> Option<&S> {
        self.previous.as_ref()
    }
}

/// A reflex policy controlling one unit.
pub struct Policy<S> {
    agent: AgentIndex,
    mode: PolicyMode,
    selector: ActionSelector<'static, S>,
    distancer: Arc<dyn DistanceOracle>,
}

impl<S> fmt::Debug for Policy<S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("agent", &self.agent)
            .field("mode", &self.mode)
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}

/// Creates the policy of `agent` with the built-in weights of `mode`.
#[must_use]
pub fn create_policy<S>(
    agent: AgentIndex,
    mode: PolicyMode,
    distancer: Arc<dyn DistanceOracle>,
) -> Policy<S>
where
    S: GameView + 'static,
{
    Policy::new(agent, mode, &TeamWeights::default(), distancer)
}

impl<S> Policy<S>
where
    S: GameView + 'static,
{
    /// Creates the policy of `agent`, taking the weight table of `mode` from `weights`.
    #[must_use]
    pub fn new(
        agent: AgentIndex,
        mode: PolicyMode,
        weights: &TeamWeights,
        distancer: Arc<dyn DistanceOracle>,
    ) -> Self {
        let evaluator: Box<dyn ActionEvaluator<S>> = match mode {
            PolicyMode::Offensive => Box::new(LinearEvaluator::new(
                OffenseExtractor,
                weights.offense.clone(),
            )),
            PolicyMode::Defensive => Box::new(LinearEvaluator::new(
                DefenseExtractor,
                weights.defense.clone(),
            )),
        };
        Self {
            agent,
            mode,
            selector: ActionSelector::new(evaluator),
            distancer,
        }
    }

    #[must_use]
    pub fn agent(&self) -> AgentIndex {
        self.agent
    }

    #[must_use]
    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    #[must_use]
    pub fn context<'a>(
        &'a self,
        state: &'a S,
        memory: &'a ObservationMemory<S>,
    ) -> DecisionContext<'a, S> {
        DecisionContext::new(self.agent, state, memory.previous(), self.distancer.as_ref())
    }

    /// Chooses this unit's action for the turn observed in `state`.
    ///
    /// Returns the action and the memory to pass to the next call.
    pub fn choose_action<R>(
        &self,
        state: &S,
        memory: &ObservationMemory<S>,
        rng: &mut R,
    ) -> (Direction, ObservationMemory<S>)
    where
        R: Rng + ?Sized,
    {
        let ctx = self.context(state, memory);
        let action = self.selector.select_action(&ctx, rng);
        (action, ObservationMemory::remember(state))
    }

    #[must_use]
    pub fn score_actions(&self, state: &S, memory: &ObservationMemory<S>) -> ActionScores {
        self.selector.score_actions(&self.context(state, memory))
    }

    /// Per-feature breakdown of every legal action's score.
    #[must_use]
    pub fn explain(&self, state: &S, memory: &ObservationMemory<S>) -> Vec<ActionExplanation> {
        let ctx = self.context(state, memory);
        state
            .legal_actions(self.agent)
            .into_iter()
            .map(|action| self.selector.evaluator().explain_action(&ctx, action))
            .collect()
    }
}
