use capture_engine::{AgentIndex, Position};
use capture_policy::{evaluator::ActionExplanation, policy::PolicyMode};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ExplanationReport {
    pub agent: AgentIndex,
    pub mode: PolicyMode,
    pub moves_played: usize,
    pub position: Option<Position>,
    pub actions: Vec<ActionExplanation>,
}
