use capture_policy::weights::TeamWeights;
use serde::{Deserialize, Serialize};

/// Weight tables of a team, as stored on disk.
///
/// Either table may be omitted, in which case the built-in one is used.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PolicyModel {
    pub name: String,
    #[serde(flatten)]
    pub weights: TeamWeights,
}

impl PolicyModel {
    pub const BASELINE_NAME: &'static str = "baseline";

    pub fn baseline() -> Self {
        Self {
            name: Self::BASELINE_NAME.to_owned(),
            weights: TeamWeights::default(),
        }
    }
}
