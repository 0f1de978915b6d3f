use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{defense::DefenseFeature, feature::FeatureKey, offense::OffenseFeature};

/// Immutable feature weights of one policy mode.
///
/// Serialized as a map from feature name to weight, e.g. `{"stop": -1000.0}`. Features
/// missing from the table weigh 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable<K>
where
    K: Ord,
{
    weights: BTreeMap<K, f32>,
}

impl<K> WeightTable<K>
where
    K: FeatureKey,
{
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, f32)>,
    {
        Self {
            weights: pairs.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn weight(&self, key: K) -> f32 {
        self.weights.get(&key).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f32)> + '_ {
        self.weights.iter().map(|(k, w)| (*k, *w))
    }
}

impl WeightTable<OffenseFeature> {
    pub const OFFENSE: [(OffenseFeature, f32); 14] = [
        (OffenseFeature::Stop, -1000.0),
        (OffenseFeature::NumInvaders, -1000.0),
        (OffenseFeature::NumPacman, -100.0),
        (OffenseFeature::SuccessorScore, 100.0),
        (OffenseFeature::InvaderDistance, -10.0),
        (OffenseFeature::DistanceToFood, -1.0),
        (OffenseFeature::DistanceToCapsule, -5.0),
        (OffenseFeature::GhostDistance, 5.0),
        (OffenseFeature::GoForFood, 50.0),
        (OffenseFeature::GoForCapsule, 100.0),
        (OffenseFeature::Loop, -300.0),
        (OffenseFeature::NoGhost, 30.0),
        (OffenseFeature::EatingPacman, 65.0),
        (OffenseFeature::OnAttack, 0.0),
    ];

    /// Built-in weights of the offensive policy.
    #[must_use]
    pub fn offense() -> Self {
        Self::from_pairs(Self::OFFENSE)
    }
}

impl Default for WeightTable<OffenseFeature> {
    fn default() -> Self {
        Self::offense()
    }
}

impl WeightTable<DefenseFeature> {
    pub const DEFENSE: [(DefenseFeature, f32); 7] = [
        (DefenseFeature::NumInvaders, -1000.0),
        (DefenseFeature::OnDefense, 10.0),
        (DefenseFeature::InvaderDistance, -10.0),
        (DefenseFeature::Stop, -1000.0),
        (DefenseFeature::Reverse, -2.0),
        (DefenseFeature::ClosestFood, -1.0),
        (DefenseFeature::NoisyInvaderDistance, -2.0),
    ];

    /// Built-in weights of the defensive policy.
    #[must_use]
    pub fn defense() -> Self {
        Self::from_pairs(Self::DEFENSE)
    }
}

impl Default for WeightTable<DefenseFeature> {
    fn default() -> Self {
        Self::defense()
    }
}

/// Weight tables of a two-unit team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamWeights {
    #[serde(default)]
    pub offense: WeightTable<OffenseFeature>,
    #[serde(default)]
    pub defense: WeightTable<DefenseFeature>,
}
