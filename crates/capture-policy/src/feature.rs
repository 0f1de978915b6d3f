//! Sparse feature vectors keyed by a closed set of feature names.
//!
//! Each extractor owns an enum of feature keys ([`OffenseFeature`](crate::offense::OffenseFeature),
//! [`DefenseFeature`](crate::defense::DefenseFeature)). Its [`WeightTable`] uses the same key
//! type, so a feature that has no weight, or a weight that has no feature, is a compile-time
//! error rather than a silently ignored string.
//!
//! A [`FeatureVector`] holds only the features an extractor emitted for one candidate action.
//! Keys that were not emitted count as zero when the vector is scored.

use std::{collections::BTreeMap, fmt};

use serde::{Serialize, de::DeserializeOwned};

use crate::weights::WeightTable;

/// A feature name.
///
/// Keys serialize as their camel-case names (e.g. `distanceToFood`), which is also the
/// form used in weight files.
pub trait FeatureKey:
    Copy + Ord + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Every key, in declaration order.
    const ALL: &'static [Self];

    /// The camel-case name of this key.
    fn name(self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<K> {
    values: BTreeMap<K, f32>,
}

impl<K> Default for FeatureVector<K> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }
}

impl<K> FeatureVector<K>
where
    K: FeatureKey,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `value`, overwriting an earlier value.
    pub fn set(&mut self, key: K, value: f32) {
        self.values.insert(key, value);
    }

    #[must_use]
    pub fn get(&self, key: K) -> Option<f32> {
        self.values.get(&key).copied()
    }

    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.values.contains_key(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f32)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    /// `Σ feature × weight` over the emitted features.
    #[must_use]
    pub fn dot(&self, weights: &WeightTable<K>) -> f32 {
        self.iter().map(|(k, v)| v * weights.weight(k)).sum()
    }
}

impl<K> fmt::Display for FeatureVector<K>
where
    K: FeatureKey,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {value}", key.name())?;
        }
        write!(f, "}}")
    }
}

/// Converts a distance into a feature value.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn value(n: u32) -> f32 {
    n as f32
}

/// Converts a number of units or cells into a feature value.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn count(n: usize) -> f32 {
    n as f32
}

/// Converts a signed score into a feature value.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn signed_value(n: i32) -> f32 {
    n as f32
}
