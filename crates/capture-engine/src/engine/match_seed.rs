use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for the sensor noise of a match.
///
/// This is a 128-bit seed for the random number generator that perturbs distance
/// readings. Two matches played with the same seed and the same deterministic agents
/// produce identical observations, which makes replays and regression tests reproducible.
///
/// Serialized as a 32-character hex string.
///
/// # Example
///
/// ```
/// use capture_engine::MatchSeed;
/// use rand::Rng as _;
///
/// let seed: MatchSeed = rand::rng().random();
/// let mut rng1 = seed.rng();
/// let mut rng2 = seed.rng();
/// assert_eq!(rng1.random::<u32>(), rng2.random::<u32>());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSeed([u8; 16]);

impl MatchSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }

    #[must_use]
    pub fn rng(&self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for MatchSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for MatchSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<MatchSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> MatchSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        MatchSeed(seed)
    }
}
