//! Random number source for hit rolls, damage, trap odds and loot picks.
//!
//! Every random decision in a turn draws from a single caller-owned
//! [`RngOracle`] passed by `&mut`, so a seeded [`GameRng`] replays an
//! encounter exactly.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Stateful random source consumed by the combat rules.
pub trait RngOracle {
    /// Next raw 32-bit value.
    fn next_u32(&mut self) -> u32;

    /// Uniform value in `0..bound`. Returns 0 when `bound` is 0.
    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.next_u32() % bound
    }

    /// Uniform value in `[min, max]`. Returns `min` when the range is empty.
    fn range_inclusive(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        match (max - min).checked_add(1) {
            Some(span) => min + self.below(span),
            // 0..=u32::MAX
            None => self.next_u32(),
        }
    }

    /// Returns true with the given probability (clamped into `[0, 1]`, NaN
    /// never succeeds).
    fn chance(&mut self, probability: f32) -> bool {
        let p = unit_probability(probability);
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0) < p
    }
}

fn unit_probability(probability: f32) -> f64 {
    if probability.is_nan() {
        return 0.0;
    }
    f64::from(probability.clamp(0.0, 1.0))
}

/// Seeded ChaCha8 generator.
///
/// Only the seed is serialized; a restored generator restarts its stream.
#[derive(Debug, Clone)]
pub struct GameRng {
    rng: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RngOracle for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        self.rng.gen_range(0..bound)
    }

    fn chance(&mut self, probability: f32) -> bool {
        self.rng.gen_bool(unit_probability(probability))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for GameRng {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.seed, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for GameRng {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let seed = <u64 as serde::Deserialize>::deserialize(deserializer)?;
        Ok(GameRng::new(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn below_zero_is_zero() {
        let mut rng = GameRng::new(1);
        assert_eq!(rng.below(0), 0);
    }

    #[test]
    fn range_inclusive_stays_in_bounds() {
        let mut rng = GameRng::new(7);
        for _ in 0..200 {
            let v = rng.range_inclusive(5, 15);
            assert!((5..=15).contains(&v));
        }
        assert_eq!(rng.range_inclusive(9, 3), 9);
    }

    #[test]
    fn full_width_range_does_not_overflow() {
        let mut rng = GameRng::new(11);
        let mut scripted = ScriptedRng::new([u32::MAX, 0]);
        for _ in 0..16 {
            rng.range_inclusive(0, u32::MAX);
        }
        assert_eq!(scripted.range_inclusive(0, u32::MAX), u32::MAX);
        assert_eq!(scripted.range_inclusive(0, u32::MAX), 0);
        assert_eq!(rng.range_inclusive(u32::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn chance_extremes() {
        let mut rng = GameRng::new(3);
        for _ in 0..50 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
        }
    }

    #[test]
    fn out_of_range_probabilities_are_clamped() {
        let mut rng = GameRng::new(5);
        for _ in 0..50 {
            assert!(!rng.chance(f32::NAN));
            assert!(!rng.chance(-0.5));
            assert!(!rng.chance(f32::NEG_INFINITY));
            assert!(rng.chance(1.5));
            assert!(rng.chance(f32::INFINITY));
        }
        let mut scripted = ScriptedRng::new([0]);
        assert!(!scripted.chance(f32::NAN));
    }
}
