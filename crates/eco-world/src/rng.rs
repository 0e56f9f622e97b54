//! Random draws used by the update rule.

use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Source of the three uniform draws the rules consume
pub trait RandomSource {
    /// Offset along one axis, in [-1, 1]
    fn direction(&mut self) -> i32;
    /// Per-channel color change on reproduction, in [-3, 3]
    fn color_mutation(&mut self) -> i32;
    /// Percentage roll in [0, 99]. Reserved for probability gates.
    fn chance(&mut self) -> i32;
}

/// One ChaCha engine shared by three distributions
#[derive(Debug, Clone)]
pub struct EcoRng {
    rng: ChaCha8Rng,
    direction: Uniform<i32>,
    color_mutation: Uniform<i32>,
    chance: Uniform<i32>,
}

impl EcoRng {
    /// Seed from `seed` when given, otherwise from OS entropy
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seed_from_u64(seed),
            None => Self::from_engine(ChaCha8Rng::from_entropy()),
        }
    }

    pub fn seed_from_u64(seed: u64) -> Self {
        Self::from_engine(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_engine(rng: ChaCha8Rng) -> Self {
        Self {
            rng,
            direction: Uniform::new_inclusive(-1, 1),
            color_mutation: Uniform::new_inclusive(-3, 3),
            chance: Uniform::new_inclusive(0, 99),
        }
    }
}

impl RandomSource for EcoRng {
    fn direction(&mut self) -> i32 {
        self.direction.sample(&mut self.rng)
    }

    fn color_mutation(&mut self) -> i32 {
        self.color_mutation.sample(&mut self.rng)
    }

    fn chance(&mut self) -> i32 {
        self.chance.sample(&mut self.rng)
    }
}

/// Replays queued draws in order.
///
/// Each distribution has its own queue; an exhausted queue yields 0, which
/// is the "stay put" direction and the "no change" color mutation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRng {
    directions: VecDeque<i32>,
    color_mutations: VecDeque<i32>,
    chances: VecDeque<i32>,
}

impl ScriptedRng {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_directions(mut self, draws: impl IntoIterator<Item = i32>) -> Self {
        self.directions.extend(draws);
        self
    }

    pub fn with_color_mutations(mut self, draws: impl IntoIterator<Item = i32>) -> Self {
        self.color_mutations.extend(draws);
        self
    }

    pub fn with_chances(mut self, draws: impl IntoIterator<Item = i32>) -> Self {
        self.chances.extend(draws);
        self
    }

    /// Queue one neighbor offset (dx drawn first, then dy)
    pub fn push_offset(&mut self, dx: i32, dy: i32) {
        self.directions.push_back(dx);
        self.directions.push_back(dy);
    }

    pub fn push_color_mutation(&mut self, dr: i32, dg: i32, db: i32) {
        self.color_mutations.extend([dr, dg, db]);
    }

    pub fn directions_left(&self) -> usize {
        self.directions.len()
    }

    pub fn color_mutations_left(&self) -> usize {
        self.color_mutations.len()
    }
}

impl RandomSource for ScriptedRng {
    fn direction(&mut self) -> i32 {
        self.directions.pop_front().unwrap_or(0)
    }

    fn color_mutation(&mut self) -> i32 {
        self.color_mutations.pop_front().unwrap_or(0)
    }

    fn chance(&mut self) -> i32 {
        self.chances.pop_front().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_draws_cover_their_ranges() {
        let mut rng = EcoRng::seed_from_u64(42);

        let directions: HashSet<i32> = (0..1000).map(|_| rng.direction()).collect();
        assert_eq!(directions, (-1..=1).collect());

        let mutations: HashSet<i32> = (0..1000).map(|_| rng.color_mutation()).collect();
        assert_eq!(mutations, (-3..=3).collect());

        let chances: Vec<i32> = (0..5000).map(|_| rng.chance()).collect();
        assert!(chances.iter().all(|c| (0..=99).contains(c)));
        assert!(chances.contains(&0));
        assert!(chances.contains(&99));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = EcoRng::new(Some(7));
        let mut b = EcoRng::new(Some(7));
        for _ in 0..100 {
            assert_eq!(a.direction(), b.direction());
            assert_eq!(a.color_mutation(), b.color_mutation());
        }
    }

    #[test]
    fn test_scripted_replays_then_goes_neutral() {
        let mut rng = ScriptedRng::new()
            .with_directions([1, -1])
            .with_color_mutations([3])
            .with_chances([42]);
        rng.push_offset(0, 1);
        rng.push_color_mutation(-2, 0, 2);

        assert_eq!(rng.directions_left(), 4);
        assert_eq!(rng.direction(), 1);
        assert_eq!(rng.direction(), -1);
        assert_eq!(rng.direction(), 0);
        assert_eq!(rng.direction(), 1);
        assert_eq!(rng.direction(), 0);

        assert_eq!(rng.color_mutation(), 3);
        assert_eq!(rng.color_mutation(), -2);
        assert_eq!(rng.color_mutations_left(), 2);

        assert_eq!(rng.chance(), 42);
        assert_eq!(rng.chance(), 0);
    }
}
