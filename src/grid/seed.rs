use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Upper bound (exclusive) for seeds drawn by [`SeedPolicy::RandomPerRepeat`].
pub const RANDOM_SEED_RANGE: u64 = 1_000_000;

/// How seeds are handed out to repeat groups.
///
/// All trials in one repeat group always share a seed (or all have none),
/// so every agent variant in the group plays the same game.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeedPolicy {
    /// No seeds, the engine draws fresh randomness for each game
    #[default]
    Unseeded,
    /// Every trial in every group gets this seed
    Fixed { seed: u64 },
    /// Each group gets a seed derived from `base` and the group index. The
    /// same base always produces the same seeds.
    PerRepeat { base: u64 },
    /// Each group draws a fresh seed below one million
    RandomPerRepeat,
}

impl SeedPolicy {
    /// One seed per repeat group.
    pub fn seeds(&self, repeats: usize) -> Vec<Option<u64>> {
        match self {
            SeedPolicy::Unseeded => vec![None; repeats],
            SeedPolicy::Fixed { seed } => vec![Some(*seed); repeats],
            SeedPolicy::PerRepeat { base } => {
                let mut rng = StdRng::seed_from_u64(*base);
                (0..repeats).map(|_| Some(rng.random::<u64>())).collect()
            }
            SeedPolicy::RandomPerRepeat => {
                let mut rng = rand::rng();
                (0..repeats)
                    .map(|_| Some(rng.random_range(0..RANDOM_SEED_RANGE)))
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseeded() {
        assert_eq!(SeedPolicy::Unseeded.seeds(3), vec![None, None, None]);
    }

    #[test]
    fn test_fixed() {
        assert_eq!(
            SeedPolicy::Fixed { seed: 5 }.seeds(2),
            vec![Some(5), Some(5)]
        );
    }

    #[test]
    fn test_per_repeat_is_reproducible() {
        let policy = SeedPolicy::PerRepeat { base: 42 };
        let a = policy.seeds(10);
        let b = policy.seeds(10);
        assert_eq!(a, b);
        assert!(a.iter().all(Option::is_some));

        // A longer run extends a shorter one
        assert_eq!(&policy.seeds(12)[..10], &a[..]);
    }

    #[test]
    fn test_random_per_repeat_in_range() {
        let seeds = SeedPolicy::RandomPerRepeat.seeds(50);
        assert_eq!(seeds.len(), 50);
        assert!(
            seeds
                .iter()
                .all(|s| s.is_some_and(|s| s < RANDOM_SEED_RANGE))
        );
    }
}
