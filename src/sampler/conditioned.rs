//! Multinomial sampling conditioned on the total offspring count

use rand::Rng;
use tracing::{debug, instrument, trace, warn};
use crate::dist::{CategoryCounts, MultinomialSampler};
use crate::{GaltonWatsonError, Result};

/// An accepted multinomial sample and the attempts it took
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConditionedSample {
    /// Child counts per category, summing to `node_count` trials
    pub counts: CategoryCounts,
    /// Number of multinomial draws made, including the accepted one
    pub attempts: u64,
}

/// Rejection sampler for multinomial counts with total offspring `n - 1`
///
/// Draws `n` trials until `sum(k * c_k) == n - 1`. The attempt budget turns
/// an infeasible or vanishingly unlikely target into a reported error.
#[derive(Clone, Debug)]
pub struct ConditionedSampler {
    multinomial: MultinomialSampler,
    max_attempts: u64,
}

impl ConditionedSampler {
    /// Attempt budget used when none is given
    pub const DEFAULT_MAX_ATTEMPTS: u64 = 1_000_000;

    /// Create a sampler with the default attempt budget
    pub fn new(multinomial: MultinomialSampler) -> Self {
        ConditionedSampler {
            multinomial,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Replace the attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Result<Self> {
        if max_attempts == 0 {
            return Err(GaltonWatsonError::InvalidConfig(
                "max_attempts must be positive".to_string()
            ));
        }
        self.max_attempts = max_attempts;
        Ok(self)
    }

    /// Attempt budget
    pub fn max_attempts(&self) -> u64 {
        self.max_attempts
    }

    /// The unconditioned sampler
    pub fn multinomial(&self) -> &MultinomialSampler {
        &self.multinomial
    }

    /// Draw counts for `node_count` nodes whose offspring total `node_count - 1`
    #[instrument(level = "debug", skip(self, rng))]
    pub fn sample<R: Rng + ?Sized>(&self, node_count: usize, rng: &mut R) -> Result<ConditionedSample> {
        if node_count == 0 {
            return Err(GaltonWatsonError::ZeroNodes);
        }

        let trials = node_count as u64;
        let target = trials - 1;

        for attempt in 1..=self.max_attempts {
            let counts = self.multinomial.sample(trials, rng)?;
            let total = counts.weighted_sum();
            if total == target {
                debug!(attempts = attempt, "accepted multinomial sample");
                return Ok(ConditionedSample { counts, attempts: attempt });
            }
            trace!(attempt, total, target, "rejected multinomial sample");
        }

        warn!(node_count, attempts = self.max_attempts, "rejection budget exhausted");
        Err(GaltonWatsonError::AttemptsExhausted {
            node_count,
            attempts: self.max_attempts,
        })
    }
}

/// Whether the offspring support can produce a tree on `node_count` nodes
///
/// Checks the bounds `n * min <= n - 1 <= n * max` and that `n - 1 - n * min`
/// is a multiple of the gcd of pairwise support differences. Returning false
/// proves the rejection loop can never accept; returning true does not
/// guarantee it will.
pub fn support_admits<I>(support: I, node_count: usize) -> bool
where
    I: IntoIterator<Item = usize>,
{
    let support: Vec<u128> = support.into_iter().map(|k| k as u128).collect();
    let (Some(&min), Some(&max)) = (support.iter().min(), support.iter().max()) else {
        return false;
    };
    if node_count == 0 {
        return false;
    }

    let n = node_count as u128;
    let target = n - 1;
    let lower = n * min;
    if target < lower || target > n * max {
        return false;
    }

    let step = support.iter().fold(0, |g, &k| gcd(g, k - min));
    if step == 0 {
        target == lower
    } else {
        (target - lower) % step == 0
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::OffspringTable;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sampler(pairs: &[(usize, f64)]) -> ConditionedSampler {
        let table = OffspringTable::from_pairs(pairs).unwrap();
        ConditionedSampler::new(MultinomialSampler::from_table(table))
    }

    #[test]
    fn test_binary_three_nodes() {
        let sampler = sampler(&[(0, 0.5), (2, 0.5)]);
        let mut rng = StdRng::seed_from_u64(7);
        let sample = sampler.sample(3, &mut rng).unwrap();
        assert_eq!(sample.counts.get(0), 2);
        assert_eq!(sample.counts.get(2), 1);
        assert!(sample.attempts >= 1);
    }

    #[test]
    fn test_zero_nodes() {
        let sampler = sampler(&[(0, 0.5), (2, 0.5)]);
        let mut rng = StdRng::seed_from_u64(7);
        assert!(matches!(sampler.sample(0, &mut rng), Err(GaltonWatsonError::ZeroNodes)));
    }

    #[test]
    fn test_infeasible_target_exhausts_budget() {
        // Every node has two children, so the offspring total is always even
        let sampler = sampler(&[(2, 1.0)]).with_max_attempts(50).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        match sampler.sample(4, &mut rng) {
            Err(GaltonWatsonError::AttemptsExhausted { node_count, attempts }) => {
                assert_eq!(node_count, 4);
                assert_eq!(attempts, 50);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_budget_rejected() {
        assert!(sampler(&[(0, 1.0)]).with_max_attempts(0).is_err());
    }

    #[test]
    fn test_support_admits() {
        assert!(support_admits([0, 2], 3));
        assert!(!support_admits([0, 2], 4));
        assert!(!support_admits([2], 4));
        assert!(!support_admits([1, 2], 5));
        assert!(support_admits([0, 1], 10));
        assert!(support_admits([0, 3], 7));
        assert!(!support_admits([0, 3], 8));
        assert!(support_admits([0], 1));
        assert!(!support_admits([0], 2));
        assert!(!support_admits(Vec::<usize>::new(), 3));
    }

    proptest! {
        #[test]
        fn prop_accepted_samples_hit_target(node_count in 1usize..40, seed in any::<u64>()) {
            let sampler = sampler(&[(0, 0.5), (1, 0.25), (3, 0.25)]);
            let mut rng = StdRng::seed_from_u64(seed);
            let sample = sampler.sample(node_count, &mut rng).unwrap();
            prop_assert_eq!(sample.counts.trials(), node_count as u64);
            prop_assert_eq!(sample.counts.weighted_sum(), node_count as u64 - 1);
        }
    }
}
