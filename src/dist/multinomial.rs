//! Multinomial sampling by sequential conditional binomials

use std::collections::BTreeMap;
use rand::Rng;
use rand_distr::{Binomial, Distribution};
use serde::{Serialize, Deserialize};
use tracing::trace;
use super::{OffspringDistribution, OffspringTable};
use crate::{GaltonWatsonError, Result};

/// Joint counts per category from one multinomial draw
///
/// Only categories with a nonzero count are stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    counts: BTreeMap<usize, u64>,
}

impl CategoryCounts {
    /// Count for `category`, zero if absent
    pub fn get(&self, category: usize) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Iterate over `(category, count)` pairs with nonzero count
    pub fn iter(&self) -> impl Iterator<Item = (usize, u64)> + '_ {
        self.counts.iter().map(|(&k, &c)| (k, c))
    }

    /// Number of categories with a nonzero count
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True when no trial was drawn
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of trials, the sum of all counts
    pub fn trials(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Total offspring, the sum of `category * count`
    pub fn weighted_sum(&self) -> u64 {
        self.counts
            .iter()
            .fold(0u64, |acc, (&k, &c)| acc.saturating_add((k as u64).saturating_mul(c)))
    }
}

impl FromIterator<(usize, u64)> for CategoryCounts {
    fn from_iter<I: IntoIterator<Item = (usize, u64)>>(iter: I) -> Self {
        let mut counts = BTreeMap::new();
        for (k, c) in iter {
            if c > 0 {
                *counts.entry(k).or_insert(0) += c;
            }
        }
        CategoryCounts { counts }
    }
}

/// Multinomial sampler over an offspring table
///
/// A sample N_0, N_1, ... with n trials is drawn as
///   N_0 ~ Binomial(n, p_0),
///   N_1 ~ Binomial(n - N_0, p_1 / (1 - p_0)),
/// and so on, each conditioned on the counts before it.
#[derive(Clone, Debug)]
pub struct MultinomialSampler {
    table: OffspringTable,
    last_support: usize,
}

impl MultinomialSampler {
    /// Validate `dist` and build a sampler over it
    pub fn new<D: OffspringDistribution + ?Sized>(dist: &D) -> Result<Self> {
        let table = OffspringTable::from_distribution(dist)?;
        Ok(Self::from_table(table))
    }

    /// Build a sampler over an already validated table
    pub fn from_table(table: OffspringTable) -> Self {
        let last_support = table.last_support();
        MultinomialSampler { table, last_support }
    }

    /// The underlying table
    pub fn table(&self) -> &OffspringTable {
        &self.table
    }

    /// Draw category counts for `trials` independent trials
    pub fn sample<R: Rng + ?Sized>(&self, trials: u64, rng: &mut R) -> Result<CategoryCounts> {
        let mut counts = BTreeMap::new();
        let mut remaining = trials;
        let mut mass = self.table.total_mass();
        let mut category = 0;

        while remaining > 0 {
            // Unreachable while the last supported category absorbs the
            // remainder; kept as an invariant check on the loop bound
            if category > self.last_support {
                return Err(GaltonWatsonError::CategoryOverrun {
                    category,
                    max_category: self.table.max_category(),
                    remaining,
                });
            }

            let p = self.table.probability(category);
            let drawn = if category == self.last_support {
                // Conditional probability of the last category is one
                remaining
            } else if p <= 0.0 {
                0
            } else {
                let ratio = if mass > 0.0 { (p / mass).min(1.0) } else { 1.0 };
                Binomial::new(remaining, ratio)
                    .map_err(|e| GaltonWatsonError::InvalidConfig(e.to_string()))?
                    .sample(rng)
            };

            if drawn > 0 {
                trace!(category, drawn, remaining, "binomial draw");
                counts.insert(category, drawn);
                remaining -= drawn;
            }
            mass -= p;
            category += 1;
        }

        Ok(CategoryCounts { counts })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_trials() {
        let sampler = MultinomialSampler::from_table(OffspringTable::binary());
        let mut rng = StdRng::seed_from_u64(0);
        let counts = sampler.sample(0, &mut rng).unwrap();
        assert!(counts.is_empty());
        assert_eq!(counts.trials(), 0);
    }

    #[test]
    fn test_single_category_absorbs_everything() {
        let table = OffspringTable::from_pairs(&[(3, 1.0)]).unwrap();
        let sampler = MultinomialSampler::from_table(table);
        let mut rng = StdRng::seed_from_u64(0);
        let counts = sampler.sample(17, &mut rng).unwrap();
        assert_eq!(counts.get(3), 17);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.weighted_sum(), 51);
    }

    #[test]
    fn test_same_seed_same_sample() {
        let table = OffspringTable::poisson(1.0, 10).unwrap();
        let sampler = MultinomialSampler::from_table(table);
        let a = sampler.sample(500, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = sampler.sample(500, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unnormalized_weights() {
        // Weights 1:1 behave like probabilities 1/2:1/2
        let table = OffspringTable::new(vec![2.0, 0.0, 2.0]).unwrap();
        let sampler = MultinomialSampler::from_table(table);
        let mut rng = StdRng::seed_from_u64(3);
        let counts = sampler.sample(10_000, &mut rng).unwrap();
        let leaves = counts.get(0) as f64 / 10_000.0;
        assert!((leaves - 0.5).abs() < 0.05, "leaf share was {}", leaves);
    }

    #[test]
    fn test_rounding_residue_lands_in_last_category() {
        // Ten weights of 0.1 do not subtract back to exactly zero
        let table = OffspringTable::new(vec![0.1; 10]).unwrap();
        let sampler = MultinomialSampler::from_table(table);
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..200 {
            let counts = sampler.sample(1_000, &mut rng).unwrap();
            assert_eq!(counts.trials(), 1_000);
            assert!(counts.iter().all(|(k, _)| k <= 9));
        }
    }

    #[test]
    fn test_counts_from_iter() {
        let counts: CategoryCounts = vec![(0, 2), (2, 1), (5, 0), (2, 1)].into_iter().collect();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(2), 2);
        assert_eq!(counts.trials(), 4);
        assert_eq!(counts.weighted_sum(), 4);
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_trials(
            weights in prop::collection::vec(0.0f64..1.0, 1..8),
            trials in 0u64..2_000,
            seed in any::<u64>(),
        ) {
            prop_assume!(weights.iter().any(|&w| w > 0.0));
            let table = OffspringTable::new(weights.clone()).unwrap();
            let sampler = MultinomialSampler::from_table(table);
            let mut rng = StdRng::seed_from_u64(seed);
            let counts = sampler.sample(trials, &mut rng).unwrap();

            prop_assert_eq!(counts.trials(), trials);
            for (k, c) in counts.iter() {
                prop_assert!(c <= trials);
                prop_assert!(weights[k] > 0.0);
            }
        }
    }
}
