//! Offspring distributions over non-negative integer categories

mod geometric;
mod multinomial;

pub use geometric::Geometric;
pub use multinomial::{CategoryCounts, MultinomialSampler};

use serde::{Serialize, Deserialize};
use crate::{GaltonWatsonError, Result};

/// A probability mass function over child counts with a bounded domain
///
/// Categories are probed in increasing order from 0 up to and including
/// `max_category`. Categories beyond it are never queried.
pub trait OffspringDistribution {
    /// Largest category the distribution declares
    fn max_category(&self) -> usize;

    /// Probability of having `category` children
    fn probability(&self, category: usize) -> f64;
}

/// An explicit offspring table indexed by category
///
/// Entry `k` holds the weight of a node having `k` children. Weights need
/// not sum to one: samplers treat the table as its normalized distribution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OffspringTable {
    probs: Vec<f64>,
}

impl OffspringTable {
    /// Create a table from per-category weights
    pub fn new(probs: Vec<f64>) -> Result<Self> {
        for (category, &value) in probs.iter().enumerate() {
            if !value.is_finite() {
                return Err(GaltonWatsonError::NonFiniteProbability(category));
            }
            if value < 0.0 {
                return Err(GaltonWatsonError::NegativeProbability { category, value });
            }
        }

        if !probs.iter().any(|&p| p > 0.0) {
            return Err(GaltonWatsonError::EmptyDistribution);
        }

        Ok(OffspringTable { probs })
    }

    /// Create a table from sparse `(category, probability)` pairs
    ///
    /// Repeated categories accumulate. The table is dense up to the largest
    /// category given.
    pub fn from_pairs(pairs: &[(usize, f64)]) -> Result<Self> {
        let mut len = 0;
        for &(category, _) in pairs {
            let end = category.checked_add(1).ok_or_else(|| GaltonWatsonError::InvalidConfig(
                format!("Category {} is too large for a table", category)
            ))?;
            len = len.max(end);
        }
        let mut probs = vec![0.0; len];
        for &(category, p) in pairs {
            probs[category] += p;
        }
        Self::new(probs)
    }

    /// Snapshot any bounded distribution into a table
    pub fn from_distribution<D: OffspringDistribution + ?Sized>(dist: &D) -> Result<Self> {
        let probs = (0..=dist.max_category())
            .map(|k| dist.probability(k))
            .collect();
        Self::new(probs)
    }

    /// Half the nodes are leaves, half have two children: full binary trees
    pub fn binary() -> Self {
        OffspringTable { probs: vec![0.5, 0.0, 0.5] }
    }

    /// Poisson(`lambda`) truncated at `max_category`
    ///
    /// Poisson(1) conditioned on `n` nodes gives uniformly random labelled
    /// rooted trees (Cayley trees) once labels are permuted.
    pub fn poisson(lambda: f64, max_category: usize) -> Result<Self> {
        if !(lambda.is_finite() && lambda > 0.0) {
            return Err(GaltonWatsonError::InvalidConfig(
                format!("Poisson rate must be positive, got {}", lambda)
            ));
        }

        let mut probs = Vec::with_capacity(max_category + 1);
        let mut term = (-lambda).exp();
        for k in 0..=max_category {
            probs.push(term);
            term *= lambda / (k + 1) as f64;
        }
        Self::new(probs)
    }

    /// The raw weights
    pub fn probabilities(&self) -> &[f64] {
        &self.probs
    }

    /// Sum of all weights
    pub fn total_mass(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Categories with positive weight, in increasing order
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.probs
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > 0.0)
            .map(|(k, _)| k)
    }

    /// Largest category with positive weight
    pub fn last_support(&self) -> usize {
        // `new` guarantees at least one positive entry
        self.support().last().unwrap_or(0)
    }

    /// Expected number of children under the normalized table
    ///
    /// A mean of one makes the unconditioned process critical.
    pub fn mean(&self) -> f64 {
        let weighted: f64 = self.probs
            .iter()
            .enumerate()
            .map(|(k, &p)| k as f64 * p)
            .sum();
        weighted / self.total_mass()
    }
}

impl OffspringDistribution for OffspringTable {
    fn max_category(&self) -> usize {
        self.probs.len().saturating_sub(1)
    }

    fn probability(&self, category: usize) -> f64 {
        self.probs.get(category).copied().unwrap_or(0.0)
    }
}
