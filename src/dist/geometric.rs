//! Geometric offspring distribution

use rand::Rng;
use serde::{Serialize, Deserialize};
use super::OffspringTable;
use crate::{GaltonWatsonError, Result};

/// Number of failures before the first success in Bernoulli(`p`) trials
///
/// With `p = 1/2` the Galton-Watson tree conditioned on `n` nodes is a
/// uniformly random plane tree on `n` nodes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometric {
    p: f64,
}

impl Geometric {
    /// Create a geometric distribution with success probability `p` in (0, 1]
    pub fn new(p: f64) -> Result<Self> {
        if !(p > 0.0 && p <= 1.0) {
            return Err(GaltonWatsonError::InvalidConfig(
                format!("Geometric success probability must lie in (0, 1], got {}", p)
            ));
        }
        Ok(Geometric { p })
    }

    /// Success probability
    pub fn p(&self) -> f64 {
        self.p
    }

    /// Probability of exactly `k` failures
    pub fn probability(&self, k: usize) -> f64 {
        self.p * (1.0 - self.p).powf(k as f64)
    }

    /// Draw a sample by inversion
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        if self.p >= 1.0 {
            return 0;
        }
        // gen::<f64>() lies in [0, 1); flip it so ln never sees zero
        let u = 1.0 - rng.gen::<f64>();
        (u.ln() / (1.0 - self.p).ln()).floor() as u64
    }

    /// Truncate to categories `0..=max_category`
    ///
    /// A tree on `n` nodes never has a node with more than `n - 1` children,
    /// so truncating at `n - 1` leaves the conditioned law unchanged.
    pub fn to_table(&self, max_category: usize) -> Result<OffspringTable> {
        OffspringTable::new((0..=max_category).map(|k| self.probability(k)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_invalid_parameter() {
        assert!(Geometric::new(0.0).is_err());
        assert!(Geometric::new(1.5).is_err());
        assert!(Geometric::new(f64::NAN).is_err());
        assert!(Geometric::new(1.0).is_ok());
    }

    #[test]
    fn test_degenerate_sample() {
        let geo = Geometric::new(1.0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!((0..100).all(|_| geo.sample(&mut rng) == 0));
    }

    #[test]
    fn test_sample_mean() {
        // Mean of failures before success is (1 - p) / p = 1 for p = 1/2
        let geo = Geometric::new(0.5).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let n = 20_000;
        let total: u64 = (0..n).map(|_| geo.sample(&mut rng)).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 1.0).abs() < 0.1, "mean was {}", mean);
    }

    #[test]
    fn test_table() {
        let table = Geometric::new(0.5).unwrap().to_table(3).unwrap();
        let expected = [0.5, 0.25, 0.125, 0.0625];
        for (got, want) in table.probabilities().iter().zip(expected) {
            assert!((got - want).abs() < 1e-15);
        }
    }
}
