//! Generator configuration

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};
use super::GaltonWatson;
use crate::{
    dist::{Geometric, OffspringTable},
    sampler::ConditionedSampler,
    GaltonWatsonError, Result,
};

fn default_max_attempts() -> u64 {
    ConditionedSampler::DEFAULT_MAX_ATTEMPTS
}

/// Generator configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of nodes in each tree
    pub node_count: usize,
    /// Offspring weights indexed by number of children
    pub offspring: Vec<f64>,
    /// Rejection attempt budget per tree
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u64,
    /// Seed for a reproducible random stream, entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Uniformly random plane trees: geometric(1/2) offspring
    pub fn plane_trees(node_count: usize) -> Result<Self> {
        let table = Geometric::new(0.5)?.to_table(node_count.saturating_sub(1))?;
        Ok(Self::with_table(node_count, table))
    }

    /// Uniformly random full binary trees
    pub fn full_binary_trees(node_count: usize) -> Self {
        Self::with_table(node_count, OffspringTable::binary())
    }

    /// Cayley trees: Poisson(1) offspring
    pub fn cayley_trees(node_count: usize) -> Result<Self> {
        let table = OffspringTable::poisson(1.0, node_count.saturating_sub(1))?;
        Ok(Self::with_table(node_count, table))
    }

    fn with_table(node_count: usize, table: OffspringTable) -> Self {
        GeneratorConfig {
            node_count,
            offspring: table.probabilities().to_vec(),
            max_attempts: default_max_attempts(),
            seed: None,
        }
    }

    /// Set the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.node_count == 0 {
            return Err(GaltonWatsonError::ZeroNodes);
        }

        if self.max_attempts == 0 {
            return Err(GaltonWatsonError::InvalidConfig(
                "max_attempts must be positive".to_string()
            ));
        }

        OffspringTable::new(self.offspring.clone())?;
        Ok(())
    }

    /// Build the generator described by this config
    pub fn build(&self) -> Result<GaltonWatson> {
        self.validate()?;
        let table = OffspringTable::new(self.offspring.clone())?;
        GaltonWatson::from_table(table, self.node_count)?
            .with_max_attempts(self.max_attempts)
    }

    /// Random stream for this config
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::full_binary_trees(15)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = GeneratorConfig::default();
        assert!(config.validate().is_ok());

        config.node_count = 0;
        assert!(matches!(config.validate(), Err(GaltonWatsonError::ZeroNodes)));

        config.node_count = 5;
        config.offspring = vec![0.5, -0.5];
        assert!(config.validate().is_err());

        config.offspring = vec![0.5, 0.5];
        config.max_attempts = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_predefined_configs() {
        let plane = GeneratorConfig::plane_trees(10).unwrap();
        assert!(plane.validate().is_ok());
        assert_eq!(plane.offspring.len(), 10);

        let cayley = GeneratorConfig::cayley_trees(8).unwrap();
        assert!(cayley.validate().is_ok());
        assert_eq!(cayley.offspring.len(), 8);

        assert_eq!(GeneratorConfig::full_binary_trees(7).offspring, vec![0.5, 0.0, 0.5]);
    }

    #[test]
    fn test_build_and_seeded_sample() {
        let config = GeneratorConfig::plane_trees(12).unwrap().with_seed(5);
        let gw = config.build().unwrap();
        assert_eq!(gw.node_count(), 12);
        assert_eq!(gw.max_attempts(), ConditionedSampler::DEFAULT_MAX_ATTEMPTS);

        let a = gw.sample(&mut config.rng()).unwrap();
        let b = gw.sample(&mut config.rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"node_count": 9, "offspring": [0.5, 0.0, 0.5]}"#).unwrap();
        assert_eq!(config.max_attempts, ConditionedSampler::DEFAULT_MAX_ATTEMPTS);
        assert_eq!(config.seed, None);
        assert_eq!(config, GeneratorConfig::full_binary_trees(9));
    }
}
