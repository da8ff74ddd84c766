//! Conditioned Galton-Watson tree generator

use rand::Rng;
use tracing::{debug, instrument, warn};
use crate::{
    dist::{MultinomialSampler, OffspringDistribution, OffspringTable},
    sampler::{support_admits, ConditionedSampler, CycleLemma, SequenceBuilder},
    tree::{Tree, TreeBuilder},
    GaltonWatsonError, Result,
};

/// A generated tree together with the rejection attempts it cost
#[derive(Clone, Debug)]
pub struct GenerationReport {
    /// The tree, payloads are creation numbers with the root at 0
    pub tree: Tree<usize>,
    /// Multinomial draws made before acceptance, 0 for the one-node fast path
    pub attempts: u64,
}

/// Generator for Galton-Watson trees conditioned on their node count
///
/// The algorithm is due to Devroye (2011), "Simulating size-constrained
/// Galton-Watson trees".
#[derive(Clone, Debug)]
pub struct GaltonWatson {
    node_count: usize,
    sampler: ConditionedSampler,
}

impl GaltonWatson {
    /// Create a generator for trees on `node_count` nodes
    ///
    /// Configuration and degenerate inputs are rejected here, before any
    /// randomness is drawn.
    pub fn new<D: OffspringDistribution + ?Sized>(dist: &D, node_count: usize) -> Result<Self> {
        let table = OffspringTable::from_distribution(dist)?;
        Self::from_table(table, node_count)
    }

    /// Create a generator from a validated table
    pub fn from_table(table: OffspringTable, node_count: usize) -> Result<Self> {
        if node_count == 0 {
            return Err(GaltonWatsonError::ZeroNodes);
        }
        Ok(GaltonWatson {
            node_count,
            sampler: ConditionedSampler::new(MultinomialSampler::from_table(table)),
        })
    }

    /// Replace the rejection attempt budget
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Result<Self> {
        self.sampler = self.sampler.with_max_attempts(max_attempts)?;
        Ok(self)
    }

    /// Number of nodes in every generated tree
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Rejection attempt budget
    pub fn max_attempts(&self) -> u64 {
        self.sampler.max_attempts()
    }

    /// The offspring table in use
    pub fn table(&self) -> &OffspringTable {
        self.sampler.multinomial().table()
    }

    /// False when the offspring support provably cannot yield the node count
    pub fn is_feasible(&self) -> bool {
        self.node_count == 1 || support_admits(self.table().support(), self.node_count)
    }

    /// Draw a tree
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Tree<usize>> {
        self.sample_with_report(rng).map(|report| report.tree)
    }

    /// Draw a tree and report how many rejection attempts it took
    #[instrument(level = "debug", skip(self, rng), fields(node_count = self.node_count))]
    pub fn sample_with_report<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GenerationReport> {
        if self.node_count == 1 {
            return Ok(GenerationReport { tree: Tree::new(0), attempts: 0 });
        }

        if !self.is_feasible() {
            warn!(node_count = self.node_count, "offspring support cannot produce this node count");
            return Err(GaltonWatsonError::Infeasible { node_count: self.node_count });
        }

        let accepted = self.sampler.sample(self.node_count, rng)?;

        let mut sequence = SequenceBuilder::build(&accepted.counts, rng);
        CycleLemma::rotate(&mut sequence)?;
        let tree = TreeBuilder::build(&sequence)?;

        debug!(attempts = accepted.attempts, "generated tree");
        Ok(GenerationReport { tree, attempts: accepted.attempts })
    }
}
