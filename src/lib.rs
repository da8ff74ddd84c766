//! # gwtree: Conditioned Galton-Watson trees
//!
//! This library draws random plane trees from a Galton-Watson branching
//! process conditioned to have exactly `N` nodes. The generator follows
//! Devroye's method: a multinomial sample of child counts conditioned on
//! summing to `N - 1`, shuffled and rotated into a valid depth-first order
//! by the cycle lemma, then materialized in one linear pass.
//!
//! ## Features
//!
//! - **Offspring distributions**: bounded tables, geometric, Poisson and binary presets
//! - **Sampling**: multinomial via sequential binomials, bounded rejection conditioning
//! - **Combinatorics**: Dvoretzky-Motzkin cycle lemma rotation
//! - **Trees**: arena-backed ordered trees with generic payloads
//! - **Configuration**: serde-backed generator configs with JSON persistence

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Offspring distributions and the multinomial sampler
pub mod dist;

/// Rejection conditioning, sequence shuffling and the cycle lemma
pub mod sampler;

/// Ordered tree data structure and sequence-driven construction
pub mod tree;

/// The generator and its configuration
pub mod core;

/// Utility functions and helpers
pub mod utils;

// Re-export commonly used types
pub use dist::{CategoryCounts, Geometric, MultinomialSampler, OffspringDistribution, OffspringTable};
pub use sampler::{ConditionedSampler, CycleLemma, SequenceBuilder};
pub use tree::{Node, NodeId, Tree, TreeBuilder};
pub use crate::core::{GaltonWatson, GenerationReport, GeneratorConfig};

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum GaltonWatsonError {
    /// A probability in the offspring table is below zero
    #[error("Negative probability {value} for category {category}")]
    NegativeProbability {
        /// Offending category
        category: usize,
        /// Offending value
        value: f64,
    },

    /// A probability in the offspring table is NaN or infinite
    #[error("Non-finite probability for category {0}")]
    NonFiniteProbability(usize),

    /// The offspring table carries no positive mass
    #[error("Offspring distribution has no positive mass")]
    EmptyDistribution,

    /// The sampler probed a category beyond the declared domain with trials left
    ///
    /// `MultinomialSampler` assigns all remaining trials to the last category
    /// with positive weight, so this only signals a broken loop invariant.
    #[error("Category {category} exceeds declared maximum {max_category} with {remaining} trials left")]
    CategoryOverrun {
        /// Probed category
        category: usize,
        /// Declared maximum category
        max_category: usize,
        /// Trials still unassigned
        remaining: u64,
    },

    /// A tree must have at least one node
    #[error("Node count must be positive")]
    ZeroNodes,

    /// No multiset of child counts from the support sums to `node_count - 1`
    #[error("Conditioning on {node_count} nodes is infeasible for this offspring support")]
    Infeasible {
        /// Requested node count
        node_count: usize,
    },

    /// The rejection loop ran out of attempts
    #[error("No sample with {node_count} nodes accepted after {attempts} attempts")]
    AttemptsExhausted {
        /// Requested node count
        node_count: usize,
        /// Attempts made
        attempts: u64,
    },

    /// A child-count sequence does not describe a tree
    #[error("Invalid offspring sequence: {0}")]
    InvalidOffspringSequence(String),

    /// Invalid tree operation
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// Invalid generator configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, GaltonWatsonError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        dist::{CategoryCounts, Geometric, MultinomialSampler, OffspringDistribution, OffspringTable},
        sampler::{ConditionedSampler, CycleLemma, SequenceBuilder},
        tree::{Node, NodeId, Tree, TreeBuilder},
        core::{GaltonWatson, GenerationReport, GeneratorConfig},
        Result, GaltonWatsonError,
    };
}
