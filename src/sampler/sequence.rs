//! Flattening category counts into a shuffled child-count sequence

use rand::seq::SliceRandom;
use rand::Rng;
use crate::dist::CategoryCounts;

/// Builds the per-node child-count array from accepted counts
pub struct SequenceBuilder;

impl SequenceBuilder {
    /// Repeat each category `k` exactly `c_k` times, in category order
    pub fn flatten(counts: &CategoryCounts) -> Vec<usize> {
        let mut sequence = Vec::with_capacity(counts.trials() as usize);
        for (category, count) in counts.iter() {
            sequence.extend(std::iter::repeat(category).take(count as usize));
        }
        sequence
    }

    /// Flatten then apply a uniform random permutation
    ///
    /// Every arrangement of the multiset must be equally likely before the
    /// cycle lemma picks a rotation, otherwise the tree law is biased.
    pub fn build<R: Rng + ?Sized>(counts: &CategoryCounts, rng: &mut R) -> Vec<usize> {
        let mut sequence = Self::flatten(counts);
        sequence.shuffle(rng);
        sequence
    }
}
