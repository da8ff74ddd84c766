//! Dvoretzky-Motzkin cycle lemma
//!
//! For a sequence `x` of `n` non-negative integers summing to `n - 1`, the
//! walk `S_0 = 1, S_i = S_{i-1} + x_{i-1} - 1` ends at `S_n = 0`. Exactly one
//! cyclic rotation keeps the walk positive until the last step, and that
//! rotation is a valid pre-order child-count sequence of a plane tree.

use crate::{GaltonWatsonError, Result};

/// Rotation of child-count sequences into depth-first order
pub struct CycleLemma;

impl CycleLemma {
    /// The walk `S` of length `n + 1`
    pub fn prefix_walk(sequence: &[usize]) -> Vec<i64> {
        let mut walk = Vec::with_capacity(sequence.len() + 1);
        let mut height = 1i64;
        walk.push(height);
        for &x in sequence {
            height += x as i64 - 1;
            walk.push(height);
        }
        walk
    }

    /// First index in `1..=n` where the walk attains its minimum
    pub fn rotation_index(sequence: &[usize]) -> Result<usize> {
        Self::check_sum(sequence)?;

        let walk = Self::prefix_walk(sequence);
        let mut min_index = 1;
        for (i, &height) in walk.iter().enumerate().skip(2) {
            // Strict comparison keeps the earliest minimum
            if height < walk[min_index] {
                min_index = i;
            }
        }
        Ok(min_index)
    }

    /// Rotate `sequence` in place so it starts right after its first minimum
    pub fn rotate(sequence: &mut [usize]) -> Result<()> {
        let index = Self::rotation_index(sequence)?;
        sequence.rotate_left(index % sequence.len());
        Ok(())
    }

    /// Whether `sequence` is already a valid pre-order child-count sequence
    pub fn is_preorder(sequence: &[usize]) -> bool {
        if Self::check_sum(sequence).is_err() {
            return false;
        }
        let walk = Self::prefix_walk(sequence);
        let n = sequence.len();
        walk[1..n].iter().all(|&s| s > 0) && walk[n] == 0
    }

    fn check_sum(sequence: &[usize]) -> Result<()> {
        if sequence.is_empty() {
            return Err(GaltonWatsonError::InvalidOffspringSequence(
                "sequence is empty".to_string()
            ));
        }
        let total: u128 = sequence.iter().map(|&x| x as u128).sum();
        let expected = sequence.len() as u128 - 1;
        if total != expected {
            return Err(GaltonWatsonError::InvalidOffspringSequence(
                format!("child counts sum to {} but {} nodes need {}", total, sequence.len(), expected)
            ));
        }
        Ok(())
    }
}
