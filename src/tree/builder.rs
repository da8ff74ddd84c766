//! Building a tree from its pre-order child-count sequence

use tracing::instrument;
use super::{NodeId, Tree};
use crate::{GaltonWatsonError, Result};

/// Materializes a tree from child counts in depth-first pre-order
///
/// Each node's payload is its creation number: the root is 0 and siblings
/// receive ascending numbers from left to right.
pub struct TreeBuilder;

impl TreeBuilder {
    /// Build the tree described by `sequence` in one linear pass
    ///
    /// The pre-order child counts of the result equal `sequence`. Fails if
    /// the sequence runs out of pending nodes early or leaves some unexpanded.
    #[instrument(level = "debug", skip(sequence), fields(len = sequence.len()))]
    pub fn build(sequence: &[usize]) -> Result<Tree<usize>> {
        let n = sequence.len();
        if n == 0 {
            return Err(GaltonWatsonError::InvalidOffspringSequence(
                "sequence is empty".to_string()
            ));
        }

        let mut tree = Tree::with_capacity(0, n);
        let mut stack: Vec<NodeId> = vec![tree.root()];
        let mut created = 0usize;

        for (cursor, &count) in sequence.iter().enumerate() {
            let Some(node) = stack.pop() else {
                return Err(GaltonWatsonError::InvalidOffspringSequence(
                    format!("tree completed after {} of {} entries", cursor, n)
                ));
            };
            if count > n - 1 - created {
                return Err(GaltonWatsonError::InvalidOffspringSequence(
                    format!("entry {} adds {} children beyond {} nodes", cursor, count, n)
                ));
            }

            let first = stack.len();
            for _ in 0..count {
                created += 1;
                stack.push(tree.push_child(node, created));
            }
            // Leftmost child on top so it is expanded next
            stack[first..].reverse();
        }

        if !stack.is_empty() {
            return Err(GaltonWatsonError::InvalidOffspringSequence(
                format!("{} nodes left without a child count", stack.len())
            ));
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::CycleLemma;
    use proptest::prelude::*;

    #[test]
    fn test_single_node() {
        let tree = TreeBuilder::build(&[0]).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.is_leaf(tree.root()));
    }

    #[test]
    fn test_cherry() {
        let tree = TreeBuilder::build(&[2, 0, 0]).unwrap();
        let root = tree.root();
        assert_eq!(tree.size(root), 3);
        let payloads: Vec<usize> = tree.children(root).iter().map(|&c| *tree.payload(c)).collect();
        assert_eq!(payloads, vec![1, 2]);
    }

    #[test]
    fn test_preorder_matches_sequence() {
        let sequence = [2, 1, 0, 3, 0, 0, 0];
        let tree = TreeBuilder::build(&sequence).unwrap();
        assert_eq!(tree.child_counts(), sequence.to_vec());
        assert_eq!(tree.height(tree.root()), 3);
    }

    #[test]
    fn test_rejects_invalid_sequences() {
        assert!(TreeBuilder::build(&[]).is_err());
        // Finishes after the first entry
        assert!(TreeBuilder::build(&[0, 0]).is_err());
        // Two nodes never get a child count
        assert!(TreeBuilder::build(&[2]).is_err());
        // Second entry overshoots the node budget
        assert!(TreeBuilder::build(&[1, 5, 0]).is_err());
    }

    proptest! {
        #[test]
        fn prop_builds_rotated_sequences(
            raw in (1usize..40).prop_flat_map(|n| prop::collection::vec(0usize..n, n - 1).prop_map(move |cuts| {
                let mut seq = vec![0; n];
                for cut in cuts {
                    seq[cut] += 1;
                }
                seq
            }))
        ) {
            let mut sequence = raw;
            CycleLemma::rotate(&mut sequence).unwrap();
            let tree = TreeBuilder::build(&sequence).unwrap();

            prop_assert_eq!(tree.node_count(), sequence.len());
            prop_assert_eq!(tree.size(tree.root()), sequence.len());
            prop_assert_eq!(tree.child_counts(), sequence);
        }
    }
}
