//! Turning offspring counts into a depth-first child-count sequence

mod conditioned;
mod sequence;
mod rotation;

pub use conditioned::{ConditionedSample, ConditionedSampler, support_admits};
pub use sequence::SequenceBuilder;
pub use rotation::CycleLemma;
