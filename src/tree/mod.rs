//! Ordered rooted trees

mod node;
mod builder;

pub use node::{Node, NodeId, Tree};
pub use builder::TreeBuilder;
