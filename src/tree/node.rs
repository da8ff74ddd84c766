//! Arena-backed plane tree with ordered children

use std::fmt;
use serde::{Serialize, Deserialize};
use crate::{GaltonWatsonError, Result};

/// Index of a node inside its [`Tree`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tree node holding a payload, its parent link and ordered children
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node<T> {
    payload: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl<T> Node<T> {
    fn new(payload: T) -> Self {
        Node {
            payload,
            parent: None,
            children: Vec::new(),
        }
    }

    /// The payload
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Mutable access to the payload
    pub fn payload_mut(&mut self) -> &mut T {
        &mut self.payload
    }

    /// Parent, `None` for a root or a detached node
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children from left to right
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// True if the node has no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// A rooted plane tree stored in an arena
///
/// - The root is always `NodeId` 0
/// - The order of children is the plane embedding and is significant
/// - Parent links are indices, used only for traversal
///
/// Methods taking a `NodeId` panic if the id was not minted by this tree.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTree<T>")]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Tree<T> {
    /// Create a tree with a single root node
    pub fn new(root: T) -> Self {
        Self::with_capacity(root, 1)
    }

    /// Create a single-node tree with room for `capacity` nodes
    pub fn with_capacity(root: T, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::new(root));
        Tree { nodes }
    }

    /// The root node id
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, detached ones included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    /// Look up a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.nodes.get_mut(id.0)
    }

    /// Payload of a node
    pub fn payload(&self, id: NodeId) -> &T {
        &self.nodes[id.0].payload
    }

    /// Children of a node from left to right
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// True if the node has no parent
    pub fn is_root(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_root()
    }

    /// True if the node has no children
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_leaf()
    }

    /// Add a detached node, to be linked with [`Tree::append_child`]
    pub fn insert(&mut self, payload: T) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(payload));
        id
    }

    /// Make `child` the new rightmost child of `parent`
    ///
    /// Fails if either id is unknown, if `child` is the root or already has a
    /// parent, or if the link would close a cycle.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if parent.0 >= self.nodes.len() || child.0 >= self.nodes.len() {
            return Err(GaltonWatsonError::InvalidTree(
                format!("Node {} or {} out of bounds", parent, child)
            ));
        }
        if child == self.root() {
            return Err(GaltonWatsonError::InvalidTree(
                "The root cannot become a child".to_string()
            ));
        }
        if self.nodes[child.0].parent.is_some() {
            return Err(GaltonWatsonError::InvalidTree(
                format!("Node {} already has a parent", child)
            ));
        }

        let mut ancestor = Some(parent);
        while let Some(node) = ancestor {
            if node == child {
                return Err(GaltonWatsonError::InvalidTree(
                    format!("Attaching {} under {} would create a cycle", child, parent)
                ));
            }
            ancestor = self.nodes[node.0].parent;
        }

        self.link(parent, child);
        Ok(())
    }

    /// Create a node holding `payload` as the new rightmost child of `parent`
    pub fn add_child(&mut self, parent: NodeId, payload: T) -> Result<NodeId> {
        if parent.0 >= self.nodes.len() {
            return Err(GaltonWatsonError::InvalidTree(
                format!("Node {} out of bounds", parent)
            ));
        }
        Ok(self.push_child(parent, payload))
    }

    /// Unchecked `add_child` for callers that only hold ids from this tree
    pub(crate) fn push_child(&mut self, parent: NodeId, payload: T) -> NodeId {
        let child = self.insert(payload);
        self.link(parent, child);
        child
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Nodes of the subtree at `id`, each before its children, left to right
    pub fn pre_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            order.push(node);
            stack.extend(self.children(node).iter().rev());
        }
        order
    }

    /// Nodes of the subtree at `id`, each after its children, left to right
    pub fn post_order(&self, id: NodeId) -> Vec<NodeId> {
        let mut pending = vec![id];
        let mut reversed = Vec::new();
        while let Some(node) = pending.pop() {
            reversed.push(node);
            pending.extend(self.children(node));
        }
        reversed.reverse();
        reversed
    }

    /// Number of nodes in the subtree at `id`
    pub fn size(&self, id: NodeId) -> usize {
        let mut sizes = vec![0usize; self.nodes.len()];
        for node in self.post_order(id) {
            sizes[node.0] = 1 + self.children(node)
                .iter()
                .map(|c| sizes[c.0])
                .sum::<usize>();
        }
        sizes[id.0]
    }

    /// Number of nodes on the longest downward path from `id`, a leaf has height 1
    pub fn height(&self, id: NodeId) -> usize {
        let mut heights = vec![0usize; self.nodes.len()];
        for node in self.post_order(id) {
            heights[node.0] = 1 + self.children(node)
                .iter()
                .map(|c| heights[c.0])
                .max()
                .unwrap_or(0);
        }
        heights[id.0]
    }

    /// Child counts of the whole tree in pre-order
    pub fn child_counts(&self) -> Vec<usize> {
        self.pre_order(self.root())
            .into_iter()
            .map(|node| self.children(node).len())
            .collect()
    }

    /// Count of leaf nodes reachable from the root
    pub fn leaf_count(&self) -> usize {
        self.pre_order(self.root())
            .into_iter()
            .filter(|&node| self.is_leaf(node))
            .count()
    }

    /// Largest number of children of any node reachable from the root
    pub fn max_degree(&self) -> usize {
        self.child_counts().into_iter().max().unwrap_or(0)
    }
}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tree(size={})", self.size(self.root()))?;

        let mut stack = vec![(self.root(), 0usize)];
        while let Some((node, depth)) = stack.pop() {
            writeln!(f, "{:indent$}● {:?}", "", self.payload(node), indent = 2 * depth)?;
            stack.extend(self.children(node).iter().rev().map(|&child| (child, depth + 1)));
        }
        Ok(())
    }
}

/// Unchecked serialized form, validated into a [`Tree`] on load
#[derive(Deserialize)]
struct RawTree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> TryFrom<RawTree<T>> for Tree<T> {
    type Error = GaltonWatsonError;

    fn try_from(raw: RawTree<T>) -> Result<Self> {
        let nodes = raw.nodes;
        let n = nodes.len();
        let invalid = |msg: String| Err(GaltonWatsonError::InvalidTree(msg));

        if n == 0 {
            return invalid("Tree has no nodes".to_string());
        }
        if let Some(parent) = nodes[0].parent {
            return invalid(format!("Root has parent {}", parent));
        }

        // Every child link must be mirrored by exactly one parent link
        let mut claimed = vec![false; n];
        for (index, node) in nodes.iter().enumerate() {
            for &child in &node.children {
                if child.0 >= n || child.0 == 0 {
                    return invalid(format!("Node {} lists invalid child {}", index, child));
                }
                if claimed[child.0] {
                    return invalid(format!("Node {} is listed as a child twice", child));
                }
                if nodes[child.0].parent != Some(NodeId(index)) {
                    return invalid(format!("Node {} does not point back to parent {}", child, index));
                }
                claimed[child.0] = true;
            }
        }
        for (index, node) in nodes.iter().enumerate() {
            if node.parent.is_some() && !claimed[index] {
                return invalid(format!("Node {} names a parent that does not list it", index));
            }
        }

        // Parent chains must end, at the root or at a detached node
        const UNSEEN: u8 = 0;
        const ON_PATH: u8 = 1;
        const DONE: u8 = 2;
        let mut state = vec![UNSEEN; n];
        for start in 0..n {
            let mut path = Vec::new();
            let mut current = Some(start);
            while let Some(index) = current {
                match state[index] {
                    DONE => break,
                    ON_PATH => return invalid(format!("Cycle through node {}", index)),
                    _ => {}
                }
                state[index] = ON_PATH;
                path.push(index);
                current = nodes[index].parent.map(|p| p.0);
            }
            for index in path {
                state[index] = DONE;
            }
        }

        Ok(Tree { nodes })
    }
}
