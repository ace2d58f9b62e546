//! Flat, pre-order index over a [`TreeNode`].
//!
//! The index is built once per widget and never changes. Every per-node
//! table elsewhere (expansion flags, layout weights) is a `Vec` addressed by
//! [`NodeId`].

use super::model::{CategoryTag, Metric, TreeNode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Pre-order position of a node. The root is always `NodeId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node.
    pub const ROOT: Self = Self(0);

    /// Raw index into per-node tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Child-index path from the root, written `0/2/1`.
///
/// The first segment is always `0` (the root).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of the root.
    #[must_use]
    pub fn root() -> Self {
        Self(vec![0])
    }

    /// Path segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Depth of the addressed node (root is 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// Path of the `index`-th child.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(index);
        Self(segments)
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(segments: Vec<usize>) -> Self {
        Self(segments)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

/// Error parsing a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid node path '{0}': expected segments like 0/2/1 starting at 0")]
pub struct NodePathError(String);

impl FromStr for NodePath {
    type Err = NodePathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let segments = s
            .trim()
            .split('/')
            .map(|seg| seg.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| NodePathError(s.to_string()))?;
        if segments.first() != Some(&0) {
            return Err(NodePathError(s.to_string()));
        }
        Ok(Self(segments))
    }
}

impl TryFrom<String> for NodePath {
    type Error = NodePathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<NodePath> for String {
    fn from(path: NodePath) -> Self {
        path.to_string()
    }
}

/// One node as stored in the index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedNode {
    /// Display text
    pub label: String,
    /// Resolved role
    pub tag: CategoryTag,
    /// Tooltip body
    pub description: Option<String>,
    /// Tooltip footnote
    pub details: Option<String>,
    /// Leaf call-outs
    pub metrics: Vec<Metric>,
    /// Parent, `None` for the root
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Distance from the root
    pub depth: usize,
    /// Position among the parent's children
    pub child_index: usize,
    /// One past the last descendant in pre-order
    pub subtree_end: usize,
}

impl IndexedNode {
    /// Whether the node has children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether the node has tooltip content.
    #[must_use]
    pub fn has_tooltip(&self) -> bool {
        self.description.is_some() || self.details.is_some()
    }
}

/// Flattened tree in pre-order.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeIndex {
    nodes: Vec<IndexedNode>,
    max_depth: usize,
}

impl TreeIndex {
    /// Flatten `tree` with an explicit stack.
    #[must_use]
    pub fn build(tree: &TreeNode) -> Self {
        let mut nodes: Vec<IndexedNode> = Vec::with_capacity(tree.node_count());
        let mut max_depth = 0;
        let mut stack: Vec<(&TreeNode, Option<NodeId>, usize, usize)> = vec![(tree, None, 0, 0)];

        while let Some((node, parent, depth, child_index)) = stack.pop() {
            let id = NodeId(nodes.len());
            if let Some(p) = parent {
                nodes[p.0].children.push(id);
            }
            max_depth = max_depth.max(depth);
            nodes.push(IndexedNode {
                label: node.label.clone(),
                tag: node.tag.clone(),
                description: node.description.clone(),
                details: node.details.clone(),
                metrics: node.metrics.clone(),
                parent,
                children: Vec::with_capacity(node.children.len()),
                depth,
                child_index,
                subtree_end: 0,
            });
            for (i, child) in node.children.iter().enumerate().rev() {
                stack.push((child, Some(id), depth + 1, i));
            }
        }

        // Descendants follow their ancestor contiguously in pre-order.
        for i in (0..nodes.len()).rev() {
            let end = nodes[i]
                .children
                .last()
                .map_or(i + 1, |last| nodes[last.0].subtree_end);
            nodes[i].subtree_end = end;
        }

        Self { nodes, max_depth }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest level in the whole tree.
    #[must_use]
    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&IndexedNode> {
        self.nodes.get(id.0)
    }

    /// The root node.
    #[must_use]
    pub fn root(&self) -> &IndexedNode {
        &self.nodes[0]
    }

    /// All nodes in pre-order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &IndexedNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Nodes that can be expanded or collapsed (have children, not the root).
    #[must_use]
    pub fn is_toggleable(&self, id: NodeId) -> bool {
        id != NodeId::ROOT && self.get(id).is_some_and(IndexedNode::has_children)
    }

    /// Resolve a path to an id.
    #[must_use]
    pub fn find(&self, path: &NodePath) -> Option<NodeId> {
        let (first, rest) = path.segments().split_first()?;
        if *first != 0 {
            return None;
        }
        let mut id = NodeId::ROOT;
        for &seg in rest {
            id = *self.get(id)?.children.get(seg)?;
        }
        Some(id)
    }

    /// Path of an id. Unknown ids yield the root path.
    #[must_use]
    pub fn path_of(&self, id: NodeId) -> NodePath {
        let mut segments = Vec::new();
        let mut cursor = self.get(id);
        while let Some(node) = cursor {
            match node.parent {
                Some(parent) => {
                    segments.push(node.child_index);
                    cursor = self.get(parent);
                }
                None => cursor = None,
            }
        }
        segments.push(0);
        segments.reverse();
        NodePath(segments)
    }
}

impl From<&TreeNode> for TreeIndex {
    fn from(tree: &TreeNode) -> Self {
        Self::build(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeNode {
        TreeNode::root("R")
            .with_child(
                TreeNode::branch("A")
                    .with_child(TreeNode::leaf("a1", CategoryTag::Both))
                    .with_child(TreeNode::leaf("a2", CategoryTag::Restricted)),
            )
            .with_child(TreeNode::branch("B").with_child(TreeNode::leaf("b1", CategoryTag::Public)))
    }

    #[test]
    fn test_pre_order_ids() {
        let index = TreeIndex::build(&sample());
        let labels: Vec<&str> = index.iter().map(|(_, n)| n.label.as_str()).collect();
        assert_eq!(labels, ["R", "A", "a1", "a2", "B", "b1"]);
        assert_eq!(index.len(), 6);
        assert_eq!(index.max_depth(), 2);
    }

    #[test]
    fn test_parent_child_links() {
        let index = TreeIndex::build(&sample());
        assert_eq!(index.root().children, vec![NodeId(1), NodeId(4)]);
        assert_eq!(index.get(NodeId(3)).unwrap().parent, Some(NodeId(1)));
        assert_eq!(index.get(NodeId(3)).unwrap().child_index, 1);
        assert_eq!(index.get(NodeId(5)).unwrap().depth, 2);
    }

    #[test]
    fn test_subtree_end() {
        let index = TreeIndex::build(&sample());
        assert_eq!(index.root().subtree_end, 6);
        assert_eq!(index.get(NodeId(1)).unwrap().subtree_end, 4);
        assert_eq!(index.get(NodeId(2)).unwrap().subtree_end, 3);
        assert_eq!(index.get(NodeId(4)).unwrap().subtree_end, 6);
    }

    #[test]
    fn test_toggleable() {
        let index = TreeIndex::build(&sample());
        assert!(!index.is_toggleable(NodeId::ROOT));
        assert!(index.is_toggleable(NodeId(1)));
        assert!(!index.is_toggleable(NodeId(2)));
        assert!(!index.is_toggleable(NodeId(99)));
    }

    #[test]
    fn test_paths_round_trip_through_index() {
        let index = TreeIndex::build(&sample());
        for (id, _) in index.iter() {
            let path = index.path_of(id);
            assert_eq!(index.find(&path), Some(id));
        }
        assert_eq!(index.path_of(NodeId(5)).to_string(), "0/1/0");
    }

    #[test]
    fn test_find_missing() {
        let index = TreeIndex::build(&sample());
        assert_eq!(index.find(&"0/7".parse().unwrap()), None);
        assert_eq!(index.find(&NodePath::from(vec![1])), None);
        assert_eq!(index.find(&NodePath::from(Vec::new())), None);
    }

    #[test]
    fn test_node_path_parse() {
        let path: NodePath = "0/2/1".parse().unwrap();
        assert_eq!(path.segments(), &[0, 2, 1]);
        assert_eq!(path.depth(), 2);
        assert_eq!(path.child(4).to_string(), "0/2/1/4");
        assert!("1/2".parse::<NodePath>().is_err());
        assert!("0/x".parse::<NodePath>().is_err());
        assert!("".parse::<NodePath>().is_err());
    }
}
