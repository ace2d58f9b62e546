//! Expand/collapse state and the visible node set derived from it.

use super::index::{NodeId, TreeIndex};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How expanding a node affects its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SiblingPolicy {
    /// Each node toggles on its own.
    #[default]
    Independent,
    /// Expanding a node collapses its expanded siblings (their own flag only).
    Accordion,
}

/// Why a toggle request changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// The node has no children.
    Leaf,
    /// The root is always shown.
    Root,
    /// No such node.
    Unknown,
}

/// Result of [`ExpansionState::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The node is now expanded.
    Expanded,
    /// The node is now collapsed.
    Collapsed,
    /// Nothing changed.
    Ignored(IgnoredReason),
}

impl ToggleOutcome {
    /// Whether the visible set may have changed.
    #[must_use]
    pub const fn changed(self) -> bool {
        !matches!(self, Self::Ignored(_))
    }
}

/// Per-node expanded flags, indexed by [`NodeId`].
///
/// Collapsing a node leaves its descendants' flags untouched, so they come
/// back exactly as they were when the node is expanded again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: Vec<bool>,
    policy: SiblingPolicy,
}

impl ExpansionState {
    /// Everything collapsed except the root.
    #[must_use]
    pub fn new(index: &TreeIndex) -> Self {
        Self {
            expanded: vec![false; index.len()],
            policy: SiblingPolicy::default(),
        }
    }

    /// Use the given sibling policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: SiblingPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Current sibling policy.
    #[must_use]
    pub const fn policy(&self) -> SiblingPolicy {
        self.policy
    }

    /// Whether `id` currently shows its children. The root always does.
    #[must_use]
    pub fn is_expanded(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.expanded.get(id.index()).copied().unwrap_or(false)
    }

    /// Flip one node's flag.
    ///
    /// Leaves, the root, and unknown ids are no-ops.
    pub fn toggle(&mut self, index: &TreeIndex, id: NodeId) -> ToggleOutcome {
        let Some(node) = index.get(id) else {
            return ToggleOutcome::Ignored(IgnoredReason::Unknown);
        };
        if id == NodeId::ROOT {
            return ToggleOutcome::Ignored(IgnoredReason::Root);
        }
        if !node.has_children() {
            return ToggleOutcome::Ignored(IgnoredReason::Leaf);
        }

        let now_expanded = !self.expanded[id.index()];
        self.expanded[id.index()] = now_expanded;

        if now_expanded && self.policy == SiblingPolicy::Accordion {
            if let Some(parent) = node.parent.and_then(|p| index.get(p)) {
                for &sibling in &parent.children {
                    if sibling != id {
                        self.expanded[sibling.index()] = false;
                    }
                }
            }
        }

        debug!(node = id.index(), expanded = now_expanded, "toggled node");
        if now_expanded {
            ToggleOutcome::Expanded
        } else {
            ToggleOutcome::Collapsed
        }
    }

    /// Expand every node with children.
    pub fn expand_all(&mut self, index: &TreeIndex) {
        for (id, node) in index.iter() {
            self.expanded[id.index()] = node.has_children();
        }
    }

    /// Collapse every node. The root stays shown.
    pub fn collapse_all(&mut self) {
        self.expanded.fill(false);
    }

    /// Derive the visible set from scratch.
    ///
    /// A node is visible when it is the root or its parent is visible and
    /// expanded. Hidden subtrees are skipped wholesale.
    #[must_use]
    pub fn visible(&self, index: &TreeIndex) -> VisibleSet {
        let mut member = vec![false; index.len()];
        let mut ids = Vec::new();
        let mut i = 0;
        while i < index.len() {
            let id = NodeId(i);
            let Some(node) = index.get(id) else { break };
            let shown = match node.parent {
                None => true,
                Some(parent) => member[parent.index()] && self.is_expanded(parent),
            };
            if shown {
                member[i] = true;
                ids.push(id);
                i += 1;
            } else {
                i = node.subtree_end.max(i + 1);
            }
        }
        VisibleSet { ids, member }
    }
}

/// Nodes eligible for drawing, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleSet {
    ids: Vec<NodeId>,
    member: Vec<bool>,
}

impl VisibleSet {
    /// Visible ids in pre-order.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Number of visible nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True only for a set built over an empty index.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.member.get(id.index()).copied().unwrap_or(false)
    }

    /// Deepest visible level.
    #[must_use]
    pub fn max_depth(&self, index: &TreeIndex) -> usize {
        self.ids
            .iter()
            .filter_map(|id| index.get(*id))
            .map(|n| n.depth)
            .max()
            .unwrap_or(0)
    }
}
