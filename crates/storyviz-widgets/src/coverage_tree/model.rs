//! Hierarchical data model consumed by the coverage tree.
//!
//! Scenes ship their trees as JSON:
//!
//! ```json
//! { "title": "NAMCS", "children": [
//!     { "title": "Visit", "category": "Encounter", "children": [
//!         { "title": "Reason for visit", "availability": "both" } ] } ] }
//! ```
//!
//! Each node's [`CategoryTag`] is resolved once, at load time.

use super::index::NodePath;
use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hard limit on nesting accepted when loading or validating.
pub const MAX_DEPTH: usize = 64;

/// Role of a node: decides its color and whether it may have children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryTag {
    /// The single top-level node
    Root,
    /// Internal grouping node
    Branch,
    /// Leaf kind A (e.g. available in both files, moderate impact)
    Both,
    /// Leaf kind B (e.g. restricted access, high impact)
    Restricted,
    /// Leaf kind C (e.g. public files, manageable)
    Public,
    /// Any vocabulary the palette does not know
    Other(String),
}

impl CategoryTag {
    /// Parse one of the fixed tag names, ignoring case and surrounding space.
    #[must_use]
    pub fn recognized(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "root" => Some(Self::Root),
            "category" | "branch" => Some(Self::Branch),
            "both" => Some(Self::Both),
            "restricted" => Some(Self::Restricted),
            "public" => Some(Self::Public),
            _ => None,
        }
    }

    /// Canonical name used in JSON and manifests.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Root => "root",
            Self::Branch => "category",
            Self::Both => "both",
            Self::Restricted => "restricted",
            Self::Public => "public",
            Self::Other(name) => name,
        }
    }

    /// Leaf-only kinds.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Both | Self::Restricted | Self::Public)
    }
}

impl From<String> for CategoryTag {
    fn from(name: String) -> Self {
        Self::recognized(&name).unwrap_or(Self::Other(name))
    }
}

impl From<CategoryTag> for String {
    fn from(tag: CategoryTag) -> Self {
        match tag {
            CategoryTag::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric call-out shown under a leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    /// Formatted value, e.g. "62%"
    pub value: String,
    /// What the value measures
    pub label: String,
}

impl Metric {
    /// Create a metric.
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// One node of a scene's hierarchy. Children keep their document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct TreeNode {
    /// Display text; need not be unique
    pub label: String,
    /// Resolved role
    #[serde(rename = "category")]
    pub tag: CategoryTag,
    /// Tooltip body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Tooltip footnote
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Leaf call-outs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Metric>,
    /// Ordered children
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

/// Wire shape before tags are resolved.
#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(alias = "title")]
    label: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    availability: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    metrics: Vec<Metric>,
    #[serde(default)]
    children: Vec<RawNode>,
}

/// Decide a node's tag from its wire fields.
///
/// Order: a known name in `category`, then `availability`, then position
/// (top level is root, nodes with children are branches). Remaining leaves
/// keep their raw category text as [`CategoryTag::Other`].
fn resolve_tag(
    category: Option<&str>,
    availability: Option<&str>,
    depth: usize,
    has_children: bool,
) -> CategoryTag {
    if let Some(tag) = category.and_then(CategoryTag::recognized) {
        return tag;
    }
    if let Some(tag) = availability.and_then(CategoryTag::recognized) {
        return tag;
    }
    if depth == 0 {
        return CategoryTag::Root;
    }
    if has_children {
        return CategoryTag::Branch;
    }
    // A leaf without a usable tag is not a branch. It maps to the unknown
    // color so a missing or misspelled tag stays visible in the frame.
    CategoryTag::Other(category.unwrap_or_default().trim().to_string())
}

struct Frame {
    node: TreeNode,
    path: Vec<usize>,
    pending: std::iter::Enumerate<std::vec::IntoIter<RawNode>>,
}

impl Frame {
    fn open(raw: RawNode, path: Vec<usize>) -> Self {
        let tag = resolve_tag(
            raw.category.as_deref(),
            raw.availability.as_deref(),
            path.len() - 1,
            !raw.children.is_empty(),
        );
        Self {
            node: TreeNode {
                label: raw.label,
                tag,
                description: raw.description,
                details: raw.details,
                metrics: raw.metrics,
                children: Vec::with_capacity(raw.children.len()),
            },
            path,
            pending: raw.children.into_iter().enumerate(),
        }
    }
}

impl TryFrom<RawNode> for TreeNode {
    type Error = TreeError;

    /// Resolve tags without recursing, so hostile nesting cannot blow the stack.
    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let mut current = Frame::open(raw, vec![0]);
        let mut parents: Vec<Frame> = Vec::new();
        loop {
            if let Some((i, child)) = current.pending.next() {
                let mut path = current.path.clone();
                path.push(i);
                if path.len() > MAX_DEPTH {
                    return Err(TreeError::TooDeep {
                        limit: MAX_DEPTH,
                        path: NodePath::from(path).to_string(),
                    });
                }
                let child = Frame::open(child, path);
                parents.push(std::mem::replace(&mut current, child));
                continue;
            }
            match parents.pop() {
                Some(parent) => {
                    let done = std::mem::replace(&mut current, parent);
                    current.node.children.push(done.node);
                }
                None => return Ok(current.node),
            }
        }
    }
}

impl TreeNode {
    fn with_tag(label: impl Into<String>, tag: CategoryTag) -> Self {
        Self {
            label: label.into(),
            tag,
            description: None,
            details: None,
            metrics: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Top-level node.
    #[must_use]
    pub fn root(label: impl Into<String>) -> Self {
        Self::with_tag(label, CategoryTag::Root)
    }

    /// Internal grouping node.
    #[must_use]
    pub fn branch(label: impl Into<String>) -> Self {
        Self::with_tag(label, CategoryTag::Branch)
    }

    /// Leaf with the given kind.
    #[must_use]
    pub fn leaf(label: impl Into<String>, tag: CategoryTag) -> Self {
        Self::with_tag(label, tag)
    }

    /// Append a child.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children in order.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Append a metric call-out.
    #[must_use]
    pub fn with_metric(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.metrics.push(Metric::new(value, label));
        self
    }

    /// Set the tooltip description.
    #[must_use]
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Set the tooltip details.
    #[must_use]
    pub fn with_details(mut self, text: impl Into<String>) -> Self {
        self.details = Some(text.into());
        self
    }

    /// Parse a scene dataset.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Json`] for malformed documents and
    /// [`TreeError::TooDeep`] past [`MAX_DEPTH`].
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize with canonical tag names.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// No children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Has tooltip content.
    #[must_use]
    pub fn has_tooltip(&self) -> bool {
        self.description.is_some() || self.details.is_some()
    }

    /// Total number of nodes, including this one.
    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Deepest level below this node (0 for a lone node).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        deepest
    }

    /// Check the documented shape rules.
    ///
    /// Reports the first problem in document order: a root tag below the
    /// top level, a leaf-only tag on a node with children, or nesting past
    /// [`MAX_DEPTH`].
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), TreeError> {
        let mut stack: Vec<(&Self, Vec<usize>)> = vec![(self, vec![0])];
        while let Some((node, path)) = stack.pop() {
            let depth = path.len() - 1;
            if depth >= MAX_DEPTH {
                return Err(TreeError::TooDeep {
                    limit: MAX_DEPTH,
                    path: NodePath::from(path).to_string(),
                });
            }
            if depth > 0 && node.tag == CategoryTag::Root {
                return Err(TreeError::MisplacedRoot {
                    path: NodePath::from(path).to_string(),
                });
            }
            if node.tag.is_terminal() && !node.children.is_empty() {
                return Err(TreeError::TerminalWithChildren {
                    path: NodePath::from(path).to_string(),
                    tag: node.tag.to_string(),
                });
            }
            for (i, child) in node.children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child, child_path));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "title": "NAMCS Health Center Data",
        "children": [
            { "title": "Patient", "category": "Demographics", "children": [
                { "title": "Age", "availability": "both", "description": "Age in years" },
                { "title": "ZIP code", "availability": "restricted" }
            ]},
            { "title": "Visit", "category": "category", "children": [
                { "title": "Reason", "category": "public",
                  "metrics": [{ "value": "62%", "label": "match rate" }] }
            ]},
            { "title": "Loose end", "category": "Misc" }
        ]
    }"#;

    #[test]
    fn test_tag_resolution() {
        let tree = TreeNode::from_json(SAMPLE).unwrap();
        assert_eq!(tree.label, "NAMCS Health Center Data");
        assert_eq!(tree.tag, CategoryTag::Root);
        assert_eq!(tree.children[0].tag, CategoryTag::Branch);
        assert_eq!(tree.children[0].children[0].tag, CategoryTag::Both);
        assert_eq!(tree.children[0].children[1].tag, CategoryTag::Restricted);
        assert_eq!(tree.children[1].tag, CategoryTag::Branch);
        assert_eq!(tree.children[1].children[0].tag, CategoryTag::Public);
        assert_eq!(tree.children[2].tag, CategoryTag::Other("Misc".into()));
    }

    #[test]
    fn test_untagged_leaf_uses_unknown_color() {
        use crate::coverage_tree::palette::{map_category, Palette};

        let tree = TreeNode::from_json(r#"{"title": "R", "children": [{"title": "Bare leaf"}]}"#).unwrap();
        let leaf = &tree.children[0];
        assert_eq!(leaf.tag, CategoryTag::Other(String::new()));

        let palette = Palette::default();
        assert_eq!(map_category(&leaf.tag, &palette), palette.unknown);
        assert_ne!(map_category(&leaf.tag, &palette), palette.category);
    }

    #[test]
    fn test_children_keep_document_order() {
        let tree = TreeNode::from_json(SAMPLE).unwrap();
        let labels: Vec<&str> = tree.children.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["Patient", "Visit", "Loose end"]);
    }

    #[test]
    fn test_optional_fields() {
        let tree = TreeNode::from_json(SAMPLE).unwrap();
        let age = &tree.children[0].children[0];
        assert_eq!(age.description.as_deref(), Some("Age in years"));
        assert!(age.has_tooltip());
        let reason = &tree.children[1].children[0];
        assert_eq!(reason.metrics, vec![Metric::new("62%", "match rate")]);
    }

    #[test]
    fn test_label_alias() {
        let a = TreeNode::from_json(r#"{"label": "A"}"#).unwrap();
        let b = TreeNode::from_json(r#"{"title": "A"}"#).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_label_is_an_error() {
        let err = TreeNode::from_json(r#"{"children": []}"#).unwrap_err();
        assert!(matches!(err, TreeError::Json(_)));
    }

    #[test]
    fn test_json_round_trip_keeps_tags() {
        let tree = TreeNode::from_json(SAMPLE).unwrap();
        let json = tree.to_json_pretty().unwrap();
        let back = TreeNode::from_json(&json).unwrap();
        assert_eq!(back, tree);
    }

    #[test]
    fn test_too_deep_document() {
        let mut json = String::new();
        for _ in 0..=MAX_DEPTH {
            json.push_str(r#"{"title":"n","children":["#);
        }
        json.push_str(r#"{"title":"leaf"}"#);
        for _ in 0..=MAX_DEPTH {
            json.push_str("]}");
        }
        // serde_json's own recursion guard may trip first; either way it is refused.
        let err = TreeNode::from_json(&json).unwrap_err();
        assert!(matches!(err, TreeError::TooDeep { .. } | TreeError::Json(_)));
    }

    #[test]
    fn test_validate_too_deep() {
        let mut node = TreeNode::leaf("bottom", CategoryTag::Both);
        for _ in 0..MAX_DEPTH {
            node = TreeNode::branch("n").with_child(node);
        }
        let tree = TreeNode::root("top").with_child(node);
        assert!(matches!(
            tree.validate(),
            Err(TreeError::TooDeep { limit: MAX_DEPTH, .. })
        ));
    }

    #[test]
    fn test_builders_and_counts() {
        let tree = TreeNode::root("Root")
            .with_child(
                TreeNode::branch("A")
                    .with_child(TreeNode::leaf("a1", CategoryTag::Both).with_metric("12", "visits")),
            )
            .with_child(TreeNode::leaf("b", CategoryTag::Public));
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.depth(), 2);
        assert!(!tree.is_leaf());
        assert!(tree.validate().is_ok());
    }

    #[test]
    fn test_validate_misplaced_root() {
        let tree = TreeNode::root("R").with_child(TreeNode::root("again"));
        assert!(matches!(
            tree.validate(),
            Err(TreeError::MisplacedRoot { path }) if path == "0/0"
        ));
    }

    #[test]
    fn test_validate_terminal_with_children() {
        let tree = TreeNode::root("R").with_child(
            TreeNode::branch("A").with_child(
                TreeNode::leaf("bad", CategoryTag::Restricted)
                    .with_child(TreeNode::leaf("x", CategoryTag::Both)),
            ),
        );
        match tree.validate() {
            Err(TreeError::TerminalWithChildren { path, tag }) => {
                assert_eq!(path, "0/0/0");
                assert_eq!(tag, "restricted");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_category_tag_names() {
        assert_eq!(CategoryTag::recognized(" Both "), Some(CategoryTag::Both));
        assert_eq!(CategoryTag::recognized("branch"), Some(CategoryTag::Branch));
        assert_eq!(CategoryTag::recognized("high"), None);
        assert_eq!(String::from(CategoryTag::Branch), "category");
        assert_eq!(CategoryTag::from("weird".to_string()), CategoryTag::Other("weird".into()));
        assert!(CategoryTag::Public.is_terminal());
        assert!(!CategoryTag::Branch.is_terminal());
    }
}
