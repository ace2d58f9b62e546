//! Trees shared by the unit tests.

use super::index::TreeIndex;
use super::model::{CategoryTag, TreeNode};
use proptest::prelude::*;

/// Root -> 2 categories -> 3 leaves each; ids: R=0, A=1, a*=2..4, B=5, b*=6..8
pub(crate) fn two_by_three_tree() -> TreeNode {
    let cat = |name: &str, tag: CategoryTag| {
        TreeNode::branch(name)
            .with_children((0..3).map(|i| TreeNode::leaf(format!("{name}{i}"), tag.clone())))
    };
    TreeNode::root("R")
        .with_child(cat("A", CategoryTag::Both))
        .with_child(cat("B", CategoryTag::Restricted))
}

pub(crate) fn two_by_three() -> TreeIndex {
    TreeIndex::build(&two_by_three_tree())
}

pub(crate) fn arb_tree() -> impl Strategy<Value = TreeNode> {
    let leaf = "[a-z]{1,6}".prop_map(|l| TreeNode::leaf(l, CategoryTag::Both));
    let inner = leaf.prop_recursive(4, 48, 5, |child| {
        ("[A-Z]{1,6}", prop::collection::vec(child, 1..5))
            .prop_map(|(l, kids)| TreeNode::branch(l).with_children(kids))
    });
    prop::collection::vec(inner, 0..5).prop_map(|kids| TreeNode::root("root").with_children(kids))
}
