//! Widgets for storyviz scenes.
//!
//! The crate currently ships one widget, the [`CoverageTree`]: a
//! collapsible tree whose node colors and legend are reinterpreted per
//! scene through a fixed set of [`PaletteRole`]s.

pub mod coverage_tree;
mod error;

pub use coverage_tree::{
    map_category, CategoryTag, CoverageTree, ExpansionState, LabelLimits, LayoutConfig, Legend,
    LegendEntry, Metric, NodeId, NodePath, NodeToggled, Orientation, Palette, PaletteRole,
    SiblingPolicy, TierSpacing, TreeConfig, TreeIndex, TreeLayout, TreeNode,
};
pub use error::TreeError;
