//! Collapsible hierarchical visualization.
//!
//! The widget owns a [`TreeIndex`] built once from the dataset and an
//! [`ExpansionState`]. Every stimulus (click, key, resize) funnels into
//! [`CoverageTree::refresh`], which re-derives the visible set and the
//! layout from scratch; painting reads only that derived state.
//!
//! # Examples
//!
//! ```
//! use storyviz_core::Size;
//! use storyviz_widgets::coverage_tree::{CategoryTag, CoverageTree, NodePath, TreeNode};
//!
//! let tree = TreeNode::root("Survey")
//!     .with_child(TreeNode::branch("Visits").with_child(TreeNode::leaf("Reason", CategoryTag::Both)));
//! let mut widget = CoverageTree::new(&tree);
//! widget.set_container_size(Size::new(900.0, 480.0));
//! assert_eq!(widget.visible().len(), 2);
//!
//! let path: NodePath = "0/0".parse().expect("valid path");
//! widget.toggle_path(&path);
//! assert_eq!(widget.visible().len(), 3);
//! ```

pub mod expansion;
pub mod index;
pub mod label;
pub mod layout;
pub mod model;
pub mod palette;
pub mod render;

#[cfg(test)]
mod fixtures;

pub use expansion::{ExpansionState, IgnoredReason, SiblingPolicy, ToggleOutcome, VisibleSet};
pub use index::{IndexedNode, NodeId, NodePath, NodePathError, TreeIndex};
pub use label::LabelLimits;
pub use layout::{
    compute_layout, Breakpoint, Edge, LayoutConfig, Orientation, PositionedNode, SizeTier,
    TierSpacing, TreeLayout,
};
pub use model::{CategoryTag, Metric, TreeNode, MAX_DEPTH};
pub use palette::{map_category, Legend, LegendEntry, Palette, PaletteRole};
pub use render::LEGEND_HEIGHT;

use crate::error::TreeError;
use render::{paint_legend, TreePainter, HOVER_SCALE};
use serde::{Deserialize, Serialize};
use std::any::Any;
use storyviz_core::svg::SvgWriter;
use storyviz_core::{
    AccessibleRole, Canvas, Constraints, DrawCommand, Event, Key, LayoutResult, MouseButton, Point,
    RecordingCanvas, Rect, Size, TypeId, Widget,
};
use tracing::debug;

/// Extra pointer slack around a node's circle.
const HIT_SLOP: f32 = 4.0;

/// Message returned from [`Widget::event`] when a node was expanded or collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeToggled {
    /// Path of the toggled node
    pub path: NodePath,
    /// State after the toggle
    pub expanded: bool,
}

/// Layout, label, sizing, and interaction options.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Tier layout
    pub layout: LayoutConfig,
    /// Label column caps
    pub labels: LabelLimits,
    /// Fixed height; the container height is used when absent
    pub height: Option<f32>,
    /// Sibling behavior on expand
    pub siblings: SiblingPolicy,
}

/// Interactive collapsible tree.
#[derive(Debug, Clone)]
pub struct CoverageTree {
    index: TreeIndex,
    expansion: ExpansionState,
    palette: Palette,
    legend: Legend,
    show_legend: bool,
    config: TreeConfig,
    container: Size,
    bounds: Rect,
    visible: VisibleSet,
    layout: TreeLayout,
    focused: Option<NodeId>,
    hovered: Option<NodeId>,
    accessible_name: Option<String>,
    test_id: Option<String>,
}

impl CoverageTree {
    /// Widget over `tree` with everything but the root collapsed.
    #[must_use]
    pub fn new(tree: &TreeNode) -> Self {
        let index = TreeIndex::build(tree);
        let expansion = ExpansionState::new(&index);
        let visible = expansion.visible(&index);
        Self {
            index,
            expansion,
            palette: Palette::default(),
            legend: Legend::coverage_default(),
            show_legend: false,
            config: TreeConfig::default(),
            container: Size::ZERO,
            bounds: Rect::default(),
            visible,
            layout: TreeLayout::default(),
            focused: None,
            hovered: None,
            accessible_name: None,
            test_id: None,
        }
    }

    /// Parse a JSON dataset and build the widget.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        Ok(Self::new(&TreeNode::from_json(json)?))
    }

    /// Use a scene palette.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self.refresh();
        self
    }

    /// Use a scene legend for badges (and the legend strip when shown).
    #[must_use]
    pub fn with_legend(mut self, legend: Legend) -> Self {
        self.legend = legend;
        self.refresh();
        self
    }

    /// Reserve a strip at the top for the legend.
    #[must_use]
    pub fn show_legend(mut self, show: bool) -> Self {
        self.show_legend = show;
        self.refresh();
        self
    }

    /// Apply a full option set.
    #[must_use]
    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self.expansion = self.expansion.with_policy(config.siblings);
        self.apply_container();
        self
    }

    /// Fix the height instead of following the container.
    #[must_use]
    pub fn with_height(mut self, height: f32) -> Self {
        self.config.height = Some(height);
        self.apply_container();
        self
    }

    /// Set layout options.
    #[must_use]
    pub fn with_layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self.refresh();
        self
    }

    /// Set label caps.
    #[must_use]
    pub fn with_labels(mut self, labels: LabelLimits) -> Self {
        self.config.labels = labels;
        self
    }

    /// Set the sibling policy.
    #[must_use]
    pub fn with_sibling_policy(mut self, policy: SiblingPolicy) -> Self {
        self.config.siblings = policy;
        self.expansion = self.expansion.with_policy(policy);
        self
    }

    /// Set accessible name.
    #[must_use]
    pub fn with_accessible_name(mut self, name: impl Into<String>) -> Self {
        self.accessible_name = Some(name.into());
        self
    }

    /// Set test ID.
    #[must_use]
    pub fn with_test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    /// The flattened dataset.
    #[must_use]
    pub const fn index(&self) -> &TreeIndex {
        &self.index
    }

    /// Current expand/collapse flags.
    #[must_use]
    pub const fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Nodes currently eligible for drawing.
    #[must_use]
    pub const fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    /// Positions from the last refresh.
    #[must_use]
    pub const fn tree_layout(&self) -> &TreeLayout {
        &self.layout
    }

    /// Active palette.
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Active legend.
    #[must_use]
    pub const fn legend(&self) -> &Legend {
        &self.legend
    }

    /// Active options.
    #[must_use]
    pub const fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Focused node, if any.
    #[must_use]
    pub const fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Hovered node, if any.
    #[must_use]
    pub const fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Drawing surface size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.bounds.size()
    }

    /// Report a new container size, as observed by a resize tracker.
    pub fn set_container_size(&mut self, size: Size) {
        self.container = size.sanitized();
        self.apply_container();
    }

    fn apply_container(&mut self) {
        let height = self
            .config
            .height
            .filter(|h| h.is_finite() && *h > 0.0)
            .unwrap_or(self.container.height);
        self.bounds = Rect::new(0.0, 0.0, self.container.width, height);
        self.refresh();
    }

    /// Area left for the tree after the legend strip.
    fn tree_area(&self) -> Rect {
        if self.legend_visible() {
            Rect::new(
                self.bounds.x,
                self.bounds.y + LEGEND_HEIGHT,
                self.bounds.width,
                (self.bounds.height - LEGEND_HEIGHT).max(0.0),
            )
        } else {
            self.bounds
        }
    }

    fn legend_visible(&self) -> bool {
        self.show_legend && !self.legend.is_empty()
    }

    /// Re-derive the visible set and layout from the current state.
    pub fn refresh(&mut self) {
        self.visible = self.expansion.visible(&self.index);
        self.layout = compute_layout(&self.index, &self.visible, self.tree_area(), &self.config.layout);
        if self.focused.is_some_and(|id| !self.visible.contains(id)) {
            self.focused = None;
        }
        if self.hovered.is_some_and(|id| !self.visible.contains(id)) {
            self.hovered = None;
        }
    }

    /// Toggle a node by id.
    pub fn toggle(&mut self, id: NodeId) -> ToggleOutcome {
        let outcome = self.expansion.toggle(&self.index, id);
        if outcome.changed() {
            self.refresh();
        }
        outcome
    }

    /// Toggle a node by path. Unknown paths are ignored.
    pub fn toggle_path(&mut self, path: &NodePath) -> ToggleOutcome {
        match self.index.find(path) {
            Some(id) => self.toggle(id),
            None => ToggleOutcome::Ignored(IgnoredReason::Unknown),
        }
    }

    /// Expand every node with children.
    pub fn expand_all(&mut self) {
        self.expansion.expand_all(&self.index);
        self.refresh();
    }

    /// Collapse everything below the root.
    pub fn collapse_all(&mut self) {
        self.expansion.collapse_all();
        self.refresh();
    }

    /// Visible node under `point`; the nearest wins when circles overlap.
    #[must_use]
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.layout
            .nodes()
            .iter()
            .filter_map(|n| {
                let d = n.center.distance(&point);
                (d <= n.radius.mul_add(HOVER_SCALE, HIT_SLOP)).then_some((d, n.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    fn toggleable_visible(&self) -> Vec<NodeId> {
        self.visible
            .ids()
            .iter()
            .copied()
            .filter(|id| self.index.is_toggleable(*id))
            .collect()
    }

    /// Move focus to the next toggleable visible node, wrapping.
    pub fn focus_next(&mut self) -> Option<NodeId> {
        let candidates = self.toggleable_visible();
        let next = match self.focused.and_then(|f| candidates.iter().position(|c| *c == f)) {
            Some(i) => candidates.get((i + 1) % candidates.len()),
            None => candidates.first(),
        };
        self.focused = next.copied();
        self.focused
    }

    /// Move focus to the previous toggleable visible node, wrapping.
    pub fn focus_prev(&mut self) -> Option<NodeId> {
        let candidates = self.toggleable_visible();
        let prev = match self.focused.and_then(|f| candidates.iter().position(|c| *c == f)) {
            Some(0) | None => candidates.last(),
            Some(i) => candidates.get(i - 1),
        };
        self.focused = prev.copied();
        self.focused
    }

    /// Drop keyboard focus.
    pub fn clear_focus(&mut self) {
        self.focused = None;
    }

    fn activate(&mut self, id: NodeId) -> Option<Box<dyn Any + Send>> {
        let outcome = self.toggle(id);
        let expanded = match outcome {
            ToggleOutcome::Expanded => true,
            ToggleOutcome::Collapsed => false,
            ToggleOutcome::Ignored(reason) => {
                debug!(node = id.index(), ?reason, "activation ignored");
                return None;
            }
        };
        Some(Box::new(NodeToggled {
            path: self.index.path_of(id),
            expanded,
        }))
    }

    /// Paint the current state into a fresh command list.
    #[must_use]
    pub fn frame(&self) -> Vec<DrawCommand> {
        let mut canvas = RecordingCanvas::new();
        self.paint(&mut canvas);
        canvas.take_commands()
    }

    /// Standalone SVG document of the current state.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let title = self
            .accessible_name
            .clone()
            .unwrap_or_else(|| self.index.root().label.clone());
        SvgWriter::default()
            .with_title(title)
            .write(&self.frame(), self.bounds.size())
    }
}

impl Widget for CoverageTree {
    fn type_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }

    fn measure(&self, constraints: Constraints) -> Size {
        let biggest = constraints.biggest();
        let width = if constraints.max_width.is_finite() {
            biggest.width
        } else {
            self.container.width
        };
        let height = match self.config.height.filter(|h| h.is_finite() && *h > 0.0) {
            Some(h) => h,
            None if constraints.max_height.is_finite() => biggest.height,
            None => self.container.height,
        };
        constraints.constrain(Size::new(width, height))
    }

    fn layout(&mut self, bounds: Rect) -> LayoutResult {
        self.bounds = bounds;
        self.refresh();
        LayoutResult {
            size: bounds.size(),
        }
    }

    fn paint(&self, canvas: &mut dyn Canvas) {
        if self.layout.is_empty() {
            return;
        }
        if self.legend_visible() {
            let strip = Rect::new(self.bounds.x, self.bounds.y, self.bounds.width, LEGEND_HEIGHT);
            paint_legend(canvas, &self.legend, &self.palette, strip);
        }
        TreePainter {
            index: &self.index,
            expansion: &self.expansion,
            layout: &self.layout,
            palette: &self.palette,
            legend: &self.legend,
            labels: &self.config.labels,
            focused: self.focused,
            hovered: self.hovered,
        }
        .paint(canvas);
    }

    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>> {
        match event {
            Event::MouseUp {
                position,
                button: MouseButton::Left,
            } => {
                let id = self.node_at(*position)?;
                self.activate(id)
            }
            Event::MouseMove { position } => {
                self.hovered = self.node_at(*position);
                None
            }
            Event::MouseLeave => {
                self.hovered = None;
                None
            }
            Event::KeyDown { key } => match key {
                Key::Tab | Key::Down => {
                    self.focus_next();
                    None
                }
                Key::Up => {
                    self.focus_prev();
                    None
                }
                Key::Escape => {
                    self.clear_focus();
                    None
                }
                k if k.is_activation() => {
                    let id = self.focused?;
                    self.activate(id)
                }
                _ => None,
            },
            Event::Resize { width, height } => {
                self.set_container_size(Size::new(*width, *height));
                None
            }
            Event::FocusOut => {
                self.clear_focus();
                None
            }
            _ => None,
        }
    }

    fn is_interactive(&self) -> bool {
        true
    }

    fn is_focusable(&self) -> bool {
        true
    }

    fn accessible_name(&self) -> Option<&str> {
        self.accessible_name.as_deref()
    }

    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Tree
    }

    fn test_id(&self) -> Option<&str> {
        self.test_id.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }
}
