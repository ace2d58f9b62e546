//! Tiered layout of the visible node set.
//!
//! Depth picks the tier along the main axis (down or right). Along the
//! cross axis each visible node owns a slot proportional to the number of
//! visible leaves below it, so children sit under their parent in document
//! order and every leaf slot has the same width.
//!
//! [`compute_layout`] is a pure function of its inputs.

use super::expansion::VisibleSet;
use super::index::{NodeId, TreeIndex};
use serde::{Deserialize, Serialize};
use storyviz_core::{Point, Rect};
use tracing::trace;

/// Default padding between the drawing area and the outermost nodes.
pub const DEFAULT_MARGIN: f32 = 40.0;

/// Gap between a node and a label placed beside it.
pub const SIDE_LABEL_GAP: f32 = 8.0;

/// Main axis direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    /// Root at the top, tiers stacked downward
    #[default]
    TopDown,
    /// Root at the left, tiers stacked rightward
    LeftRight,
}

/// How many tiers the main axis is divided into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TierSpacing {
    /// As many tiers as are currently visible
    #[default]
    Fit,
    /// One tier per level of the whole tree, visible or not
    FullDepth,
}

/// Layout options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Main axis direction
    pub orientation: Orientation,
    /// Tier allocation
    pub tier_spacing: TierSpacing,
    /// Padding in pixels, shrunk automatically on small areas
    pub margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            tier_spacing: TierSpacing::default(),
            margin: DEFAULT_MARGIN,
        }
    }
}

impl LayoutConfig {
    /// Set the orientation.
    #[must_use]
    pub const fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the tier allocation.
    #[must_use]
    pub const fn tier_spacing(mut self, tier_spacing: TierSpacing) -> Self {
        self.tier_spacing = tier_spacing;
        self
    }

    /// Set the margin.
    #[must_use]
    pub const fn margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }
}

/// Container width class. Node and font sizes step with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    /// Narrower than 768px
    Mobile,
    /// 768px up to 1024px
    Tablet,
    /// 1024px and wider
    #[default]
    Desktop,
}

impl Breakpoint {
    /// Classify a container width. Non-finite widths count as mobile.
    #[must_use]
    pub fn from_width(width: f32) -> Self {
        if !width.is_finite() || width < 768.0 {
            Self::Mobile
        } else if width < 1024.0 {
            Self::Tablet
        } else {
            Self::Desktop
        }
    }
}

/// Visual size class of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeTier {
    /// The top-level node
    Root,
    /// Any other node with children
    Branch,
    /// Node without children
    Leaf,
}

impl SizeTier {
    /// Classify a node by depth and whether it has children in the full tree.
    #[must_use]
    pub const fn classify(depth: usize, has_children: bool) -> Self {
        if depth == 0 {
            Self::Root
        } else if has_children {
            Self::Branch
        } else {
            Self::Leaf
        }
    }

    /// Preferred circle radius before fitting to the available space.
    #[must_use]
    pub const fn base_radius(self, breakpoint: Breakpoint) -> f32 {
        let leaf = match breakpoint {
            Breakpoint::Mobile => 8.0,
            Breakpoint::Tablet => 10.0,
            Breakpoint::Desktop => 12.0,
        };
        match self {
            Self::Root => leaf * 1.5,
            Self::Branch => leaf * 1.2,
            Self::Leaf => leaf,
        }
    }
}

/// One placed node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionedNode {
    /// Node in the index
    pub id: NodeId,
    /// Tier number
    pub depth: usize,
    /// Size class
    pub tier: SizeTier,
    /// Circle center
    pub center: Point,
    /// Circle radius, never negative
    pub radius: f32,
    /// Horizontal pixels the node's label may use without reaching a neighbor
    pub label_space: f32,
    /// Length of the node's slot along the cross axis. No other node in the
    /// same tier overlaps it.
    pub cross_space: f32,
}

/// Connection from a visible parent to a visible child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    /// Parent node
    pub parent: NodeId,
    /// Child node; its tag colors the edge
    pub child: NodeId,
    /// Parent center
    pub from: Point,
    /// Child center
    pub to: Point,
}

impl Edge {
    /// Bezier control points of the diagonal connector.
    ///
    /// The curve leaves the parent and enters the child along the main axis.
    #[must_use]
    pub fn control_points(&self, orientation: Orientation) -> (Point, Point) {
        match orientation {
            Orientation::TopDown => {
                let mid = (self.from.y + self.to.y) / 2.0;
                (Point::new(self.from.x, mid), Point::new(self.to.x, mid))
            }
            Orientation::LeftRight => {
                let mid = (self.from.x + self.to.x) / 2.0;
                (Point::new(mid, self.from.y), Point::new(mid, self.to.y))
            }
        }
    }
}

/// Positioned nodes and edges for one (visible set, area) pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeLayout {
    nodes: Vec<PositionedNode>,
    edges: Vec<Edge>,
    area: Rect,
    breakpoint: Breakpoint,
    orientation: Orientation,
    tier_gap: f32,
}

impl TreeLayout {
    fn empty(area: Rect, orientation: Orientation) -> Self {
        Self {
            area,
            orientation,
            breakpoint: Breakpoint::from_width(area.width),
            ..Self::default()
        }
    }

    /// Placed nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[PositionedNode] {
        &self.nodes
    }

    /// Edges in document order of their child.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Whether nothing was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Area the layout was computed for.
    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }

    /// Width class used for sizes.
    #[must_use]
    pub const fn breakpoint(&self) -> Breakpoint {
        self.breakpoint
    }

    /// Main axis direction.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Distance between adjacent tiers.
    #[must_use]
    pub const fn tier_gap(&self) -> f32 {
        self.tier_gap
    }

    /// Placement of `id`, if visible.
    #[must_use]
    pub fn position_of(&self, id: NodeId) -> Option<&PositionedNode> {
        // Visible ids are increasing in pre-order.
        self.nodes
            .binary_search_by_key(&id, |n| n.id)
            .ok()
            .map(|i| &self.nodes[i])
    }
}

/// Place every visible node inside `area`.
///
/// An empty or non-finite area yields an empty layout; nothing is clamped
/// to a minimum size.
#[must_use]
pub fn compute_layout(
    index: &TreeIndex,
    visible: &VisibleSet,
    area: Rect,
    config: &LayoutConfig,
) -> TreeLayout {
    let usable = area.width.is_finite()
        && area.height.is_finite()
        && area.x.is_finite()
        && area.y.is_finite()
        && area.width > 0.0
        && area.height > 0.0;
    if !usable || visible.is_empty() {
        trace!(width = area.width, height = area.height, "layout skipped");
        return TreeLayout::empty(area, config.orientation);
    }

    let (main_len, cross_len) = match config.orientation {
        Orientation::TopDown => (area.height, area.width),
        Orientation::LeftRight => (area.width, area.height),
    };
    let margin = if config.margin.is_finite() {
        config.margin.max(0.0).min(cross_len / 4.0).min(main_len / 4.0)
    } else {
        0.0
    };
    let usable_cross = cross_len - 2.0 * margin;
    let usable_main = main_len - 2.0 * margin;

    let tiers = match config.tier_spacing {
        TierSpacing::Fit => visible.max_depth(index) + 1,
        TierSpacing::FullDepth => index.max_depth() + 1,
    };
    let tier_gap = usable_main / tiers as f32;

    // Visible-leaf weights, children before parents.
    let mut weight = vec![0usize; index.len()];
    for &id in visible.ids().iter().rev() {
        let w = weight[id.index()].max(1);
        weight[id.index()] = w;
        if let Some(parent) = index.get(id).and_then(|n| n.parent) {
            weight[parent.index()] += w;
        }
    }
    let total = weight[NodeId::ROOT.index()].max(1);
    let unit = usable_cross / total as f32;

    // Slot starts, parents before children.
    let mut start = vec![0usize; index.len()];
    for &id in visible.ids() {
        let Some(node) = index.get(id) else { continue };
        let mut cursor = start[id.index()];
        for &child in &node.children {
            if visible.contains(child) {
                start[child.index()] = cursor;
                cursor += weight[child.index()];
            }
        }
    }

    let breakpoint = Breakpoint::from_width(area.width);
    let radius_cap = (unit * 0.4).min(tier_gap * 0.35);
    let next_radius = SizeTier::Branch.base_radius(breakpoint).min(radius_cap).max(0.0);
    let mut nodes = Vec::with_capacity(visible.len());
    for &id in visible.ids() {
        let Some(node) = index.get(id) else { continue };
        let w = weight[id.index()] as f32;
        let cross = margin + (start[id.index()] as f32 + w / 2.0) * unit;
        let main = margin + tier_gap * (node.depth as f32 + 0.5);
        let center = match config.orientation {
            Orientation::TopDown => Point::new(area.x + cross, area.y + main),
            Orientation::LeftRight => Point::new(area.x + main, area.y + cross),
        };
        let tier = SizeTier::classify(node.depth, node.has_children());
        let radius = tier.base_radius(breakpoint).min(radius_cap);
        let radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        let cross_space = w * unit;
        // Left-right labels sit beside the node and stop short of the next tier.
        let label_space = match config.orientation {
            Orientation::TopDown => cross_space - 4.0,
            Orientation::LeftRight => tier_gap - radius - next_radius - 2.0 * SIDE_LABEL_GAP,
        };
        nodes.push(PositionedNode {
            id,
            depth: node.depth,
            tier,
            center,
            radius,
            label_space: if label_space.is_finite() { label_space.max(0.0) } else { 0.0 },
            cross_space,
        });
    }

    let mut layout = TreeLayout {
        nodes,
        edges: Vec::new(),
        area,
        breakpoint,
        orientation: config.orientation,
        tier_gap,
    };
    let edges = layout
        .nodes
        .iter()
        .filter_map(|placed| {
            let parent = index.get(placed.id)?.parent?;
            let from = layout.position_of(parent)?.center;
            Some(Edge {
                parent,
                child: placed.id,
                from,
                to: placed.center,
            })
        })
        .collect();
    layout.edges = edges;

    trace!(
        nodes = layout.nodes.len(),
        tiers,
        width = area.width,
        height = area.height,
        "computed layout"
    );
    layout
}
