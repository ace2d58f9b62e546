//! Paint a [`TreeLayout`] into a [`Canvas`].
//!
//! Top-down trees stack a node's text under it. Left-right trees put the
//! text beside the node, inside its slot.
//!
//! Drawing order is edges, nodes, then the tooltip, so connectors pass
//! under circles and the tooltip sits above everything. Every node is
//! wrapped in a group keyed by its path; toggleable nodes are marked
//! interactive so hosts can attach pointer handling to them.

use super::expansion::ExpansionState;
use super::index::{IndexedNode, NodeId, TreeIndex};
use super::label::{self, LabelLimits};
use super::layout::{Breakpoint, Orientation, PositionedNode, SizeTier, TreeLayout, SIDE_LABEL_GAP};
use super::palette::{map_category, Legend, Palette, PaletteRole};
use storyviz_core::{Canvas, Color, FontWeight, Point, Rect, TextAnchor, TextStyle};

/// Node outline, label halo, and the indicator glyph on dark fills.
pub const CREAM: Color = Color {
    r: 0.984,
    g: 0.914,
    b: 0.816,
    a: 1.0,
};

/// Label text, and the indicator glyph on light fills.
pub const INK: Color = Color {
    r: 0.141,
    g: 0.282,
    b: 0.333,
    a: 1.0,
};

/// Connector underlay.
pub const EDGE_BASE: Color = Color {
    r: 0.529,
    g: 0.310,
    b: 0.255,
    a: 0.3,
};

/// Secondary tooltip and legend text.
pub const MUTED: Color = Color {
    r: 0.392,
    g: 0.455,
    b: 0.545,
    a: 1.0,
};

/// Tooltip border.
pub const TOOLTIP_BORDER: Color = Color {
    r: 0.898,
    g: 0.906,
    b: 0.922,
    a: 1.0,
};

/// Node outline width.
pub const NODE_STROKE_WIDTH: f32 = 2.5;
/// Hovered nodes grow by this factor.
pub const HOVER_SCALE: f32 = 1.3;
/// Gap between the focus ring and the node outline.
pub const FOCUS_RING_GAP: f32 = 5.0;
/// Distance from node edge to the label baseline.
pub const LABEL_OFFSET: f32 = 25.0;
/// Badge height.
pub const BADGE_HEIGHT: f32 = 18.0;
/// Minimum badge width.
pub const BADGE_MIN_WIDTH: f32 = 70.0;
/// Height reserved for the legend strip.
pub const LEGEND_HEIGHT: f32 = 44.0;

const BADGE_FONT: f32 = 10.0;
const METRIC_FONT: f32 = 11.0;
const METRIC_LINE: f32 = 14.0;
const LINE_GAP: f32 = 4.0;
const TOOLTIP_MAX_WIDTH: f32 = 260.0;
const TOOLTIP_PADDING: f32 = 10.0;
const TOOLTIP_MAX_LINES: usize = 4;

/// Label font size for a size class.
#[must_use]
pub const fn label_font_size(tier: SizeTier, breakpoint: Breakpoint) -> f32 {
    match (tier, breakpoint) {
        (SizeTier::Root, _) => 18.0,
        (SizeTier::Branch, Breakpoint::Mobile) => 14.0,
        (SizeTier::Branch, Breakpoint::Tablet) => 15.0,
        (SizeTier::Branch, Breakpoint::Desktop) => 16.0,
        (SizeTier::Leaf, Breakpoint::Mobile) => 12.0,
        (SizeTier::Leaf, Breakpoint::Tablet) => 13.0,
        (SizeTier::Leaf, Breakpoint::Desktop) => 14.0,
    }
}

/// Label font weight for a size class.
#[must_use]
pub const fn label_font_weight(tier: SizeTier) -> FontWeight {
    match tier {
        SizeTier::Root => FontWeight::Bold,
        SizeTier::Branch => FontWeight::Semibold,
        SizeTier::Leaf => FontWeight::Medium,
    }
}

/// Connector widths (underlay, overlay) at full node size.
#[must_use]
pub const fn edge_widths(breakpoint: Breakpoint) -> (f32, f32) {
    match breakpoint {
        Breakpoint::Mobile => (16.0, 10.0),
        Breakpoint::Tablet => (20.0, 12.0),
        Breakpoint::Desktop => (24.0, 16.0),
    }
}

/// Rough rendered width of `text`.
fn text_width(text: &str, size: f32) -> f32 {
    label::display_width(text) as f32 * size * label::GLYPH_ASPECT
}

/// Horizontal anchor for a node's text block.
#[derive(Clone, Copy)]
struct TextAt {
    x: f32,
    anchor: TextAnchor,
}

/// Everything needed to paint one frame of the tree.
pub(crate) struct TreePainter<'a> {
    pub(crate) index: &'a TreeIndex,
    pub(crate) expansion: &'a ExpansionState,
    pub(crate) layout: &'a TreeLayout,
    pub(crate) palette: &'a Palette,
    pub(crate) legend: &'a Legend,
    pub(crate) labels: &'a LabelLimits,
    pub(crate) focused: Option<NodeId>,
    pub(crate) hovered: Option<NodeId>,
}

impl TreePainter<'_> {
    pub(crate) fn paint(&self, canvas: &mut dyn Canvas) {
        self.paint_edges(canvas);
        for placed in self.layout.nodes() {
            if let Some(node) = self.index.get(placed.id) {
                self.paint_node(canvas, placed, node);
            }
        }
        if let Some(id) = self.hovered {
            self.paint_tooltip(canvas, id);
        }
    }

    fn paint_edges(&self, canvas: &mut dyn Canvas) {
        let orientation = self.layout.orientation();
        let (base_width, overlay_width) = edge_widths(self.layout.breakpoint());
        for edge in self.layout.edges() {
            let Some(child) = self.layout.position_of(edge.child) else {
                continue;
            };
            let Some(node) = self.index.get(edge.child) else {
                continue;
            };
            // Thin connectors when nodes were shrunk to fit.
            let nominal = child.tier.base_radius(self.layout.breakpoint());
            let scale = if nominal > 0.0 {
                (child.radius / nominal).min(1.0)
            } else {
                0.0
            };
            let (c1, c2) = edge.control_points(orientation);
            canvas.draw_curve(edge.from, c1, c2, edge.to, EDGE_BASE, base_width * scale);
            let overlay = map_category(&node.tag, self.palette).with_alpha(0.6);
            canvas.draw_curve(edge.from, c1, c2, edge.to, overlay, overlay_width * scale);
        }
    }

    fn paint_node(&self, canvas: &mut dyn Canvas, placed: &PositionedNode, node: &IndexedNode) {
        let toggleable = self.index.is_toggleable(placed.id);
        let key = self.index.path_of(placed.id).to_string();
        canvas.push_group(&key, toggleable);

        let center = placed.center;
        let radius = if self.hovered == Some(placed.id) {
            placed.radius * HOVER_SCALE
        } else {
            placed.radius
        };
        let fill = map_category(&node.tag, self.palette);
        canvas.fill_circle(center, radius, fill);
        canvas.stroke_circle(center, radius, CREAM, NODE_STROKE_WIDTH);

        if toggleable && radius > 0.0 {
            let glyph = if self.expansion.is_expanded(placed.id) {
                "−"
            } else {
                "+"
            };
            let size = placed.radius * 1.2;
            canvas.draw_text(
                glyph,
                Point::new(center.x, size.mul_add(0.35, center.y)),
                &TextStyle {
                    size,
                    color: fill.best_contrast(CREAM, INK),
                    weight: FontWeight::Bold,
                    anchor: TextAnchor::Middle,
                    halo: None,
                },
            );
        }

        if self.focused == Some(placed.id) {
            canvas.stroke_circle(center, radius + FOCUS_RING_GAP, INK, 2.0);
        }

        match self.layout.orientation() {
            Orientation::TopDown => self.paint_text_below(canvas, placed, node),
            Orientation::LeftRight => self.paint_text_beside(canvas, placed, node),
        }

        canvas.pop_group();
    }

    /// Label, badge, and metrics stacked under the node.
    fn paint_text_below(&self, canvas: &mut dyn Canvas, placed: &PositionedNode, node: &IndexedNode) {
        let font = label_font_size(placed.tier, self.layout.breakpoint());
        let text = label::fit_label(&node.label, placed.tier, self.labels, placed.label_space, font);
        let label_y = placed.radius + LABEL_OFFSET + placed.center.y;
        let at = TextAt {
            x: placed.center.x,
            anchor: TextAnchor::Middle,
        };
        if !text.is_empty() {
            draw_label(canvas, placed.tier, &text, at, label_y, font);
        }
        if placed.tier == SizeTier::Leaf {
            let top = label_y + font.max(0.0) * 0.4;
            let below = match self.badge_text(placed, node) {
                Some((text, width)) => self.paint_badge(canvas, node, &text, width, at, top),
                None => top,
            };
            self.paint_metrics(canvas, placed, node, at, below, node.metrics.len());
        }
    }

    /// Label, badge, and metrics beside the node, centered on it and kept
    /// inside its slot. Lines that do not fit the slot are dropped from the
    /// bottom; a slot shorter than one label line gets no text.
    fn paint_text_beside(&self, canvas: &mut dyn Canvas, placed: &PositionedNode, node: &IndexedNode) {
        let font = label_font_size(placed.tier, self.layout.breakpoint());
        let room = placed.cross_space;
        let mut height = font + LINE_GAP;
        if !room.is_finite() || room < height {
            return;
        }
        let text = label::fit_label(&node.label, placed.tier, self.labels, placed.label_space, font);
        if text.is_empty() {
            return;
        }

        let leaf = placed.tier == SizeTier::Leaf;
        let badge = if leaf { self.badge_text(placed, node) } else { None };
        let badge = badge.filter(|_| height + BADGE_HEIGHT + LINE_GAP <= room);
        if badge.is_some() {
            height += BADGE_HEIGHT + LINE_GAP;
        }
        let mut metrics = 0;
        if leaf {
            while metrics < node.metrics.len() && height + METRIC_LINE <= room {
                height += METRIC_LINE;
                metrics += 1;
            }
        }

        let at = TextAt {
            x: placed.center.x + placed.radius + SIDE_LABEL_GAP,
            anchor: TextAnchor::Start,
        };
        let mut cursor = placed.center.y - height / 2.0;
        draw_label(canvas, placed.tier, &text, at, cursor + font + LINE_GAP / 2.0, font);
        cursor += font + LINE_GAP;
        if let Some((text, width)) = &badge {
            let _ = self.paint_badge(canvas, node, text, *width, at, cursor + LINE_GAP / 2.0);
            cursor += BADGE_HEIGHT + LINE_GAP;
        }
        // Metric baselines sit just above the bottom of their line.
        self.paint_metrics(canvas, placed, node, at, cursor - 3.0, metrics);
    }

    /// Badge text and width for a terminal leaf with a legend label.
    fn badge_text(&self, placed: &PositionedNode, node: &IndexedNode) -> Option<(String, f32)> {
        if !node.tag.is_terminal() {
            return None;
        }
        let role = PaletteRole::for_tag(&node.tag);
        let text = self.legend.label_for(role)?;
        let width = (text_width(text, BADGE_FONT) + 16.0)
            .max(BADGE_MIN_WIDTH)
            .min(placed.label_space);
        let cols = label::columns_for(width - 12.0, BADGE_FONT);
        let text = label::truncate(text, cols.min(self.labels.leaf));
        (!text.is_empty()).then_some((text, width))
    }

    /// Draws the leaf badge and returns the y below it.
    fn paint_badge(
        &self,
        canvas: &mut dyn Canvas,
        node: &IndexedNode,
        text: &str,
        width: f32,
        at: TextAt,
        top: f32,
    ) -> f32 {
        let color = map_category(&node.tag, self.palette);
        let (left, text_x) = match at.anchor {
            TextAnchor::Start => (at.x, at.x + width / 2.0),
            TextAnchor::Middle | TextAnchor::End => (at.x - width / 2.0, at.x),
        };
        let rect = Rect::new(left, top, width, BADGE_HEIGHT);
        canvas.fill_rect(rect, BADGE_HEIGHT / 2.0, color.with_alpha(0.2));
        canvas.draw_text(
            text,
            Point::new(text_x, top + 13.0),
            &TextStyle {
                size: BADGE_FONT,
                color,
                weight: FontWeight::Bold,
                anchor: TextAnchor::Middle,
                halo: None,
            },
        );
        top + BADGE_HEIGHT
    }

    fn paint_metrics(
        &self,
        canvas: &mut dyn Canvas,
        placed: &PositionedNode,
        node: &IndexedNode,
        at: TextAt,
        top: f32,
        limit: usize,
    ) {
        let cols = label::columns_for(placed.label_space, METRIC_FONT).min(self.labels.leaf + 8);
        for (i, metric) in node.metrics.iter().take(limit).enumerate() {
            let line = label::truncate(&format!("{} {}", metric.value, metric.label), cols);
            if line.is_empty() {
                break;
            }
            canvas.draw_text(
                &line,
                Point::new(at.x, (i + 1) as f32 * METRIC_LINE + top),
                &TextStyle {
                    size: METRIC_FONT,
                    color: INK,
                    weight: FontWeight::Semibold,
                    anchor: at.anchor,
                    halo: Some(CREAM),
                },
            );
        }
    }

    fn paint_tooltip(&self, canvas: &mut dyn Canvas, id: NodeId) {
        let (Some(node), Some(placed)) = (self.index.get(id), self.layout.position_of(id)) else {
            return;
        };
        if !node.has_tooltip() {
            return;
        }
        let area = self.layout.area();
        let width = TOOLTIP_MAX_WIDTH.min(area.width - 2.0 * TOOLTIP_PADDING);
        if width <= 2.0 * TOOLTIP_PADDING {
            return;
        }
        let inner = width - 2.0 * TOOLTIP_PADDING;

        let title = label::truncate(&node.label, label::columns_for(inner, 13.0));
        let mut lines: Vec<(String, f32, Color, FontWeight)> = vec![(title, 13.0, INK, FontWeight::Bold)];
        if let Some(description) = &node.description {
            for line in label::wrap(description, label::columns_for(inner, 12.0), TOOLTIP_MAX_LINES) {
                lines.push((line, 12.0, INK, FontWeight::Normal));
            }
        }
        if let Some(details) = &node.details {
            for line in label::wrap(details, label::columns_for(inner, 11.0), TOOLTIP_MAX_LINES) {
                lines.push((line, 11.0, MUTED, FontWeight::Normal));
            }
        }

        let height: f32 = lines.iter().map(|(_, size, _, _)| size + 4.0).sum::<f32>() + 2.0 * TOOLTIP_PADDING;
        let radius = placed.radius * HOVER_SCALE;
        let anchor_y = placed.center.y - radius - 10.0;
        let proposed = Rect::new(placed.center.x - width / 2.0, anchor_y - height, width, height);
        let rect = proposed.clamp_within(&area);

        canvas.push_group("tooltip", false);
        canvas.fill_rect(rect, 6.0, Color::WHITE.with_alpha(0.97));
        canvas.stroke_rect(rect, TOOLTIP_BORDER, 1.0);
        let mut baseline = rect.y + TOOLTIP_PADDING;
        for (text, size, color, weight) in &lines {
            baseline += size;
            canvas.draw_text(
                text,
                Point::new(rect.x + TOOLTIP_PADDING, baseline),
                &TextStyle {
                    size: *size,
                    color: *color,
                    weight: *weight,
                    anchor: TextAnchor::Start,
                    halo: None,
                },
            );
            baseline += 4.0;
        }
        canvas.pop_group();
    }
}

fn draw_label(canvas: &mut dyn Canvas, tier: SizeTier, text: &str, at: TextAt, baseline: f32, font: f32) {
    canvas.draw_text(
        text,
        Point::new(at.x, baseline),
        &TextStyle {
            size: font,
            color: INK,
            weight: label_font_weight(tier),
            anchor: at.anchor,
            halo: Some(CREAM),
        },
    );
}

/// Paint the legend as a row of swatches across the top of `strip`.
pub(crate) fn paint_legend(canvas: &mut dyn Canvas, legend: &Legend, palette: &Palette, strip: Rect) {
    if legend.is_empty() || strip.width <= 0.0 || strip.height <= 0.0 {
        return;
    }
    let slot = strip.width / legend.entries.len() as f32;
    canvas.push_group("legend", false);
    for (i, entry) in legend.entries.iter().enumerate() {
        let x = (i as f32).mul_add(slot, strip.x);
        let swatch = Point::new(x + 12.0, strip.y + 14.0);
        canvas.fill_circle(swatch, 6.0, palette.color(entry.role));
        canvas.stroke_circle(swatch, 6.0, CREAM, 1.5);

        let cols = label::columns_for(slot - 30.0, 12.0);
        let text = label::truncate(&entry.label, cols);
        canvas.draw_text(
            &text,
            Point::new(x + 24.0, strip.y + 18.0),
            &TextStyle {
                size: 12.0,
                color: INK,
                weight: FontWeight::Semibold,
                anchor: TextAnchor::Start,
                halo: None,
            },
        );
        if let Some(sub) = &entry.sub {
            let sub = label::truncate(sub, label::columns_for(slot - 30.0, 11.0));
            canvas.draw_text(
                &sub,
                Point::new(x + 24.0, strip.y + 33.0),
                &TextStyle {
                    size: 11.0,
                    color: MUTED,
                    ..TextStyle::default()
                },
            );
        }
    }
    canvas.pop_group();
}
