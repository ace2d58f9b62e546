//! Draw commands produced by painting.
//!
//! Every backend (SVG serializer, browser DOM) consumes these primitives.

use crate::{Color, Point, Rect};
use serde::{Deserialize, Serialize};

/// Stroke style for outlines and connectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Color,
    /// Stroke width in pixels
    pub width: f32,
    /// Line cap style
    pub cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            cap: LineCap::Butt,
        }
    }
}

impl StrokeStyle {
    /// Solid stroke of the given color and width.
    #[must_use]
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }
}

/// Line cap style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    /// Flat cap at endpoint
    #[default]
    Butt,
    /// Rounded cap
    Round,
}

impl LineCap {
    /// SVG `stroke-linecap` value.
    #[must_use]
    pub const fn as_svg(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
        }
    }
}

/// Box style for rectangles and circles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStyle {
    /// Fill color (None = no fill)
    pub fill: Option<Color>,
    /// Stroke style (None = no stroke)
    pub stroke: Option<StrokeStyle>,
}

impl Default for BoxStyle {
    fn default() -> Self {
        Self {
            fill: Some(Color::WHITE),
            stroke: None,
        }
    }
}

impl BoxStyle {
    /// Create a box with only fill color.
    #[must_use]
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
        }
    }

    /// Create a box with only stroke.
    #[must_use]
    pub fn stroke(style: StrokeStyle) -> Self {
        Self {
            fill: None,
            stroke: Some(style),
        }
    }
}

/// Drawing primitive - all rendering reduces to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Draw a cubic Bezier curve
    Curve {
        /// Start point
        from: Point,
        /// First control point
        ctrl1: Point,
        /// Second control point
        ctrl2: Point,
        /// End point
        to: Point,
        /// Stroke style
        style: StrokeStyle,
    },

    /// Draw a rectangle
    Rect {
        /// Rectangle bounds
        bounds: Rect,
        /// Uniform corner radius
        radius: f32,
        /// Box style
        style: BoxStyle,
    },

    /// Draw a circle
    Circle {
        /// Center point
        center: Point,
        /// Radius
        radius: f32,
        /// Box style
        style: BoxStyle,
    },

    /// Draw text
    Text {
        /// Text content
        content: String,
        /// Position
        position: Point,
        /// Text style
        style: crate::widget::TextStyle,
    },

    /// Named group of commands
    Group {
        /// Stable key identifying what the group draws
        key: String,
        /// Whether the group reacts to pointer activation
        interactive: bool,
        /// Child commands
        children: Vec<DrawCommand>,
    },
}

impl DrawCommand {
    /// Create a rounded rectangle.
    #[must_use]
    pub fn rounded_rect(bounds: Rect, radius: f32, color: Color) -> Self {
        Self::Rect {
            bounds,
            radius,
            style: BoxStyle::fill(color),
        }
    }

    /// Create a stroked rectangle.
    #[must_use]
    pub fn stroked_rect(bounds: Rect, stroke: StrokeStyle) -> Self {
        Self::Rect {
            bounds,
            radius: 0.0,
            style: BoxStyle::stroke(stroke),
        }
    }

    /// Create a filled circle.
    #[must_use]
    pub fn filled_circle(center: Point, radius: f32, color: Color) -> Self {
        Self::Circle {
            center,
            radius,
            style: BoxStyle::fill(color),
        }
    }

    /// Number of primitive (non-group) commands, counting nested children.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        match self {
            Self::Group { children, .. } => children.iter().map(Self::primitive_count).sum(),
            _ => 1,
        }
    }

    /// Visit every command depth-first, groups before their children.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        if let Self::Group { children, .. } = self {
            for child in children {
                child.walk(visit);
            }
        }
    }
}
