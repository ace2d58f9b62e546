//! Widget trait and related types.
//!
//! Widgets follow a measure-layout-paint cycle:
//!
//! 1. **Measure**: compute the preferred size given constraints
//! 2. **Layout**: accept the bounds the host allocated
//! 3. **Paint**: emit draw operations into a [`Canvas`]
//!
//! Input flows back through [`Widget::event`], which may return a message
//! describing what changed.
//!
//! # Examples
//!
//! ```
//! use storyviz_core::{TextStyle, TextAnchor, FontWeight, Color};
//!
//! let label = TextStyle {
//!     size: 14.0,
//!     weight: FontWeight::Semibold,
//!     anchor: TextAnchor::Middle,
//!     color: Color::from_hex("#244855").expect("valid hex"),
//!     halo: None,
//! };
//! assert_eq!(label.anchor, TextAnchor::Middle);
//! ```

use crate::constraints::Constraints;
use crate::event::Event;
use crate::geometry::{Point, Rect, Size};
use crate::Color;
use serde::{Deserialize, Serialize};
use std::any::Any;

/// Type identifier for widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(std::any::TypeId);

impl TypeId {
    /// Get the type ID for a type.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self(std::any::TypeId::of::<T>())
    }
}

/// Result of laying out a widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutResult {
    /// Computed size after layout
    pub size: Size,
}

/// Core widget trait.
pub trait Widget: Send + Sync {
    /// Get the type identifier for this widget type.
    fn type_id(&self) -> TypeId;

    /// Compute the preferred size under `constraints`.
    fn measure(&self, constraints: Constraints) -> Size;

    /// Accept the allocated bounds.
    fn layout(&mut self, bounds: Rect) -> LayoutResult;

    /// Generate draw operations for the current state.
    fn paint(&self, canvas: &mut dyn Canvas);

    /// Handle an input event, returning a message when state changed.
    fn event(&mut self, event: &Event) -> Option<Box<dyn Any + Send>>;

    /// Check if this widget is interactive (can receive focus/events).
    fn is_interactive(&self) -> bool {
        false
    }

    /// Check if this widget can receive keyboard focus.
    fn is_focusable(&self) -> bool {
        false
    }

    /// Get the accessible name for screen readers.
    fn accessible_name(&self) -> Option<&str> {
        None
    }

    /// Get the accessible role.
    fn accessible_role(&self) -> AccessibleRole {
        AccessibleRole::Generic
    }

    /// Get the test ID for this widget (if any).
    fn test_id(&self) -> Option<&str> {
        None
    }

    /// Get the current bounds of this widget.
    fn bounds(&self) -> Rect {
        Rect::default()
    }
}

/// Rendering backend abstraction used by [`Widget::paint`].
pub trait Canvas {
    /// Draw a filled rectangle with rounded corners (`radius` 0 for square).
    fn fill_rect(&mut self, rect: Rect, radius: f32, color: Color);

    /// Draw a stroked rectangle.
    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32);

    /// Draw text anchored at `position` (baseline).
    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle);

    /// Draw a cubic Bezier curve with round caps.
    fn draw_curve(&mut self, from: Point, ctrl1: Point, ctrl2: Point, to: Point, color: Color, width: f32);

    /// Draw a filled circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    /// Draw a stroked circle.
    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32);

    /// Open a named group; subsequent commands nest inside it until [`Canvas::pop_group`].
    fn push_group(&mut self, key: &str, interactive: bool);

    /// Close the innermost open group. Unbalanced pops are ignored.
    fn pop_group(&mut self);
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    /// Text starts at the anchor
    #[default]
    Start,
    /// Text is centered on the anchor
    Middle,
    /// Text ends at the anchor
    End,
}

/// Text style for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels
    pub size: f32,
    /// Text color
    pub color: Color,
    /// Font weight
    pub weight: FontWeight,
    /// Alignment around the anchor point
    pub anchor: TextAnchor,
    /// Outline painted behind the glyphs to keep text readable over edges
    pub halo: Option<Color>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 14.0,
            color: Color::BLACK,
            weight: FontWeight::Normal,
            anchor: TextAnchor::Start,
            halo: None,
        }
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontWeight {
    /// Normal (400)
    Normal,
    /// Medium (500)
    Medium,
    /// Semibold (600)
    Semibold,
    /// Bold (700)
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    #[must_use]
    pub const fn css_value(self) -> u16 {
        match self {
            Self::Normal => 400,
            Self::Medium => 500,
            Self::Semibold => 600,
            Self::Bold => 700,
        }
    }
}

/// Accessible role for screen readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AccessibleRole {
    /// Generic element
    #[default]
    Generic,
    /// Image or figure without interaction
    Image,
    /// Hierarchical tree view
    Tree,
    /// Item of a tree view
    TreeItem,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id() {
        assert_eq!(TypeId::of::<String>(), TypeId::of::<String>());
        assert_ne!(TypeId::of::<String>(), TypeId::of::<i32>());
    }

    #[test]
    fn test_text_style_default() {
        let style = TextStyle::default();
        assert_eq!(style.size, 14.0);
        assert_eq!(style.weight, FontWeight::Normal);
        assert_eq!(style.anchor, TextAnchor::Start);
        assert!(style.halo.is_none());
    }

    #[test]
    fn test_font_weight_css() {
        assert_eq!(FontWeight::Normal.css_value(), 400);
        assert_eq!(FontWeight::Bold.css_value(), 700);
    }

    #[test]
    fn test_accessible_role_default() {
        assert_eq!(AccessibleRole::default(), AccessibleRole::Generic);
    }
}
