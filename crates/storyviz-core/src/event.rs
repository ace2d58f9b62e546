//! Input events delivered to widgets.
//!
//! Hosts (the browser runtime, the CLI, tests) translate their native input
//! into these values; widgets never see platform event types.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Input event types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Mouse moved to position
    MouseMove {
        /// New position
        position: Point,
    },
    /// Mouse button pressed
    MouseDown {
        /// Position of click
        position: Point,
        /// Button pressed
        button: MouseButton,
    },
    /// Mouse button released (a completed click)
    MouseUp {
        /// Position of release
        position: Point,
        /// Button released
        button: MouseButton,
    },
    /// Pointer left the widget's surface
    MouseLeave,
    /// Key pressed
    KeyDown {
        /// Key pressed
        key: Key,
    },
    /// Widget gained focus
    FocusIn,
    /// Widget lost focus
    FocusOut,
    /// Host container resized
    Resize {
        /// New width
        width: f32,
        /// New height
        height: f32,
    },
}

impl Event {
    /// Position carried by pointer events, if any.
    #[must_use]
    pub const fn position(&self) -> Option<Point> {
        match self {
            Self::MouseMove { position }
            | Self::MouseDown { position, .. }
            | Self::MouseUp { position, .. } => Some(*position),
            _ => None,
        }
    }
}

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button (wheel click)
    Middle,
}

/// Keyboard keys the widgets react to.
///
/// Anything else arrives as [`Key::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Enter/Return key
    Enter,
    /// Space key
    Space,
    /// Escape key
    Escape,
    /// Tab key
    Tab,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Home key
    Home,
    /// End key
    End,
    /// Unmapped key
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` value.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "Enter" | "NumpadEnter" => Self::Enter,
            "Space" => Self::Space,
            "Escape" => Self::Escape,
            "Tab" => Self::Tab,
            "ArrowUp" => Self::Up,
            "ArrowDown" => Self::Down,
            "ArrowLeft" => Self::Left,
            "ArrowRight" => Self::Right,
            "Home" => Self::Home,
            "End" => Self::End,
            _ => Self::Other,
        }
    }

    /// Keys that activate the focused control.
    #[must_use]
    pub const fn is_activation(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_position() {
        let e = Event::MouseUp {
            position: Point::new(3.0, 4.0),
            button: MouseButton::Left,
        };
        assert_eq!(e.position(), Some(Point::new(3.0, 4.0)));
        assert_eq!(Event::MouseLeave.position(), None);
        assert_eq!(Event::KeyDown { key: Key::Tab }.position(), None);
    }

    #[test]
    fn test_key_from_code() {
        assert_eq!(Key::from_code("Enter"), Key::Enter);
        assert_eq!(Key::from_code("NumpadEnter"), Key::Enter);
        assert_eq!(Key::from_code("ArrowDown"), Key::Down);
        assert_eq!(Key::from_code("KeyQ"), Key::Other);
    }

    #[test]
    fn test_activation_keys() {
        assert!(Key::Enter.is_activation());
        assert!(Key::Space.is_activation());
        assert!(!Key::Tab.is_activation());
    }

    #[test]
    fn test_event_serde_round_trip() {
        let e = Event::Resize {
            width: 900.0,
            height: 480.0,
        };
        let json = serde_json::to_string(&e).unwrap();
        let back: Event = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
