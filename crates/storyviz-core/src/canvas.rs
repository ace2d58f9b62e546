//! Canvas implementations for rendering.

use crate::draw::{BoxStyle, DrawCommand, LineCap, StrokeStyle};
use crate::widget::{Canvas, TextStyle};
use crate::{Color, Point, Rect};

#[derive(Debug)]
struct OpenGroup {
    key: String,
    interactive: bool,
    children: Vec<DrawCommand>,
}

/// A Canvas implementation that records draw operations as `DrawCommand`s.
///
/// This is useful for:
/// - Testing (verify what was painted)
/// - Serialization (hand the frame to the SVG writer or the DOM)
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
    groups: Vec<OpenGroup>,
}

impl RecordingCanvas {
    /// Create a new empty recording canvas.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the recorded top-level draw commands.
    ///
    /// Groups that are still open are not visible here.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take ownership of the recorded commands, clearing the canvas.
    ///
    /// Any group left open is closed first.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        while !self.groups.is_empty() {
            self.pop_group();
        }
        std::mem::take(&mut self.commands)
    }

    /// Get the number of recorded top-level commands.
    #[must_use]
    pub fn command_count(&self) -> usize {
        self.commands.len()
    }

    /// Check if no commands have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.groups.is_empty()
    }

    /// Depth of currently open groups.
    #[must_use]
    pub fn group_depth(&self) -> usize {
        self.groups.len()
    }

    /// Add a raw draw command.
    pub fn add_command(&mut self, command: DrawCommand) {
        match self.groups.last_mut() {
            Some(group) => group.children.push(command),
            None => self.commands.push(command),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.add_command(DrawCommand::rounded_rect(rect, radius.max(0.0), color));
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.add_command(DrawCommand::stroked_rect(
            rect,
            StrokeStyle::solid(color, width),
        ));
    }

    fn draw_text(&mut self, text: &str, position: Point, style: &TextStyle) {
        self.add_command(DrawCommand::Text {
            content: text.to_string(),
            position,
            style: style.clone(),
        });
    }

    fn draw_curve(
        &mut self,
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        color: Color,
        width: f32,
    ) {
        self.add_command(DrawCommand::Curve {
            from,
            ctrl1,
            ctrl2,
            to,
            style: StrokeStyle {
                cap: LineCap::Round,
                ..StrokeStyle::solid(color, width)
            },
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.add_command(DrawCommand::filled_circle(center, radius, color));
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, color: Color, width: f32) {
        self.add_command(DrawCommand::Circle {
            center,
            radius,
            style: BoxStyle::stroke(StrokeStyle::solid(color, width)),
        });
    }

    fn push_group(&mut self, key: &str, interactive: bool) {
        self.groups.push(OpenGroup {
            key: key.to_string(),
            interactive,
            children: Vec::new(),
        });
    }

    fn pop_group(&mut self) {
        if let Some(group) = self.groups.pop() {
            self.add_command(DrawCommand::Group {
                key: group.key,
                interactive: group.interactive,
                children: group.children,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::FontWeight;

    #[test]
    fn test_recording_canvas_new() {
        let canvas = RecordingCanvas::new();
        assert!(canvas.is_empty());
        assert_eq!(canvas.command_count(), 0);
        assert_eq!(canvas.group_depth(), 0);
    }

    #[test]
    fn test_fill_rect() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Rect::new(10.0, 20.0, 100.0, 50.0), 6.0, Color::WHITE);

        match &canvas.commands()[0] {
            DrawCommand::Rect {
                bounds,
                radius,
                style,
            } => {
                assert_eq!(*bounds, Rect::new(10.0, 20.0, 100.0, 50.0));
                assert_eq!(*radius, 6.0);
                assert_eq!(style.fill, Some(Color::WHITE));
            }
            other => panic!("expected Rect, got {other:?}"),
        }
    }

    #[test]
    fn test_draw_text() {
        let mut canvas = RecordingCanvas::new();
        let style = TextStyle {
            size: 16.0,
            weight: FontWeight::Bold,
            ..TextStyle::default()
        };
        canvas.draw_text("Hello", Point::new(10.0, 20.0), &style);

        match &canvas.commands()[0] {
            DrawCommand::Text {
                content,
                position,
                style,
            } => {
                assert_eq!(content, "Hello");
                assert_eq!(*position, Point::new(10.0, 20.0));
                assert_eq!(style.weight, FontWeight::Bold);
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_draw_curve_has_round_caps() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw_curve(
            Point::ORIGIN,
            Point::new(0.0, 50.0),
            Point::new(100.0, 50.0),
            Point::new(100.0, 100.0),
            Color::BLACK,
            2.0,
        );
        match &canvas.commands()[0] {
            DrawCommand::Curve { style, .. } => {
                assert_eq!(style.cap, LineCap::Round);
                assert_eq!(style.width, 2.0);
            }
            other => panic!("expected Curve, got {other:?}"),
        }
    }

    #[test]
    fn test_stroke_circle() {
        let mut canvas = RecordingCanvas::new();
        canvas.stroke_circle(Point::new(5.0, 5.0), 3.0, Color::BLACK, 1.5);
        match &canvas.commands()[0] {
            DrawCommand::Circle { style, .. } => {
                assert!(style.fill.is_none());
                assert_eq!(style.stroke.as_ref().map(|s| s.width), Some(1.5));
            }
            other => panic!("expected Circle, got {other:?}"),
        }
    }

    #[test]
    fn test_groups_nest_commands() {
        let mut canvas = RecordingCanvas::new();
        canvas.push_group("0", false);
        canvas.fill_circle(Point::ORIGIN, 10.0, Color::WHITE);
        canvas.push_group("0/1", true);
        canvas.fill_circle(Point::new(1.0, 1.0), 5.0, Color::BLACK);
        canvas.pop_group();
        canvas.pop_group();

        assert_eq!(canvas.command_count(), 1);
        match &canvas.commands()[0] {
            DrawCommand::Group {
                key,
                interactive,
                children,
            } => {
                assert_eq!(key, "0");
                assert!(!interactive);
                assert_eq!(children.len(), 2);
                assert!(matches!(
                    &children[1],
                    DrawCommand::Group { key, interactive: true, .. } if key == "0/1"
                ));
            }
            other => panic!("expected Group, got {other:?}"),
        }
    }

    #[test]
    fn test_pop_empty_group_stack() {
        let mut canvas = RecordingCanvas::new();
        canvas.pop_group();
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_take_commands_closes_open_groups() {
        let mut canvas = RecordingCanvas::new();
        canvas.push_group("open", false);
        canvas.stroke_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::BLACK, 1.0);

        let commands = canvas.take_commands();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].primitive_count(), 1);
        assert!(canvas.is_empty());
        assert_eq!(canvas.group_depth(), 0);
    }

    #[test]
    fn test_commands_preserve_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), 0.0, Color::WHITE);
        canvas.fill_circle(Point::ORIGIN, 1.0, Color::WHITE);
        canvas.draw_curve(Point::ORIGIN, Point::ORIGIN, Point::ORIGIN, Point::new(1.0, 1.0), Color::BLACK, 1.0);

        let cmds = canvas.commands();
        assert!(matches!(cmds[0], DrawCommand::Rect { .. }));
        assert!(matches!(cmds[1], DrawCommand::Circle { .. }));
        assert!(matches!(cmds[2], DrawCommand::Curve { .. }));
    }
}
