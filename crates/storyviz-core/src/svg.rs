//! SVG serialization of recorded draw commands.
//!
//! Each call produces a complete standalone document, so a host that swaps
//! the previous frame for the new one never keeps stale elements around.

use crate::draw::{BoxStyle, DrawCommand, StrokeStyle};
use crate::widget::{TextAnchor, TextStyle};
use crate::{Color, Point, Size};
use std::fmt::Write;

/// Font stack used when none is configured.
pub const DEFAULT_FONT_FAMILY: &str = "Inter, system-ui, -apple-system, sans-serif";

/// Configuration for SVG export.
#[derive(Debug, Clone)]
pub struct SvgWriter {
    /// Font family applied to the root element.
    pub font_family: String,
    /// Accessible title emitted as `<title>`.
    pub title: Option<String>,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            title: None,
        }
    }
}

impl SvgWriter {
    /// Set the accessible title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Serialize `commands` into an SVG document of the given size.
    ///
    /// Degenerate sizes are written as a zero-sized document.
    #[must_use]
    pub fn write(&self, commands: &[DrawCommand], size: Size) -> String {
        let size = size.sanitized();
        let (w, h) = (fmt_num(size.width), fmt_num(size.height));
        let mut out = String::with_capacity(256 + commands.len() * 96);

        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\" font-family=\""
        );
        escape_into(&mut out, &self.font_family, true);
        out.push_str("\" role=\"img\">");

        if let Some(title) = &self.title {
            out.push_str("<title>");
            escape_into(&mut out, title, false);
            out.push_str("</title>");
        }

        for command in commands {
            write_command(&mut out, command);
        }

        out.push_str("</svg>");
        out
    }
}

/// Serialize `commands` with default settings.
#[must_use]
pub fn render_document(commands: &[DrawCommand], size: Size) -> String {
    SvgWriter::default().write(commands, size)
}

fn write_command(out: &mut String, command: &DrawCommand) {
    match command {
        DrawCommand::Curve {
            from,
            ctrl1,
            ctrl2,
            to,
            style,
        } => {
            let _ = write!(
                out,
                "<path d=\"M{} C{} {} {}\" fill=\"none\"",
                fmt_point(*from),
                fmt_point(*ctrl1),
                fmt_point(*ctrl2),
                fmt_point(*to)
            );
            write_stroke(out, style);
            out.push_str("/>");
        }
        DrawCommand::Rect {
            bounds,
            radius,
            style,
        } => {
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\"",
                fmt_num(bounds.x),
                fmt_num(bounds.y),
                fmt_num(bounds.width.max(0.0)),
                fmt_num(bounds.height.max(0.0))
            );
            if *radius > 0.0 {
                let _ = write!(out, " rx=\"{}\"", fmt_num(*radius));
            }
            write_box(out, style);
            out.push_str("/>");
        }
        DrawCommand::Circle {
            center,
            radius,
            style,
        } => {
            let _ = write!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\"",
                fmt_num(center.x),
                fmt_num(center.y),
                fmt_num(radius.max(0.0))
            );
            write_box(out, style);
            out.push_str("/>");
        }
        DrawCommand::Text {
            content,
            position,
            style,
        } => write_text(out, content, *position, style),
        DrawCommand::Group {
            key,
            interactive,
            children,
        } => {
            out.push_str("<g data-key=\"");
            escape_into(out, key, true);
            out.push('"');
            if *interactive {
                out.push_str(" class=\"toggle\" cursor=\"pointer\"");
            }
            out.push('>');
            for child in children {
                write_command(out, child);
            }
            out.push_str("</g>");
        }
    }
}

fn write_text(out: &mut String, content: &str, position: Point, style: &TextStyle) {
    let anchor = match style.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let _ = write!(
        out,
        "<text x=\"{}\" y=\"{}\" font-size=\"{}\" font-weight=\"{}\" text-anchor=\"{anchor}\"",
        fmt_num(position.x),
        fmt_num(position.y),
        fmt_num(style.size),
        style.weight.css_value()
    );
    write_paint(out, "fill", style.color);
    if let Some(halo) = style.halo {
        write_paint(out, "stroke", halo);
        out.push_str(" stroke-width=\"3\" paint-order=\"stroke\" stroke-linejoin=\"round\"");
    }
    out.push('>');
    escape_into(out, content, false);
    out.push_str("</text>");
}

fn write_box(out: &mut String, style: &BoxStyle) {
    match style.fill {
        Some(fill) => write_paint(out, "fill", fill),
        None => out.push_str(" fill=\"none\""),
    }
    if let Some(stroke) = &style.stroke {
        write_stroke(out, stroke);
    }
}

fn write_stroke(out: &mut String, style: &StrokeStyle) {
    write_paint(out, "stroke", style.color);
    let _ = write!(out, " stroke-width=\"{}\"", fmt_num(style.width));
    if style.cap != crate::draw::LineCap::Butt {
        let _ = write!(out, " stroke-linecap=\"{}\"", style.cap.as_svg());
    }
}

/// Write `attr="#rrggbb"` plus `attr-opacity` when translucent.
fn write_paint(out: &mut String, attr: &str, color: Color) {
    let _ = write!(out, " {attr}=\"{}\"", color.to_hex());
    if color.a < 1.0 {
        let _ = write!(out, " {attr}-opacity=\"{}\"", fmt_num(color.a));
    }
}

fn fmt_point(p: Point) -> String {
    format!("{},{}", fmt_num(p.x), fmt_num(p.y))
}

/// Format a coordinate with at most two decimals and no trailing zeros.
///
/// Non-finite values are written as `0` so the document stays parseable.
fn fmt_num(v: f32) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// XML-escape `s` into `out`. Quotes are escaped only inside attributes.
fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::widget::Canvas;
    use crate::Rect;

    #[test]
    fn svg_basic_structure() {
        let svg = render_document(&[], Size::new(900.0, 480.0));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("viewBox=\"0 0 900 480\""));
    }

    #[test]
    fn svg_zero_size_is_well_formed() {
        let svg = render_document(&[], Size::new(f32::NAN, -3.0));
        assert!(svg.contains("width=\"0\" height=\"0\""));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn svg_escapes_text() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw_text("a < b & c", Point::new(1.0, 2.0), &TextStyle::default());
        let svg = render_document(canvas.commands(), Size::new(10.0, 10.0));
        assert!(svg.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn svg_escapes_group_keys() {
        let mut canvas = RecordingCanvas::new();
        canvas.push_group("x\"y", true);
        canvas.pop_group();
        let svg = render_document(canvas.commands(), Size::new(10.0, 10.0));
        assert!(svg.contains("data-key=\"x&quot;y\""));
        assert!(svg.contains("class=\"toggle\""));
    }

    #[test]
    fn svg_writes_translucent_paint() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw_curve(
            Point::ORIGIN,
            Point::new(0.0, 5.0),
            Point::new(10.0, 5.0),
            Point::new(10.0, 10.0),
            Color::from_rgb8(0x87, 0x4f, 0x41).with_alpha(0.3),
            2.0,
        );
        let svg = render_document(canvas.commands(), Size::new(10.0, 10.0));
        assert!(svg.contains("d=\"M0,0 C0,5 10,5 10,10\""));
        assert!(svg.contains("stroke=\"#874f41\" stroke-opacity=\"0.3\""));
        assert!(svg.contains("stroke-linecap=\"round\""));
    }

    #[test]
    fn svg_rect_and_circle() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_rect(Rect::new(1.0, 2.0, 30.5, 4.0), 3.0, Color::WHITE);
        canvas.stroke_circle(Point::new(5.0, 5.0), 2.0, Color::BLACK, 1.0);
        let svg = render_document(canvas.commands(), Size::new(50.0, 50.0));
        assert!(svg.contains("<rect x=\"1\" y=\"2\" width=\"30.5\" height=\"4\" rx=\"3\" fill=\"#ffffff\"/>"));
        assert!(svg.contains("<circle cx=\"5\" cy=\"5\" r=\"2\" fill=\"none\" stroke=\"#000000\""));
    }

    #[test]
    fn svg_title_is_escaped() {
        let svg = SvgWriter::default()
            .with_title("Coverage <tree>")
            .write(&[], Size::new(1.0, 1.0));
        assert!(svg.contains("<title>Coverage &lt;tree&gt;</title>"));
    }

    #[test]
    fn fmt_num_trims() {
        assert_eq!(fmt_num(10.0), "10");
        assert_eq!(fmt_num(0.5), "0.5");
        assert_eq!(fmt_num(1.234), "1.23");
        assert_eq!(fmt_num(-0.001), "0");
        assert_eq!(fmt_num(f32::INFINITY), "0");
    }

    #[test]
    fn identical_commands_give_identical_documents() {
        let mut canvas = RecordingCanvas::new();
        canvas.fill_circle(Point::new(3.0, 4.0), 5.0, Color::BLACK);
        let a = render_document(canvas.commands(), Size::new(10.0, 10.0));
        let b = render_document(canvas.commands(), Size::new(10.0, 10.0));
        assert_eq!(a, b);
    }
}
