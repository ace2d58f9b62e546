//! Label fitting.
//!
//! Node labels are truncated, never wrapped: each size tier has a column
//! cap, and the cap shrinks further to the space a node owns so sibling
//! labels cannot overlap. Widths are measured in terminal-style display
//! columns (wide glyphs count two) and truncation never splits a grapheme.

use super::layout::SizeTier;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Ellipsis appended to truncated text.
pub const ELLIPSIS: &str = "…";

/// Average glyph advance as a fraction of the font size.
pub const GLYPH_ASPECT: f32 = 0.6;

/// Column caps per size tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelLimits {
    /// Root label cap
    pub root: usize,
    /// Branch label cap
    pub branch: usize,
    /// Leaf label cap
    pub leaf: usize,
}

impl Default for LabelLimits {
    fn default() -> Self {
        Self {
            root: 28,
            branch: 22,
            leaf: 18,
        }
    }
}

impl LabelLimits {
    /// Cap for a tier.
    #[must_use]
    pub const fn for_tier(&self, tier: SizeTier) -> usize {
        match tier {
            SizeTier::Root => self.root,
            SizeTier::Branch => self.branch,
            SizeTier::Leaf => self.leaf,
        }
    }
}

/// Display width of `text` in columns.
#[must_use]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Columns of text at `font_size` that fit in `space` pixels.
#[must_use]
pub fn columns_for(space: f32, font_size: f32) -> usize {
    let advance = font_size * GLYPH_ASPECT;
    if !(space.is_finite() && advance > 0.0) || space <= 0.0 {
        return 0;
    }
    // Saturating float-to-int cast; `space` is finite and positive here.
    (space / advance).floor() as usize
}

/// Cut `text` to at most `max_cols` columns, ending in an ellipsis when cut.
///
/// A cap of one column yields just the ellipsis, zero yields nothing.
#[must_use]
pub fn truncate(text: &str, max_cols: usize) -> String {
    let text = text.trim();
    if display_width(text) <= max_cols {
        return text.to_string();
    }
    match max_cols {
        0 => return String::new(),
        1 => return ELLIPSIS.to_string(),
        _ => {}
    }
    let budget = max_cols - 1;
    let mut out = String::new();
    for grapheme in text.graphemes(true) {
        let before = out.len();
        out.push_str(grapheme);
        // Widths are contextual (emoji sequences), so measure the prefix.
        if display_width(&out) > budget {
            out.truncate(before);
            break;
        }
    }
    let mut out = out.trim_end().to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Fit a node label: tier cap, further limited to `space` pixels.
#[must_use]
pub fn fit_label(
    text: &str,
    tier: SizeTier,
    limits: &LabelLimits,
    space: f32,
    font_size: f32,
) -> String {
    let cap = limits.for_tier(tier).min(columns_for(space, font_size));
    truncate(text, cap)
}

/// Greedy word wrap to `max_cols`, keeping at most `max_lines` lines.
///
/// Words longer than a line are truncated; overflow past the last line
/// ends that line with an ellipsis.
#[must_use]
pub fn wrap(text: &str, max_cols: usize, max_lines: usize) -> Vec<String> {
    if max_cols == 0 || max_lines == 0 {
        return Vec::new();
    }
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut overflow = false;

    for word in text.split_whitespace() {
        let candidate_width = if current.is_empty() {
            display_width(word)
        } else {
            display_width(&current) + 1 + display_width(word)
        };
        if candidate_width <= max_cols {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if lines.len() == max_lines {
            overflow = true;
            break;
        }
        current = truncate(word, max_cols);
    }
    if !current.is_empty() {
        if lines.len() < max_lines {
            lines.push(current);
        } else {
            overflow = true;
        }
    }
    if overflow {
        if let Some(last) = lines.last_mut() {
            let cut = truncate(last, max_cols.saturating_sub(1));
            *last = if cut.ends_with(ELLIPSIS) {
                cut
            } else {
                format!("{cut}{ELLIPSIS}")
            };
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_short_text_unchanged() {
        assert_eq!(truncate("Age", 18), "Age");
        assert_eq!(truncate("  Age  ", 3), "Age");
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate("Reason for visit", 8), "Reason…");
        assert_eq!(truncate("Reason for visit", 10), "Reason fo…");
        assert_eq!(display_width(&truncate("Reason for visit", 10)), 10);
    }

    #[test]
    fn test_tiny_caps() {
        assert_eq!(truncate("Reason", 1), "…");
        assert_eq!(truncate("Reason", 0), "");
    }

    #[test]
    fn test_wide_and_combining_characters() {
        // Each CJK glyph is two columns.
        assert_eq!(truncate("診療記録データ", 5), "診療…");
        // e + combining acute stays together.
        assert_eq!(truncate("Cafe\u{301} au lait", 5), "Cafe\u{301}…");
    }

    #[test]
    fn test_fit_label_respects_tier_and_space() {
        let limits = LabelLimits::default();
        let long = "Ambulatory care sensitive conditions";
        assert_eq!(display_width(&fit_label(long, SizeTier::Root, &limits, 10_000.0, 14.0)), 28);
        assert_eq!(display_width(&fit_label(long, SizeTier::Leaf, &limits, 10_000.0, 14.0)), 18);
        // 100px at 14px font is 11 columns.
        assert_eq!(fit_label(long, SizeTier::Root, &limits, 100.0, 14.0), "Ambulatory…");
        assert_eq!(fit_label(long, SizeTier::Leaf, &limits, 0.0, 14.0), "");
    }

    #[test]
    fn test_columns_for_degenerate() {
        assert_eq!(columns_for(f32::NAN, 14.0), 0);
        assert_eq!(columns_for(100.0, 0.0), 0);
        assert_eq!(columns_for(-5.0, 12.0), 0);
    }

    #[test]
    fn test_wrap() {
        let lines = wrap("Visits for asthma and COPD in adults", 12, 3);
        assert_eq!(lines, ["Visits for", "asthma and", "COPD in…"]);
        assert!(wrap("anything", 0, 3).is_empty());
        assert_eq!(wrap("short", 20, 2), ["short"]);
    }

    #[test]
    fn test_wrap_long_word() {
        assert_eq!(wrap("Supercalifragilistic", 8, 2), ["Superca…"]);
    }

    #[test]
    fn test_limits_serde_defaults() {
        let limits: LabelLimits = serde_json::from_str(r#"{"leaf": 12}"#).unwrap();
        assert_eq!(limits.leaf, 12);
        assert_eq!(limits.root, 28);
    }

    proptest! {
        #[test]
        fn prop_truncate_never_exceeds_cap(text in "[a-zA-Z0-9 .,é診療\u{301}]{0,60}", cap in 0usize..40) {
            prop_assert!(display_width(&truncate(&text, cap)) <= cap);
        }

        #[test]
        fn prop_wrap_lines_fit(text in "[a-z ]{0,80}", cols in 1usize..30, max_lines in 1usize..5) {
            let lines = wrap(&text, cols, max_lines);
            prop_assert!(lines.len() <= max_lines);
            for line in lines {
                prop_assert!(display_width(&line) <= cols);
            }
        }
    }
}
