//! Category colors and the legend that explains them.
//!
//! Every scene shares one fixed set of palette roles. A scene reinterprets
//! what the roles mean (file availability, disparity level, limitation
//! severity) by overriding colors and legend text, never by adding roles.

use super::model::CategoryTag;
use serde::{Deserialize, Serialize};
use std::fmt;
use storyviz_core::Color;
use tracing::trace;

/// Fixed palette slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteRole {
    /// Top-level node
    Root,
    /// Internal grouping nodes
    Category,
    /// Leaf kind A
    Both,
    /// Leaf kind B
    Restricted,
    /// Leaf kind C
    Public,
    /// Fallback for unrecognized tags
    Unknown,
}

impl PaletteRole {
    /// Every role, in display order.
    pub const ALL: [Self; 6] = [
        Self::Root,
        Self::Category,
        Self::Both,
        Self::Restricted,
        Self::Public,
        Self::Unknown,
    ];

    /// Manifest key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Category => "category",
            Self::Both => "both",
            Self::Restricted => "restricted",
            Self::Public => "public",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a manifest key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == key)
    }

    /// Role that colors `tag`.
    #[must_use]
    pub const fn for_tag(tag: &CategoryTag) -> Self {
        match tag {
            CategoryTag::Root => Self::Root,
            CategoryTag::Branch => Self::Category,
            CategoryTag::Both => Self::Both,
            CategoryTag::Restricted => Self::Restricted,
            CategoryTag::Public => Self::Public,
            CategoryTag::Other(_) => Self::Unknown,
        }
    }
}

impl fmt::Display for PaletteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One color per [`PaletteRole`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Root node fill
    pub root: Color,
    /// Branch node fill
    pub category: Color,
    /// Leaf kind A fill
    pub both: Color,
    /// Leaf kind B fill
    pub restricted: Color,
    /// Leaf kind C fill
    pub public: Color,
    /// Fill for tags outside the vocabulary
    pub unknown: Color,
}

impl Default for Palette {
    /// Coverage colors: dark teal root, light teal branches, terracotta and
    /// coral leaves.
    fn default() -> Self {
        Self {
            root: Color::from_rgb8(0x24, 0x48, 0x55),
            category: Color::from_rgb8(0x90, 0xAE, 0xAD),
            both: Color::from_rgb8(0x87, 0x4F, 0x41),
            restricted: Color::from_rgb8(0xE6, 0x48, 0x33),
            public: Color::from_rgb8(0x2B, 0xB0, 0xA6),
            unknown: Color::from_rgb8(0x9C, 0xA3, 0xAF),
        }
    }
}

impl Palette {
    /// Color of a role.
    #[must_use]
    pub const fn color(&self, role: PaletteRole) -> Color {
        match role {
            PaletteRole::Root => self.root,
            PaletteRole::Category => self.category,
            PaletteRole::Both => self.both,
            PaletteRole::Restricted => self.restricted,
            PaletteRole::Public => self.public,
            PaletteRole::Unknown => self.unknown,
        }
    }

    /// Replace one role's color.
    #[must_use]
    pub fn with(mut self, role: PaletteRole, color: Color) -> Self {
        match role {
            PaletteRole::Root => self.root = color,
            PaletteRole::Category => self.category = color,
            PaletteRole::Both => self.both = color,
            PaletteRole::Restricted => self.restricted = color,
            PaletteRole::Public => self.public = color,
            PaletteRole::Unknown => self.unknown = color,
        }
        self
    }
}

/// Color for a node's tag. Total: unrecognized tags get the unknown color.
#[must_use]
pub fn map_category(tag: &CategoryTag, palette: &Palette) -> Color {
    if let CategoryTag::Other(name) = tag {
        trace!(tag = %name, "tag outside palette vocabulary");
    }
    palette.color(PaletteRole::for_tag(tag))
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Role whose color the swatch shows
    pub role: PaletteRole,
    /// Short name, also used as leaf badge text
    pub label: String,
    /// Secondary explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

impl LegendEntry {
    /// Create an entry without secondary text.
    #[must_use]
    pub fn new(role: PaletteRole, label: impl Into<String>) -> Self {
        Self {
            role,
            label: label.into(),
            sub: None,
        }
    }

    /// Add secondary text.
    #[must_use]
    pub fn with_sub(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }
}

/// Ordered legend. Colors are looked up in the palette at paint time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Legend {
    /// Rows in display order
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Legend from rows.
    #[must_use]
    pub fn new(entries: Vec<LegendEntry>) -> Self {
        Self { entries }
    }

    /// The file-availability legend used when a scene gives none.
    #[must_use]
    pub fn coverage_default() -> Self {
        Self::new(vec![
            LegendEntry::new(PaletteRole::Both, "Both Files").with_sub("Restricted & Public"),
            LegendEntry::new(PaletteRole::Restricted, "Restricted Only").with_sub("RDC Access"),
            LegendEntry::new(PaletteRole::Public, "Public Only").with_sub("Public-use file"),
        ])
    }

    /// Label of the first entry for `role`.
    #[must_use]
    pub fn label_for(&self, role: PaletteRole) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.role == role)
            .map(|e| e.label.as_str())
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
