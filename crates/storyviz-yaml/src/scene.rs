//! Scene manifest format (`*.scene.yaml`).
//!
//! ```yaml
//! version: "1.0"
//! metadata:
//!   name: scene13-limitations
//!   title: Known limitations
//! dataset: scene13-limitations-tree.json
//! palette:
//!   category: "#6366F1"
//! legend:
//!   - { tag: restricted, label: High impact, sub: Affects study design }
//! height: 460
//! layout: { orientation: top-down, tier_spacing: fit, margin: 40 }
//! interaction: { siblings: accordion }
//! labels: { root: 28, branch: 22, leaf: 18 }
//! ```
//!
//! Palette keys are the fixed role set; a scene changes what a role means
//! by overriding its color and legend text, never by adding keys.

use crate::error::SceneError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storyviz_core::Color;
use storyviz_widgets::coverage_tree::LabelLimits;
use storyviz_widgets::{
    LayoutConfig, Legend, LegendEntry, Palette, PaletteRole, SiblingPolicy, TreeConfig,
};
use tracing::debug;

/// Top-level manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneManifest {
    /// Format version (`X.Y`)
    pub version: String,

    /// Scene metadata
    #[serde(default)]
    pub metadata: SceneMetadata,

    /// Tree dataset path, relative to the manifest
    #[serde(default)]
    pub dataset: Option<String>,

    /// Per-role color overrides
    #[serde(default)]
    pub palette: PaletteOverrides,

    /// Legend rows; an empty list means the default coverage legend
    #[serde(default)]
    pub legend: Vec<LegendSpec>,

    /// Fixed drawing height in pixels
    #[serde(default)]
    pub height: Option<f32>,

    /// Tier layout options
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Interaction options
    #[serde(default)]
    pub interaction: InteractionSpec,

    /// Label column caps
    #[serde(default)]
    pub labels: LabelLimits,
}

/// Scene metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneMetadata {
    /// Scene identifier (kebab-case)
    #[serde(default)]
    pub name: String,

    /// Human-readable title, used as the SVG title
    #[serde(default)]
    pub title: Option<String>,

    /// Description
    #[serde(default)]
    pub description: Option<String>,
}

/// Color overrides keyed by palette role.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteOverrides {
    /// Root node color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    /// Branch node color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// First leaf kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub both: Option<String>,
    /// Second leaf kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restricted: Option<String>,
    /// Third leaf kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public: Option<String>,
    /// Fallback for unrecognized tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown: Option<String>,
}

impl PaletteOverrides {
    /// Overrides present in the manifest, in role order.
    pub fn entries(&self) -> impl Iterator<Item = (PaletteRole, &str)> {
        [
            (PaletteRole::Root, &self.root),
            (PaletteRole::Category, &self.category),
            (PaletteRole::Both, &self.both),
            (PaletteRole::Restricted, &self.restricted),
            (PaletteRole::Public, &self.public),
            (PaletteRole::Unknown, &self.unknown),
        ]
        .into_iter()
        .filter_map(|(role, value)| value.as_deref().map(|v| (role, v)))
    }

    /// Default palette with these overrides applied.
    ///
    /// Values that fail to parse are skipped; [`SceneManifest::validate`]
    /// rejects them up front.
    #[must_use]
    pub fn resolve(&self) -> Palette {
        self.entries().fold(Palette::default(), |palette, (role, value)| {
            match Color::from_hex(value) {
                Ok(color) => palette.with(role, color),
                Err(_) => palette,
            }
        })
    }
}

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendSpec {
    /// Palette role key
    pub tag: String,
    /// Short name
    pub label: String,
    /// Secondary text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
}

/// Interaction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSpec {
    /// What expanding a node does to its siblings
    pub siblings: SiblingPolicy,
}

impl SceneManifest {
    /// Parse and validate a manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self, SceneError> {
        let manifest: Self = serde_yaml_ng::from_str(yaml)?;
        manifest.validate()?;
        debug!(name = %manifest.metadata.name, "loaded scene manifest");
        Ok(manifest)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, SceneError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Validate the manifest.
    ///
    /// Checks:
    /// 1. version format (`X.Y`)
    /// 2. metadata.name is kebab-case when present
    /// 3. palette values are hex colors
    /// 4. legend tags are palette roles and labels are non-empty
    /// 5. height and margin are finite and positive
    /// 6. label caps are at least 1
    pub fn validate(&self) -> Result<(), SceneError> {
        self.validate_version()?;
        self.validate_metadata_name()?;
        self.validate_palette()?;
        self.validate_legend()?;
        self.validate_sizes()?;
        self.validate_labels()?;
        Ok(())
    }

    fn validate_version(&self) -> Result<(), SceneError> {
        let parts: Vec<&str> = self.version.split('.').collect();
        if parts.len() != 2 || parts.iter().any(|p| p.parse::<u32>().is_err()) {
            return Err(SceneError::InvalidVersion(self.version.clone()));
        }
        Ok(())
    }

    fn validate_metadata_name(&self) -> Result<(), SceneError> {
        let name = &self.metadata.name;
        if name.is_empty() {
            return Ok(());
        }
        let charset_ok = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if !charset_ok || name.starts_with('-') || name.ends_with('-') || name.contains("--") {
            return Err(SceneError::InvalidMetadataName(name.clone()));
        }
        Ok(())
    }

    fn validate_palette(&self) -> Result<(), SceneError> {
        for (role, value) in self.palette.entries() {
            if Color::from_hex(value).is_err() {
                return Err(SceneError::InvalidColor {
                    role: role.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    fn validate_legend(&self) -> Result<(), SceneError> {
        for entry in &self.legend {
            if PaletteRole::from_key(entry.tag.trim()).is_none() {
                return Err(SceneError::UnknownLegendTag {
                    tag: entry.tag.clone(),
                    label: entry.label.clone(),
                });
            }
            if entry.label.trim().is_empty() {
                return Err(SceneError::EmptyLegendLabel(entry.tag.clone()));
            }
        }
        Ok(())
    }

    fn validate_sizes(&self) -> Result<(), SceneError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if let Some(height) = self.height {
            if !positive(height) {
                return Err(SceneError::InvalidSize {
                    field: "height",
                    value: height,
                });
            }
        }
        if !positive(self.layout.margin) {
            return Err(SceneError::InvalidSize {
                field: "layout.margin",
                value: self.layout.margin,
            });
        }
        Ok(())
    }

    fn validate_labels(&self) -> Result<(), SceneError> {
        let limits = [
            ("labels.root", self.labels.root),
            ("labels.branch", self.labels.branch),
            ("labels.leaf", self.labels.leaf),
        ];
        match limits.into_iter().find(|(_, v)| *v == 0) {
            Some((field, _)) => Err(SceneError::InvalidLabelLimit(field)),
            None => Ok(()),
        }
    }

    /// Palette for the scene.
    #[must_use]
    pub fn palette(&self) -> Palette {
        self.palette.resolve()
    }

    /// Scene legend, or `None` when the manifest declares none.
    #[must_use]
    pub fn legend(&self) -> Option<Legend> {
        if self.legend.is_empty() {
            return None;
        }
        let entries = self
            .legend
            .iter()
            .filter_map(|spec| {
                let role = PaletteRole::from_key(spec.tag.trim())?;
                let entry = LegendEntry::new(role, spec.label.trim());
                Some(match &spec.sub {
                    Some(sub) => entry.with_sub(sub.trim()),
                    None => entry,
                })
            })
            .collect();
        Some(Legend::new(entries))
    }

    /// Widget options for the scene.
    #[must_use]
    pub const fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            layout: self.layout,
            labels: self.labels,
            height: self.height,
            siblings: self.interaction.siblings,
        }
    }

    /// Dataset path resolved against the manifest's directory.
    #[must_use]
    pub fn dataset_path(&self, manifest_dir: &Path) -> Option<PathBuf> {
        self.dataset.as_ref().map(|d| manifest_dir.join(d))
    }

    /// Title for rendered output: the metadata title, else the name.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        self.metadata
            .title
            .as_deref()
            .or_else(|| Some(self.metadata.name.as_str()).filter(|n| !n.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use storyviz_widgets::{Orientation, TierSpacing};

    const LIMITATIONS: &str = r##"
version: "1.0"
metadata:
  name: scene13-limitations
  title: Known limitations
dataset: scene13-limitations-tree.json
palette:
  root: "#1F2A44"
  category: "#6366F1"
  restricted: "#E64833"
legend:
  - { tag: restricted, label: High impact, sub: Affects study design }
  - { tag: both, label: Moderate }
height: 460
layout: { orientation: left-right, tier_spacing: full-depth }
interaction: { siblings: accordion }
labels: { leaf: 14 }
"##;

    #[test]
    fn test_full_manifest() {
        let m = SceneManifest::from_yaml(LIMITATIONS).unwrap();
        assert_eq!(m.metadata.name, "scene13-limitations");
        assert_eq!(m.dataset.as_deref(), Some("scene13-limitations-tree.json"));
        assert_eq!(m.palette().category.to_hex(), "#6366f1");
        assert_eq!(m.palette().both, Palette::default().both);

        let legend = m.legend().unwrap();
        assert_eq!(legend.label_for(PaletteRole::Restricted), Some("High impact"));
        assert_eq!(legend.entries[0].sub.as_deref(), Some("Affects study design"));

        let config = m.tree_config();
        assert_eq!(config.height, Some(460.0));
        assert_eq!(config.layout.orientation, Orientation::LeftRight);
        assert_eq!(config.layout.tier_spacing, TierSpacing::FullDepth);
        assert_eq!(config.siblings, SiblingPolicy::Accordion);
        assert_eq!(config.labels.leaf, 14);
        assert_eq!(config.labels.root, 28);
    }

    #[test]
    fn test_minimal_manifest_defaults() {
        let m = SceneManifest::from_yaml("version: \"1.0\"\n").unwrap();
        assert!(m.legend().is_none());
        assert_eq!(m.palette(), Palette::default());
        assert_eq!(m.tree_config(), TreeConfig::default());
        assert_eq!(m.display_title(), None);
    }

    #[test]
    fn test_unknown_palette_key_rejected() {
        let err = SceneManifest::from_yaml("version: \"1.0\"\npalette:\n  severity: \"#fff\"\n").unwrap_err();
        assert!(matches!(err, SceneError::Yaml(_)));
    }

    #[test]
    fn test_bad_color() {
        let err = SceneManifest::from_yaml("version: \"1.0\"\npalette:\n  public: teal\n").unwrap_err();
        assert!(matches!(err, SceneError::InvalidColor { ref role, .. } if role == "public"));
    }

    #[test]
    fn test_bad_version_and_name() {
        assert!(matches!(
            SceneManifest::from_yaml("version: \"1\"\n"),
            Err(SceneError::InvalidVersion(_))
        ));
        assert!(matches!(
            SceneManifest::from_yaml("version: \"1.0\"\nmetadata:\n  name: Bad Name\n"),
            Err(SceneError::InvalidMetadataName(_))
        ));
    }

    #[test]
    fn test_legend_validation() {
        let yaml = "version: \"1.0\"\nlegend:\n  - { tag: severe, label: Severe }\n";
        assert!(matches!(
            SceneManifest::from_yaml(yaml),
            Err(SceneError::UnknownLegendTag { .. })
        ));
        let yaml = "version: \"1.0\"\nlegend:\n  - { tag: public, label: \"  \" }\n";
        assert!(matches!(
            SceneManifest::from_yaml(yaml),
            Err(SceneError::EmptyLegendLabel(_))
        ));
    }

    #[test]
    fn test_size_validation() {
        assert!(matches!(
            SceneManifest::from_yaml("version: \"1.0\"\nheight: -5\n"),
            Err(SceneError::InvalidSize { field: "height", .. })
        ));
        assert!(matches!(
            SceneManifest::from_yaml("version: \"1.0\"\nlayout: { margin: 0 }\n"),
            Err(SceneError::InvalidSize { field: "layout.margin", .. })
        ));
        assert!(matches!(
            SceneManifest::from_yaml("version: \"1.0\"\nlabels: { branch: 0 }\n"),
            Err(SceneError::InvalidLabelLimit("labels.branch"))
        ));
    }

    #[test]
    fn test_dataset_path_relative_to_manifest() {
        let m = SceneManifest::from_yaml(LIMITATIONS).unwrap();
        assert_eq!(
            m.dataset_path(Path::new("scenes")),
            Some(PathBuf::from("scenes/scene13-limitations-tree.json"))
        );
        assert_eq!(m.display_title(), Some("Known limitations"));
    }

    #[test]
    fn test_yaml_round_trip() {
        let m = SceneManifest::from_yaml(LIMITATIONS).unwrap();
        let again = SceneManifest::from_yaml(&m.to_yaml().unwrap()).unwrap();
        assert_eq!(m, again);
    }

    proptest! {
        #[test]
        fn prop_valid_versions(major in 0u32..100, minor in 0u32..100) {
            let yaml = format!("version: \"{major}.{minor}\"\n");
            prop_assert!(SceneManifest::from_yaml(&yaml).is_ok());
        }

        #[test]
        fn prop_kebab_names_accepted(name in "[a-z0-9]{1,8}(-[a-z0-9]{1,8}){0,3}") {
            let yaml = format!("version: \"1.0\"\nmetadata:\n  name: \"{name}\"\n");
            prop_assert!(SceneManifest::from_yaml(&yaml).is_ok());
        }
    }
}
