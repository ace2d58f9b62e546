//! Error types for scene manifests.

use thiserror::Error;

/// Problems found while parsing or validating a scene manifest.
#[derive(Debug, Error)]
pub enum SceneError {
    /// YAML syntax error, wrong shape, or an unknown palette key
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// `version` is not `X.Y`
    #[error("invalid version '{0}': expected X.Y")]
    InvalidVersion(String),

    /// `metadata.name` is not kebab-case
    #[error("invalid scene name '{0}': expected kebab-case")]
    InvalidMetadataName(String),

    /// A palette value is not a hex color
    #[error("palette entry '{role}' has invalid color '{value}'")]
    InvalidColor {
        /// Palette role key
        role: String,
        /// Offending value
        value: String,
    },

    /// A legend entry names a tag outside the palette roles
    #[error("legend entry '{label}' uses unknown tag '{tag}'")]
    UnknownLegendTag {
        /// Tag as written
        tag: String,
        /// Entry label
        label: String,
    },

    /// A legend entry has no label
    #[error("legend entry for tag '{0}' has an empty label")]
    EmptyLegendLabel(String),

    /// A size option is not a finite positive number
    #[error("'{field}' must be a finite positive number, got {value}")]
    InvalidSize {
        /// Option name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// A label cap is zero
    #[error("label limit '{0}' must be at least 1")]
    InvalidLabelLimit(&'static str),
}
