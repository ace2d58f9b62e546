//! Error types for storyviz-widgets.

use thiserror::Error;

/// Problems found while loading or validating a hierarchical dataset.
///
/// None of these are raised by toggling, layout, or painting; those paths
/// degrade silently instead.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The document is not valid JSON or does not have the node shape.
    #[error("invalid tree document: {0}")]
    Json(#[from] serde_json::Error),

    /// Nesting exceeds the supported depth.
    #[error("tree nesting exceeds {limit} levels at {path}")]
    TooDeep {
        /// Depth limit that was exceeded
        limit: usize,
        /// Path of the first node beyond the limit
        path: String,
    },

    /// A node below the top level carries the root tag.
    #[error("node {path} is tagged root but is not the top-level node")]
    MisplacedRoot {
        /// Path of the offending node
        path: String,
    },

    /// A node with a leaf-only tag has children.
    #[error("node {path} has children but is tagged '{tag}', which is only valid on leaves")]
    TerminalWithChildren {
        /// Path of the offending node
        path: String,
        /// Tag name found on the node
        tag: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_converts() {
        let err: TreeError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, TreeError::Json(_)));
        assert!(err.to_string().starts_with("invalid tree document"));
    }

    #[test]
    fn test_display_includes_path() {
        let err = TreeError::TerminalWithChildren {
            path: "0/1".into(),
            tag: "both".into(),
        };
        assert_eq!(
            err.to_string(),
            "node 0/1 has children but is tagged 'both', which is only valid on leaves"
        );
    }
}
