//! Scene loading: manifest plus dataset into a configured widget.

use std::fs;
use std::path::{Path, PathBuf};
use storyviz_widgets::{CoverageTree, TreeError, TreeNode};
use storyviz_yaml::{SceneError, SceneManifest};
use thiserror::Error;
use tracing::debug;

/// Failure to load a scene.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The manifest is malformed or invalid
    #[error(transparent)]
    Manifest(#[from] SceneError),

    /// The dataset is malformed or violates the tree shape rules
    #[error(transparent)]
    Dataset(#[from] TreeError),

    /// The manifest does not name a dataset
    #[error("scene '{0}' does not name a dataset")]
    MissingDataset(String),
}

/// A loaded scene: optional manifest and its tree.
#[derive(Debug, Clone)]
pub struct Scene {
    manifest: Option<SceneManifest>,
    tree: TreeNode,
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_tree(json: &str) -> Result<TreeNode, LoadError> {
    let tree = TreeNode::from_json(json)?;
    tree.validate()?;
    Ok(tree)
}

impl Scene {
    /// Load a `*.scene.yaml` manifest and its dataset, or a bare `.json`
    /// dataset with default styling.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
            return Self::from_tree_json(&read(path)?);
        }

        let manifest = SceneManifest::from_yaml(&read(path)?)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let dataset = manifest
            .dataset_path(dir)
            .ok_or_else(|| LoadError::MissingDataset(manifest.metadata.name.clone()))?;
        debug!(manifest = %path.display(), dataset = %dataset.display(), "loading scene");
        let tree = parse_tree(&read(&dataset)?)?;
        Ok(Self {
            manifest: Some(manifest),
            tree,
        })
    }

    /// Build from in-memory manifest and dataset text.
    pub fn from_sources(manifest_yaml: &str, dataset_json: &str) -> Result<Self, LoadError> {
        Ok(Self {
            manifest: Some(SceneManifest::from_yaml(manifest_yaml)?),
            tree: parse_tree(dataset_json)?,
        })
    }

    /// Build from a dataset alone, with the default palette and options.
    pub fn from_tree_json(dataset_json: &str) -> Result<Self, LoadError> {
        Ok(Self {
            manifest: None,
            tree: parse_tree(dataset_json)?,
        })
    }

    /// The manifest, when the scene has one.
    #[must_use]
    pub const fn manifest(&self) -> Option<&SceneManifest> {
        self.manifest.as_ref()
    }

    /// The dataset.
    #[must_use]
    pub const fn tree(&self) -> &TreeNode {
        &self.tree
    }

    /// Accessible title: the manifest title or name, else the root label.
    #[must_use]
    pub fn title(&self) -> &str {
        self.manifest
            .as_ref()
            .and_then(SceneManifest::display_title)
            .unwrap_or(&self.tree.label)
    }

    /// A fresh widget styled and configured by the manifest, fully
    /// collapsed and not yet sized.
    #[must_use]
    pub fn widget(&self) -> CoverageTree {
        let widget = CoverageTree::new(&self.tree).with_accessible_name(self.title());
        let Some(manifest) = &self.manifest else {
            return widget;
        };
        let widget = widget
            .with_palette(manifest.palette())
            .with_config(manifest.tree_config());
        match manifest.legend() {
            Some(legend) => widget.with_legend(legend).show_legend(true),
            None => widget,
        }
    }
}
