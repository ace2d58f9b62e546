//! Scene manifest parser for storyviz.
//!
//! A scene manifest (`*.scene.yaml`) names the dataset a coverage tree
//! shows and reinterprets the fixed palette roles for that scene.

mod error;
mod scene;

pub use error::SceneError;
pub use scene::{InteractionSpec, LegendSpec, PaletteOverrides, SceneManifest, SceneMetadata};
