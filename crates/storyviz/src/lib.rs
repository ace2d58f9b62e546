//! Storyviz: collapsible coverage-tree scenes for data stories.
//!
//! A scene is a YAML manifest plus a JSON tree dataset. Load one with
//! [`Scene::load`], turn it into a [`CoverageTree`](widgets::CoverageTree)
//! with [`Scene::widget`], and either render it headlessly to SVG or mount
//! it in the browser.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { CoverageTreeApp } from './storyviz.js';
//!
//! async function main() {
//!     await init();
//!     const app = new CoverageTreeApp('tree', manifestYaml, datasetJson);
//!     app.on_toggle((json) => console.log(JSON.parse(json)));
//! }
//! ```

pub use storyviz_core::*;
pub use storyviz_widgets as widgets;
pub use storyviz_yaml as yaml;

pub mod browser;
mod scene;

pub use scene::{LoadError, Scene};

#[cfg(target_arch = "wasm32")]
pub use browser::{CoverageTreeApp, DomResizeHost};
