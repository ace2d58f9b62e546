//! Browser runtime for storyviz scenes.
//!
//! Bridges the headless widget to the DOM: a `ResizeObserver`-backed
//! [`ResizeHost`](storyviz_core::ResizeHost) and a mountable app that
//! re-renders the scene's SVG into its container on every stimulus.

#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod resize;

#[cfg(target_arch = "wasm32")]
pub use app::CoverageTreeApp;
#[cfg(target_arch = "wasm32")]
pub use resize::{DomResizeHost, DomSubscription};
