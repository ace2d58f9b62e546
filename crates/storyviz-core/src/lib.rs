//! Core types and traits for storyviz scenes.
//!
//! This crate provides foundational types used throughout storyviz:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color: [`Color`], with a contrast pick for glyphs drawn on fills
//! - Layout constraints: [`Constraints`]
//! - Input: [`Event`], [`Key`], [`MouseButton`]
//! - Painting: [`Widget`], [`Canvas`], [`DrawCommand`], [`RecordingCanvas`], [`svg`]
//! - Container sizing: [`ResizeTracker`] over a [`ResizeHost`]

mod canvas;
mod color;
mod constraints;
pub mod draw;
mod event;
mod geometry;
pub mod resize;
pub mod svg;
pub mod widget;

pub use canvas::RecordingCanvas;
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use draw::{BoxStyle, DrawCommand, LineCap, StrokeStyle};
pub use event::{Event, Key, MouseButton};
pub use geometry::{Point, Rect, Size};
pub use resize::{ManualResizeHost, ResizeHost, ResizeTracker};
pub use widget::{
    AccessibleRole, Canvas, FontWeight, LayoutResult, TextAnchor, TextStyle, TypeId, Widget,
};
