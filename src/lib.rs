//! three-point-story: a slide-driven visualization of the NBA three-point
//! revolution.
//!
//! Six scenes are described as plain configuration values, resolved from CSV
//! source tables into typed datasets, and drawn into backend-agnostic render
//! frames. Hosts drive a [`Presentation`] with navigation, pointer and
//! selector events and hand the resulting frames to a renderer (SVG, cairo,
//! or the optional GTK4 window).

pub mod api;
pub mod chart;
pub mod core;
pub mod data;
pub mod error;
pub mod interaction;
pub mod render;
pub mod scene;
pub mod table;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{Presentation, PresentationConfig, PresentationSnapshot};
pub use error::{StoryError, StoryResult};
