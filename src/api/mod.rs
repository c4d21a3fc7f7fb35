//! Host-facing facade: [`Presentation`] wires a data source, the scene
//! pipeline, interaction state and a renderer together.

mod config;
mod presentation;
mod snapshot;

pub use config::PresentationConfig;
pub use presentation::{Presentation, PresentationClick};
pub use snapshot::{PRESENTATION_SNAPSHOT_JSON_SCHEMA_V1, PresentationSnapshot};
