use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};
use crate::interaction::{DatumRef, ModalDetail, TooltipContent};
use crate::render::PrimitiveCounts;
use crate::scene::DashboardState;

pub const PRESENTATION_SNAPSHOT_JSON_SCHEMA_V1: u32 = 1;

/// Serializable deterministic state of a presentation, used by regression
/// tests and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationSnapshot {
    pub schema_version: u32,
    pub scene_index: usize,
    pub scene_count: usize,
    pub title: String,
    pub progress_label: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub generation: u64,
    /// A load for the current scene has not completed yet.
    pub loading: bool,
    pub annotation: String,
    pub primitives: PrimitiveCounts,
    pub hover_targets: usize,
    pub hovered: Option<DatumRef>,
    pub tooltip: Option<TooltipContent>,
    pub modal: Option<ModalDetail>,
    /// Selector values while the dashboard scene is shown.
    pub dashboard: Option<DashboardState>,
}

impl PresentationSnapshot {
    pub fn to_json_pretty(&self) -> StoryResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoryError::InvalidData(format!("failed to serialize snapshot: {e}")))
    }

    pub fn from_json_str(input: &str) -> StoryResult<Self> {
        let snapshot: Self = serde_json::from_str(input)
            .map_err(|e| StoryError::InvalidData(format!("failed to parse snapshot json: {e}")))?;
        if snapshot.schema_version != PRESENTATION_SNAPSHOT_JSON_SCHEMA_V1 {
            return Err(StoryError::InvalidData(format!(
                "unsupported snapshot schema version: {}",
                snapshot.schema_version
            )));
        }
        Ok(snapshot)
    }
}
