use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{Margins, PlotArea, Viewport};
use crate::error::{StoryError, StoryResult};
use crate::interaction::HoverStyle;
use crate::scene::{LeaderboardConfig, SceneLayout};

/// Public presentation bootstrap configuration.
///
/// Serializable so hosts can keep the presentation setup in a JSON file.
/// Every field except the viewport has a serde default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationConfig {
    pub viewport: Viewport,
    #[serde(default = "default_margins")]
    pub margins: Margins,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Cosmetic fade duration of scene transitions.
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u32,
    #[serde(default = "default_tooltip_offset")]
    pub tooltip_offset: (f64, f64),
    #[serde(default = "default_grow_factor")]
    pub grow_factor: f64,
    #[serde(default = "default_bar_rest_opacity")]
    pub bar_rest_opacity: f64,
    #[serde(default)]
    pub leaderboards: LeaderboardConfig,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self::new(Viewport::new(1160, 400))
    }
}

impl PresentationConfig {
    /// Config with default margins, data directory and hover tuning.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            margins: default_margins(),
            data_dir: default_data_dir(),
            fade_ms: default_fade_ms(),
            tooltip_offset: default_tooltip_offset(),
            grow_factor: default_grow_factor(),
            bar_rest_opacity: default_bar_rest_opacity(),
            leaderboards: LeaderboardConfig::default(),
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    #[must_use]
    pub fn with_fade_ms(mut self, fade_ms: u32) -> Self {
        self.fade_ms = fade_ms;
        self
    }

    #[must_use]
    pub fn with_tooltip_offset(mut self, dx: f64, dy: f64) -> Self {
        self.tooltip_offset = (dx, dy);
        self
    }

    #[must_use]
    pub fn with_grow_factor(mut self, grow_factor: f64) -> Self {
        self.grow_factor = grow_factor;
        self
    }

    #[must_use]
    pub fn with_leaderboards(mut self, leaderboards: LeaderboardConfig) -> Self {
        self.leaderboards = leaderboards;
        self
    }

    /// Rejects configs whose layout or hover tuning cannot be drawn.
    pub fn validate(&self) -> StoryResult<()> {
        if !self.viewport.is_valid() {
            return Err(StoryError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        PlotArea::from_viewport(self.viewport, self.margins)?;

        let (dx, dy) = self.tooltip_offset;
        if !dx.is_finite() || !dy.is_finite() {
            return Err(StoryError::InvalidData(
                "tooltip offset must be finite".to_owned(),
            ));
        }
        if !self.grow_factor.is_finite() || self.grow_factor <= 0.0 {
            return Err(StoryError::InvalidData(
                "hover grow factor must be finite and > 0".to_owned(),
            ));
        }
        if !(0.0..=1.0).contains(&self.bar_rest_opacity) {
            return Err(StoryError::InvalidData(
                "bar rest opacity must be in [0, 1]".to_owned(),
            ));
        }
        self.leaderboards.validate()
    }

    #[must_use]
    pub fn layout(&self) -> SceneLayout {
        SceneLayout::new(self.viewport, self.margins)
    }

    #[must_use]
    pub fn hover_style(&self) -> HoverStyle {
        HoverStyle {
            tooltip_offset: self.tooltip_offset,
            grow_factor: self.grow_factor,
            bar_rest_opacity: self.bar_rest_opacity,
        }
    }

    /// Serializes config to pretty JSON for config files.
    pub fn to_json_pretty(&self) -> StoryResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoryError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> StoryResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| StoryError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}

fn default_margins() -> Margins {
    // Wide right margin leaves room for the legend and the secondary axis.
    Margins::new(40.0, 340.0, 50.0, 60.0)
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_fade_ms() -> u32 {
    300
}

fn default_tooltip_offset() -> (f64, f64) {
    HoverStyle::default().tooltip_offset
}

fn default_grow_factor() -> f64 {
    HoverStyle::default().grow_factor
}

fn default_bar_rest_opacity() -> f64 {
    HoverStyle::default().bar_rest_opacity
}

#[cfg(test)]
mod tests {
    use super::PresentationConfig;
    use crate::core::Viewport;

    #[test]
    fn minimal_json_fills_defaults() {
        let config = PresentationConfig::from_json_str(r#"{"viewport":{"width":900,"height":500}}"#)
            .expect("config");
        assert_eq!(config.viewport, Viewport::new(900, 500));
        assert_eq!(config.fade_ms, 300);
        assert_eq!(config.leaderboards.team_chart_top_n, 15);
        assert!((config.grow_factor - 1.5).abs() <= 1e-9);
    }

    #[test]
    fn margins_wider_than_viewport_are_rejected() {
        let config = PresentationConfig::new(Viewport::new(300, 200));
        assert!(config.validate().is_err());
    }
}
