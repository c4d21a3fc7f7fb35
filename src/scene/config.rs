use serde::{Deserialize, Serialize};

use crate::chart::{AxisSide, EraBand, LegendEntry, SeriesStyle, TickFormat, TickSpec};
use crate::core::ScalePadding;
use crate::data::{ColumnMapping, RowPredicate, SourceTable, StatField};
use crate::error::{StoryError, StoryResult};
use crate::render::{Animation, Color, TextHAlign};

/// One scene of the presentation, as plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub title: String,
    /// Paragraph placed in the annotation container.
    pub narrative: String,
    /// Tables joined before anything is drawn.
    pub sources: Vec<SourceTable>,
    pub kind: SceneKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneKind {
    Chart(Box<ChartSceneConfig>),
    Dashboard(DashboardConfig),
}

impl SceneConfig {
    /// Cross-reference checks: every key a series, axis or reference names
    /// must be a declared dataset.
    pub fn validate(&self) -> StoryResult<()> {
        if self.sources.is_empty() {
            return Err(StoryError::InvalidData(format!(
                "scene `{}` declares no source tables",
                self.title
            )));
        }
        match &self.kind {
            SceneKind::Chart(chart) => chart.validate(&self.title, &self.sources),
            SceneKind::Dashboard(dashboard) => dashboard.validate(),
        }
    }
}

/// A named dataset: one source table, normalized and filtered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub key: String,
    pub table: SourceTable,
    pub mapping: ColumnMapping,
    pub predicate: RowPredicate,
}

impl DatasetSpec {
    #[must_use]
    pub fn new(key: impl Into<String>, table: SourceTable, predicate: RowPredicate) -> Self {
        Self {
            key: key.into(),
            table,
            mapping: table.mapping(),
            predicate,
        }
    }

    #[must_use]
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.mapping = mapping;
        self
    }
}

/// `(dataset key, field)` pair a scale or reference reads from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRef {
    pub dataset: String,
    pub field: StatField,
}

impl FieldRef {
    #[must_use]
    pub fn new(dataset: impl Into<String>, field: StatField) -> Self {
        Self {
            dataset: dataset.into(),
            field,
        }
    }
}

/// Vertical axis: domain rule over the union of `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisRule {
    pub fields: Vec<FieldRef>,
    pub padding: ScalePadding,
    pub format: TickFormat,
}

impl AxisRule {
    #[must_use]
    pub fn new(fields: Vec<FieldRef>, padding: ScalePadding, format: TickFormat) -> Self {
        Self {
            fields,
            padding,
            format,
        }
    }
}

/// Horizontal (year) domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum XDomain {
    /// Exact year extent of the named datasets.
    Data(Vec<String>),
    /// Fixed `[start, end]` regardless of data.
    Fixed(i32, i32),
}

/// One tooltip line, formatted when the pointer reaches the datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TooltipLine {
    /// `label: value` of the hovered row.
    Stat { label: String, field: StatField },
    /// `label: value` of a reference baseline (by index into the scene's references).
    Baseline { label: String, reference: usize },
}

impl TooltipLine {
    #[must_use]
    pub fn stat(label: impl Into<String>, field: StatField) -> Self {
        Self::Stat {
            label: label.into(),
            field,
        }
    }

    #[must_use]
    pub fn baseline(label: impl Into<String>, reference: usize) -> Self {
        Self::Baseline {
            label: label.into(),
            reference,
        }
    }
}

/// One drawn line with its markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub label: String,
    pub dataset: String,
    pub field: StatField,
    pub axis: AxisSide,
    pub style: SeriesStyle,
    /// Tooltip lines below the season heading.
    pub tooltip: Vec<TooltipLine>,
}

impl SeriesSpec {
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        dataset: impl Into<String>,
        field: StatField,
        axis: AxisSide,
        style: SeriesStyle,
    ) -> Self {
        Self {
            label: label.into(),
            dataset: dataset.into(),
            field,
            axis,
            style,
            tooltip: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tooltip(mut self, lines: Vec<TooltipLine>) -> Self {
        self.tooltip = lines;
        self
    }
}

/// Horizontal baseline at the mean of a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSpec {
    pub source: FieldRef,
    pub axis: AxisSide,
    /// Label prefix; the formatted mean is appended after `": "`.
    pub label: String,
    pub color: Color,
}

/// Text anchored at the point of `series` whose season matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalloutSpec {
    pub season: String,
    pub series: usize,
    pub text: String,
    pub offset: (f64, f64),
    pub align: TextHAlign,
}

impl CalloutSpec {
    #[must_use]
    pub fn new(
        season: impl Into<String>,
        text: impl Into<String>,
        offset: (f64, f64),
        align: TextHAlign,
    ) -> Self {
        Self {
            season: season.into(),
            series: 0,
            text: text.into(),
            offset,
            align,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSceneConfig {
    pub x_label: String,
    pub y_label: String,
    pub y2_label: Option<String>,
    pub datasets: Vec<DatasetSpec>,
    pub x_domain: XDomain,
    pub x_ticks: TickSpec,
    pub left: AxisRule,
    pub right: Option<AxisRule>,
    pub series: Vec<SeriesSpec>,
    pub bands: Vec<EraBand>,
    pub references: Vec<ReferenceSpec>,
    pub callouts: Vec<CalloutSpec>,
    pub legend: Vec<LegendEntry>,
    pub legend_reveal: Option<Animation>,
}

impl ChartSceneConfig {
    #[must_use]
    pub fn dataset(&self, key: &str) -> Option<&DatasetSpec> {
        self.datasets.iter().find(|spec| spec.key == key)
    }

    fn validate(&self, title: &str, sources: &[SourceTable]) -> StoryResult<()> {
        let unknown = |key: &str| {
            StoryError::InvalidData(format!("scene `{title}` references unknown dataset `{key}`"))
        };
        for spec in &self.datasets {
            if !sources.contains(&spec.table) {
                return Err(StoryError::InvalidData(format!(
                    "scene `{title}` dataset `{}` reads `{}` which is not a declared source",
                    spec.key,
                    spec.table.name()
                )));
            }
        }
        let axis_fields = self
            .left
            .fields
            .iter()
            .chain(self.right.iter().flat_map(|rule| rule.fields.iter()));
        for field in axis_fields.chain(self.references.iter().map(|reference| &reference.source)) {
            if self.dataset(&field.dataset).is_none() {
                return Err(unknown(&field.dataset));
            }
        }
        if let XDomain::Data(keys) = &self.x_domain {
            if let Some(key) = keys.iter().find(|key| self.dataset(key).is_none()) {
                return Err(unknown(key));
            }
        }
        for series in &self.series {
            if self.dataset(&series.dataset).is_none() {
                return Err(unknown(&series.dataset));
            }
            if series.axis == AxisSide::Right && self.right.is_none() {
                return Err(StoryError::InvalidData(format!(
                    "scene `{title}` series `{}` needs a right axis",
                    series.label
                )));
            }
            for line in &series.tooltip {
                if let TooltipLine::Baseline { reference, .. } = line {
                    if *reference >= self.references.len() {
                        return Err(StoryError::InvalidData(format!(
                            "scene `{title}` tooltip names reference #{reference}"
                        )));
                    }
                }
            }
        }
        if let Some(callout) = self.callouts.iter().find(|c| c.series >= self.series.len()) {
            return Err(StoryError::InvalidData(format!(
                "scene `{title}` callout `{}` names series #{}",
                callout.text, callout.series
            )));
        }
        Ok(())
    }
}

/// Leaderboard sizes and minimum-volume thresholds of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    pub player_top_n: usize,
    /// Minimum 3PA per game when players are ranked by 3P%.
    pub player_min_attempts: f64,
    pub team_top_n: usize,
    /// Minimum 3PA per game when teams are ranked by 3P%.
    pub team_min_attempts: f64,
    pub team_chart_top_n: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            player_top_n: 10,
            player_min_attempts: 5.0,
            team_top_n: 5,
            team_min_attempts: 30.0,
            team_chart_top_n: 15,
        }
    }
}

impl LeaderboardConfig {
    pub fn validate(&self) -> StoryResult<()> {
        if self.player_top_n == 0 || self.team_top_n == 0 || self.team_chart_top_n == 0 {
            return Err(StoryError::InvalidData(
                "leaderboard sizes must be > 0".to_owned(),
            ));
        }
        for value in [self.player_min_attempts, self.team_min_attempts] {
            if !value.is_finite() || value < 0.0 {
                return Err(StoryError::InvalidData(
                    "minimum attempts must be finite and >= 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

/// Scene 6: player leaderboard, team leaderboard and team bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    pub leaderboards: LeaderboardConfig,
    /// Team rows shown in the team table and chart.
    pub team_predicate: RowPredicate,
    /// Player year selected on entry when present in the data.
    pub preferred_player_year: i32,
    pub bar_color: Color,
    pub note_color: Color,
}

impl DashboardConfig {
    fn validate(&self) -> StoryResult<()> {
        self.leaderboards.validate()?;
        self.bar_color.validate()?;
        self.note_color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{AxisRule, ChartSceneConfig, FieldRef, SceneConfig, SceneKind, XDomain};
    use crate::chart::{TickFormat, TickSpec};
    use crate::core::ScalePadding;
    use crate::data::{SourceTable, StatField};

    #[test]
    fn unknown_dataset_key_is_rejected() {
        let scene = SceneConfig {
            title: "t".to_owned(),
            narrative: String::new(),
            sources: vec![SourceTable::League],
            kind: SceneKind::Chart(Box::new(ChartSceneConfig {
                x_label: String::new(),
                y_label: String::new(),
                y2_label: None,
                datasets: Vec::new(),
                x_domain: XDomain::Fixed(2000, 2010),
                x_ticks: TickSpec::default(),
                left: AxisRule::new(
                    vec![FieldRef::new("league", StatField::ThreePointAttempts)],
                    ScalePadding::from_zero(1.1),
                    TickFormat::Number,
                ),
                right: None,
                series: Vec::new(),
                bands: Vec::new(),
                references: Vec::new(),
                callouts: Vec::new(),
                legend: Vec::new(),
                legend_reveal: None,
            })),
        };
        let err = scene.validate().expect_err("unknown key");
        assert!(err.to_string().contains("unknown dataset `league`"));
    }
}
