use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::{
    Callout, ChartOutput, ChartScales, ChartSeries, LineChartSpec, ReferenceLine, SeriesPoint,
    build_line_chart, draw_title, message_frame, unavailable_frame,
};
use crate::core::{
    LinearScale, MISSING_VALUE_LABEL, Margins, PlotArea, Viewport, build_linear_scale,
    build_year_scale, format_optional_fixed, format_optional_percent,
};
use crate::data::{Dataset, LoadedTables, StatField, normalize_table};
use crate::error::{StoryError, StoryResult};
use crate::interaction::{DatumRef, HoverStyle, HoverTarget, TooltipContent, TooltipProvider};
use crate::render::RenderFrame;

use super::config::{AxisRule, ChartSceneConfig, SceneConfig, SceneKind, TooltipLine, XDomain};
use super::dashboard::{DashboardData, DashboardState, DashboardView};

/// Empty-state text for a chart whose datasets came out empty.
pub const NO_DATA_AVAILABLE: &str = "No data available";

const CALLOUT_BASE_DELAY_MS: u32 = 1000;
const CALLOUT_STEP_MS: u32 = 300;

/// Viewport and chart margins scenes are laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    pub viewport: Viewport,
    pub margins: Margins,
}

impl SceneLayout {
    #[must_use]
    pub fn new(viewport: Viewport, margins: Margins) -> Self {
        Self { viewport, margins }
    }

    pub fn plot(self) -> StoryResult<PlotArea> {
        PlotArea::from_viewport(self.viewport, self.margins)
    }
}

/// `1 decimal` for counts, `xx.x%` for rates, `N/A` when missing.
#[must_use]
pub fn format_stat(field: StatField, value: Option<f64>) -> String {
    if field.is_rate() {
        format_optional_percent(value, 1)
    } else {
        format_optional_fixed(value, 1)
    }
}

/// Chart datasets by key, normalized and filtered for one scene entry.
#[derive(Debug, Clone, Default)]
pub struct ResolvedChart {
    datasets: IndexMap<String, Arc<Dataset>>,
}

impl ResolvedChart {
    #[must_use]
    pub fn dataset(&self, key: &str) -> Option<&Dataset> {
        self.datasets.get(key).map(Arc::as_ref)
    }

    fn shared(&self, key: &str) -> Arc<Dataset> {
        self.datasets.get(key).cloned().unwrap_or_default()
    }

    fn values<'a>(&'a self, rule: &'a AxisRule) -> impl Iterator<Item = f64> + 'a {
        rule.fields.iter().flat_map(move |field| {
            self.dataset(&field.dataset)
                .into_iter()
                .flat_map(move |dataset| dataset.values(field.field))
        })
    }
}

/// Scene data after the load join completed, before drawing.
#[derive(Debug, Clone)]
pub enum ResolvedScene {
    Chart(ResolvedChart),
    Dashboard(Box<DashboardData>),
}

/// Normalizes and filters every dataset the scene declares.
///
/// Each dataset normalizes its table with its own mapping, so derived fields
/// needed by one scene never leak into another.
pub fn resolve_scene(scene: &SceneConfig, tables: &LoadedTables) -> StoryResult<ResolvedScene> {
    match &scene.kind {
        SceneKind::Chart(chart) => {
            let mut resolved = ResolvedChart::default();
            for spec in &chart.datasets {
                let raw = tables.get(spec.table)?;
                let rows = normalize_table(raw, &spec.mapping);
                let dataset = Dataset::filter(&rows, &spec.predicate);
                debug!(
                    dataset = spec.key.as_str(),
                    table = spec.table.name(),
                    normalized = rows.len(),
                    kept = dataset.len(),
                    "resolved dataset"
                );
                resolved.datasets.insert(spec.key.clone(), Arc::new(dataset));
            }
            Ok(ResolvedScene::Chart(resolved))
        }
        SceneKind::Dashboard(config) => Ok(ResolvedScene::Dashboard(Box::new(
            DashboardData::from_tables(config, tables)?,
        ))),
    }
}

/// Tooltip content source of a line chart: series `i` reads rows of its
/// dataset by index.
#[derive(Debug, Clone, Default)]
pub struct ChartTooltips {
    series: Vec<SeriesTooltip>,
    baselines: Vec<Option<(StatField, f64)>>,
}

#[derive(Debug, Clone)]
struct SeriesTooltip {
    lines: Vec<TooltipLine>,
    dataset: Arc<Dataset>,
}

impl TooltipProvider for ChartTooltips {
    fn tooltip_content(&self, datum: DatumRef) -> Option<TooltipContent> {
        let series = self.series.get(datum.group)?;
        let row = series.dataset.get(datum.index)?;
        let content = series
            .lines
            .iter()
            .fold(TooltipContent::new(row.season.clone()), |content, line| match line {
                TooltipLine::Stat { label, field } => {
                    content.field(label, &format_stat(*field, row.get(*field)))
                }
                TooltipLine::Baseline { label, reference } => {
                    let value = self
                        .baselines
                        .get(*reference)
                        .copied()
                        .flatten()
                        .map_or_else(
                            || MISSING_VALUE_LABEL.to_owned(),
                            |(field, mean)| format_stat(field, Some(mean)),
                        );
                    content.field(label, &value)
                }
            });
        Some(content)
    }
}

/// What a rendered scene offers to the interaction layer.
#[derive(Debug, Clone)]
pub enum SceneContent {
    Chart(ChartTooltips),
    Dashboard(Box<DashboardView>),
    /// Placeholder frames (load failure); nothing is interactive.
    Inert,
}

impl TooltipProvider for SceneContent {
    fn tooltip_content(&self, datum: DatumRef) -> Option<TooltipContent> {
        match self {
            Self::Chart(tooltips) => tooltips.tooltip_content(datum),
            Self::Dashboard(view) => view.tooltip_content(datum),
            Self::Inert => None,
        }
    }
}

/// One drawn scene: the visual container plus its interaction bindings.
#[derive(Debug, Clone)]
pub struct SceneView {
    pub index: usize,
    pub title: String,
    pub frame: RenderFrame,
    pub targets: Vec<HoverTarget>,
    pub content: SceneContent,
}

impl SceneView {
    #[must_use]
    pub fn dashboard(&self) -> Option<&DashboardView> {
        match &self.content {
            SceneContent::Dashboard(view) => Some(view),
            SceneContent::Chart(_) | SceneContent::Inert => None,
        }
    }
}

/// Draws a resolved scene.
pub fn render_scene(
    index: usize,
    scene: &SceneConfig,
    resolved: &ResolvedScene,
    layout: SceneLayout,
    dashboard: &DashboardState,
    hover: HoverStyle,
) -> StoryResult<SceneView> {
    let (output, content) = match (&scene.kind, resolved) {
        (SceneKind::Chart(chart), ResolvedScene::Chart(data)) => {
            let (output, tooltips) = render_chart(&scene.title, chart, data, layout)?;
            (output, SceneContent::Chart(tooltips))
        }
        (SceneKind::Dashboard(_), ResolvedScene::Dashboard(data)) => {
            let view = data.view(dashboard);
            let output = view.draw(&scene.title, layout, hover.bar_rest_opacity)?;
            (output, SceneContent::Dashboard(Box::new(view)))
        }
        _ => {
            return Err(StoryError::InvalidData(format!(
                "scene `{}` was resolved with mismatched data",
                scene.title
            )));
        }
    };
    debug!(
        scene = index,
        primitives = output.frame.counts().total(),
        targets = output.targets.len(),
        "rendered scene"
    );
    Ok(SceneView {
        index,
        title: scene.title.clone(),
        frame: output.frame,
        targets: output.targets,
        content,
    })
}

/// Placeholder scene for a failed load. Keeps the title visible.
pub fn unavailable_scene(
    index: usize,
    scene: &SceneConfig,
    layout: SceneLayout,
    detail: Option<&str>,
) -> StoryResult<SceneView> {
    let plot = layout.plot()?;
    Ok(SceneView {
        index,
        title: scene.title.clone(),
        frame: unavailable_frame(layout.viewport, plot, &scene.title, detail),
        targets: Vec::new(),
        content: SceneContent::Inert,
    })
}

fn empty_chart(title: &str, layout: SceneLayout, plot: PlotArea) -> (ChartOutput, ChartTooltips) {
    let mut frame = message_frame(layout.viewport, plot, NO_DATA_AVAILABLE);
    draw_title(&mut frame, plot, title);
    (
        ChartOutput {
            frame,
            targets: Vec::new(),
        },
        ChartTooltips::default(),
    )
}

fn x_scale(
    chart: &ChartSceneConfig,
    data: &ResolvedChart,
    plot: PlotArea,
) -> StoryResult<Option<LinearScale>> {
    match &chart.x_domain {
        XDomain::Fixed(start, end) => {
            LinearScale::new((f64::from(*start), f64::from(*end)), plot.x_range()).map(Some)
        }
        XDomain::Data(keys) => build_year_scale(
            keys.iter()
                .filter_map(|key| data.dataset(key))
                .flat_map(Dataset::years),
            plot.x_range(),
        ),
    }
}

fn value_scale(
    rule: &AxisRule,
    data: &ResolvedChart,
    plot: PlotArea,
) -> StoryResult<Option<LinearScale>> {
    build_linear_scale(data.values(rule), rule.padding, plot.y_range())
}

/// Generic line-chart pipeline: datasets -> scales -> series -> primitives.
pub fn render_chart(
    title: &str,
    chart: &ChartSceneConfig,
    data: &ResolvedChart,
    layout: SceneLayout,
) -> StoryResult<(ChartOutput, ChartTooltips)> {
    let plot = layout.plot()?;

    let Some(x) = x_scale(chart, data, plot)? else {
        return Ok(empty_chart(title, layout, plot));
    };
    let Some(left) = value_scale(&chart.left, data, plot)? else {
        return Ok(empty_chart(title, layout, plot));
    };
    let right = match &chart.right {
        Some(rule) => match value_scale(rule, data, plot)? {
            Some(scale) => Some(scale),
            None => return Ok(empty_chart(title, layout, plot)),
        },
        None => None,
    };
    let scales = ChartScales { x, left, right };

    let baselines: Vec<Option<(StatField, f64)>> = chart
        .references
        .iter()
        .map(|reference| {
            data.dataset(&reference.source.dataset)
                .and_then(|dataset| dataset.mean(reference.source.field))
                .map(|mean| (reference.source.field, mean))
        })
        .collect();
    let references = chart
        .references
        .iter()
        .zip(&baselines)
        .filter_map(|(reference, baseline)| {
            baseline.map(|(field, mean)| ReferenceLine {
                value: mean,
                axis: reference.axis,
                label: format!("{}: {}", reference.label, format_stat(field, Some(mean))),
                color: reference.color,
            })
        })
        .collect();

    let series: Vec<ChartSeries> = chart
        .series
        .iter()
        .map(|spec| ChartSeries {
            label: spec.label.clone(),
            axis: spec.axis,
            style: spec.style,
            points: data
                .dataset(&spec.dataset)
                .map(|dataset| {
                    dataset
                        .rows()
                        .iter()
                        .enumerate()
                        .filter_map(|(index, row)| {
                            row.get(spec.field).map(|y| SeriesPoint {
                                index,
                                x: f64::from(row.year),
                                y,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    let callouts = chart
        .callouts
        .iter()
        .enumerate()
        .filter_map(|(position, callout)| {
            let spec = chart.series.get(callout.series)?;
            let (_, row) = data.dataset(&spec.dataset)?.find_season(&callout.season)?;
            let value = row.get(spec.field)?;
            let y = scales.value_scale(spec.axis)?;
            Some(Callout {
                anchor: (x.map(f64::from(row.year)), y.map(value)),
                offset: callout.offset,
                text: callout.text.clone(),
                align: callout.align,
                delay_ms: CALLOUT_BASE_DELAY_MS + CALLOUT_STEP_MS * position as u32,
            })
        })
        .collect();

    let spec = LineChartSpec {
        title: title.to_owned(),
        x_label: chart.x_label.clone(),
        y_label: chart.y_label.clone(),
        y2_label: chart.y2_label.clone(),
        x_ticks: chart.x_ticks.clone(),
        left_format: Some(chart.left.format),
        right_format: chart.right.as_ref().map(|rule| rule.format),
        series,
        bands: chart.bands.clone(),
        references,
        callouts,
        legend: chart.legend.clone(),
        legend_reveal: chart.legend_reveal,
        margin_bottom: layout.margins.bottom,
    };
    let output = build_line_chart(layout.viewport, plot, scales, &spec)?;

    let tooltips = ChartTooltips {
        series: chart
            .series
            .iter()
            .map(|spec| SeriesTooltip {
                lines: spec.tooltip.clone(),
                dataset: data.shared(&spec.dataset),
            })
            .collect(),
        baselines,
    };
    Ok((output, tooltips))
}

#[cfg(test)]
mod tests {
    use super::format_stat;
    use crate::data::StatField;

    #[test]
    fn stat_formatting_follows_field_kind() {
        assert_eq!(format_stat(StatField::ThreePointAttempts, Some(24.06)), "24.1");
        assert_eq!(format_stat(StatField::ThreePointPct, Some(0.3551)), "35.5%");
        assert_eq!(format_stat(StatField::ThreePointPct, None), "N/A");
    }
}
