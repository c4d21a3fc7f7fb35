use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{LinearScale, PlotArea, Viewport, monotone_x_path};
use crate::error::{StoryError, StoryResult};
use crate::interaction::{DatumRef, HoverTarget};
use crate::render::{
    Animation, CirclePrimitive, Color, FrameLayer, PathPrimitive, RenderFrame, StrokeDash,
};

use super::annotation::{
    Callout, EraBand, ReferenceLine, draw_callout, draw_era_band, draw_reference_line, draw_title,
};
use super::axis::{
    TickFormat, TickSpec, draw_axis_titles, draw_bottom_axis, draw_left_axis, draw_right_axis,
};
use super::legend::{LegendEntry, draw_legend};
use super::{AxisSide, ChartOutput};

/// Stroke and marker appearance of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    pub color: Color,
    pub stroke_width: f64,
    pub dash: Option<StrokeDash>,
    pub point_radius: f64,
    pub point_color: Color,
    pub reveal: Option<Animation>,
}

impl SeriesStyle {
    /// Solid 2.5px line with same-colored 4px markers.
    #[must_use]
    pub const fn solid(color: Color) -> Self {
        Self {
            color,
            stroke_width: 2.5,
            dash: None,
            point_radius: 4.0,
            point_color: color,
            reveal: None,
        }
    }

    #[must_use]
    pub const fn dashed(mut self, dash: StrokeDash) -> Self {
        self.dash = Some(dash);
        self
    }

    #[must_use]
    pub const fn with_points(mut self, radius: f64, color: Color) -> Self {
        self.point_radius = radius;
        self.point_color = color;
        self
    }

    #[must_use]
    pub const fn with_reveal(mut self, reveal: Animation) -> Self {
        self.reveal = Some(reveal);
        self
    }
}

/// One sample of a series; `index` is the row position in the source dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub index: usize,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub label: String,
    pub axis: AxisSide,
    pub style: SeriesStyle,
    pub points: Vec<SeriesPoint>,
}

/// Shared x scale plus one or two value scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartScales {
    pub x: LinearScale,
    pub left: LinearScale,
    pub right: Option<LinearScale>,
}

impl ChartScales {
    #[must_use]
    pub fn value_scale(&self, axis: AxisSide) -> Option<LinearScale> {
        match axis {
            AxisSide::Left => Some(self.left),
            AxisSide::Right => self.right,
        }
    }
}

/// Everything a single- or dual-axis line chart draws.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub y2_label: Option<String>,
    pub x_ticks: TickSpec,
    pub left_format: Option<TickFormat>,
    pub right_format: Option<TickFormat>,
    pub series: Vec<ChartSeries>,
    pub bands: Vec<EraBand>,
    pub references: Vec<ReferenceLine>,
    pub callouts: Vec<Callout>,
    pub legend: Vec<LegendEntry>,
    pub legend_reveal: Option<Animation>,
    pub margin_bottom: f64,
}

/// Builds the chart frame and its hover targets.
///
/// Series `i` registers its markers under `DatumRef { group: i, .. }`.
pub fn build_line_chart(
    viewport: Viewport,
    plot: PlotArea,
    scales: ChartScales,
    spec: &LineChartSpec,
) -> StoryResult<ChartOutput> {
    let mut frame = RenderFrame::new(viewport);
    let mut targets = Vec::new();

    for band in &spec.bands {
        draw_era_band(&mut frame, plot, scales.x, band);
    }

    let x_ticks = spec.x_ticks.resolve(scales.x);
    draw_bottom_axis(&mut frame, plot, scales.x, &x_ticks, TickFormat::Year);
    draw_left_axis(
        &mut frame,
        plot,
        scales.left,
        &scales.left.ticks(10),
        spec.left_format.unwrap_or(TickFormat::Number),
    );
    if let Some(right) = scales.right {
        draw_right_axis(
            &mut frame,
            plot,
            right,
            &right.ticks(10),
            spec.right_format.unwrap_or(TickFormat::WholePercent),
        );
    }

    for reference in &spec.references {
        let scale = scales
            .value_scale(reference.axis)
            .ok_or_else(|| missing_right_axis(&reference.label))?;
        draw_reference_line(&mut frame, plot, scale, reference);
    }

    for (group, series) in spec.series.iter().enumerate() {
        let y = scales
            .value_scale(series.axis)
            .ok_or_else(|| missing_right_axis(&series.label))?;
        let pixels: Vec<(f64, f64)> = series
            .points
            .iter()
            .map(|point| (scales.x.map(point.x), y.map(point.y)))
            .collect();

        if pixels.len() >= 2 {
            frame.push_path(
                FrameLayer::Series,
                PathPrimitive::new(
                    monotone_x_path(&pixels),
                    series.style.stroke_width,
                    series.style.color,
                )
                .with_dash(series.style.dash)
                .with_animation(series.style.reveal),
            );
        }

        for (point, (cx, cy)) in series.points.iter().zip(&pixels) {
            frame.push_circle(
                FrameLayer::Markers,
                CirclePrimitive::new(
                    *cx,
                    *cy,
                    series.style.point_radius,
                    series.style.point_color,
                ),
            );
            targets.push(HoverTarget::point(
                *cx,
                *cy,
                series.style.point_radius,
                series.style.point_color,
                DatumRef::new(group, point.index),
            ));
        }
    }

    for callout in &spec.callouts {
        draw_callout(&mut frame, callout);
    }
    draw_legend(
        &mut frame,
        (plot.right() + 70.0, plot.top + 10.0),
        &spec.legend,
        spec.legend_reveal,
    );
    draw_axis_titles(
        &mut frame,
        plot,
        spec.margin_bottom,
        &spec.x_label,
        &spec.y_label,
        spec.y2_label.as_deref(),
    );
    draw_title(&mut frame, plot, &spec.title);

    debug!(
        series = spec.series.len(),
        targets = targets.len(),
        primitives = frame.counts().total(),
        "built line chart"
    );
    Ok(ChartOutput { frame, targets })
}

fn missing_right_axis(label: &str) -> StoryError {
    StoryError::InvalidData(format!(
        "`{label}` is bound to the right axis but the chart has no right scale"
    ))
}
