//! Chart Renderer: turns resolved series and scales into frame primitives.
//!
//! Nothing here reads raw rows. Scenes resolve datasets into
//! [`ChartSeries`] / [`BarDatum`] values first and hand those over.

mod annotation;
mod axis;
mod bar_chart;
mod legend;
mod line_chart;
mod placeholder;

pub use annotation::{
    Callout, EraBand, ReferenceLine, draw_callout, draw_era_band, draw_reference_line, draw_title,
};
pub use axis::{
    TickFormat, TickSpec, draw_axis_titles, draw_bottom_axis, draw_left_axis, draw_right_axis,
};
pub use bar_chart::{BarChartSpec, BarDatum, build_bar_chart};
pub use legend::{LegendEntry, draw_legend};
pub use line_chart::{
    ChartScales, ChartSeries, LineChartSpec, SeriesPoint, SeriesStyle, build_line_chart,
};
pub use placeholder::{DATA_UNAVAILABLE, message_frame, unavailable_frame};

use serde::{Deserialize, Serialize};

use crate::interaction::HoverTarget;
use crate::render::RenderFrame;

/// Which value axis a series or reference line is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisSide {
    Left,
    Right,
}

/// A built chart: its primitives plus the hover targets bound to them.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutput {
    pub frame: RenderFrame,
    pub targets: Vec<HoverTarget>,
}
