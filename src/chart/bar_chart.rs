use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{BandScale, DomainFloor, PlotArea, ScalePadding, Viewport, build_linear_scale};
use crate::error::StoryResult;
use crate::interaction::{DatumRef, HoverTarget};
use crate::render::{
    Color, FrameLayer, LinePrimitive, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive,
};

use super::annotation::draw_title;
use super::axis::{TickFormat, draw_axis_titles, draw_left_axis};
use super::placeholder::message_frame;
use super::ChartOutput;

const BAND_PADDING: f64 = 0.1;
const CATEGORY_FONT_PX: f64 = 10.0;

/// One bar; `index` points back at the row it was drawn from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChartSpec {
    pub title: String,
    pub y_label: String,
    pub bars: Vec<BarDatum>,
    pub floor: DomainFloor,
    pub headroom: f64,
    pub color: Color,
    pub rest_opacity: f64,
    /// Hover group the bars register under.
    pub group: usize,
    /// Shown instead of the chart when `bars` is empty.
    pub empty_message: String,
}

/// Builds a category bar chart. Bars are a full redraw of `spec.bars` in
/// their given order.
pub fn build_bar_chart(
    viewport: Viewport,
    plot: PlotArea,
    spec: &BarChartSpec,
) -> StoryResult<ChartOutput> {
    if spec.bars.is_empty() {
        return Ok(ChartOutput {
            frame: message_frame(viewport, plot, &spec.empty_message),
            targets: Vec::new(),
        });
    }

    let bands = BandScale::new(
        spec.bars.iter().map(|bar| bar.label.as_str()),
        plot.x_range(),
        BAND_PADDING,
    )?;
    let Some(y) = build_linear_scale(
        spec.bars.iter().map(|bar| bar.value),
        ScalePadding::new(spec.floor, spec.headroom),
        plot.y_range(),
    )?
    else {
        return Ok(ChartOutput {
            frame: message_frame(viewport, plot, &spec.empty_message),
            targets: Vec::new(),
        });
    };

    let mut frame = RenderFrame::new(viewport);
    let mut targets = Vec::with_capacity(spec.bars.len());

    draw_left_axis(&mut frame, plot, y, &y.ticks(10), TickFormat::Integer);
    frame.push_line(
        FrameLayer::Axis,
        LinePrimitive::new(
            plot.left,
            plot.bottom(),
            plot.right(),
            plot.bottom(),
            1.0,
            Color::rgb(0.0, 0.0, 0.0),
        ),
    );

    let width = bands.bandwidth();
    for bar in &spec.bars {
        let Some(x) = bands.position(&bar.label) else {
            continue;
        };
        let top = y.map(bar.value).min(plot.bottom());
        let height = plot.bottom() - top;
        frame.push_rect(
            FrameLayer::Series,
            RectPrimitive::new(x, top, width, height, spec.color).with_opacity(spec.rest_opacity),
        );
        targets.push(HoverTarget::bar(
            x,
            top,
            width,
            height,
            spec.color,
            DatumRef::new(spec.group, bar.index),
        ));

        let label_x = x + width / 2.0;
        frame.push_text(
            FrameLayer::Axis,
            TextPrimitive::new(
                bar.label.clone(),
                label_x,
                plot.bottom() + 12.0,
                CATEGORY_FONT_PX,
                Color::rgb(0.0, 0.0, 0.0),
                TextHAlign::Right,
            )
            .rotated(-45.0),
        );
    }

    draw_axis_titles(&mut frame, plot, 0.0, "", &spec.y_label, None);
    draw_title(&mut frame, plot, &spec.title);

    debug!(bars = spec.bars.len(), "built bar chart");
    Ok(ChartOutput { frame, targets })
}
