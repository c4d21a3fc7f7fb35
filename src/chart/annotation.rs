use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, PlotArea};
use crate::render::{
    Animation, Color, FrameLayer, LinePrimitive, RectPrimitive, RenderFrame, StrokeDash,
    TextHAlign, TextPrimitive,
};

use super::AxisSide;

const BAND_OPACITY: f64 = 0.08;
const BAND_LABEL_OFFSET: f64 = 30.0;
const REFERENCE_OPACITY: f64 = 0.6;
const REFERENCE_WIDTH: f64 = 1.5;

/// Highlighted year range spanning the full plot height.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EraBand {
    pub start_year: i32,
    pub end_year: i32,
    pub label: String,
    pub color: Color,
}

impl EraBand {
    #[must_use]
    pub fn new(start_year: i32, end_year: i32, label: impl Into<String>, color: Color) -> Self {
        Self {
            start_year,
            end_year,
            label: label.into(),
            color,
        }
    }
}

/// Draws the translucent band and its centered label.
///
/// The band is clipped to the plot so a range reaching past the data still
/// stays inside the axes.
pub fn draw_era_band(frame: &mut RenderFrame, plot: PlotArea, x: LinearScale, band: &EraBand) {
    let a = x.map(f64::from(band.start_year));
    let b = x.map(f64::from(band.end_year));
    let left = a.min(b).max(plot.left);
    let right = a.max(b).min(plot.right());
    if right <= left {
        return;
    }
    frame.push_rect(
        FrameLayer::Background,
        RectPrimitive::new(left, plot.top, right - left, plot.height, band.color)
            .with_opacity(BAND_OPACITY)
            .with_animation(Animation::fade_in(600, 800)),
    );
    frame.push_text(
        FrameLayer::Annotation,
        TextPrimitive::new(
            band.label.clone(),
            left + (right - left) / 2.0,
            plot.top + BAND_LABEL_OFFSET,
            14.0,
            band.color,
            TextHAlign::Center,
        )
        .bold()
        .with_animation(Animation::fade_in(800, 800)),
    );
}

/// Horizontal baseline at a precomputed value with a label past the plot's
/// right edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub axis: AxisSide,
    pub label: String,
    pub color: Color,
}

pub fn draw_reference_line(
    frame: &mut RenderFrame,
    plot: PlotArea,
    scale: LinearScale,
    line: &ReferenceLine,
) {
    let y = scale.map(line.value);
    if !y.is_finite() {
        return;
    }
    frame.push_line(
        FrameLayer::Axis,
        LinePrimitive::new(plot.left, y, plot.right(), y, REFERENCE_WIDTH, line.color)
            .with_dash(StrokeDash::REFERENCE)
            .with_opacity(REFERENCE_OPACITY),
    );
    frame.push_text(
        FrameLayer::Annotation,
        TextPrimitive::new(
            line.label.clone(),
            plot.right() + 10.0,
            y + 4.0,
            11.0,
            line.color,
            TextHAlign::Left,
        )
        .bold(),
    );
}

/// Label attached to a data point by a short connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Callout {
    /// Anchor in pixels (the data point).
    pub anchor: (f64, f64),
    /// Label offset from the anchor.
    pub offset: (f64, f64),
    pub text: String,
    pub align: TextHAlign,
    pub delay_ms: u32,
}

pub fn draw_callout(frame: &mut RenderFrame, callout: &Callout) {
    let (ax, ay) = callout.anchor;
    let (lx, ly) = (ax + callout.offset.0, ay + callout.offset.1);
    let reveal = Animation::fade_in(callout.delay_ms, 500);
    frame.push_line(
        FrameLayer::Annotation,
        LinePrimitive::new(ax, ay, lx, ly, 1.0, Color::TEXT),
    );
    frame.push_text(
        FrameLayer::Annotation,
        TextPrimitive::new(callout.text.clone(), lx, ly - 4.0, 12.0, Color::TEXT, callout.align)
            .with_animation(reveal),
    );
}

/// Bold chart title centered above the plot.
pub fn draw_title(frame: &mut RenderFrame, plot: PlotArea, title: &str) {
    if title.is_empty() {
        return;
    }
    frame.push_text(
        FrameLayer::Annotation,
        TextPrimitive::new(
            title,
            plot.center_x(),
            plot.top - 16.0,
            17.0,
            Color::TITLE,
            TextHAlign::Center,
        )
        .bold()
        .with_animation(Animation::fade_in(100, 500)),
    );
}
