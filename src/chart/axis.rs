use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, PlotArea, format_fixed};
use crate::render::{Color, FrameLayer, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};

const AXIS_COLOR: Color = Color::rgb(0.0, 0.0, 0.0);
const TICK_SIZE: f64 = 6.0;
const TICK_FONT_PX: f64 = 10.0;
const LABEL_FONT_PX: f64 = 13.0;

/// How tick values are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickFormat {
    /// Plain integer year (`2015`).
    Year,
    /// Shortest decimal form (`5`, `2.5`).
    Number,
    /// Rounded integer (`35`).
    Integer,
    /// Fraction shown as a whole percentage (`0.35` -> `35%`).
    WholePercent,
}

impl TickFormat {
    #[must_use]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Year | Self::Integer => format!("{}", value.round() as i64),
            Self::WholePercent => format!("{}%", (value * 100.0).round() as i64),
            Self::Number => {
                let text = format_fixed(value, 2);
                let trimmed = text.trim_end_matches('0').trim_end_matches('.');
                if trimmed == "-0" {
                    "0".to_owned()
                } else {
                    trimmed.to_owned()
                }
            }
        }
    }
}

/// Tick placement: a target count for generated "nice" ticks, or explicit values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TickSpec {
    Auto(usize),
    Explicit(Vec<f64>),
}

impl TickSpec {
    /// Evenly stepped explicit ticks from `start` to `end` inclusive.
    #[must_use]
    pub fn stepped(start: i32, end: i32, step: i32) -> Self {
        let step = step.max(1);
        Self::Explicit(
            (start..=end)
                .step_by(step as usize)
                .map(f64::from)
                .collect(),
        )
    }

    /// Values inside the scale domain.
    #[must_use]
    pub fn resolve(&self, scale: LinearScale) -> Vec<f64> {
        let (d0, d1) = scale.domain();
        let (lo, hi) = (d0.min(d1), d0.max(d1));
        match self {
            Self::Auto(count) => scale.ticks(*count),
            Self::Explicit(values) => values
                .iter()
                .copied()
                .filter(|v| *v >= lo - 1e-9 && *v <= hi + 1e-9)
                .collect(),
        }
    }
}

impl Default for TickSpec {
    fn default() -> Self {
        Self::Auto(10)
    }
}

pub fn draw_bottom_axis(
    frame: &mut RenderFrame,
    plot: PlotArea,
    scale: LinearScale,
    ticks: &[f64],
    format: TickFormat,
) {
    let y = plot.bottom();
    frame.push_line(
        FrameLayer::Axis,
        LinePrimitive::new(plot.left, y, plot.right(), y, 1.0, AXIS_COLOR),
    );
    for tick in ticks {
        let x = scale.map(*tick);
        frame.push_line(
            FrameLayer::Axis,
            LinePrimitive::new(x, y, x, y + TICK_SIZE, 1.0, AXIS_COLOR),
        );
        frame.push_text(
            FrameLayer::Axis,
            TextPrimitive::new(
                format.format(*tick),
                x,
                y + TICK_SIZE + TICK_FONT_PX + 3.0,
                TICK_FONT_PX,
                AXIS_COLOR,
                TextHAlign::Center,
            ),
        );
    }
}

pub fn draw_left_axis(
    frame: &mut RenderFrame,
    plot: PlotArea,
    scale: LinearScale,
    ticks: &[f64],
    format: TickFormat,
) {
    draw_vertical_axis(frame, plot, plot.left, -1.0, scale, ticks, format);
}

pub fn draw_right_axis(
    frame: &mut RenderFrame,
    plot: PlotArea,
    scale: LinearScale,
    ticks: &[f64],
    format: TickFormat,
) {
    draw_vertical_axis(frame, plot, plot.right(), 1.0, scale, ticks, format);
}

fn draw_vertical_axis(
    frame: &mut RenderFrame,
    plot: PlotArea,
    x: f64,
    direction: f64,
    scale: LinearScale,
    ticks: &[f64],
    format: TickFormat,
) {
    frame.push_line(
        FrameLayer::Axis,
        LinePrimitive::new(x, plot.top, x, plot.bottom(), 1.0, AXIS_COLOR),
    );
    let align = if direction < 0.0 {
        TextHAlign::Right
    } else {
        TextHAlign::Left
    };
    for tick in ticks {
        let y = scale.map(*tick);
        frame.push_line(
            FrameLayer::Axis,
            LinePrimitive::new(x, y, x + direction * TICK_SIZE, y, 1.0, AXIS_COLOR),
        );
        frame.push_text(
            FrameLayer::Axis,
            TextPrimitive::new(
                format.format(*tick),
                x + direction * (TICK_SIZE + 3.0),
                y + TICK_FONT_PX * 0.35,
                TICK_FONT_PX,
                AXIS_COLOR,
                align,
            ),
        );
    }
}

/// Axis titles: centered under the x axis, rotated beside the value axes.
pub fn draw_axis_titles(
    frame: &mut RenderFrame,
    plot: PlotArea,
    margin_bottom: f64,
    x_label: &str,
    y_label: &str,
    y2_label: Option<&str>,
) {
    let center_y = plot.top + plot.height / 2.0;
    if !x_label.is_empty() {
        frame.push_text(
            FrameLayer::Annotation,
            TextPrimitive::new(
                x_label,
                plot.center_x(),
                plot.bottom() + margin_bottom - 10.0,
                LABEL_FONT_PX,
                Color::TEXT,
                TextHAlign::Center,
            ),
        );
    }
    if !y_label.is_empty() {
        frame.push_text(
            FrameLayer::Annotation,
            TextPrimitive::new(
                y_label,
                (plot.left - 42.0).max(LABEL_FONT_PX),
                center_y,
                LABEL_FONT_PX,
                Color::TEXT,
                TextHAlign::Center,
            )
            .rotated(-90.0),
        );
    }
    if let Some(label) = y2_label.filter(|label| !label.is_empty()) {
        frame.push_text(
            FrameLayer::Annotation,
            TextPrimitive::new(
                label,
                plot.right() + 52.0,
                center_y,
                LABEL_FONT_PX,
                Color::TEXT,
                TextHAlign::Center,
            )
            .rotated(90.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{TickFormat, TickSpec};
    use crate::core::LinearScale;

    #[test]
    fn tick_formats() {
        assert_eq!(TickFormat::Year.format(2015.0), "2015");
        assert_eq!(TickFormat::WholePercent.format(0.354), "35%");
        assert_eq!(TickFormat::Number.format(2.5), "2.5");
        assert_eq!(TickFormat::Number.format(10.0), "10");
    }

    #[test]
    fn explicit_ticks_are_clipped_to_the_domain() {
        let scale = LinearScale::new((1990.0, 1996.0), (0.0, 100.0)).expect("scale");
        let ticks = TickSpec::stepped(1990, 2000, 2).resolve(scale);
        assert_eq!(ticks, vec![1990.0, 1992.0, 1994.0, 1996.0]);
    }
}
