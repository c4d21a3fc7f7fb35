use serde::{Deserialize, Serialize};

use crate::render::{
    Animation, Color, FrameLayer, LinePrimitive, RenderFrame, StrokeDash, TextHAlign, TextPrimitive,
};

const ROW_SPACING: f64 = 24.0;
const SWATCH_LENGTH: f64 = 30.0;
const LABEL_GAP: f64 = 6.0;
const FONT_PX: f64 = 13.0;

/// One `(swatch, label)` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: Color,
    pub label: String,
    pub dash: Option<StrokeDash>,
    pub stroke_width: f64,
}

impl LegendEntry {
    #[must_use]
    pub fn new(color: Color, label: impl Into<String>) -> Self {
        Self {
            color,
            label: label.into(),
            dash: None,
            stroke_width: 3.0,
        }
    }

    #[must_use]
    pub fn dashed(mut self, dash: StrokeDash) -> Self {
        self.dash = Some(dash);
        self
    }

    #[must_use]
    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }
}

/// Stacked legend with a bold "Legend:" heading above the first row.
///
/// `origin` is the left end of the first swatch.
pub fn draw_legend(
    frame: &mut RenderFrame,
    origin: (f64, f64),
    entries: &[LegendEntry],
    reveal: Option<Animation>,
) {
    if entries.is_empty() {
        return;
    }
    let (x, y) = origin;
    let mut heading = TextPrimitive::new("Legend:", x, y - 10.0, FONT_PX, Color::TEXT, TextHAlign::Left).bold();
    if let Some(animation) = reveal {
        heading = heading.with_animation(animation);
    }
    frame.push_text(FrameLayer::Annotation, heading);

    for (row, entry) in entries.iter().enumerate() {
        let row_y = y + row as f64 * ROW_SPACING;
        let mut swatch = LinePrimitive::new(
            x,
            row_y,
            x + SWATCH_LENGTH,
            row_y,
            entry.stroke_width,
            entry.color,
        );
        if let Some(dash) = entry.dash {
            swatch = swatch.with_dash(dash);
        }
        frame.push_line(FrameLayer::Annotation, swatch);

        let mut label = TextPrimitive::new(
            entry.label.clone(),
            x + SWATCH_LENGTH + LABEL_GAP,
            row_y + 4.0,
            FONT_PX,
            Color::TEXT,
            TextHAlign::Left,
        );
        if let Some(animation) = reveal {
            label = label.with_animation(animation);
        }
        frame.push_text(FrameLayer::Annotation, label);
    }
}
