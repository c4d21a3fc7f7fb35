use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Viewport;
use crate::render::{
    Color, FrameLayer, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, estimate_text_width,
};

use super::hit::DatumRef;

const FONT_SIZE_PX: f64 = 12.0;
const LINE_HEIGHT_PX: f64 = 16.0;
const PADDING_X: f64 = 12.0;
const PADDING_Y: f64 = 8.0;

/// Tooltip text: a bold heading (usually the season or team) and detail lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipContent {
    pub heading: String,
    pub lines: SmallVec<[String; 4]>,
}

impl TooltipContent {
    #[must_use]
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            lines: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.lines.push(line.into());
        self
    }

    /// `label: value` detail line.
    #[must_use]
    pub fn field(self, label: &str, value: &str) -> Self {
        self.line(format!("{label}: {value}"))
    }
}

/// Builds tooltip content on demand from the datum a target is bound to.
///
/// Called once per hover-enter; nothing is precomputed per point.
pub trait TooltipProvider {
    fn tooltip_content(&self, datum: DatumRef) -> Option<TooltipContent>;
}

/// A visible tooltip anchored at pointer + offset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tooltip {
    pub datum: DatumRef,
    pub content: TooltipContent,
    pub x: f64,
    pub y: f64,
}

impl Tooltip {
    #[must_use]
    pub fn new(datum: DatumRef, content: TooltipContent, pointer: (f64, f64), offset: (f64, f64)) -> Self {
        let mut tooltip = Self {
            datum,
            content,
            x: 0.0,
            y: 0.0,
        };
        tooltip.follow(pointer, offset);
        tooltip
    }

    pub fn follow(&mut self, pointer: (f64, f64), offset: (f64, f64)) {
        self.x = pointer.0 + offset.0;
        self.y = pointer.1 + offset.1;
    }

    /// Box size including padding.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        let widest = std::iter::once(estimate_text_width(&self.content.heading, FONT_SIZE_PX, true))
            .chain(
                self.content
                    .lines
                    .iter()
                    .map(|line| estimate_text_width(line, FONT_SIZE_PX, false)),
            )
            .fold(0.0_f64, f64::max);
        let rows = 1 + self.content.lines.len();
        (
            widest + PADDING_X * 2.0,
            rows as f64 * LINE_HEIGHT_PX + PADDING_Y * 2.0,
        )
    }

    /// Draws the tooltip box, shifted inward when it would leave the viewport.
    pub fn draw(&self, frame: &mut RenderFrame, viewport: Viewport) {
        let (width, height) = self.size();
        let max_x = (f64::from(viewport.width) - width).max(0.0);
        let max_y = (f64::from(viewport.height) - height).max(0.0);
        let left = self.x.clamp(0.0, max_x);
        let top = self.y.clamp(0.0, max_y);

        frame.push_rect(
            FrameLayer::Overlay,
            RectPrimitive::new(left, top, width, height, Color::WHITE)
                .with_border(1.0, Color::rgb(0.8, 0.8, 0.8))
                .with_corner_radius(4.0),
        );
        let text_left = left + PADDING_X;
        let mut baseline = top + PADDING_Y + FONT_SIZE_PX;
        frame.push_text(
            FrameLayer::Overlay,
            TextPrimitive::new(
                self.content.heading.clone(),
                text_left,
                baseline,
                FONT_SIZE_PX,
                Color::TEXT,
                TextHAlign::Left,
            )
            .bold(),
        );
        for line in &self.content.lines {
            baseline += LINE_HEIGHT_PX;
            frame.push_text(
                FrameLayer::Overlay,
                TextPrimitive::new(
                    line.clone(),
                    text_left,
                    baseline,
                    FONT_SIZE_PX,
                    Color::TEXT,
                    TextHAlign::Left,
                ),
            );
        }
    }
}
