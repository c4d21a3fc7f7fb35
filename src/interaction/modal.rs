use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::render::{
    Color, FrameLayer, RectPrimitive, RenderFrame, TextHAlign, TextPrimitive, estimate_text_width,
};

const CONTENT_PADDING: f64 = 30.0;
const MIN_CONTENT_WIDTH: f64 = 320.0;
const MAX_CONTENT_WIDTH: f64 = 500.0;
const TITLE_SIZE_PX: f64 = 22.0;
const FIELD_SIZE_PX: f64 = 14.0;
const FIELD_SPACING: f64 = 28.0;
const BUTTON_WIDTH: f64 = 90.0;
const BUTTON_HEIGHT: f64 = 36.0;

/// Entity detail shown in the modal overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalDetail {
    pub title: String,
    pub fields: Vec<(String, String)>,
}

impl ModalDetail {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn field(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((label.into(), value.into()));
        self
    }

    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value.as_str())
    }
}

/// Resolved geometry of an open modal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModalLayout {
    pub backdrop: RectPrimitive,
    pub content: RectPrimitive,
    pub close_button: RectPrimitive,
}

impl ModalLayout {
    #[must_use]
    pub fn centered(viewport: Viewport, detail: &ModalDetail) -> Self {
        let (vw, vh) = (f64::from(viewport.width), f64::from(viewport.height));
        let widest = std::iter::once(estimate_text_width(&detail.title, TITLE_SIZE_PX, true))
            .chain(detail.fields.iter().map(|(label, value)| {
                estimate_text_width(&format!("{label}: {value}"), FIELD_SIZE_PX, false)
            }))
            .fold(0.0_f64, f64::max);
        let width = (widest + CONTENT_PADDING * 2.0)
            .clamp(MIN_CONTENT_WIDTH, MAX_CONTENT_WIDTH)
            .min(vw);
        let height = (CONTENT_PADDING * 2.0
            + TITLE_SIZE_PX
            + 20.0
            + detail.fields.len() as f64 * FIELD_SPACING
            + 20.0
            + BUTTON_HEIGHT)
            .min(vh);
        let left = (vw - width) / 2.0;
        let top = (vh - height) / 2.0;

        let button_left = left + (width - BUTTON_WIDTH) / 2.0;
        let button_top = top + height - CONTENT_PADDING - BUTTON_HEIGHT;

        Self {
            backdrop: RectPrimitive::new(0.0, 0.0, vw, vh, Color::rgba(0.0, 0.0, 0.0, 0.5)),
            content: RectPrimitive::new(left, top, width, height, Color::WHITE)
                .with_corner_radius(8.0),
            close_button: RectPrimitive::new(
                button_left,
                button_top,
                BUTTON_WIDTH,
                BUTTON_HEIGHT,
                Color::rgb(0.098, 0.463, 0.824),
            )
            .with_corner_radius(4.0),
        }
    }

    /// Moves the whole overlay down by `dy`, e.g. to a host scroll offset.
    #[must_use]
    pub fn shifted(mut self, dy: f64) -> Self {
        self.backdrop.y += dy;
        self.content.y += dy;
        self.close_button.y += dy;
        self
    }
}

/// Where a click landed while the modal was open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalClick {
    NotOpen,
    CloseControl,
    Backdrop,
    Content,
}

impl ModalClick {
    #[must_use]
    pub const fn dismisses(self) -> bool {
        matches!(self, Self::CloseControl | Self::Backdrop)
    }
}

/// Detail overlay opened from a table row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModalState {
    open: Option<(ModalDetail, ModalLayout)>,
}

impl ModalState {
    /// Opens `detail`, replacing any modal already shown.
    pub fn open(&mut self, detail: ModalDetail, viewport: Viewport) {
        self.open_at(detail, viewport, 0.0);
    }

    /// Opens the modal centered in the `viewport` whose top edge sits at
    /// frame row `top`.
    pub fn open_at(&mut self, detail: ModalDetail, viewport: Viewport, top: f64) {
        let layout = ModalLayout::centered(viewport, &detail).shifted(top);
        self.open = Some((detail, layout));
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    #[must_use]
    pub fn detail(&self) -> Option<&ModalDetail> {
        self.open.as_ref().map(|(detail, _)| detail)
    }

    #[must_use]
    pub fn layout(&self) -> Option<ModalLayout> {
        self.open.as_ref().map(|(_, layout)| *layout)
    }

    /// Classifies a click and closes the modal for the close control or
    /// anywhere on the backdrop outside the content box.
    pub fn on_click(&mut self, x: f64, y: f64) -> ModalClick {
        let Some((_, layout)) = &self.open else {
            return ModalClick::NotOpen;
        };
        let click = if layout.close_button.contains(x, y) {
            ModalClick::CloseControl
        } else if layout.content.contains(x, y) {
            ModalClick::Content
        } else {
            ModalClick::Backdrop
        };
        if click.dismisses() {
            self.close();
        }
        click
    }

    pub fn draw(&self, frame: &mut RenderFrame) {
        let Some((detail, layout)) = &self.open else {
            return;
        };
        frame.push_rect(FrameLayer::Overlay, layout.backdrop);
        frame.push_rect(FrameLayer::Overlay, layout.content);

        let center = layout.content.x + layout.content.width / 2.0;
        let mut baseline = layout.content.y + CONTENT_PADDING + TITLE_SIZE_PX;
        frame.push_text(
            FrameLayer::Overlay,
            TextPrimitive::new(
                detail.title.clone(),
                center,
                baseline,
                TITLE_SIZE_PX,
                Color::TEXT,
                TextHAlign::Center,
            )
            .bold(),
        );
        baseline += 20.0;
        for (label, value) in &detail.fields {
            baseline += FIELD_SPACING;
            frame.push_text(
                FrameLayer::Overlay,
                TextPrimitive::new(
                    format!("{label}: {value}"),
                    center,
                    baseline,
                    FIELD_SIZE_PX,
                    Color::TEXT,
                    TextHAlign::Center,
                ),
            );
        }

        frame.push_rect(FrameLayer::Overlay, layout.close_button);
        frame.push_text(
            FrameLayer::Overlay,
            TextPrimitive::new(
                "Close",
                layout.close_button.x + BUTTON_WIDTH / 2.0,
                layout.close_button.y + BUTTON_HEIGHT / 2.0 + 5.0,
                FIELD_SIZE_PX,
                Color::WHITE,
                TextHAlign::Center,
            ),
        );
    }
}
