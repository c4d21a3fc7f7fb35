use crate::core::{PlotArea, Viewport};
use crate::render::{Color, FrameLayer, RenderFrame, TextHAlign, TextPrimitive};

/// Text shown in place of a scene whose source tables failed to load.
pub const DATA_UNAVAILABLE: &str = "Data unavailable";

/// A frame holding only `message`, centered in the plot.
#[must_use]
pub fn message_frame(viewport: Viewport, plot: PlotArea, message: &str) -> RenderFrame {
    RenderFrame::new(viewport).with_text(
        FrameLayer::Annotation,
        TextPrimitive::new(
            message,
            plot.center_x(),
            plot.top + plot.height / 2.0,
            16.0,
            Color::MUTED,
            TextHAlign::Center,
        ),
    )
}

/// Replacement frame for a scene whose data could not be loaded.
///
/// The scene title stays visible so navigation context is not lost.
#[must_use]
pub fn unavailable_frame(
    viewport: Viewport,
    plot: PlotArea,
    title: &str,
    detail: Option<&str>,
) -> RenderFrame {
    let mut frame = message_frame(viewport, plot, DATA_UNAVAILABLE);
    super::annotation::draw_title(&mut frame, plot, title);
    if let Some(detail) = detail {
        frame.push_text(
            FrameLayer::Annotation,
            TextPrimitive::new(
                detail,
                plot.center_x(),
                plot.top + plot.height / 2.0 + 24.0,
                12.0,
                Color::MUTED,
                TextHAlign::Center,
            ),
        );
    }
    frame
}
