//! Backend-agnostic drawing model.
//!
//! Charts produce a [`RenderFrame`] of plain primitives; backends turn the
//! frame into pixels or markup and never see chart or data types.

mod frame;
mod layer;
mod null_renderer;
mod primitives;
mod svg;

pub use frame::{Primitive, PrimitiveCounts, RenderFrame};
pub use layer::FrameLayer;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Animation, CirclePrimitive, Color, LinePrimitive, PathPrimitive, RectPrimitive, StrokeDash,
    TextHAlign, TextPrimitive, estimate_text_width,
};
pub use svg::SvgRenderer;

use crate::error::StoryResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized `RenderFrame`, so drawing code stays
/// isolated from datasets, scenes and interaction state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> StoryResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoContextRenderer, CairoRenderStats, CairoRenderer};
