use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{StoryError, StoryResult};
use crate::render::{
    CirclePrimitive, FrameLayer, LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive,
};

/// One drawable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line(LinePrimitive),
    Path(PathPrimitive),
    Circle(CirclePrimitive),
    Rect(RectPrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    pub fn validate(&self) -> StoryResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Path(path) => path.validate(),
            Self::Circle(circle) => circle.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Text(text) => text.validate(),
        }
    }
}

/// Primitive totals per kind, as exposed by snapshots and renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrimitiveCounts {
    pub lines: usize,
    pub paths: usize,
    pub circles: usize,
    pub rects: usize,
    pub texts: usize,
}

impl PrimitiveCounts {
    #[must_use]
    pub const fn total(self) -> usize {
        self.lines + self.paths + self.circles + self.rects + self.texts
    }
}

/// Scene-scoped visual container.
///
/// Everything a scene draws is appended here; a scene transition replaces
/// the whole frame. Primitives keep insertion order within their layer and
/// layers draw in [`FrameLayer::ORDERED`] order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    layers: [Vec<Primitive>; 6],
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layers: Default::default(),
        }
    }

    pub fn push(&mut self, layer: FrameLayer, primitive: Primitive) {
        self.layers[layer.index()].push(primitive);
    }

    pub fn push_line(&mut self, layer: FrameLayer, line: LinePrimitive) {
        self.push(layer, Primitive::Line(line));
    }

    pub fn push_path(&mut self, layer: FrameLayer, path: PathPrimitive) {
        self.push(layer, Primitive::Path(path));
    }

    pub fn push_circle(&mut self, layer: FrameLayer, circle: CirclePrimitive) {
        self.push(layer, Primitive::Circle(circle));
    }

    pub fn push_rect(&mut self, layer: FrameLayer, rect: RectPrimitive) {
        self.push(layer, Primitive::Rect(rect));
    }

    pub fn push_text(&mut self, layer: FrameLayer, text: TextPrimitive) {
        self.push(layer, Primitive::Text(text));
    }

    #[must_use]
    pub fn with_text(mut self, layer: FrameLayer, text: TextPrimitive) -> Self {
        self.push_text(layer, text);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, layer: FrameLayer, rect: RectPrimitive) -> Self {
        self.push_rect(layer, rect);
        self
    }

    /// Appends every primitive of `other`, layer by layer.
    pub fn extend(&mut self, other: RenderFrame) {
        for (target, source) in self.layers.iter_mut().zip(other.layers) {
            target.extend(source);
        }
    }

    /// Drops everything on `layer`.
    pub fn clear_layer(&mut self, layer: FrameLayer) {
        self.layers[layer.index()].clear();
    }

    #[must_use]
    pub fn layer(&self, layer: FrameLayer) -> &[Primitive] {
        &self.layers[layer.index()]
    }

    pub fn layer_mut(&mut self, layer: FrameLayer) -> &mut Vec<Primitive> {
        &mut self.layers[layer.index()]
    }

    /// All primitives in draw order.
    pub fn primitives(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.layers.iter().flatten()
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> + '_ {
        self.primitives().filter_map(|primitive| match primitive {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }

    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|text| text.text.contains(needle))
    }

    #[must_use]
    pub fn counts(&self) -> PrimitiveCounts {
        let mut counts = PrimitiveCounts::default();
        for primitive in self.primitives() {
            match primitive {
                Primitive::Line(_) => counts.lines += 1,
                Primitive::Path(_) => counts.paths += 1,
                Primitive::Circle(_) => counts.circles += 1,
                Primitive::Rect(_) => counts.rects += 1,
                Primitive::Text(_) => counts.texts += 1,
            }
        }
        counts
    }

    pub fn validate(&self) -> StoryResult<()> {
        if !self.viewport.is_valid() {
            return Err(StoryError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for primitive in self.primitives() {
            primitive.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::{Primitive, RenderFrame};
    use crate::core::Viewport;
    use crate::render::{Color, FrameLayer, RectPrimitive, TextHAlign, TextPrimitive};

    #[test]
    fn layers_draw_bottom_to_top_regardless_of_push_order() {
        let mut frame = RenderFrame::new(Viewport::new(100, 100));
        frame.push_text(
            FrameLayer::Annotation,
            TextPrimitive::new("title", 1.0, 1.0, 12.0, Color::TEXT, TextHAlign::Left),
        );
        frame.push_rect(
            FrameLayer::Background,
            RectPrimitive::new(0.0, 0.0, 10.0, 10.0, Color::WHITE),
        );

        let order: Vec<bool> = frame
            .primitives()
            .map(|primitive| matches!(primitive, Primitive::Rect(_)))
            .collect();
        assert_eq!(order, vec![true, false]);
        assert_eq!(frame.counts().total(), 2);
    }
}
