use serde::{Deserialize, Serialize};

/// Draw layers of one frame, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameLayer {
    /// Era bands, table row backgrounds.
    Background,
    /// Axes, ticks, reference lines.
    Axis,
    /// Lines and bars.
    Series,
    /// Point markers.
    Markers,
    /// Titles, callouts, legends.
    Annotation,
    /// Tooltip and modal.
    Overlay,
}

impl FrameLayer {
    pub const ORDERED: [FrameLayer; 6] = [
        Self::Background,
        Self::Axis,
        Self::Series,
        Self::Markers,
        Self::Annotation,
        Self::Overlay,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Background => 0,
            Self::Axis => 1,
            Self::Series => 2,
            Self::Markers => 3,
            Self::Annotation => 4,
            Self::Overlay => 5,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Axis => "axis",
            Self::Series => "series",
            Self::Markers => "markers",
            Self::Annotation => "annotation",
            Self::Overlay => "overlay",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FrameLayer;

    #[test]
    fn ordered_layers_match_their_indices() {
        for (position, layer) in FrameLayer::ORDERED.iter().enumerate() {
            assert_eq!(layer.index(), position);
        }
    }
}
