use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Outer spacing between the viewport edge and the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(40.0, 120.0, 50.0, 60.0)
    }
}

/// Inner drawing region of a chart in absolute viewport pixels.
///
/// Scales map into `[left, left + width]` horizontally and
/// `[top + height, top]` vertically (larger values are drawn higher).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> StoryResult<Self> {
        if ![left, top, width, height].iter().all(|v| v.is_finite()) || width <= 0.0 || height <= 0.0
        {
            return Err(StoryError::InvalidData(
                "plot area must be finite with positive size".to_owned(),
            ));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    pub fn from_viewport(viewport: Viewport, margins: Margins) -> StoryResult<Self> {
        if !viewport.is_valid() {
            return Err(StoryError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Self::new(
            margins.left,
            margins.top,
            f64::from(viewport.width) - margins.left - margins.right,
            f64::from(viewport.height) - margins.top - margins.bottom,
        )
    }

    #[must_use]
    pub fn right(self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn x_range(self) -> (f64, f64) {
        (self.left, self.right())
    }

    /// Vertical pixel range ordered for value scales: bottom first.
    #[must_use]
    pub fn y_range(self) -> (f64, f64) {
        (self.bottom(), self.top)
    }

    #[must_use]
    pub fn center_x(self) -> f64 {
        self.left + self.width / 2.0
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        x >= self.left && x <= self.right() && y >= self.top && y <= self.bottom()
    }
}

/// One `(x, y)` sample in domain units (year, stat value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
