use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Points back at the datum a primitive was drawn from.
///
/// `group` is the series (or chart) index within the scene and `index` the
/// row position inside that group's dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatumRef {
    pub group: usize,
    pub index: usize,
}

impl DatumRef {
    #[must_use]
    pub const fn new(group: usize, index: usize) -> Self {
        Self { group, index }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HitShape {
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl HitShape {
    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        match self {
            Self::Circle { cx, cy, radius } => (x - cx).hypot(y - cy) <= radius,
            Self::Rect {
                x: left,
                y: top,
                width,
                height,
            } => x >= left && x <= left + width && y >= top && y <= top + height,
        }
    }

    /// Circles scaled around their center; rectangles are unchanged.
    #[must_use]
    pub fn grown(self, factor: f64) -> Self {
        match self {
            Self::Circle { cx, cy, radius } => Self::Circle {
                cx,
                cy,
                radius: radius * factor,
            },
            rect @ Self::Rect { .. } => rect,
        }
    }
}

/// How a hovered target is emphasized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    /// Marker redrawn with a grown radius.
    GrowPoint,
    /// Bar redrawn fully opaque.
    OpaqueBar,
    /// Background tint behind a table row's text.
    RowBackground,
}

/// A hoverable primitive registered by a chart or table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverTarget {
    pub shape: HitShape,
    pub datum: DatumRef,
    pub fill: Color,
    pub highlight: Highlight,
}

impl HoverTarget {
    #[must_use]
    pub const fn point(cx: f64, cy: f64, radius: f64, fill: Color, datum: DatumRef) -> Self {
        Self {
            shape: HitShape::Circle { cx, cy, radius },
            datum,
            fill,
            highlight: Highlight::GrowPoint,
        }
    }

    #[must_use]
    pub const fn bar(x: f64, y: f64, width: f64, height: f64, fill: Color, datum: DatumRef) -> Self {
        Self {
            shape: HitShape::Rect {
                x,
                y,
                width,
                height,
            },
            datum,
            fill,
            highlight: Highlight::OpaqueBar,
        }
    }

    /// Table row; `fill` is the hover tint.
    #[must_use]
    pub const fn row(x: f64, y: f64, width: f64, height: f64, fill: Color, datum: DatumRef) -> Self {
        Self {
            shape: HitShape::Rect {
                x,
                y,
                width,
                height,
            },
            datum,
            fill,
            highlight: Highlight::RowBackground,
        }
    }
}

/// Topmost target under the pointer. Later targets are drawn above earlier
/// ones, so the search runs back to front.
#[must_use]
pub fn hit_test(targets: &[HoverTarget], x: f64, y: f64) -> Option<&HoverTarget> {
    targets.iter().rev().find(|target| target.shape.contains(x, y))
}
