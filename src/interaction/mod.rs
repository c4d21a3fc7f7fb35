//! Interaction Layer: hover targets, the enter/move/leave state machine,
//! tooltips and the detail modal.

mod hit;
mod modal;
mod tooltip;

pub use hit::{DatumRef, Highlight, HitShape, HoverTarget, hit_test};
pub use modal::{ModalClick, ModalDetail, ModalLayout, ModalState};
pub use tooltip::{Tooltip, TooltipContent, TooltipProvider};

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::Viewport;
use crate::render::{CirclePrimitive, FrameLayer, RectPrimitive, RenderFrame};

/// Hover affordance tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverStyle {
    /// Tooltip position relative to the pointer.
    pub tooltip_offset: (f64, f64),
    /// Point radius multiplier while hovered.
    pub grow_factor: f64,
    /// Bar opacity at rest; hovered bars are fully opaque.
    pub bar_rest_opacity: f64,
}

impl Default for HoverStyle {
    fn default() -> Self {
        Self {
            tooltip_offset: (10.0, -28.0),
            grow_factor: 1.5,
            bar_rest_opacity: 0.8,
        }
    }
}

/// Backend capability receiving hover state transitions.
///
/// `tooltip` is `None` for targets whose provider has no content (table rows).
pub trait HoverHandler {
    fn hover_enter(&mut self, target: &HoverTarget, tooltip: Option<&Tooltip>);
    fn hover_move(&mut self, target: &HoverTarget, tooltip: Option<&Tooltip>);
    fn hover_leave(&mut self, target: &HoverTarget);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverTransition {
    Idle,
    Entered(DatumRef),
    Moved(DatumRef),
    Left(DatumRef),
    Switched { from: DatumRef, to: DatumRef },
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveHover {
    target: HoverTarget,
    tooltip: Option<Tooltip>,
}

/// Hover state for the current scene.
///
/// At most one target is hovered. Leaving a target always restores it before
/// another one is entered.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionState {
    style: HoverStyle,
    cursor: Option<(f64, f64)>,
    active: Option<ActiveHover>,
}

impl InteractionState {
    #[must_use]
    pub fn new(style: HoverStyle) -> Self {
        Self {
            style,
            cursor: None,
            active: None,
        }
    }

    #[must_use]
    pub fn style(&self) -> HoverStyle {
        self.style
    }

    #[must_use]
    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    #[must_use]
    pub fn hovered(&self) -> Option<DatumRef> {
        self.active.as_ref().map(|active| active.target.datum)
    }

    #[must_use]
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.active.as_ref().and_then(|active| active.tooltip.as_ref())
    }

    pub fn on_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        targets: &[HoverTarget],
        provider: &dyn TooltipProvider,
        handler: &mut dyn HoverHandler,
    ) -> HoverTransition {
        self.cursor = Some((x, y));
        let offset = self.style.tooltip_offset;

        if let Some(active) = &mut self.active {
            // The grown marker still counts as the hovered area.
            if active.target.shape.grown(self.style.grow_factor).contains(x, y) {
                if let Some(tooltip) = &mut active.tooltip {
                    tooltip.follow((x, y), offset);
                }
                handler.hover_move(&active.target, active.tooltip.as_ref());
                return HoverTransition::Moved(active.target.datum);
            }
        }

        let left = self.active.take().map(|active| {
            handler.hover_leave(&active.target);
            active.target.datum
        });

        let entered = hit_test(targets, x, y).map(|target| {
            // Content is built here, once per enter.
            let tooltip = provider
                .tooltip_content(target.datum)
                .map(|content| Tooltip::new(target.datum, content, (x, y), offset));
            handler.hover_enter(target, tooltip.as_ref());
            self.active = Some(ActiveHover {
                target: *target,
                tooltip,
            });
            target.datum
        });

        let transition = match (left, entered) {
            (Some(from), Some(to)) => HoverTransition::Switched { from, to },
            (Some(from), None) => HoverTransition::Left(from),
            (None, Some(to)) => HoverTransition::Entered(to),
            (None, None) => HoverTransition::Idle,
        };
        if transition != HoverTransition::Idle {
            trace!(?transition, x, y, "hover transition");
        }
        transition
    }

    pub fn on_pointer_leave(&mut self, handler: &mut dyn HoverHandler) -> HoverTransition {
        self.cursor = None;
        match self.active.take() {
            Some(active) => {
                handler.hover_leave(&active.target);
                HoverTransition::Left(active.target.datum)
            }
            None => HoverTransition::Idle,
        }
    }

    /// Forgets hover state without callbacks; used when the scene container
    /// is torn down.
    pub fn reset(&mut self) {
        self.cursor = None;
        self.active = None;
    }
}

/// Hover handler that paints highlight and tooltip into an overlay frame
/// composed on top of the scene frame.
#[derive(Debug, Clone)]
pub struct OverlayPainter {
    style: HoverStyle,
    overlay: RenderFrame,
}

impl OverlayPainter {
    #[must_use]
    pub fn new(viewport: Viewport, style: HoverStyle) -> Self {
        Self {
            style,
            overlay: RenderFrame::new(viewport),
        }
    }

    #[must_use]
    pub fn overlay(&self) -> &RenderFrame {
        &self.overlay
    }

    pub fn clear(&mut self) {
        self.overlay.clear_layer(FrameLayer::Background);
        self.overlay.clear_layer(FrameLayer::Overlay);
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.overlay = RenderFrame::new(viewport);
    }

    fn paint(&mut self, target: &HoverTarget, tooltip: Option<&Tooltip>) {
        self.clear();
        let layer = match target.highlight {
            Highlight::RowBackground => FrameLayer::Background,
            Highlight::GrowPoint | Highlight::OpaqueBar => FrameLayer::Overlay,
        };
        match target.shape.grown(self.style.grow_factor) {
            HitShape::Circle { cx, cy, radius } => self
                .overlay
                .push_circle(layer, CirclePrimitive::new(cx, cy, radius, target.fill)),
            HitShape::Rect {
                x,
                y,
                width,
                height,
            } => self
                .overlay
                .push_rect(layer, RectPrimitive::new(x, y, width, height, target.fill)),
        }
        if let Some(tooltip) = tooltip {
            let viewport = self.overlay.viewport;
            tooltip.draw(&mut self.overlay, viewport);
        }
    }
}

impl HoverHandler for OverlayPainter {
    fn hover_enter(&mut self, target: &HoverTarget, tooltip: Option<&Tooltip>) {
        self.paint(target, tooltip);
    }

    fn hover_move(&mut self, target: &HoverTarget, tooltip: Option<&Tooltip>) {
        self.paint(target, tooltip);
    }

    fn hover_leave(&mut self, _target: &HoverTarget) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DatumRef, HoverStyle, HoverTarget, HoverTransition, InteractionState, OverlayPainter,
        TooltipContent, TooltipProvider,
    };
    use crate::core::Viewport;
    use crate::render::{Color, FrameLayer, Primitive};
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingProvider {
        calls: Cell<usize>,
    }

    impl TooltipProvider for CountingProvider {
        fn tooltip_content(&self, datum: DatumRef) -> Option<TooltipContent> {
            self.calls.set(self.calls.get() + 1);
            Some(TooltipContent::new(format!("row {}", datum.index)))
        }
    }

    #[test]
    fn enter_move_leave_cycle_restores_the_overlay() {
        let targets = [HoverTarget::point(
            100.0,
            100.0,
            4.0,
            Color::WHITE,
            DatumRef::new(0, 3),
        )];
        let provider = CountingProvider::default();
        let mut painter = OverlayPainter::new(Viewport::new(400, 300), HoverStyle::default());
        let mut state = InteractionState::new(HoverStyle::default());

        let entered = state.on_pointer_move(101.0, 100.0, &targets, &provider, &mut painter);
        assert_eq!(entered, HoverTransition::Entered(DatumRef::new(0, 3)));
        let grown = painter
            .overlay()
            .layer(FrameLayer::Overlay)
            .iter()
            .find_map(|primitive| match primitive {
                Primitive::Circle(circle) => Some(circle.radius),
                _ => None,
            })
            .expect("highlight");
        assert!((grown - 6.0).abs() <= 1e-9);

        // Inside the grown radius but outside the base radius.
        let moved = state.on_pointer_move(105.0, 100.0, &targets, &provider, &mut painter);
        assert_eq!(moved, HoverTransition::Moved(DatumRef::new(0, 3)));
        let tooltip = state.tooltip().expect("tooltip");
        assert!((tooltip.x - 115.0).abs() <= 1e-9);
        assert!((tooltip.y - 72.0).abs() <= 1e-9);
        assert_eq!(provider.calls.get(), 1);

        let left = state.on_pointer_move(300.0, 250.0, &targets, &provider, &mut painter);
        assert_eq!(left, HoverTransition::Left(DatumRef::new(0, 3)));
        assert!(painter.overlay().is_empty());
        assert!(state.tooltip().is_none());
    }
}
