use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::Viewport;
use crate::data::{DataSource, LoadedTables, load_all};
use crate::error::{StoryError, StoryResult};
use crate::interaction::{
    HoverTransition, InteractionState, ModalClick, ModalState, OverlayPainter, hit_test,
};
#[cfg(feature = "cairo-backend")]
use crate::render::CairoContextRenderer;
use crate::render::{RenderFrame, Renderer};
use crate::scene::{
    DashboardSelect, DashboardState, LoadTicket, ResolvedScene, SceneConfig, SceneController,
    SceneTransition, SceneView, render_scene, resolve_scene, story_with, unavailable_scene,
};

use super::{PRESENTATION_SNAPSHOT_JSON_SCHEMA_V1, PresentationConfig, PresentationSnapshot};

/// Outcome of a click routed through [`Presentation::click`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationClick {
    /// Nothing clickable under the pointer.
    Ignored,
    /// A player row was clicked and its detail modal opened.
    ModalOpened,
    /// The click landed on the open modal (close control, backdrop or content).
    Modal(ModalClick),
}

/// Slide presentation over a data source, drawn by a renderer.
///
/// Scene entry is split in two halves so hosts can load data off the UI
/// thread: `begin_*` tears the previous scene down and returns a
/// [`LoadTicket`]; [`Presentation::complete_load`] draws the scene only if
/// that ticket is still current. The plain `start`/`next`/`prev` methods run
/// both halves synchronously.
pub struct Presentation<R: Renderer, S: DataSource> {
    renderer: R,
    source: S,
    config: PresentationConfig,
    scenes: Vec<SceneConfig>,
    controller: SceneController,
    interaction: InteractionState,
    overlay: OverlayPainter,
    modal: ModalState,
    scroll_top: f64,
    pending: Option<LoadTicket>,
    resolved: Option<ResolvedScene>,
    view: Option<SceneView>,
    annotation: String,
    dashboard: DashboardState,
    last_transition: Option<SceneTransition>,
}

impl<R: Renderer, S: DataSource> Presentation<R, S> {
    /// Presentation of the six story scenes.
    pub fn new(renderer: R, source: S, config: PresentationConfig) -> StoryResult<Self> {
        let scenes = story_with(config.leaderboards);
        Self::with_scenes(renderer, source, config, scenes)
    }

    /// Presentation of an arbitrary scene list.
    pub fn with_scenes(
        renderer: R,
        source: S,
        config: PresentationConfig,
        scenes: Vec<SceneConfig>,
    ) -> StoryResult<Self> {
        config.validate()?;
        if scenes.is_empty() {
            return Err(StoryError::InvalidData(
                "presentation needs at least one scene".to_owned(),
            ));
        }
        for scene in &scenes {
            scene.validate()?;
        }
        debug!(scenes = scenes.len(), "presentation created");

        let hover = config.hover_style();
        Ok(Self {
            renderer,
            source,
            controller: SceneController::new(scenes.len(), config.fade_ms),
            interaction: InteractionState::new(hover),
            overlay: OverlayPainter::new(config.viewport, hover),
            modal: ModalState::default(),
            scroll_top: 0.0,
            pending: None,
            resolved: None,
            view: None,
            annotation: String::new(),
            dashboard: DashboardState::default(),
            last_transition: None,
            config,
            scenes,
        })
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn config(&self) -> &PresentationConfig {
        &self.config
    }

    #[must_use]
    pub fn scenes(&self) -> &[SceneConfig] {
        &self.scenes
    }

    #[must_use]
    pub fn controller(&self) -> &SceneController {
        &self.controller
    }

    #[must_use]
    pub fn current_scene(&self) -> Option<&SceneConfig> {
        self.scenes.get(self.controller.index())
    }

    /// Drawn scene, `None` while its load is pending.
    #[must_use]
    pub fn view(&self) -> Option<&SceneView> {
        self.view.as_ref()
    }

    /// Narrative text of the current scene.
    #[must_use]
    pub fn annotation(&self) -> &str {
        &self.annotation
    }

    #[must_use]
    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    #[must_use]
    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    #[must_use]
    pub fn dashboard_state(&self) -> Option<DashboardState> {
        matches!(self.resolved, Some(ResolvedScene::Dashboard(_))).then_some(self.dashboard)
    }

    /// Years offered by the player and team-chart year selectors.
    #[must_use]
    pub fn dashboard_years(&self) -> Option<(&[i32], &[i32])> {
        match &self.resolved {
            Some(ResolvedScene::Dashboard(data)) => Some((data.player_years(), data.team_years())),
            _ => None,
        }
    }

    #[must_use]
    pub fn pending_load(&self) -> Option<LoadTicket> {
        self.pending
    }

    #[must_use]
    pub fn last_transition(&self) -> Option<SceneTransition> {
        self.last_transition
    }

    /// Enters the first scene and loads it.
    pub fn start(&mut self) -> StoryResult<SceneTransition> {
        let transition = self.controller.enter_current();
        self.enter(transition);
        self.load_pending()?;
        Ok(transition)
    }

    /// Advances one scene and loads it; `None` on the last scene.
    pub fn next(&mut self) -> StoryResult<Option<SceneTransition>> {
        let Some(transition) = self.controller.next() else {
            return Ok(None);
        };
        self.enter(transition);
        self.load_pending()?;
        Ok(Some(transition))
    }

    /// Goes back one scene and loads it; `None` on the first scene.
    pub fn prev(&mut self) -> StoryResult<Option<SceneTransition>> {
        let Some(transition) = self.controller.prev() else {
            return Ok(None);
        };
        self.enter(transition);
        self.load_pending()?;
        Ok(Some(transition))
    }

    /// Enters the current scene without loading it.
    pub fn begin_start(&mut self) -> LoadTicket {
        let transition = self.controller.enter_current();
        self.enter(transition)
    }

    pub fn begin_next(&mut self) -> Option<LoadTicket> {
        self.controller.next().map(|transition| self.enter(transition))
    }

    pub fn begin_prev(&mut self) -> Option<LoadTicket> {
        self.controller.prev().map(|transition| self.enter(transition))
    }

    /// Loads every source table the ticket's scene declares.
    pub fn load(&self, ticket: LoadTicket) -> StoryResult<LoadedTables> {
        let scene = self.scene_at(ticket.scene)?;
        load_all(&self.source, &scene.sources)
    }

    /// Draws the ticket's scene from `result`.
    ///
    /// Returns `Ok(false)` without touching any container when the ticket is
    /// stale. A failed load still draws: the scene shows its title over a
    /// "Data unavailable" placeholder.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: StoryResult<LoadedTables>,
    ) -> StoryResult<bool> {
        if !self.controller.accept(ticket) {
            return Ok(false);
        }
        if self.pending != Some(ticket) {
            trace!(scene = ticket.scene, "load already completed");
            return Ok(false);
        }
        self.pending = None;

        let Some(scene) = self.scenes.get(ticket.scene) else {
            return Err(StoryError::InvalidData(format!(
                "scene index {} out of range",
                ticket.scene
            )));
        };
        let layout = self.config.layout();
        let view = match result.and_then(|tables| resolve_scene(scene, &tables)) {
            Ok(resolved) => {
                if let ResolvedScene::Dashboard(data) = &resolved {
                    self.dashboard = DashboardState::initial(data);
                }
                let view = render_scene(
                    ticket.scene,
                    scene,
                    &resolved,
                    layout,
                    &self.dashboard,
                    self.config.hover_style(),
                )?;
                self.resolved = Some(resolved);
                view
            }
            Err(err) => {
                warn!(scene = ticket.scene, error = %err, "scene data unavailable");
                unavailable_scene(ticket.scene, scene, layout, Some(&err.to_string()))?
            }
        };
        self.install(view);
        Ok(true)
    }

    /// Routes pointer motion to the hover state machine. Hover is suspended
    /// while the modal is open.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> HoverTransition {
        if self.modal.is_open() {
            return HoverTransition::Idle;
        }
        let Some(view) = &self.view else {
            return HoverTransition::Idle;
        };
        self.interaction
            .on_pointer_move(x, y, &view.targets, &view.content, &mut self.overlay)
    }

    pub fn pointer_leave(&mut self) -> HoverTransition {
        self.interaction.on_pointer_leave(&mut self.overlay)
    }

    /// Opens the player detail modal from a player row, or routes the click
    /// to the open modal.
    pub fn click(&mut self, x: f64, y: f64) -> PresentationClick {
        if self.modal.is_open() {
            return PresentationClick::Modal(self.modal.on_click(x, y));
        }
        let Some(view) = &self.view else {
            return PresentationClick::Ignored;
        };
        let Some(ResolvedScene::Dashboard(data)) = &self.resolved else {
            return PresentationClick::Ignored;
        };
        let Some(row) = hit_test(&view.targets, x, y)
            .and_then(|target| view.dashboard()?.clicked_player(target.datum))
        else {
            return PresentationClick::Ignored;
        };

        debug!(player = row.entity.as_str(), year = row.year, "opening player detail");
        let detail = data.player_detail(row);
        self.modal.open_at(detail, self.config.viewport, self.scroll_top);
        PresentationClick::ModalOpened
    }

    /// Records how far a scrolling host has moved the frame, in pixels.
    ///
    /// Modals open centered in the layout viewport at this offset.
    pub fn set_scroll_top(&mut self, top: f64) {
        self.scroll_top = if top.is_finite() { top.max(0.0) } else { 0.0 };
    }

    /// Applies a dashboard selector change and redraws the dashboard.
    ///
    /// Returns `Ok(false)` when the current scene is not the dashboard or
    /// the selection did not change anything.
    pub fn select(&mut self, select: DashboardSelect) -> StoryResult<bool> {
        let Some(ResolvedScene::Dashboard(data)) = &self.resolved else {
            return Ok(false);
        };
        if !self.dashboard.apply(select, data) {
            return Ok(false);
        }
        debug!(?select, "dashboard selection changed");
        self.modal.close();
        self.redraw()?;
        Ok(true)
    }

    /// Changes the layout viewport and redraws the current scene.
    pub fn resize(&mut self, viewport: Viewport) -> StoryResult<()> {
        let mut config = self.config.clone();
        config.viewport = viewport;
        config.validate()?;
        self.config = config;
        self.modal.close();
        self.redraw()
    }

    /// Scene frame with the hover overlay and the modal composed on top.
    #[must_use]
    pub fn compose_frame(&self) -> Option<RenderFrame> {
        let view = self.view.as_ref()?;
        let mut frame = view.frame.clone();
        frame.extend(self.overlay.overlay().clone());
        self.modal.draw(&mut frame);
        Some(frame)
    }

    /// Hands the composed frame to the renderer. Nothing is drawn while the
    /// current scene is still loading.
    pub fn render(&mut self) -> StoryResult<bool> {
        let Some(frame) = self.compose_frame() else {
            trace!(scene = self.controller.index(), "render skipped while loading");
            return Ok(false);
        };
        self.renderer.render(&frame)?;
        Ok(true)
    }

    /// Draws the composed frame into an external cairo context (GTK draw
    /// callbacks). Nothing is drawn while the current scene is loading.
    #[cfg(feature = "cairo-backend")]
    pub fn render_on_cairo_context(&mut self, context: &cairo::Context) -> StoryResult<bool>
    where
        R: CairoContextRenderer,
    {
        let Some(frame) = self.compose_frame() else {
            return Ok(false);
        };
        self.renderer.render_on_cairo_context(context, &frame)?;
        Ok(true)
    }

    #[must_use]
    pub fn snapshot(&self) -> PresentationSnapshot {
        let title = self
            .current_scene()
            .map_or_else(String::new, |scene| scene.title.clone());
        PresentationSnapshot {
            schema_version: PRESENTATION_SNAPSHOT_JSON_SCHEMA_V1,
            scene_index: self.controller.index(),
            scene_count: self.controller.scene_count(),
            title,
            progress_label: self.controller.progress_label(),
            prev_enabled: self.controller.prev_enabled(),
            next_enabled: self.controller.next_enabled(),
            generation: self.controller.generation(),
            loading: self.pending.is_some(),
            annotation: self.annotation.clone(),
            primitives: self
                .compose_frame()
                .map(|frame| frame.counts())
                .unwrap_or_default(),
            hover_targets: self.view.as_ref().map_or(0, |view| view.targets.len()),
            hovered: self.interaction.hovered(),
            tooltip: self
                .interaction
                .tooltip()
                .map(|tooltip| tooltip.content.clone()),
            modal: self.modal.detail().cloned(),
            dashboard: self.dashboard_state(),
        }
    }

    fn scene_at(&self, index: usize) -> StoryResult<&SceneConfig> {
        self.scenes
            .get(index)
            .ok_or_else(|| StoryError::InvalidData(format!("scene index {index} out of range")))
    }

    /// Clears the visual and annotation containers, then sets the new
    /// scene's narrative and a pending ticket.
    fn enter(&mut self, transition: SceneTransition) -> LoadTicket {
        self.view = None;
        self.resolved = None;
        self.interaction.reset();
        self.overlay.clear();
        self.modal.close();
        self.annotation = self
            .scenes
            .get(transition.to)
            .map_or_else(String::new, |scene| scene.narrative.clone());

        let ticket = self.controller.ticket();
        self.pending = Some(ticket);
        self.last_transition = Some(transition);
        debug!(
            from = ?transition.from,
            to = transition.to,
            generation = transition.generation,
            "scene load started"
        );
        ticket
    }

    fn load_pending(&mut self) -> StoryResult<()> {
        if let Some(ticket) = self.pending {
            let result = self.load(ticket);
            self.complete_load(ticket, result)?;
        }
        Ok(())
    }

    fn redraw(&mut self) -> StoryResult<()> {
        let index = self.controller.index();
        let (Some(resolved), Some(scene)) = (&self.resolved, self.scenes.get(index)) else {
            return Ok(());
        };
        let view = render_scene(
            index,
            scene,
            resolved,
            self.config.layout(),
            &self.dashboard,
            self.config.hover_style(),
        )?;
        self.install(view);
        Ok(())
    }

    fn install(&mut self, view: SceneView) {
        self.interaction.reset();
        self.overlay.set_viewport(view.frame.viewport);
        self.view = Some(view);
    }
}
