//! GTK4 host window: navigation buttons, slide label, narrative text and a
//! drawing area painted through the cairo backend.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk4::prelude::*;
use tracing::warn;

use crate::api::{Presentation, PresentationConfig};
use crate::core::Viewport;
use crate::data::{CsvDirectorySource, DataSource};
use crate::render::CairoRenderer;
use crate::scene::DashboardSelect;
use crate::table::SortMetric;

pub type UiPresentation<S> = Rc<RefCell<Presentation<CairoRenderer, S>>>;

#[derive(Debug, Clone, Copy)]
enum Selector {
    PlayerYear,
    PlayerSort,
    TeamSort,
    ChartYear,
    ChartSort,
}

impl Selector {
    fn label(self) -> &'static str {
        match self {
            Self::PlayerYear => "Player year",
            Self::PlayerSort => "Player sort",
            Self::TeamSort => "Team sort",
            Self::ChartYear => "Chart year",
            Self::ChartSort => "Chart sort",
        }
    }

    /// Selector change for a combo entry id (a year or a metric code).
    fn select(self, id: &str) -> Option<DashboardSelect> {
        match self {
            Self::PlayerYear => id.parse().ok().map(DashboardSelect::PlayerYear),
            Self::ChartYear => id.parse().ok().map(DashboardSelect::ChartYear),
            Self::PlayerSort => SortMetric::from_code(id).map(DashboardSelect::PlayerSort),
            Self::TeamSort => SortMetric::from_code(id).map(DashboardSelect::TeamSort),
            Self::ChartSort => SortMetric::from_code(id).map(DashboardSelect::ChartSort),
        }
    }
}

/// Dashboard selector widgets.
#[derive(Clone)]
struct Selectors {
    player_year: gtk::ComboBoxText,
    player_sort: gtk::ComboBoxText,
    team_sort: gtk::ComboBoxText,
    chart_year: gtk::ComboBoxText,
    chart_sort: gtk::ComboBoxText,
}

impl Selectors {
    fn new() -> Self {
        Self {
            player_year: gtk::ComboBoxText::new(),
            player_sort: sort_combo(),
            team_sort: sort_combo(),
            chart_year: gtk::ComboBoxText::new(),
            chart_sort: sort_combo(),
        }
    }

    /// Rebuilds options and active entries from the presentation state.
    ///
    /// Runs while the presentation is borrowed, so the `changed` signals it
    /// raises are dropped by the handlers.
    fn sync<S: DataSource>(&self, presentation: &Presentation<CairoRenderer, S>) {
        let (Some(state), Some((player_years, chart_years))) =
            (presentation.dashboard_state(), presentation.dashboard_years())
        else {
            return;
        };
        fill_years(&self.player_year, player_years, state.player_year);
        fill_years(&self.chart_year, chart_years, state.chart_year);
        self.player_sort.set_active_id(Some(state.player_sort.code()));
        self.team_sort.set_active_id(Some(state.team_sort.code()));
        self.chart_sort.set_active_id(Some(state.chart_sort.code()));
    }
}

/// Widget handles refreshed after every state change.
#[derive(Clone)]
struct Controls {
    drawing_area: gtk::DrawingArea,
    progress: gtk::Label,
    narrative: gtk::Label,
    prev: gtk::Button,
    next: gtk::Button,
    dashboard_controls: gtk::Box,
    selectors: Selectors,
}

impl Controls {
    fn sync<S: DataSource>(&self, presentation: &Presentation<CairoRenderer, S>) {
        let controller = presentation.controller();
        self.progress.set_text(&controller.progress_label());
        self.prev.set_sensitive(controller.prev_enabled());
        self.next.set_sensitive(controller.next_enabled());
        self.narrative.set_text(presentation.annotation());
        self.dashboard_controls
            .set_visible(presentation.dashboard_state().is_some());
        self.selectors.sync(presentation);
        if let Some(view) = presentation.view() {
            let height = i32::try_from(view.frame.viewport.height).unwrap_or(i32::MAX);
            self.drawing_area.set_content_height(height);
        }
        self.drawing_area.queue_draw();
    }
}

/// Presentation embedded in a GTK widget tree.
pub struct GtkPresentationAdapter<S: DataSource + 'static> {
    presentation: UiPresentation<S>,
    root: gtk::Box,
}

impl<S: DataSource + 'static> GtkPresentationAdapter<S> {
    #[must_use]
    pub fn new(presentation: Presentation<CairoRenderer, S>) -> Self {
        let presentation = Rc::new(RefCell::new(presentation));
        let viewport = presentation.borrow().config().viewport;

        let drawing_area = gtk::DrawingArea::new();
        drawing_area.set_content_width(i32::try_from(viewport.width).unwrap_or(i32::MAX));
        drawing_area.set_content_height(i32::try_from(viewport.height).unwrap_or(i32::MAX));
        drawing_area.set_hexpand(true);

        let narrative = gtk::Label::new(None);
        narrative.set_wrap(true);
        narrative.set_xalign(0.0);

        let nav = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        let prev = gtk::Button::with_label("Previous");
        let next = gtk::Button::with_label("Next");
        let progress = gtk::Label::new(None);
        nav.append(&prev);
        nav.append(&progress);
        nav.append(&next);

        let dashboard_controls = gtk::Box::new(gtk::Orientation::Horizontal, 8);
        let selectors = Selectors::new();
        let controls = Controls {
            drawing_area: drawing_area.clone(),
            progress,
            narrative: narrative.clone(),
            prev: prev.clone(),
            next: next.clone(),
            dashboard_controls: dashboard_controls.clone(),
            selectors: selectors.clone(),
        };

        let bindings = [
            (Selector::PlayerYear, &selectors.player_year),
            (Selector::PlayerSort, &selectors.player_sort),
            (Selector::TeamSort, &selectors.team_sort),
            (Selector::ChartYear, &selectors.chart_year),
            (Selector::ChartSort, &selectors.chart_sort),
        ];
        for (selector, combo) in bindings {
            dashboard_controls.append(&gtk::Label::new(Some(selector.label())));
            dashboard_controls.append(combo);
            let presentation = Rc::clone(&presentation);
            let controls = controls.clone();
            combo.connect_changed(move |combo| {
                let Some(select) = combo.active_id().and_then(|id| selector.select(id.as_str())) else {
                    return;
                };
                if let Ok(mut presentation) = presentation.try_borrow_mut() {
                    if let Err(err) = presentation.select(select) {
                        warn!(error = %err, "dashboard redraw failed");
                    }
                    controls.sync(&presentation);
                }
            });
        }

        {
            let presentation = Rc::clone(&presentation);
            let controls = controls.clone();
            prev.connect_clicked(move |_| {
                if let Ok(mut presentation) = presentation.try_borrow_mut() {
                    if let Err(err) = presentation.prev() {
                        warn!(error = %err, "previous scene failed");
                    }
                    controls.sync(&presentation);
                }
            });
        }
        {
            let presentation = Rc::clone(&presentation);
            let controls = controls.clone();
            next.connect_clicked(move |_| {
                if let Ok(mut presentation) = presentation.try_borrow_mut() {
                    if let Err(err) = presentation.next() {
                        warn!(error = %err, "next scene failed");
                    }
                    controls.sync(&presentation);
                }
            });
        }

        drawing_area.set_draw_func({
            let presentation = Rc::clone(&presentation);
            move |_widget, context, width, _height| {
                let Ok(mut presentation) = presentation.try_borrow_mut() else {
                    return;
                };
                let Ok(width) = u32::try_from(width) else {
                    return;
                };
                // Height is owned by the scene (the dashboard grows taller).
                let current = presentation.config().viewport;
                if width > 0 && width != current.width {
                    if let Err(err) = presentation.resize(Viewport::new(width, current.height)) {
                        warn!(error = %err, width, "resize rejected");
                    }
                }
                if let Err(err) = presentation.render_on_cairo_context(context) {
                    warn!(error = %err, "scene draw failed");
                }
            }
        });

        attach_pointer(&drawing_area, &presentation, &controls);

        let scroller = gtk::ScrolledWindow::new();
        scroller.set_child(Some(&drawing_area));
        scroller.set_vexpand(true);
        {
            let presentation = Rc::clone(&presentation);
            scroller.vadjustment().connect_value_changed(move |adjustment| {
                if let Ok(mut presentation) = presentation.try_borrow_mut() {
                    presentation.set_scroll_top(adjustment.value());
                }
            });
        }

        let root = gtk::Box::new(gtk::Orientation::Vertical, 8);
        root.append(&nav);
        root.append(&narrative);
        root.append(&dashboard_controls);
        root.append(&scroller);

        if let Ok(mut ui) = presentation.try_borrow_mut() {
            if let Err(err) = ui.start() {
                warn!(error = %err, "first scene failed");
            }
            controls.sync(&ui);
        }

        Self { presentation, root }
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::Box {
        &self.root
    }

    #[must_use]
    pub fn presentation(&self) -> UiPresentation<S> {
        Rc::clone(&self.presentation)
    }
}

fn fill_years(combo: &gtk::ComboBoxText, years: &[i32], active: Option<i32>) {
    combo.remove_all();
    for year in years {
        let id = year.to_string();
        combo.append(Some(&id), &id);
    }
    if let Some(active) = active {
        combo.set_active_id(Some(&active.to_string()));
    }
}

fn sort_combo() -> gtk::ComboBoxText {
    let combo = gtk::ComboBoxText::new();
    for metric in SortMetric::ALL {
        combo.append(Some(metric.code()), metric.option_label());
    }
    combo.set_active_id(Some(SortMetric::default().code()));
    combo
}

fn attach_pointer<S: DataSource + 'static>(
    drawing_area: &gtk::DrawingArea,
    presentation: &UiPresentation<S>,
    controls: &Controls,
) {
    let motion = gtk::EventControllerMotion::new();
    {
        let presentation = Rc::clone(presentation);
        let drawing_area = drawing_area.clone();
        motion.connect_motion(move |_, x, y| {
            if let Ok(mut presentation) = presentation.try_borrow_mut() {
                presentation.pointer_move(x, y);
            }
            drawing_area.queue_draw();
        });
    }
    {
        let presentation = Rc::clone(presentation);
        let drawing_area = drawing_area.clone();
        motion.connect_leave(move |_| {
            if let Ok(mut presentation) = presentation.try_borrow_mut() {
                presentation.pointer_leave();
            }
            drawing_area.queue_draw();
        });
    }
    drawing_area.add_controller(motion);

    let click = gtk::GestureClick::new();
    {
        let presentation = Rc::clone(presentation);
        let controls = controls.clone();
        click.connect_pressed(move |_, _presses, x, y| {
            if let Ok(mut presentation) = presentation.try_borrow_mut() {
                presentation.click(x, y);
                controls.sync(&presentation);
            }
        });
    }
    drawing_area.add_controller(click);
}

/// Opens the presentation window over `config.data_dir` and runs the GTK
/// main loop.
pub fn run(config: PresentationConfig) -> gtk::glib::ExitCode {
    let app = gtk::Application::builder()
        .application_id("rs.three_point_story.presentation")
        .build();
    app.connect_activate(move |app| {
        let source = CsvDirectorySource::new(config.data_dir.clone());
        let renderer = match CairoRenderer::new(
            i32::try_from(config.viewport.width).unwrap_or(i32::MAX),
            i32::try_from(config.viewport.height).unwrap_or(i32::MAX),
        ) {
            Ok(renderer) => renderer,
            Err(err) => {
                warn!(error = %err, "failed to create cairo renderer");
                return;
            }
        };
        let presentation = match Presentation::new(renderer, source, config.clone()) {
            Ok(presentation) => presentation,
            Err(err) => {
                warn!(error = %err, "failed to create presentation");
                return;
            }
        };
        let adapter = GtkPresentationAdapter::new(presentation);
        let window = gtk::ApplicationWindow::builder()
            .application(app)
            .title("The Three-Point Revolution")
            .default_width(i32::try_from(config.viewport.width).unwrap_or(1160))
            .default_height(720)
            .child(adapter.widget())
            .build();
        window.present();
    });
    app.run_with_args::<&str>(&[])
}
