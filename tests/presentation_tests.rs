mod support;

use three_point_story::api::{Presentation, PresentationClick, PresentationConfig, PresentationSnapshot};
use three_point_story::chart::DATA_UNAVAILABLE;
use three_point_story::core::Viewport;
use three_point_story::data::{InMemorySource, SourceTable};
use three_point_story::interaction::{DatumRef, HitShape, HoverTarget, HoverTransition, ModalClick};
use three_point_story::render::{NullRenderer, SvgRenderer};
use three_point_story::scene::{DashboardSelect, NO_DATA_AVAILABLE, PLAYER_TABLE_GROUP};
use three_point_story::table::SortMetric;

fn center(target: &HoverTarget) -> (f64, f64) {
    match target.shape {
        HitShape::Circle { cx, cy, .. } => (cx, cy),
        HitShape::Rect {
            x,
            y,
            width,
            height,
        } => (x + width / 2.0, y + height / 2.0),
    }
}

type TestPresentation = Presentation<NullRenderer, InMemorySource>;

fn target_for(presentation: &TestPresentation, datum: DatumRef) -> HoverTarget {
    *presentation
        .view()
        .expect("scene drawn")
        .targets
        .iter()
        .find(|target| target.datum == datum)
        .expect("target registered")
}

#[test]
fn navigation_is_clamped_at_both_ends() {
    let mut presentation = support::presentation(support::full_source());
    presentation.start().expect("start");
    assert!(!presentation.controller().prev_enabled());
    assert!(presentation.prev().expect("prev").is_none());
    assert_eq!(presentation.controller().index(), 0);

    for expected in 1..=5 {
        let transition = presentation.next().expect("next").expect("advanced");
        assert_eq!(transition.to, expected);
        assert!(presentation.view().is_some(), "scene {expected} drawn");
    }
    assert!(presentation.next().expect("next").is_none());

    let controller = presentation.controller();
    assert_eq!(controller.index(), 5);
    assert_eq!(controller.progress_label(), "Slide 6 of 6");
    assert!(controller.prev_enabled());
    assert!(!controller.next_enabled());
}

#[test]
fn stale_load_is_never_drawn() {
    let mut presentation = support::presentation(support::full_source());
    let first = presentation.begin_start();
    let second = presentation.begin_next().expect("second scene");
    assert_ne!(first, second);

    let stale = presentation.load(first);
    assert!(!presentation.complete_load(first, stale).expect("complete"));
    assert!(presentation.view().is_none());
    assert!(!presentation.render().expect("render"));
    assert_eq!(presentation.renderer().frames_rendered, 0);

    let fresh = presentation.load(second);
    assert!(presentation.complete_load(second, fresh).expect("complete"));
    assert_eq!(presentation.view().map(|view| view.index), Some(1));

    // A duplicate completion for the same ticket is ignored.
    let again = presentation.load(second);
    assert!(!presentation.complete_load(second, again).expect("complete"));

    assert!(presentation.render().expect("render"));
    assert_eq!(presentation.renderer().frames_rendered, 1);
}

#[test]
fn annotation_updates_before_data_arrives() {
    let mut presentation = support::presentation(support::full_source());
    presentation.start().expect("start");
    let ticket = presentation.begin_next().expect("next");

    assert_eq!(presentation.annotation(), presentation.scenes()[1].narrative);
    assert!(presentation.view().is_none());
    assert_eq!(presentation.pending_load(), Some(ticket));
    assert!(presentation.snapshot().loading);
}

#[test]
fn missing_table_shows_placeholder_and_keeps_navigation() {
    let mut presentation =
        support::presentation(support::source_without(&[SourceTable::Suns]));
    presentation.start().expect("start");
    presentation.next().expect("next");
    presentation.next().expect("next");
    assert_eq!(presentation.controller().index(), 2);

    assert!(presentation.render().expect("render"));
    let texts = &presentation.renderer().last_texts;
    assert!(texts.iter().any(|text| text == DATA_UNAVAILABLE));
    assert!(texts.iter().any(|text| *text == presentation.scenes()[2].title));
    assert!(presentation.view().expect("view").targets.is_empty());

    assert!(presentation.next().expect("next").is_some());
    assert!(!presentation.view().expect("view").targets.is_empty());
    assert!(presentation.prev().expect("prev").is_some());
    assert_eq!(presentation.controller().index(), 2);
}

#[test]
fn hovering_a_point_shows_its_season() {
    let mut presentation = support::presentation(support::full_source());
    presentation.start().expect("start");

    let datum = DatumRef::new(0, 0);
    let (x, y) = center(&target_for(&presentation, datum));
    assert_eq!(presentation.pointer_move(x, y), HoverTransition::Entered(datum));
    assert_eq!(presentation.pointer_move(x + 0.5, y), HoverTransition::Moved(datum));

    let tooltip = presentation.interaction().tooltip().expect("tooltip");
    assert_eq!(tooltip.content.heading, "1980-81");
    assert!(
        tooltip
            .content
            .lines
            .iter()
            .any(|line| line.starts_with("3PA: "))
    );

    assert_eq!(presentation.pointer_leave(), HoverTransition::Left(datum));
    assert!(presentation.interaction().tooltip().is_none());
    assert!(presentation.snapshot().hovered.is_none());
}

fn dashboard() -> TestPresentation {
    let mut presentation = support::presentation(support::full_source());
    presentation.start().expect("start");
    for _ in 0..5 {
        presentation.next().expect("next");
    }
    presentation
}

#[test]
fn dashboard_selectors_rebuild_the_panels() {
    let mut presentation = dashboard();
    let state = presentation.dashboard_state().expect("dashboard");
    assert_eq!(state.player_year, Some(2025));
    assert_eq!(state.chart_year, Some(2020));
    assert_eq!(state.player_sort, SortMetric::ThreePointAttempts);
    let (player_years, chart_years) = presentation.dashboard_years().expect("years");
    assert_eq!(player_years, &[2024, 2025]);
    assert_eq!(chart_years, &[2020, 2021, 2022, 2024]);

    assert!(presentation.select(DashboardSelect::ChartYear(2021)).expect("select"));
    assert!(!presentation.select(DashboardSelect::ChartYear(1999)).expect("select"));
    assert_eq!(
        presentation.dashboard_state().and_then(|state| state.chart_year),
        Some(2021)
    );

    let view = presentation.view().and_then(|view| view.dashboard()).expect("panels");
    assert!(view.player_table.note.is_none());
    assert!(presentation
        .select(DashboardSelect::PlayerSort(SortMetric::ThreePointPct))
        .expect("select"));
    let view = presentation.view().and_then(|view| view.dashboard()).expect("panels");
    let note = view.player_table.note.as_deref().expect("volume note");
    assert!(note.starts_with("Note: Only players with 5+ 3PA per game"));
    let players: Vec<&str> = view
        .player_table
        .rows
        .iter()
        .map(|row| row.entity.as_str())
        .collect();
    assert_eq!(players, vec!["Stephen Curry", "Traded Player", "Luka Doncic"]);
}

#[test]
fn selection_is_ignored_outside_the_dashboard() {
    let mut presentation = support::presentation(support::full_source());
    presentation.start().expect("start");
    assert!(presentation.dashboard_state().is_none());
    assert!(!presentation.select(DashboardSelect::ChartYear(2021)).expect("select"));
}

#[test]
fn clicking_a_player_row_opens_the_detail_modal() {
    let mut presentation = dashboard();
    let (x, y) = center(&target_for(&presentation, DatumRef::new(PLAYER_TABLE_GROUP, 0)));

    assert_eq!(presentation.click(x, y), PresentationClick::ModalOpened);
    let detail = presentation.modal().detail().expect("modal open");
    assert_eq!(detail.title, "Stephen Curry");
    assert_eq!(detail.value("Team"), Some("GSW"));
    assert_eq!(detail.value("Season"), Some("2025"));
    assert_eq!(detail.value("Games Played"), Some("70"));
    assert_eq!(detail.value("3P%"), Some("39.7%"));

    // Hover is suspended behind the modal.
    assert_eq!(presentation.pointer_move(x, y), HoverTransition::Idle);

    assert_eq!(
        presentation.click(1.0, 1.0),
        PresentationClick::Modal(ModalClick::Backdrop)
    );
    assert!(!presentation.modal().is_open());
}

#[test]
fn modal_opens_in_the_visible_part_of_a_scrolled_dashboard() {
    let mut presentation = dashboard();
    let layout_height = f64::from(presentation.config().viewport.height);
    let (x, y) = center(&target_for(&presentation, DatumRef::new(PLAYER_TABLE_GROUP, 0)));

    presentation.set_scroll_top(250.0);
    assert_eq!(presentation.click(x, y), PresentationClick::ModalOpened);
    let layout = presentation.modal().layout().expect("modal open");
    assert_eq!(layout.backdrop.y, 250.0);
    assert_eq!(layout.backdrop.height, layout_height);
    assert!(layout.content.y >= 250.0);
    assert!(layout.content.y + layout.content.height <= 250.0 + layout_height);
}

#[test]
fn clicks_outside_player_rows_are_ignored() {
    let mut presentation = support::presentation(support::full_source());
    presentation.start().expect("start");
    let (x, y) = center(&target_for(&presentation, DatumRef::new(0, 0)));
    assert_eq!(presentation.click(x, y), PresentationClick::Ignored);
    assert!(!presentation.modal().is_open());
}

#[test]
fn resize_redraws_at_the_new_width() {
    let mut presentation = support::presentation(support::full_source());
    presentation.start().expect("start");
    presentation.resize(Viewport::new(900, 400)).expect("resize");
    assert_eq!(
        presentation.view().map(|view| view.frame.viewport.width),
        Some(900)
    );
    assert!(presentation.resize(Viewport::new(0, 400)).is_err());
}

#[test]
fn snapshot_survives_json() {
    let mut presentation = dashboard();
    let (x, y) = center(&target_for(&presentation, DatumRef::new(PLAYER_TABLE_GROUP, 1)));
    presentation.click(x, y);

    let snapshot = presentation.snapshot();
    assert_eq!(snapshot.progress_label, "Slide 6 of 6");
    assert!(snapshot.modal.is_some());
    assert!(snapshot.dashboard.is_some());

    let json = snapshot.to_json_pretty().expect("serialize");
    let restored = PresentationSnapshot::from_json_str(&json).expect("parse");
    assert_eq!(restored, snapshot);
}

#[test]
fn svg_renderer_writes_paths_for_line_scenes() {
    let mut presentation = Presentation::new(
        SvgRenderer::new(),
        support::full_source(),
        PresentationConfig::default(),
    )
    .expect("presentation");
    presentation.start().expect("start");
    assert!(presentation.render().expect("render"));

    let document = presentation.renderer_mut().take_document();
    assert!(document.starts_with("<svg"));
    assert!(document.contains("<path"));
}

#[test]
fn league_without_seasons_in_range_renders_the_empty_state() {
    let league = "Season,Lg,FGA,3PA,3P%\n1975-76,NBA,90.0,1.0,0.250\n";
    let mut presentation =
        support::presentation(support::source_replacing(SourceTable::League, league));
    presentation.start().expect("start");

    assert!(presentation.render().expect("render"));
    let texts = &presentation.renderer().last_texts;
    assert!(texts.iter().any(|text| text == NO_DATA_AVAILABLE));
    assert!(presentation.view().expect("view").targets.is_empty());
}

#[test]
fn player_table_is_empty_when_nobody_meets_the_volume_floor() {
    let per_game = "season,player,team,x3pa_per_game,x3p_percent,x3p_per_game,g,mp_per_game
2025,Low Volume Guy,XYZ,2.0,0.500,1.0,40,12.0
2025,Luka Doncic,DAL,4.5,0.368,1.7,50,35.4
";
    let mut presentation =
        support::presentation(support::source_replacing(SourceTable::PlayerPerGame, per_game));
    presentation.start().expect("start");
    for _ in 0..5 {
        presentation.next().expect("next");
    }
    assert!(
        presentation
            .select(DashboardSelect::PlayerSort(SortMetric::ThreePointPct))
            .expect("select")
    );

    let view = presentation.view().expect("view");
    let table = &view.dashboard().expect("dashboard").player_table;
    assert!(table.rows.is_empty());
    assert_eq!(table.empty_message, "No player data available for 2025");

    assert!(presentation.render().expect("render"));
    let texts = &presentation.renderer().last_texts;
    assert!(texts.iter().any(|text| text == "No player data available for 2025"));
}

#[test]
fn teams_without_a_percentage_stay_off_the_dashboard() {
    let team_stats = "season,team,x3pa_per_game,x3p_percent,x3p_per_game
2021,No Pct Team,50.0,,18.0
2021,Utah Jazz,43.0,0.389,16.7
";
    let mut presentation =
        support::presentation(support::source_replacing(SourceTable::TeamStats, team_stats));
    presentation.start().expect("start");
    for _ in 0..5 {
        presentation.next().expect("next");
    }

    let view = presentation.view().expect("view").dashboard().expect("dashboard");
    let teams: Vec<&str> = view.team_table.rows.iter().map(|row| row.entity.as_str()).collect();
    assert_eq!(teams, ["Utah Jazz"]);
    let bars: Vec<&str> = view.bars.iter().map(|row| row.entity.as_str()).collect();
    assert_eq!(bars, ["Utah Jazz"]);
}
