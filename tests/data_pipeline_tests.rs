mod support;

use three_point_story::data::{
    DataSource, Dataset, InMemorySource, RawTable, RowPredicate, SourceTable, StatField, YearRange,
    load_all, normalize_table, player_rows,
};
use three_point_story::error::StoryError;
use three_point_story::scene::{ResolvedScene, resolve_scene, story};

fn resolved_chart(scene_index: usize) -> three_point_story::scene::ResolvedChart {
    let scenes = story();
    let scene = &scenes[scene_index];
    let tables = load_all(&support::full_source(), &scene.sources).expect("tables load");
    match resolve_scene(scene, &tables).expect("scene resolves") {
        ResolvedScene::Chart(chart) => chart,
        ResolvedScene::Dashboard(_) => panic!("scene {scene_index} should be a chart"),
    }
}

#[test]
fn league_scene_starts_at_1980_and_drops_unparseable_rows() {
    let chart = resolved_chart(0);
    let league = chart.dataset("league").expect("league dataset");

    assert_eq!(league.len(), 2024 - 1980 + 1);
    assert_eq!(league.rows()[0].season, "1980-81");
    assert!(league.find_season("1979-80").is_none());
    assert!(league.rows().iter().all(|row| row.season != "Total"));
}

#[test]
fn datasets_are_year_ordered() {
    let chart = resolved_chart(3);
    for key in ["warriors", "rockets", "league"] {
        let dataset = chart.dataset(key).expect("dataset");
        let years: Vec<i32> = dataset.rows().iter().map(|row| row.year).collect();
        assert_eq!(years, (2015..=2020).collect::<Vec<_>>(), "{key}");
    }
}

#[test]
fn two_point_attempts_are_derived_from_field_goal_attempts() {
    let chart = resolved_chart(1);
    let league = chart.dataset("league").expect("league dataset");
    assert_eq!(league.len(), 11);

    for row in league.rows() {
        let fga = row.get(StatField::FieldGoalAttempts).expect("fga");
        let three = row.get(StatField::ThreePointAttempts).expect("3pa");
        let two = row.get(StatField::TwoPointAttempts).expect("2pa");
        assert!((two - (fga - three)).abs() <= 1e-9);
    }
}

#[test]
fn derived_field_does_not_leak_into_other_scenes() {
    let chart = resolved_chart(0);
    let league = chart.dataset("league").expect("league dataset");
    assert!(league.rows().iter().all(|row| !row.has(StatField::TwoPointAttempts)));
}

#[test]
fn suns_rows_without_minutes_are_excluded() {
    let chart = resolved_chart(2);
    let suns = chart.dataset("suns").expect("suns dataset");
    assert!(suns.find_year(2001).is_none());
    assert_eq!(suns.len(), 10);
    assert_eq!(chart.dataset("league").expect("league").len(), 11);
}

#[test]
fn boom_scene_splits_current_and_baseline_windows() {
    let chart = resolved_chart(4);
    let current = chart.dataset("current").expect("current");
    let baseline = chart.dataset("baseline").expect("baseline");
    assert_eq!(current.distinct_years(), vec![2020, 2021, 2022, 2023, 2024]);
    assert_eq!(baseline.distinct_years(), vec![2000, 2001, 2002, 2003, 2004]);
    assert!(baseline.mean(StatField::TwoPointAttempts).is_some());
}

#[test]
fn filtering_is_idempotent() {
    let raw = RawTable::from_csv_str("league", &support::league_csv()).expect("csv");
    let rows = normalize_table(&raw, &SourceTable::League.mapping());
    let predicate = RowPredicate::years(YearRange::between(1990, 2000))
        .requiring(&[StatField::ThreePointAttempts, StatField::ThreePointPct]);

    let once = Dataset::filter(&rows, &predicate);
    let twice = once.refilter(&predicate);
    assert_eq!(once, twice);
}

#[test]
fn empty_dataset_has_no_mean() {
    let dataset = Dataset::filter(&[], &RowPredicate::years(YearRange::all()));
    assert!(dataset.is_empty());
    assert_eq!(dataset.mean(StatField::ThreePointAttempts), None);
    assert_eq!(dataset.extent(StatField::ThreePointAttempts), None);
}

#[test]
fn player_join_takes_first_per_game_match() {
    let shooting =
        RawTable::from_csv_str("player_shooting", support::PLAYER_SHOOTING_CSV).expect("csv");
    let per_game =
        RawTable::from_csv_str("player_per_game", support::PLAYER_PER_GAME_CSV).expect("csv");
    let rows = player_rows(&shooting, &per_game);

    let traded: Vec<_> = rows
        .iter()
        .filter(|row| row.player.as_deref() == Some("Traded Player"))
        .collect();
    assert_eq!(traded.len(), 2);
    assert!(traded.iter().all(|row| row.team.as_deref() == Some("TOT")));

    let unmatched = rows
        .iter()
        .find(|row| row.player.as_deref() == Some("Missing Per Game"))
        .expect("left join keeps unmatched shooting rows");
    assert!(!unmatched.has(StatField::ThreePointPct));
}

#[test]
fn in_memory_source_checks_schema_on_insert() {
    let err = InMemorySource::new()
        .with_csv(SourceTable::TeamStats, "season,team,x3pa_per_game\n2021,A,30.0\n")
        .expect_err("schema violation");
    assert!(matches!(err, StoryError::Schema { ref table, .. } if table == "team_stats"));
}

#[test]
fn missing_table_is_a_load_error() {
    let source = support::source_without(&[SourceTable::Rockets]);
    let err = source.load(SourceTable::Rockets).expect_err("missing table");
    assert!(matches!(err, StoryError::Load { .. }));

    let scenes = story();
    assert!(load_all(&source, &scenes[3].sources).is_err());
    assert!(load_all(&source, &scenes[2].sources).is_ok());
}

#[test]
fn first_scene_excludes_the_inaugural_season() {
    let raw = RawTable::from_csv_str(
        "league",
        "Season,FGA,3PA,3P%\n2015-16,84.6,24.1,.354\n1979-80,88.8,2.8,.280\n1994-95,81.5,10.1,.359\n",
    )
    .expect("csv");
    let scenes = story();
    let three_point_story::scene::SceneKind::Chart(chart) = &scenes[0].kind else {
        panic!("first scene is a chart");
    };
    let spec = &chart.datasets[0];
    let dataset = Dataset::filter(&normalize_table(&raw, &spec.mapping), &spec.predicate);

    let seasons: Vec<&str> = dataset.rows().iter().map(|row| row.season.as_str()).collect();
    assert_eq!(seasons, vec!["1994-95", "2015-16"]);
    let attempts = dataset.rows()[0]
        .get(StatField::ThreePointAttempts)
        .expect("3pa");
    assert!((attempts - 10.1).abs() <= 1e-9);
}
