mod support;

use three_point_story::data::{
    Dataset, RawTable, RowPredicate, SeasonRow, SourceTable, StatField, YearRange,
    normalize_table, player_rows,
};
use three_point_story::table::{SortMetric, TableRequest, build_table};

fn team_dataset() -> Dataset {
    let raw = RawTable::from_csv_str("team_stats", support::TEAM_STATS_CSV).expect("csv");
    let rows = normalize_table(&raw, &SourceTable::TeamStats.mapping());
    Dataset::filter(
        &rows,
        &RowPredicate::years(YearRange::from(2020))
            .requiring(&[StatField::ThreePointAttempts])
            .requiring_team()
            .excluding_team("League Average")
            .excluding_team("League"),
    )
}

fn player_dataset() -> Dataset {
    let shooting =
        RawTable::from_csv_str("player_shooting", support::PLAYER_SHOOTING_CSV).expect("csv");
    let per_game =
        RawTable::from_csv_str("player_per_game", support::PLAYER_PER_GAME_CSV).expect("csv");
    Dataset::filter(
        &player_rows(&shooting, &per_game),
        &RowPredicate::years(YearRange::all())
            .requiring(&[StatField::ThreePointPct])
            .requiring_positive(StatField::ThreePointAttempts)
            .requiring_player(),
    )
}

fn entities(rows: &[three_point_story::table::TableRow]) -> Vec<&str> {
    rows.iter().map(|row| row.entity.as_str()).collect()
}

#[test]
fn team_accuracy_leaderboard_applies_minimum_volume() {
    let teams = team_dataset();
    let request = TableRequest::new(SortMetric::ThreePointPct, 5)
        .for_year(2021)
        .with_min_volume(30.0);
    let rows = build_table(teams.rows(), &request);

    // Ties (Jazz and Bucks at 38.9%) keep source order.
    assert_eq!(
        entities(&rows),
        vec![
            "LA Clippers",
            "Brooklyn Nets",
            "Utah Jazz",
            "Milwaukee Bucks",
            "Golden State Warriors",
        ]
    );
    assert_eq!(
        rows.iter().map(|row| row.rank).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5]
    );
    assert!(rows.iter().all(|row| row.attempts.unwrap_or(0.0) >= 30.0));
}

#[test]
fn volume_ranking_ignores_minimum_volume() {
    let teams = team_dataset();
    let request = TableRequest::new(SortMetric::ThreePointAttempts, 10)
        .for_year(2021)
        .with_min_volume(30.0);
    assert!(!request.volume_filter_applies());

    let rows = build_table(teams.rows(), &request);
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].entity, "Utah Jazz");
    assert_eq!(rows.last().map(|row| row.entity.as_str()), Some("Low Volume Club"));
}

#[test]
fn league_rows_never_reach_the_team_leaderboard() {
    let teams = team_dataset();
    let rows = build_table(
        teams.rows(),
        &TableRequest::new(SortMetric::ThreePointAttempts, 50),
    );
    assert!(
        rows.iter()
            .all(|row| row.entity != "League Average" && row.entity != "League")
    );
    assert!(rows.iter().all(|row| row.year >= 2020));
}

#[test]
fn grouped_table_ranks_each_year_separately() {
    let teams = team_dataset();
    let request = TableRequest::new(SortMetric::ThreePointMade, 5).grouped_by_year();
    let rows = build_table(teams.rows(), &request);

    let years: Vec<i32> = rows.iter().map(|row| row.year).collect();
    let mut sorted = years.clone();
    sorted.sort_unstable();
    assert_eq!(years, sorted);

    let in_2021: Vec<_> = rows.iter().filter(|row| row.year == 2021).collect();
    assert_eq!(in_2021.len(), 5);
    assert_eq!(in_2021[0].entity, "Utah Jazz");
    assert_eq!(in_2021[0].rank, 1);

    let in_2020: Vec<_> = rows.iter().filter(|row| row.year == 2020).collect();
    assert_eq!(in_2020.len(), 2);
    assert_eq!(in_2020[0].rank, 1);
    assert_eq!(in_2020[1].rank, 2);
}

#[test]
fn player_leaderboard_dedupes_by_player_and_year() {
    let players = player_dataset();
    let rows = build_table(
        players.rows(),
        &TableRequest::new(SortMetric::ThreePointAttempts, 10).for_year(2025),
    );
    assert_eq!(
        entities(&rows),
        vec!["Stephen Curry", "Luka Doncic", "Traded Player", "Low Volume Guy"]
    );
    assert_eq!(rows[2].team.as_deref(), Some("TOT"));
}

#[test]
fn player_accuracy_leaderboard_hides_low_volume_shooters() {
    let players = player_dataset();
    let rows = build_table(
        players.rows(),
        &TableRequest::new(SortMetric::ThreePointPct, 10)
            .for_year(2025)
            .with_min_volume(5.0),
    );
    assert_eq!(
        entities(&rows),
        vec!["Stephen Curry", "Traded Player", "Luka Doncic"]
    );
}

#[test]
fn rows_missing_the_metric_sort_last() {
    let rows = vec![
        SeasonRow::new(2021, "2021")
            .with_team("No Makes")
            .with_stat(StatField::ThreePointAttempts, 50.0),
        SeasonRow::new(2021, "2021")
            .with_team("Few Makes")
            .with_stat(StatField::ThreePointAttempts, 30.0)
            .with_stat(StatField::ThreePointMade, 10.0),
        SeasonRow::new(2021, "2021")
            .with_team("Many Makes")
            .with_stat(StatField::ThreePointAttempts, 40.0)
            .with_stat(StatField::ThreePointMade, 15.0),
    ];
    let table = build_table(&rows, &TableRequest::new(SortMetric::ThreePointMade, 3));
    assert_eq!(entities(&table), vec!["Many Makes", "Few Makes", "No Makes"]);
    assert_eq!(table[2].made, None);
}

#[test]
fn top_n_truncates_after_sorting() {
    let teams = team_dataset();
    let rows = build_table(
        teams.rows(),
        &TableRequest::new(SortMetric::ThreePointAttempts, 2).for_year(2021),
    );
    assert_eq!(entities(&rows), vec!["Utah Jazz", "Houston Rockets"]);
}
