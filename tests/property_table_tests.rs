use proptest::prelude::*;
use three_point_story::data::{Dataset, RowPredicate, SeasonRow, StatField, YearRange};
use three_point_story::table::{SortMetric, TableRequest, build_table};

fn team_rows() -> impl Strategy<Value = Vec<SeasonRow>> {
    prop::collection::vec(
        (
            2018i32..2024,
            0usize..12,
            prop::option::of(20.0f64..50.0),
            prop::option::of(0.30f64..0.42),
        ),
        0..60,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(year, team, attempts, pct)| {
                let mut row = SeasonRow::new(year, year.to_string()).with_team(format!("Team {team}"));
                if let Some(attempts) = attempts {
                    row = row.with_stat(StatField::ThreePointAttempts, attempts);
                }
                if let Some(pct) = pct {
                    row = row.with_stat(StatField::ThreePointPct, pct);
                }
                row
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn filtering_twice_equals_filtering_once(
        rows in team_rows(),
        start in 2018i32..2024,
        len in 0i32..6
    ) {
        let predicate = RowPredicate::years(YearRange::between(start, start + len))
            .requiring(&[StatField::ThreePointAttempts])
            .requiring_team();
        let once = Dataset::filter(&rows, &predicate);
        prop_assert_eq!(once.refilter(&predicate), once.clone());
        prop_assert!(once.rows().iter().all(|row| predicate.matches(row)));
    }

    #[test]
    fn leaderboard_is_sorted_bounded_and_unique(
        rows in team_rows(),
        top_n in 1usize..15,
        min_volume in 20.0f64..40.0
    ) {
        let request = TableRequest::new(SortMetric::ThreePointPct, top_n)
            .grouped_by_year()
            .with_min_volume(min_volume);
        let table = build_table(&rows, &request);

        let mut years: Vec<i32> = table.iter().map(|row| row.year).collect();
        years.dedup();
        let mut sorted_years = years.clone();
        sorted_years.sort_unstable();
        sorted_years.dedup();
        prop_assert_eq!(&years, &sorted_years);

        for year in years {
            let group: Vec<_> = table.iter().filter(|row| row.year == year).collect();
            prop_assert!(group.len() <= top_n);
            for (position, row) in group.iter().enumerate() {
                prop_assert_eq!(row.rank, position + 1);
                prop_assert!(row.attempts.is_some_and(|attempts| attempts >= min_volume));
            }
            for pair in group.windows(2) {
                match (pair[0].pct, pair[1].pct) {
                    (Some(a), Some(b)) => prop_assert!(a >= b),
                    (None, Some(_)) => prop_assert!(false, "missing value ranked first"),
                    _ => {}
                }
            }
            let mut names: Vec<&str> = group.iter().map(|row| row.entity.as_str()).collect();
            names.sort_unstable();
            let before = names.len();
            names.dedup();
            prop_assert_eq!(names.len(), before);
        }
    }
}
