use criterion::{Criterion, criterion_group, criterion_main};
use std::fmt::Write as _;
use std::hint::black_box;
use three_point_story::core::{LinearScale, monotone_x_path, path_length};
use three_point_story::data::{
    Dataset, RawTable, RowPredicate, SourceTable, StatField, YearRange, normalize_table,
};
use three_point_story::table::{SortMetric, TableRequest, build_table};

fn team_stats_csv(rows: usize) -> String {
    let mut csv = String::from("season,team,x3pa_per_game,x3p_percent,x3p_per_game\n");
    for i in 0..rows {
        let year = 1980 + (i % 45) as i32;
        let attempts = 5.0 + (i % 400) as f64 * 0.1;
        let _ = writeln!(
            csv,
            "{year},Team {},{attempts:.1},{:.3},{:.1}",
            i % 30,
            0.300 + (i % 120) as f64 * 0.001,
            attempts * 0.36
        );
    }
    csv
}

fn bench_normalize_and_filter_10k(c: &mut Criterion) {
    let raw = RawTable::from_csv_str("team_stats", &team_stats_csv(10_000)).expect("valid csv");
    let mapping = SourceTable::TeamStats.mapping();
    let predicate = RowPredicate::years(YearRange::from(2000))
        .requiring(&[StatField::ThreePointAttempts])
        .requiring_team();

    c.bench_function("normalize_filter_10k", |b| {
        b.iter(|| {
            let rows = normalize_table(black_box(&raw), black_box(&mapping));
            let _ = Dataset::filter(&rows, black_box(&predicate));
        })
    });
}

fn bench_grouped_leaderboard_10k(c: &mut Criterion) {
    let raw = RawTable::from_csv_str("team_stats", &team_stats_csv(10_000)).expect("valid csv");
    let rows = normalize_table(&raw, &SourceTable::TeamStats.mapping());
    let request = TableRequest::new(SortMetric::ThreePointPct, 5)
        .grouped_by_year()
        .with_min_volume(30.0);

    c.bench_function("grouped_leaderboard_10k", |b| {
        b.iter(|| {
            let _ = build_table(black_box(&rows), black_box(&request));
        })
    });
}

fn bench_monotone_curve_1k(c: &mut Criterion) {
    let x = LinearScale::new((0.0, 999.0), (60.0, 820.0)).expect("valid x scale");
    let y = LinearScale::new((-1.0, 1.0), (350.0, 40.0)).expect("valid y scale");
    let points: Vec<(f64, f64)> = (0..1_000)
        .map(|i| {
            let t = f64::from(i);
            (x.map(t), y.map((t * 0.05).sin()))
        })
        .collect();

    c.bench_function("monotone_curve_1k", |b| {
        b.iter(|| {
            let commands = monotone_x_path(black_box(&points));
            let _ = path_length(&commands);
        })
    });
}

criterion_group!(
    benches,
    bench_normalize_and_filter_10k,
    bench_grouped_leaderboard_10k,
    bench_monotone_curve_1k
);
criterion_main!(benches);
