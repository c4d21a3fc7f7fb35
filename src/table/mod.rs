//! Table/Panel Builder: ranked leaderboards for the dashboard scene.

mod view;

pub use view::{TableColumns, TableView};

use std::cmp::Ordering;

use indexmap::{IndexMap, IndexSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::{SeasonRow, StatField};

/// Metric a leaderboard is ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMetric {
    ThreePointAttempts,
    ThreePointPct,
    ThreePointMade,
}

impl SortMetric {
    pub const ALL: [SortMetric; 3] = [
        Self::ThreePointAttempts,
        Self::ThreePointPct,
        Self::ThreePointMade,
    ];

    #[must_use]
    pub const fn field(self) -> StatField {
        match self {
            Self::ThreePointAttempts => StatField::ThreePointAttempts,
            Self::ThreePointPct => StatField::ThreePointPct,
            Self::ThreePointMade => StatField::ThreePointMade,
        }
    }

    /// Short code used in selectors and titles (`3PA`, `3P%`, `3PM`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        self.field().short_label()
    }

    /// Selector option text.
    #[must_use]
    pub const fn option_label(self) -> &'static str {
        match self {
            Self::ThreePointAttempts => "3PA (Volume)",
            Self::ThreePointPct => "3P% (Accuracy)",
            Self::ThreePointMade => "3PM (Makes)",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.code() == code)
    }

    #[must_use]
    pub const fn is_rate(self) -> bool {
        self.field().is_rate()
    }
}

impl Default for SortMetric {
    fn default() -> Self {
        Self::ThreePointAttempts
    }
}

/// Parameters of one leaderboard build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRequest {
    /// Restrict to one season year.
    pub year: Option<i32>,
    /// Rank within each year separately (years ascending).
    pub group_by_year: bool,
    pub metric: SortMetric,
    pub top_n: usize,
    /// Minimum 3PA applied only when ranking by a rate metric.
    pub min_volume: Option<f64>,
}

impl TableRequest {
    #[must_use]
    pub fn new(metric: SortMetric, top_n: usize) -> Self {
        Self {
            year: None,
            group_by_year: false,
            metric,
            top_n,
            min_volume: None,
        }
    }

    #[must_use]
    pub fn for_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn grouped_by_year(mut self) -> Self {
        self.group_by_year = true;
        self
    }

    #[must_use]
    pub fn with_min_volume(mut self, min_volume: f64) -> Self {
        self.min_volume = Some(min_volume);
        self
    }

    /// Whether the minimum-volume filter is in effect for this request.
    #[must_use]
    pub fn volume_filter_applies(&self) -> bool {
        self.metric.is_rate() && self.min_volume.is_some()
    }
}

/// One ranked leaderboard line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// 1-based rank within the row's group.
    pub rank: usize,
    pub entity: String,
    pub team: Option<String>,
    pub year: i32,
    pub season: String,
    pub attempts: Option<f64>,
    pub pct: Option<f64>,
    pub made: Option<f64>,
    /// Position of the originating row in the input slice.
    pub source_index: usize,
}

impl TableRow {
    fn from_season_row(rank: usize, source_index: usize, row: &SeasonRow) -> Self {
        Self {
            rank,
            entity: row.entity_name().to_owned(),
            team: row.team.clone(),
            year: row.year,
            season: row.season.clone(),
            attempts: row.get(StatField::ThreePointAttempts),
            pct: row.get(StatField::ThreePointPct),
            made: row.get(StatField::ThreePointMade),
            source_index,
        }
    }

    #[must_use]
    pub fn metric(&self, metric: SortMetric) -> Option<f64> {
        match metric {
            SortMetric::ThreePointAttempts => self.attempts,
            SortMetric::ThreePointPct => self.pct,
            SortMetric::ThreePointMade => self.made,
        }
    }
}

/// Ranks `rows` per `request`.
///
/// Repeated `(entity, year)` pairs keep their first occurrence. Sorting is
/// descending and stable; rows missing the metric sort last. With
/// `group_by_year` every year is ranked on its own and groups come out in
/// ascending year order.
#[must_use]
pub fn build_table(rows: &[SeasonRow], request: &TableRequest) -> Vec<TableRow> {
    let field = request.metric.field();
    let mut seen: IndexSet<(&str, i32)> = IndexSet::new();
    let mut groups: IndexMap<i32, Vec<(usize, &SeasonRow)>> = IndexMap::new();

    for (index, row) in rows.iter().enumerate() {
        if request.year.is_some_and(|year| row.year != year) {
            continue;
        }
        if !seen.insert((row.entity_name(), row.year)) {
            continue;
        }
        if let Some(min) = request.min_volume.filter(|_| request.metric.is_rate()) {
            let volume = row.get(StatField::ThreePointAttempts).unwrap_or(0.0);
            if volume < min {
                continue;
            }
        }
        let key = if request.group_by_year { row.year } else { 0 };
        groups.entry(key).or_default().push((index, row));
    }
    groups.sort_keys();

    let mut table = Vec::new();
    for (_, mut group) in groups {
        group.sort_by(|(_, a), (_, b)| descending_missing_last(a.get(field), b.get(field)));
        table.extend(
            group
                .into_iter()
                .take(request.top_n)
                .enumerate()
                .map(|(position, (index, row))| TableRow::from_season_row(position + 1, index, row)),
        );
    }

    debug!(
        input_rows = rows.len(),
        output_rows = table.len(),
        metric = request.metric.code(),
        year = request.year,
        "built leaderboard"
    );
    table
}

fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => OrderedFloat(b).cmp(&OrderedFloat(a)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::{SortMetric, TableRequest, build_table};
    use crate::data::{SeasonRow, StatField};

    fn team(name: &str, year: i32, attempts: f64, pct: Option<f64>) -> SeasonRow {
        let row = SeasonRow::new(year, format!("{year}-{:02}", (year + 1) % 100))
            .with_team(name)
            .with_stat(StatField::ThreePointAttempts, attempts);
        match pct {
            Some(pct) => row.with_stat(StatField::ThreePointPct, pct),
            None => row,
        }
    }

    #[test]
    fn missing_metric_sorts_last_and_ties_keep_source_order() {
        let rows = vec![
            team("A", 2021, 30.0, None),
            team("B", 2021, 31.0, Some(0.35)),
            team("C", 2021, 32.0, Some(0.35)),
        ];
        let table = build_table(&rows, &TableRequest::new(SortMetric::ThreePointPct, 5));
        let names: Vec<&str> = table.iter().map(|row| row.entity.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert_eq!(table[2].rank, 3);
    }

    #[test]
    fn groups_rank_independently_in_year_order() {
        let rows = vec![
            team("A", 2022, 40.0, None),
            team("B", 2021, 35.0, None),
            team("C", 2022, 41.0, None),
        ];
        let table = build_table(
            &rows,
            &TableRequest::new(SortMetric::ThreePointAttempts, 1).grouped_by_year(),
        );
        let picked: Vec<(i32, &str, usize)> = table
            .iter()
            .map(|row| (row.year, row.entity.as_str(), row.rank))
            .collect();
        assert_eq!(picked, vec![(2021, "B", 1), (2022, "C", 1)]);
    }

    #[test]
    fn metric_codes_round_trip() {
        for metric in SortMetric::ALL {
            assert_eq!(SortMetric::from_code(metric.code()), Some(metric));
        }
        assert_eq!(SortMetric::from_code("FGA"), None);
    }
}
