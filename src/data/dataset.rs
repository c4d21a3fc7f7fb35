use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DataPoint, extent};

use super::row::{SeasonRow, StatField};

/// Inclusive year bounds; an open side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YearRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl YearRange {
    #[must_use]
    pub const fn between(start: i32, end: i32) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    #[must_use]
    pub const fn from(start: i32) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    #[must_use]
    pub fn contains(self, year: i32) -> bool {
        self.start.is_none_or(|start| year >= start) && self.end.is_none_or(|end| year <= end)
    }
}

/// Scene inclusion rule: year membership plus required non-missing fields.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowPredicate {
    pub years: YearRange,
    #[serde(default)]
    pub required: Vec<StatField>,
    /// Fields that must be present and strictly positive.
    #[serde(default)]
    pub positive: Vec<StatField>,
    #[serde(default)]
    pub require_team: bool,
    #[serde(default)]
    pub require_player: bool,
    /// Team names to drop (aggregate rows such as "League Average").
    #[serde(default)]
    pub excluded_teams: Vec<String>,
}

impl RowPredicate {
    #[must_use]
    pub fn years(years: YearRange) -> Self {
        Self {
            years,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn requiring(mut self, fields: &[StatField]) -> Self {
        for field in fields {
            if !self.required.contains(field) {
                self.required.push(*field);
            }
        }
        self
    }

    #[must_use]
    pub fn requiring_positive(mut self, field: StatField) -> Self {
        self.positive.push(field);
        self
    }

    #[must_use]
    pub fn requiring_team(mut self) -> Self {
        self.require_team = true;
        self
    }

    #[must_use]
    pub fn requiring_player(mut self) -> Self {
        self.require_player = true;
        self
    }

    #[must_use]
    pub fn excluding_team(mut self, team: impl Into<String>) -> Self {
        self.excluded_teams.push(team.into());
        self
    }

    #[must_use]
    pub fn matches(&self, row: &SeasonRow) -> bool {
        if !self.years.contains(row.year) {
            return false;
        }
        if !self.required.iter().all(|field| row.has(*field)) {
            return false;
        }
        if !self
            .positive
            .iter()
            .all(|field| row.get(*field).is_some_and(|v| v > 0.0))
        {
            return false;
        }
        if self.require_player && row.player.is_none() {
            return false;
        }
        match row.team.as_deref() {
            None => !self.require_team,
            Some(team) => !self.excluded_teams.iter().any(|excluded| excluded == team),
        }
    }
}

/// An ordered, immutable sequence of rows that satisfied a predicate.
///
/// Rows are in non-decreasing year order; rows sharing a year keep their
/// source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    rows: Vec<SeasonRow>,
}

impl Dataset {
    /// Filters `rows` into a new dataset. Failing rows are dropped silently.
    #[must_use]
    pub fn filter(rows: &[SeasonRow], predicate: &RowPredicate) -> Self {
        let mut kept: Vec<SeasonRow> = rows
            .iter()
            .filter(|row| predicate.matches(row))
            .cloned()
            .collect();
        kept.sort_by_key(|row| row.year);
        debug!(
            input_rows = rows.len(),
            kept_rows = kept.len(),
            "filtered dataset"
        );
        Self { rows: kept }
    }

    /// Applies another predicate, producing a new dataset.
    #[must_use]
    pub fn refilter(&self, predicate: &RowPredicate) -> Self {
        Self::filter(&self.rows, predicate)
    }

    #[must_use]
    pub fn rows(&self) -> &[SeasonRow] {
        &self.rows
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&SeasonRow> {
        self.rows.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self, field: StatField) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |row| row.get(field))
    }

    pub fn years(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|row| f64::from(row.year))
    }

    /// `(year, value)` samples for rows where `field` is present.
    #[must_use]
    pub fn points(&self, field: StatField) -> Vec<DataPoint> {
        self.rows
            .iter()
            .filter_map(|row| row.get(field).map(|v| DataPoint::new(f64::from(row.year), v)))
            .collect()
    }

    #[must_use]
    pub fn extent(&self, field: StatField) -> Option<(f64, f64)> {
        extent(self.values(field))
    }

    /// Arithmetic mean of `field`.
    ///
    /// `None` when no row carries the field (including the empty dataset), so a
    /// missing baseline can never leak NaN into a drawn reference line.
    #[must_use]
    pub fn mean(&self, field: StatField) -> Option<f64> {
        let (sum, count) = self
            .values(field)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    #[must_use]
    pub fn find_season(&self, season: &str) -> Option<(usize, &SeasonRow)> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.season == season)
    }

    #[must_use]
    pub fn find_year(&self, year: i32) -> Option<&SeasonRow> {
        self.rows.iter().find(|row| row.year == year)
    }

    /// Distinct years, ascending.
    #[must_use]
    pub fn distinct_years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|row| row.year).collect();
        years.dedup();
        years
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, RowPredicate, YearRange};
    use crate::data::{SeasonRow, StatField};

    #[test]
    fn open_ended_year_range() {
        let range = YearRange::from(1980);
        assert!(!range.contains(1979));
        assert!(range.contains(1980));
        assert!(range.contains(2030));
        assert!(YearRange::all().contains(1900));
    }

    #[test]
    fn mean_of_empty_dataset_is_none() {
        let dataset = Dataset::filter(&[], &RowPredicate::default());
        assert!(dataset.is_empty());
        assert_eq!(dataset.mean(StatField::ThreePointAttempts), None);
    }

    #[test]
    fn excluded_team_rows_are_dropped() {
        let rows = vec![
            SeasonRow::new(2021, "2021-22").with_team("League Average"),
            SeasonRow::new(2021, "2021-22").with_team("Boston Celtics"),
            SeasonRow::new(2021, "2021-22"),
        ];
        let predicate = RowPredicate::years(YearRange::all())
            .requiring_team()
            .excluding_team("League Average");
        let dataset = Dataset::filter(&rows, &predicate);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rows()[0].team.as_deref(), Some("Boston Celtics"));
    }
}
