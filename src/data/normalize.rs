use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::parse_decimal;

use super::raw::{RawRow, RawTable};
use super::row::{SeasonRow, StatField};

/// Fields computed from other fields after column parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivedField {
    /// `FGA - 3PA`, only when both inputs are present.
    TwoPointAttempts,
}

impl DerivedField {
    fn apply(self, row: &mut SeasonRow) {
        match self {
            Self::TwoPointAttempts => {
                let value = row
                    .get(StatField::FieldGoalAttempts)
                    .zip(row.get(StatField::ThreePointAttempts))
                    .map(|(fga, three)| fga - three);
                row.set_stat(StatField::TwoPointAttempts, value);
            }
        }
    }
}

/// Which source columns feed which `SeasonRow` fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub season: String,
    pub stats: Vec<(StatField, String)>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub derived: Vec<DerivedField>,
}

impl ColumnMapping {
    #[must_use]
    pub fn new(season: impl Into<String>) -> Self {
        Self {
            season: season.into(),
            stats: Vec::new(),
            team: None,
            player: None,
            derived: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_stat(mut self, field: StatField, column: impl Into<String>) -> Self {
        self.stats.push((field, column.into()));
        self
    }

    #[must_use]
    pub fn with_team(mut self, column: impl Into<String>) -> Self {
        self.team = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_player(mut self, column: impl Into<String>) -> Self {
        self.player = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_derived(mut self, field: DerivedField) -> Self {
        if !self.derived.contains(&field) {
            self.derived.push(field);
        }
        self
    }
}

/// Year encoded by a season label such as `"1994-95"`.
///
/// The part before the first hyphen must begin with four ASCII digits.
#[must_use]
pub fn parse_season_year(label: &str) -> Option<i32> {
    let head = label.trim().split('-').next()?.trim();
    let digits = head.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Converts one raw row; `None` means the row is rejected (no season year).
#[must_use]
pub fn normalize_row(raw: &RawRow, mapping: &ColumnMapping) -> Option<SeasonRow> {
    let season = raw.get(&mapping.season)?;
    let year = parse_season_year(season)?;

    let mut row = SeasonRow::new(year, season);
    for (field, column) in &mapping.stats {
        row.set_stat(*field, raw.get(column).and_then(parse_decimal));
    }
    row.team = mapping
        .team
        .as_deref()
        .and_then(|column| raw.get(column))
        .map(str::to_owned);
    row.player = mapping
        .player
        .as_deref()
        .and_then(|column| raw.get(column))
        .map(str::to_owned);
    for derived in &mapping.derived {
        derived.apply(&mut row);
    }
    Some(row)
}

/// Normalizes every row of `table`, dropping rejected rows, in source order.
#[must_use]
pub fn normalize_table(table: &RawTable, mapping: &ColumnMapping) -> Vec<SeasonRow> {
    let normalize = |raw: &RawRow| {
        let row = normalize_row(raw, mapping);
        if row.is_none() {
            trace!(table = table.name(), "rejected row without a season year");
        }
        row
    };

    #[cfg(feature = "parallel-normalize")]
    let rows: Vec<SeasonRow> = {
        use rayon::prelude::*;
        table.rows().par_iter().filter_map(normalize).collect()
    };

    #[cfg(not(feature = "parallel-normalize"))]
    let rows: Vec<SeasonRow> = table.rows().iter().filter_map(normalize).collect();

    debug!(
        table = table.name(),
        source_rows = table.len(),
        normalized_rows = rows.len(),
        rejected_rows = table.len() - rows.len(),
        "normalized table"
    );
    rows
}

#[cfg(test)]
mod tests {
    use super::{ColumnMapping, DerivedField, normalize_row, normalize_table, parse_season_year};
    use crate::data::{RawRow, RawTable, StatField};

    #[test]
    fn season_year_takes_leading_four_digits() {
        assert_eq!(parse_season_year("1979-80"), Some(1979));
        assert_eq!(parse_season_year("2024-25"), Some(2024));
        assert_eq!(parse_season_year("2001"), Some(2001));
        assert_eq!(parse_season_year(""), None);
        assert_eq!(parse_season_year("Total"), None);
        assert_eq!(parse_season_year("99-00"), None);
    }

    #[test]
    fn two_point_attempts_need_both_inputs() {
        let mapping = ColumnMapping::new("Season")
            .with_stat(StatField::FieldGoalAttempts, "FGA")
            .with_stat(StatField::ThreePointAttempts, "3PA")
            .with_derived(DerivedField::TwoPointAttempts);

        let full = RawRow::from_pairs([("Season", "1990-91"), ("FGA", "88.0"), ("3PA", "7.5")]);
        let row = normalize_row(&full, &mapping).expect("row");
        assert_eq!(row.get(StatField::TwoPointAttempts), Some(80.5));

        let partial = RawRow::from_pairs([("Season", "1990-91"), ("FGA", ""), ("3PA", "7.5")]);
        let row = normalize_row(&partial, &mapping).expect("row");
        assert_eq!(row.get(StatField::TwoPointAttempts), None);
        assert_eq!(row.get(StatField::FieldGoalAttempts), None);
    }

    #[test]
    fn table_rejects_rows_without_a_season_and_keeps_order() {
        let table = RawTable::from_csv_str(
            "league",
            "Season,3PA\n1999-00,13.7\nTotal,\n1998-99,13.2\nCareer,9.0\n",
        )
        .expect("csv");
        let mapping = ColumnMapping::new("Season").with_stat(StatField::ThreePointAttempts, "3PA");

        let rows = normalize_table(&table, &mapping);
        let seasons: Vec<&str> = rows.iter().map(|row| row.season.as_str()).collect();
        assert_eq!(seasons, ["1999-00", "1998-99"]);
        assert_eq!(rows[1].get(StatField::ThreePointAttempts), Some(13.2));
    }
}
