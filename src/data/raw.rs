use std::fs::File;
use std::io::Read;
use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::StoryResult;

/// One CSV record keyed by column name.
///
/// Cells are stored trimmed; an empty cell is kept so that callers can tell
/// "column present but blank" from "column absent".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: IndexMap<String, String>,
}

impl RawRow {
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into().trim().to_owned()))
                .collect(),
        }
    }

    /// Non-empty cell value for `column`.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    #[must_use]
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    /// Returns a copy of `self` where every non-empty cell of `other` wins.
    #[must_use]
    pub fn merged_with(&self, other: &RawRow) -> RawRow {
        let mut cells = self.cells.clone();
        for (column, value) in &other.cells {
            if !value.is_empty() || !cells.contains_key(column) {
                cells.insert(column.clone(), value.clone());
            }
        }
        RawRow { cells }
    }
}

/// An immutable, fully loaded source table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    name: String,
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    #[must_use]
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Reads a headered CSV stream. Short records are padded with blanks.
    pub fn from_csv_reader<R: Read>(name: impl Into<String>, reader: R) -> StoryResult<Self> {
        let name = name.into();
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(RawRow::from_pairs(
                headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| (header.clone(), record.get(i).unwrap_or_default())),
            ));
        }

        debug!(table = %name, rows = rows.len(), columns = headers.len(), "parsed csv table");
        Ok(Self {
            name,
            headers,
            rows,
        })
    }

    pub fn from_csv_str(name: impl Into<String>, text: &str) -> StoryResult<Self> {
        Self::from_csv_reader(name, text.as_bytes())
    }

    pub fn from_path(name: impl Into<String>, path: &Path) -> StoryResult<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(name, file)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|header| header == column)
    }

    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Left join on equal `keys`: every row of `self` is kept, enriched with
    /// the first matching row of `right` (right-hand values win).
    #[must_use]
    pub fn left_join(&self, right: &RawTable, keys: &[&str], name: impl Into<String>) -> RawTable {
        let key_of = |row: &RawRow| -> Option<Vec<String>> {
            keys.iter()
                .map(|key| row.get(key).map(str::to_owned))
                .collect()
        };

        let mut index: IndexMap<Vec<String>, &RawRow> = IndexMap::new();
        for row in &right.rows {
            if let Some(key) = key_of(row) {
                index.entry(key).or_insert(row);
            }
        }

        let rows = self
            .rows
            .iter()
            .map(|row| match key_of(row).and_then(|key| index.get(&key).copied()) {
                Some(matched) => row.merged_with(matched),
                None => row.clone(),
            })
            .collect();

        let mut headers = self.headers.clone();
        for header in &right.headers {
            if !headers.contains(header) {
                headers.push(header.clone());
            }
        }

        RawTable::new(name, headers, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::RawTable;

    #[test]
    fn csv_cells_are_trimmed_and_blank_cells_read_as_missing() {
        let table = RawTable::from_csv_str("t", "Season,3PA\n 1990-91 , \n1991-92,4.5\n")
            .expect("parse");
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].get("Season"), Some("1990-91"));
        assert_eq!(table.rows()[0].get("3PA"), None);
        assert_eq!(table.rows()[1].get("3PA"), Some("4.5"));
    }

    #[test]
    fn left_join_keeps_first_match_and_prefers_right_values() {
        let left = RawTable::from_csv_str("l", "player,season,team\nA,2021-22,X\nB,2021-22,Y\n")
            .expect("left");
        let right = RawTable::from_csv_str(
            "r",
            "player,season,team,x3pa_per_game\nA,2021-22,Z,8.1\nA,2021-22,W,2.0\n",
        )
        .expect("right");

        let joined = left.left_join(&right, &["player", "season"], "j");
        assert_eq!(joined.rows()[0].get("team"), Some("Z"));
        assert_eq!(joined.rows()[0].get("x3pa_per_game"), Some("8.1"));
        assert_eq!(joined.rows()[1].get("team"), Some("Y"));
        assert_eq!(joined.rows()[1].get("x3pa_per_game"), None);
        assert!(joined.has_column("x3pa_per_game"));
    }
}
