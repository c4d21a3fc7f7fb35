//! Row Normalizer and Dataset Filter/Shaper.
//!
//! Raw CSV tables are validated against a fixed schema when loaded, converted
//! into typed [`SeasonRow`]s per scene, then filtered into year-ordered
//! [`Dataset`]s that every chart is built from.

pub mod dataset;
pub mod normalize;
pub mod raw;
pub mod row;
pub mod schema;
pub mod source;

pub use dataset::{Dataset, RowPredicate, YearRange};
pub use normalize::{ColumnMapping, DerivedField, normalize_row, normalize_table, parse_season_year};
pub use raw::{RawRow, RawTable};
pub use row::{SeasonRow, StatField};
pub use schema::SourceTable;
pub use source::{CsvDirectorySource, DataSource, InMemorySource, LoadedTables, load_all};

/// Player rows: the shooting table joined with the per-game table on
/// `(player, season)`, normalized with the player mapping.
#[must_use]
pub fn player_rows(shooting: &RawTable, per_game: &RawTable) -> Vec<SeasonRow> {
    let joined = shooting.left_join(per_game, &["player", "season"], "players");
    normalize_table(&joined, &SourceTable::PlayerPerGame.mapping())
}
