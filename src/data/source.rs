use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{StoryError, StoryResult};

use super::raw::RawTable;
use super::schema::SourceTable;

/// Supplier of source tables.
///
/// Implementations must validate the table schema before returning it.
pub trait DataSource {
    fn load(&self, table: SourceTable) -> StoryResult<Arc<RawTable>>;
}

/// Reads `<root>/<file_name>` CSV files.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    root: PathBuf,
}

impl CsvDirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DataSource for CsvDirectorySource {
    fn load(&self, table: SourceTable) -> StoryResult<Arc<RawTable>> {
        let path = self.root.join(table.file_name());
        let raw = RawTable::from_path(table.name(), &path).map_err(|err| StoryError::Load {
            table: table.name().to_owned(),
            message: format!("{}: {err}", path.display()),
        })?;
        table.validate(&raw)?;
        debug!(table = table.name(), rows = raw.len(), path = %path.display(), "loaded source table");
        Ok(Arc::new(raw))
    }
}

/// Tables held in memory, mainly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: IndexMap<SourceTable, Arc<RawTable>>,
}

impl InMemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table parsed from CSV text; the schema is checked immediately.
    pub fn with_csv(mut self, table: SourceTable, csv_text: &str) -> StoryResult<Self> {
        let raw = RawTable::from_csv_str(table.name(), csv_text)?;
        table.validate(&raw)?;
        self.tables.insert(table, Arc::new(raw));
        Ok(self)
    }

    pub fn insert(&mut self, table: SourceTable, raw: RawTable) -> StoryResult<()> {
        table.validate(&raw)?;
        self.tables.insert(table, Arc::new(raw));
        Ok(())
    }
}

impl DataSource for InMemorySource {
    fn load(&self, table: SourceTable) -> StoryResult<Arc<RawTable>> {
        self.tables
            .get(&table)
            .cloned()
            .ok_or_else(|| StoryError::Load {
                table: table.name().to_owned(),
                message: "table not available".to_owned(),
            })
    }
}

/// The full set of tables one scene needs, all resolved.
#[derive(Debug, Clone, Default)]
pub struct LoadedTables {
    tables: IndexMap<SourceTable, Arc<RawTable>>,
}

impl LoadedTables {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: SourceTable, raw: Arc<RawTable>) {
        self.tables.insert(table, raw);
    }

    pub fn get(&self, table: SourceTable) -> StoryResult<&RawTable> {
        self.tables
            .get(&table)
            .map(Arc::as_ref)
            .ok_or_else(|| StoryError::Load {
                table: table.name().to_owned(),
                message: "table was not part of the completed load".to_owned(),
            })
    }

    #[must_use]
    pub fn contains_all(&self, tables: &[SourceTable]) -> bool {
        tables.iter().all(|table| self.tables.contains_key(table))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Loads every table in `tables`; the first failure fails the whole join.
pub fn load_all<S: DataSource + ?Sized>(
    source: &S,
    tables: &[SourceTable],
) -> StoryResult<LoadedTables> {
    let mut loaded = LoadedTables::new();
    for table in tables {
        match source.load(*table) {
            Ok(raw) => loaded.insert(*table, raw),
            Err(err) => {
                warn!(table = table.name(), error = %err, "source table load failed");
                return Err(err);
            }
        }
    }
    Ok(loaded)
}
