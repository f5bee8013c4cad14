//! Persisted version counter.
//!
//! The counter lives in a single-row, single-column table in the target
//! database. It is created and initialised to `0` the first time it is needed.

use crate::error::{EngineError, EngineResult};
use mt_db::{Database, DbError};

/// Handle on the version table
#[derive(Debug, Clone)]
pub struct VersionStore {
    table: String,
}

impl VersionStore {
    /// Create a handle for the given table name.
    ///
    /// The name is spliced into SQL unquoted; callers pass a validated identifier.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Name of the version table
    pub fn table(&self) -> &str {
        &self.table
    }

    pub(crate) fn exists_sql(&self) -> String {
        format!(
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = '{}'",
            self.table
        )
    }

    pub(crate) fn create_sql(&self) -> String {
        format!("CREATE TABLE {} (Version INT)", self.table)
    }

    pub(crate) fn init_sql(&self) -> String {
        format!("INSERT INTO {} (Version) VALUES (0)", self.table)
    }

    pub(crate) fn read_sql(&self) -> String {
        format!("SELECT Version FROM {}", self.table)
    }

    pub(crate) fn update_sql(&self, version: usize) -> String {
        format!("UPDATE {} SET Version = {}", self.table, version)
    }

    /// Whether the version table exists
    pub async fn exists(&self, db: &dyn Database) -> EngineResult<bool> {
        let count = db
            .query_scalar(&self.exists_sql())
            .await
            .map_err(|e| self.store_error(e))?;
        Ok(count.unwrap_or(0) > 0)
    }

    /// Create and initialise the table if it does not exist.
    ///
    /// Returns `true` when the table was created by this call.
    pub async fn ensure(&self, db: &dyn Database) -> EngineResult<bool> {
        if self.exists(db).await? {
            return Ok(false);
        }

        log::info!("Creating version table {}", self.table);
        db.execute(&self.create_sql())
            .await
            .map_err(|e| self.store_error(e))?;
        db.execute(&self.init_sql())
            .await
            .map_err(|e| self.store_error(e))?;
        Ok(true)
    }

    /// Read the stored version
    pub async fn read(&self, db: &dyn Database) -> EngineResult<usize> {
        let value = db
            .query_scalar(&self.read_sql())
            .await
            .map_err(|e| self.store_error(e))?;
        match value {
            Some(v) => usize::try_from(v).map_err(|_| EngineError::CorruptVersion {
                table: self.table.clone(),
                found: v.to_string(),
            }),
            None => Err(EngineError::CorruptVersion {
                table: self.table.clone(),
                found: "no version row".to_string(),
            }),
        }
    }

    /// Persist a new version
    pub async fn write(&self, db: &dyn Database, version: usize) -> EngineResult<()> {
        db.execute(&self.update_sql(version))
            .await
            .map_err(|e| self.store_error(e))?;
        Ok(())
    }

    fn store_error(&self, source: DbError) -> EngineError {
        match source {
            DbError::UnexpectedResult(found) => EngineError::CorruptVersion {
                table: self.table.clone(),
                found,
            },
            source => EngineError::VersionStore {
                table: self.table.clone(),
                source,
            },
        }
    }
}
