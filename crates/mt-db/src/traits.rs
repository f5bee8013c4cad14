//! Database executor trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Statement executor used by the migration engine.
///
/// Statements are issued one at a time and awaited before the next; the
/// engine never runs two concurrently. Implementations must be Send + Sync.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a statement that returns no rows, returning affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute a query and return the first column of its first row.
    ///
    /// Returns `None` when the query yields no rows or a NULL value.
    async fn query_scalar(&self, sql: &str) -> DbResult<Option<i64>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
