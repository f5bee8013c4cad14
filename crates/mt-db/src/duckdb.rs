//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use async_trait::async_trait;
use duckdb::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", e, path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute SQL synchronously
    fn execute_sync(&self, sql: &str) -> DbResult<usize> {
        let conn = self.lock()?;
        conn.execute(sql, [])
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    /// Query a single integer synchronously
    fn query_scalar_sync(&self, sql: &str) -> DbResult<Option<i64>> {
        let conn = self.lock()?;
        match conn.query_row(sql, [], |row| row.get::<_, Option<i64>>(0)) {
            Ok(value) => Ok(value),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(
                e @ (duckdb::Error::InvalidColumnType(..)
                | duckdb::Error::FromSqlConversionFailure(..)
                | duckdb::Error::IntegralValueOutOfRange(..)
                | duckdb::Error::UnsignedIntegralValueOutOfRange(..)),
            ) => Err(DbError::UnexpectedResult(format!("{}: {}", e, sql))),
            Err(e) => Err(DbError::ExecutionError(format!("{}: {}", e, sql))),
        }
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        self.execute_sync(sql)
    }

    async fn query_scalar(&self, sql: &str) -> DbResult<Option<i64>> {
        self.query_scalar_sync(sql)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}
