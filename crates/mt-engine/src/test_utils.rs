//! Recording database double for engine tests

use crate::version_store::VersionStore;
use async_trait::async_trait;
use mt_core::{MigrationDescriptor, MigrationKey, DEFAULT_VERSION_TABLE};
use mt_db::{Database, DbError, DbResult};
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Default)]
struct MockState {
    table_exists: bool,
    version: Option<i64>,
    executed: Vec<String>,
    fail_on: Option<String>,
}

/// In-memory stand-in for a target database.
///
/// Answers the version-table statements for `SchemaInfo`, records every
/// executed statement, and can be told to fail on a statement containing a
/// given substring.
pub(crate) struct MockDatabase {
    store: VersionStore,
    state: Mutex<MockState>,
}

impl MockDatabase {
    /// A database with no version table yet
    pub(crate) fn new() -> Self {
        Self {
            store: VersionStore::new(DEFAULT_VERSION_TABLE),
            state: Mutex::new(MockState::default()),
        }
    }

    /// A database whose version table already holds `version`
    pub(crate) fn with_version(version: i64) -> Self {
        let db = Self::new();
        {
            let mut state = db.state.lock().unwrap();
            state.table_exists = true;
            state.version = Some(version);
        }
        db
    }

    pub(crate) fn fail_on(self, needle: &str) -> Self {
        self.state.lock().unwrap().fail_on = Some(needle.to_string());
        self
    }

    /// Every statement passed to `execute`, in order
    pub(crate) fn executed(&self) -> Vec<String> {
        self.state.lock().unwrap().executed.clone()
    }

    /// Executed statements excluding version-table bookkeeping
    pub(crate) fn migration_sql(&self) -> Vec<String> {
        let table = self.store.table().to_string();
        self.executed()
            .into_iter()
            .filter(|sql| !sql.contains(&table))
            .collect()
    }

    pub(crate) fn clear(&self) {
        self.state.lock().unwrap().executed.clear();
    }

    pub(crate) fn stored_version(&self) -> Option<i64> {
        self.state.lock().unwrap().version
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn execute(&self, sql: &str) -> DbResult<usize> {
        let mut state = self.state.lock().unwrap();
        if let Some(needle) = &state.fail_on {
            if sql.contains(needle.as_str()) {
                return Err(DbError::ExecutionError(format!("mock failure: {}", sql)));
            }
        }
        state.executed.push(sql.to_string());

        if sql == self.store.create_sql() {
            state.table_exists = true;
        } else if sql == self.store.init_sql() {
            state.version = Some(0);
        } else if let Some(rest) =
            sql.strip_prefix(&format!("UPDATE {} SET Version = ", self.store.table()))
        {
            let version = rest
                .parse::<i64>()
                .map_err(|e| DbError::ExecutionError(e.to_string()))?;
            state.version = Some(version);
        }
        Ok(1)
    }

    async fn query_scalar(&self, sql: &str) -> DbResult<Option<i64>> {
        let state = self.state.lock().unwrap();
        if sql == self.store.exists_sql() {
            Ok(Some(i64::from(state.table_exists)))
        } else if sql == self.store.read_sql() {
            Ok(state.version)
        } else {
            Err(DbError::ExecutionError(format!(
                "mock cannot answer query: {}",
                sql
            )))
        }
    }

    fn db_type(&self) -> &'static str {
        "mock"
    }
}

/// Parse an inline descriptor document under the given key
pub(crate) fn descriptor(key: &str, content: &str) -> MigrationDescriptor {
    let path = PathBuf::from(format!("{}.json", key));
    MigrationDescriptor::parse(MigrationKey::try_new(key).unwrap(), &path, content).unwrap()
}
