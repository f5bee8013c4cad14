//! Migration engine: moves the database between versions.

use crate::error::{EngineError, EngineResult};
use crate::plan::{Direction, MigrationPlan};
use crate::version_store::VersionStore;
use mt_core::{load_descriptors, MigrationDescriptor, MigrationKey, Statement};
use mt_db::Database;
use std::path::Path;
use std::sync::Arc;

/// Outcome of a completed migration
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationReport {
    pub from: usize,
    pub to: usize,
    /// `None` when nothing had to move
    pub direction: Option<Direction>,
    /// Keys applied (up) or reverted (down), in execution order
    pub applied: Vec<MigrationKey>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Migration engine bound to one database and one ordered descriptor list
pub struct Migrator {
    db: Arc<dyn Database>,
    store: VersionStore,
    descriptors: Vec<MigrationDescriptor>,
    current_version: usize,
    store_ready: bool,
}

impl Migrator {
    /// Bind to a database, creating the version table if needed and reading
    /// the current version.
    ///
    /// `descriptors` must already be ordered by key.
    pub async fn new(
        db: Arc<dyn Database>,
        descriptors: Vec<MigrationDescriptor>,
        version_table: &str,
    ) -> EngineResult<Self> {
        Self::bind(db, descriptors, version_table, true).await
    }

    /// Bind without creating the version table.
    ///
    /// A missing table reads as version 0 and nothing is written until
    /// [`migrate`](Self::migrate) runs a step, so planning stays side-effect free.
    pub async fn new_without_bootstrap(
        db: Arc<dyn Database>,
        descriptors: Vec<MigrationDescriptor>,
        version_table: &str,
    ) -> EngineResult<Self> {
        Self::bind(db, descriptors, version_table, false).await
    }

    async fn bind(
        db: Arc<dyn Database>,
        descriptors: Vec<MigrationDescriptor>,
        version_table: &str,
        bootstrap: bool,
    ) -> EngineResult<Self> {
        let store = VersionStore::new(version_table);
        let store_ready = if bootstrap {
            store.ensure(db.as_ref()).await?;
            true
        } else {
            store.exists(db.as_ref()).await?
        };
        let current_version = if store_ready {
            store.read(db.as_ref()).await?
        } else {
            0
        };

        if current_version > descriptors.len() {
            log::warn!(
                "Stored version {} is beyond the {} migrations found",
                current_version,
                descriptors.len()
            );
        }

        Ok(Self {
            db,
            store,
            descriptors,
            current_version,
            store_ready,
        })
    }

    /// Load every descriptor in `dir` and bind to the database
    pub async fn open(
        db: Arc<dyn Database>,
        dir: &Path,
        version_table: &str,
    ) -> EngineResult<Self> {
        let descriptors = load_descriptors(dir)?;
        Self::new(db, descriptors, version_table).await
    }

    /// Load every descriptor in `dir` without creating the version table
    pub async fn open_without_bootstrap(
        db: Arc<dyn Database>,
        dir: &Path,
        version_table: &str,
    ) -> EngineResult<Self> {
        let descriptors = load_descriptors(dir)?;
        Self::new_without_bootstrap(db, descriptors, version_table).await
    }

    /// Version recorded in the database (0 means nothing applied)
    pub fn current_version(&self) -> usize {
        self.current_version
    }

    /// Ordered descriptors; descriptor `i` has version `i + 1`
    pub fn descriptors(&self) -> &[MigrationDescriptor] {
        &self.descriptors
    }

    /// Highest reachable version
    pub fn latest_version(&self) -> usize {
        self.descriptors.len()
    }

    pub fn version_table(&self) -> &str {
        self.store.table()
    }

    /// Clamp a requested target into `0..=latest_version()`
    pub fn clamp_target(&self, target: i64) -> usize {
        if target <= 0 {
            0
        } else {
            usize::try_from(target)
                .unwrap_or(usize::MAX)
                .min(self.latest_version())
        }
    }

    /// Steps `migrate(target)` would run, without touching the database
    pub fn plan(&self, target: i64) -> MigrationPlan {
        let to = self.clamp_target(target);
        MigrationPlan::build(&self.descriptors, self.current_version, to)
    }

    /// Move the database to `target`.
    ///
    /// The version is persisted after every step, so when a statement fails
    /// the steps already completed stay recorded and the error names the
    /// failing descriptor.
    pub async fn migrate(&mut self, target: i64) -> EngineResult<MigrationReport> {
        let plan = self.plan(target);
        let mut report = MigrationReport {
            from: plan.from,
            to: plan.from,
            direction: plan.steps.first().map(|s| s.direction),
            applied: Vec::new(),
        };

        if plan.is_empty() {
            log::info!("Already at version {}", self.current_version);
            return Ok(report);
        }

        if !self.store_ready {
            self.store.ensure(self.db.as_ref()).await?;
            self.store_ready = true;
        }

        for step in &plan.steps {
            let Some(key) = &step.key else {
                log::warn!(
                    "No migration found for version {}; recording version {}",
                    step.version,
                    step.version_after
                );
                self.store.write(self.db.as_ref(), step.version_after).await?;
                self.current_version = step.version_after;
                report.to = step.version_after;
                continue;
            };

            log::info!("Migrating {} {} ({})", step.direction, step.version, key);
            for statement in &step.statements {
                match statement {
                    Statement::Sql(sql) => {
                        log::debug!("{}", sql);
                        self.db.execute(sql).await.map_err(|source| {
                            EngineError::StatementFailed {
                                version: step.version,
                                descriptor: key.to_string(),
                                direction: step.direction.to_string(),
                                statement: sql.clone(),
                                source,
                            }
                        })?;
                    }
                    Statement::Diagnostic(text) => log::warn!("{}: {}", key, text),
                }
            }

            self.store.write(self.db.as_ref(), step.version_after).await?;
            self.current_version = step.version_after;
            report.to = step.version_after;
            report.applied.push(key.clone());
        }

        log::info!("Migrated from {} to {}", report.from, report.to);
        Ok(report)
    }

    /// Migrate to the latest version
    pub async fn migrate_to_latest(&mut self) -> EngineResult<MigrationReport> {
        let latest = i64::try_from(self.latest_version()).unwrap_or(i64::MAX);
        self.migrate(latest).await
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
