//! Runtime context for CLI commands

use anyhow::{Context, Result};
use mt_core::{Config, DatabaseConfig, DbType};
use mt_db::{Database, DuckDbBackend};
use mt_engine::Migrator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::GlobalArgs;

/// Loaded configuration plus the paths derived from it
pub struct ProjectContext {
    pub config: Config,

    /// Project root directory
    pub root: PathBuf,

    /// Directory holding migration descriptors
    pub migrations_dir: PathBuf,

    /// Verbose output enabled
    pub verbose: bool,
}

impl ProjectContext {
    /// Load configuration from global arguments
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let root = PathBuf::from(&args.project_dir);

        let config = if let Some(config_path) = &args.config {
            Config::load(Path::new(config_path)).context("Failed to load configuration file")?
        } else {
            Config::load_from_dir(&root).context("Failed to load project configuration")?
        };

        let migrations_dir = match &args.migrations {
            Some(dir) => PathBuf::from(dir),
            None => config.migrations_path_absolute(&root),
        };

        let ctx = Self {
            config,
            root,
            migrations_dir,
            verbose: args.verbose,
        };
        ctx.verbose(&format!(
            "Project '{}', migrations in {}",
            ctx.config.name,
            ctx.migrations_dir.display()
        ));
        Ok(ctx)
    }

    /// Connect to the database selected by `--target` (or the default one)
    pub fn connect(&self, target: Option<&str>) -> Result<Arc<dyn Database>> {
        let db_config = self
            .config
            .database_for(target)
            .context("Failed to select database target")?;
        let path = self.database_path(db_config);
        self.verbose(&format!("Connecting to {} at {}", db_config.db_type, path));
        log::debug!("Opening {} database {}", db_config.db_type, path);

        let db: Arc<dyn Database> = match db_config.db_type {
            DbType::DuckDb => {
                Arc::new(DuckDbBackend::new(&path).context("Failed to connect to database")?)
            }
        };
        Ok(db)
    }

    /// Connect and bind a migrator to the project's descriptors
    pub async fn migrator(&self, target: Option<&str>) -> Result<Migrator> {
        let db = self.connect(target)?;
        let migrator = Migrator::open(db, &self.migrations_dir, &self.config.version_table)
            .await
            .context("Failed to load migrations")?;
        self.verbose(&format!(
            "Loaded {} migrations, database at version {}",
            migrator.latest_version(),
            migrator.current_version()
        ));
        Ok(migrator)
    }

    /// Like [`migrator`](Self::migrator) but never creates the version table;
    /// a database without one reads as version 0
    pub async fn read_only_migrator(&self, target: Option<&str>) -> Result<Migrator> {
        let db = self.connect(target)?;
        let migrator =
            Migrator::open_without_bootstrap(db, &self.migrations_dir, &self.config.version_table)
                .await
                .context("Failed to load migrations")?;
        self.verbose(&format!(
            "Loaded {} migrations, database at version {}",
            migrator.latest_version(),
            migrator.current_version()
        ));
        Ok(migrator)
    }

    /// Print verbose output if enabled
    pub fn verbose(&self, msg: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", msg);
        }
    }

    // Relative database files live next to the config, not the working directory
    fn database_path(&self, db_config: &DatabaseConfig) -> String {
        let path = Path::new(&db_config.path);
        if db_config.path == ":memory:" || path.is_absolute() {
            db_config.path.clone()
        } else {
            self.root.join(path).display().to_string()
        }
    }
}
