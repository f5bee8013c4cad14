//! Error types for mt-engine

use mt_core::CoreError;
use mt_db::DbError;
use thiserror::Error;

/// Migration engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Descriptor loading or configuration failure (M001)
    #[error("[M001] {0}")]
    Core(#[from] CoreError),

    /// Version table could not be created, read, or updated (M002)
    #[error("[M002] Version store '{table}' failed: {source}")]
    VersionStore {
        table: String,
        #[source]
        source: DbError,
    },

    /// Version table holds a value that is not a valid version (M003)
    #[error("[M003] Version store '{table}' is corrupt: {found}")]
    CorruptVersion { table: String, found: String },

    /// A migration statement failed; earlier migrations stay applied (M004)
    #[error("[M004] Migration {version} ({descriptor}) failed while migrating {direction}: {source}\n  statement: {statement}")]
    StatementFailed {
        version: usize,
        descriptor: String,
        direction: String,
        statement: String,
        #[source]
        source: DbError,
    },
}

/// Result type alias for EngineError
pub type EngineResult<T> = Result<T, EngineError>;
