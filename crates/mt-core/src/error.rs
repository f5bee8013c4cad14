//! Error types for mt-core

use thiserror::Error;

/// Core error type for Manatee
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Named connection target is not configured
    #[error("[E003] Unknown target '{name}'. Configured targets: {available}")]
    UnknownTarget { name: String, available: String },

    /// E004: Migrations directory not found
    #[error("[E004] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E005: Descriptor file could not be parsed
    #[error("[E005] Failed to parse migration '{path}': {message}")]
    DescriptorParse { path: String, message: String },

    /// E006: Descriptor file contains an invalid operation
    #[error("[E006] Invalid migration '{path}': {source}")]
    DescriptorInvalid {
        path: String,
        #[source]
        source: Box<CoreError>,
    },

    /// E007: Two descriptor files share a sort key
    #[error("[E007] Duplicate migration '{key}' in {path1} and {path2}")]
    DuplicateDescriptor {
        key: String,
        path1: String,
        path2: String,
    },

    /// E008: Operation object is missing fields required to compile it
    #[error("[E008] Invalid '{operation}' operation: {message}")]
    InvalidOperation { operation: String, message: String },

    /// E009: Operation object matches no known operation key
    #[error("[E009] Unrecognized operation: {found}")]
    UnknownOperation { found: String },

    /// E010: Scaffolded descriptor already exists
    #[error("[E010] Migration file already exists: {path}")]
    DescriptorExists { path: String },

    /// E011: IO error
    #[error("[E011] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E012: IO error with file path context
    #[error("[E012] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E013: YAML parse error
    #[error("[E013] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
