//! mt-core - Core library for Manatee
//!
//! This crate provides configuration parsing, the declarative operation model,
//! the SQL statement compiler, down-migration inference, and the descriptor
//! loader used by the migration engine and CLI.

pub mod column_type;
pub mod compiler;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod inverse;
pub mod migration_key;
pub mod operation;
pub mod scaffold;
pub(crate) mod serde_helpers;

pub use compiler::{compile, compile_all, Statement};
pub use config::{Config, DatabaseConfig, DbType, DEFAULT_VERSION_TABLE};
pub use descriptor::{load_descriptors, sort_descriptors, MigrationDescriptor};
pub use error::{CoreError, CoreResult};
pub use inverse::{can_infer, infer};
pub use migration_key::MigrationKey;
pub use operation::{
    ColumnSpec, ColumnsSpec, CreateTableSpec, DefaultSpec, DropConstraintSpec, ExecuteSql,
    ForeignKeyEnd, ForeignKeySpec, IndexSpec, Operation, OperationKind, RemoveColumnSpec,
};
