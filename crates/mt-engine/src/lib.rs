//! mt-engine - Migration engine for Manatee
//!
//! Tracks the applied version in a table inside the target database and moves
//! the database up or down through the ordered descriptor list.

pub mod error;
pub mod migrator;
pub mod plan;
pub mod version_store;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{EngineError, EngineResult};
pub use migrator::{MigrationReport, Migrator};
pub use plan::{Direction, MigrationPlan, MigrationStep};
pub use version_store::VersionStore;
