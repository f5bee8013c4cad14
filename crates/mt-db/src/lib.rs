//! mt-db - Database abstraction layer for Manatee
//!
//! This crate provides the `Database` executor trait consumed by the
//! migration engine and a DuckDB implementation of it.

pub mod duckdb;
pub mod error;
pub mod traits;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
