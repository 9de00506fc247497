//! mt-db - Database layer for migration-tool
//!
//! This crate provides the `Database` and `Connector` traits, explicit
//! transactions, the DuckDB backend and persisted version tracking.

pub mod duckdb;
pub mod error;
mod sql;
pub mod traits;
pub mod transaction;
pub mod version_store;

pub use duckdb::{DuckDbBackend, DuckDbConnector};
pub use error::{DbError, DbResult};
pub use traits::{Connector, Database};
pub use transaction::Transaction;
pub use version_store::{DuckDbVersionStore, VersionStore, META_SCHEMA};
