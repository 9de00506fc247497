//! mt-runner - Migration execution for migration-tool
//!
//! Walks a planned [`mt_core::MigrationPath`] one step at a time against a
//! target database, tracking the applied version and retrying storage
//! operations that fail.

pub mod error;
pub mod migrator;
pub mod retry;

pub use error::{RunError, RunResult};
pub use migrator::{Migrator, PlannedRun, RunSummary};
pub use retry::RetryPolicy;
