//! mt-core - Core library for migration-tool
//!
//! This crate provides the migration data model, script discovery and
//! parsing, configuration loading, and the migration path planner shared by
//! the executor and the CLI.

pub mod config;
pub mod error;
pub mod loader;
pub mod migration;
pub mod plan;

pub use config::{Config, DbType, ResolvedTarget, RetryConfig, SourceConfig, TargetConfig};
pub use error::{CoreError, CoreResult};
pub use loader::{load_migration_set, DirectorySource, ScriptFile, ScriptSource};
pub use migration::{
    Direction, MigrationDefinition, MigrationPath, MigrationSet, MigrationStep, Version,
    MIN_VERSION,
};
pub use plan::{plan, PlanRequest};
