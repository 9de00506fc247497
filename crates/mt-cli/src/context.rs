//! Runtime context for CLI commands

use anyhow::{Context, Result};
use mt_core::{load_migration_set, Config, DbType, MigrationSet};
use mt_db::{DuckDbConnector, DuckDbVersionStore};
use mt_runner::{Migrator, RetryPolicy};
use std::path::Path;

use crate::cli::GlobalArgs;

/// Loaded configuration shared by all commands
pub(crate) struct RuntimeContext {
    /// Parsed configuration file
    pub config: Config,
}

impl RuntimeContext {
    /// Load the configuration named by `--config`/`MT_CONFIG`, or
    /// `migrations.yml` from the working directory
    pub fn new(args: &GlobalArgs) -> Result<Self> {
        let config = match &args.config {
            Some(path) => {
                Config::load(Path::new(path)).context("Failed to load configuration file")?
            }
            None => Config::load_from_dir(Path::new("."))
                .context("Failed to load configuration from current directory")?,
        };
        Ok(Self { config })
    }

    /// Load the migration definitions of database `name`
    pub fn definitions(&self, name: &str) -> Result<MigrationSet> {
        let resolved = self.config.target(name)?;
        let source = self.config.script_source(resolved.source);
        load_migration_set(source.as_ref())
            .with_context(|| format!("Failed to load migrations from {}", source.describe()))
    }

    /// Build a migrator for database `name`
    pub fn migrator(&self, name: &str) -> Result<Migrator> {
        let definitions = self.definitions(name)?;
        let resolved = self.config.target(name)?;
        let target = resolved.target;

        let (connector, store) = match target.db_type {
            DbType::DuckDb => {
                let db_path = self.config.db_path(target);
                log::debug!("Opening {} database {} in {db_path}", target.db_type, target.name);
                let connector = DuckDbConnector::open(&db_path, target.name.as_str())
                    .with_context(|| format!("Failed to open database file: {db_path}"))?;
                let store = DuckDbVersionStore::new(
                    connector
                        .backend()
                        .context("Failed to open version tracking connection")?,
                    target.name.as_str(),
                );
                (connector, store)
            }
        };

        Ok(
            Migrator::new(definitions, Box::new(connector), Box::new(store))
                .with_retry(RetryPolicy::from(&self.config.retry)),
        )
    }
}
