//! Migration executor
//!
//! A [`Migrator`] walks a [`MigrationPath`] strictly in order. Each step is
//! committed (or rolled back) before the next one starts, so a failure part
//! way through leaves every earlier step applied and tracked.

use crate::error::{RunError, RunResult};
use crate::retry::RetryPolicy;
use mt_core::{MigrationPath, MigrationSet, MigrationStep, PlanRequest, Version};
use mt_db::{Connector, Database, DbResult, Transaction, VersionStore};

/// Outcome of walking a path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Steps committed, in execution order
    pub applied: Vec<MigrationStep>,

    /// Step with no loaded definition that stopped the run
    pub halted_at: Option<MigrationStep>,
}

impl RunSummary {
    /// Whether every planned step was applied
    pub fn is_complete(&self) -> bool {
        self.halted_at.is_none()
    }
}

/// Path computed for the version a database is currently at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRun {
    /// Tracked version the path starts from
    pub current: Option<Version>,

    /// Steps to run
    pub path: MigrationPath,
}

/// Runs migration paths against one target database
pub struct Migrator {
    definitions: MigrationSet,
    connector: Box<dyn Connector>,
    store: Box<dyn VersionStore>,
    retry: RetryPolicy,
    untracked_steps: Vec<MigrationStep>,
    database_versions: Vec<Version>,
}

impl Migrator {
    /// Create a migrator with the default retry policy.
    ///
    /// Version 0 creates and drops the database itself, and dropping it
    /// leaves nothing to track.
    pub fn new(
        definitions: MigrationSet,
        connector: Box<dyn Connector>,
        store: Box<dyn VersionStore>,
    ) -> Self {
        Self {
            definitions,
            connector,
            store,
            retry: RetryPolicy::default(),
            untracked_steps: vec![MigrationStep::down(0)],
            database_versions: vec![0],
        }
    }

    /// Use `retry` for every storage operation
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Steps whose completion does not update the tracked version
    pub fn with_untracked_steps(mut self, steps: Vec<MigrationStep>) -> Self {
        self.untracked_steps = steps;
        self
    }

    /// Versions whose scripts act on the database as a whole
    pub fn with_database_versions(mut self, versions: Vec<Version>) -> Self {
        self.database_versions = versions;
        self
    }

    /// Loaded migration definitions
    pub fn definitions(&self) -> &MigrationSet {
        &self.definitions
    }

    /// Name of the target database
    pub fn database_name(&self) -> &str {
        self.connector.database_name()
    }

    /// Tracked version, `None` when the database does not exist yet
    pub async fn read_current_version(&self) -> RunResult<Option<Version>> {
        let version = self
            .retry
            .run("Reading current version", move || {
                self.store.read_current_version()
            })
            .await?;
        Ok(version)
    }

    /// Read the current version and plan `request` from it.
    ///
    /// An invalid range is rejected before the version store is read.
    pub async fn plan(&self, request: &PlanRequest) -> RunResult<PlannedRun> {
        request.validate()?;
        let current = self.read_current_version().await?;
        let path = request.plan(current)?;
        Ok(PlannedRun { current, path })
    }

    /// Plan `request` and execute the resulting path
    pub async fn migrate(&self, request: &PlanRequest) -> RunResult<RunSummary> {
        let planned = self.plan(request).await?;
        self.execute(&planned.path).await
    }

    /// Execute `path` step by step.
    ///
    /// A step without a loaded definition stops the run; the summary reports
    /// it and no later step runs. Any other failure aborts with an error.
    pub async fn execute(&self, path: &MigrationPath) -> RunResult<RunSummary> {
        let mut summary = RunSummary::default();
        // Opened on first use, reused by consecutive schema steps
        let mut target: Option<Box<dyn Database>> = None;

        for step in path {
            let Some(definition) = self.definitions.get(step.version) else {
                log::error!(
                    "Migration {} not found in {}, stopping before {step}",
                    step.version,
                    self.database_name()
                );
                summary.halted_at = Some(*step);
                return Ok(summary);
            };

            let Some(script) = definition.script(step.direction) else {
                log::error!("Migration {step} has no down script");
                return Err(RunError::MissingDownScript {
                    version: step.version,
                });
            };

            let tracked = if self.untracked_steps.contains(step) {
                None
            } else {
                step.resulting_version()
            };

            log::info!("Running migration {step}: {}", definition.label());

            let result = if self.database_versions.contains(&step.version) {
                // The database may be dropped or recreated underneath it
                target = None;
                self.run_database_step(step, script, tracked).await
            } else {
                let conn = match target.take() {
                    Some(conn) => conn,
                    None => self.open_target().await.map_err(|source| {
                        log::error!("Migration {step} failed to connect: {source}");
                        RunError::StepFailed {
                            step: *step,
                            source,
                        }
                    })?,
                };
                let result = self.run_schema_step(conn.as_ref(), step, script, tracked).await;
                target = Some(conn);
                result
            };

            if let Err(source) = result {
                log::error!("Migration {step} failed: {source}");
                return Err(RunError::StepFailed {
                    step: *step,
                    source,
                });
            }

            summary.applied.push(*step);
            match tracked {
                Some(version) => log::info!("Migration {step} applied, version is now {version}"),
                None => log::info!("Migration {step} applied"),
            }
        }

        Ok(summary)
    }

    async fn open_target(&self) -> DbResult<Box<dyn Database>> {
        self.retry
            .run("Connecting to target database", move || {
                self.connector.target()
            })
            .await
    }

    /// Run a database-level script in autocommit mode, then track it
    async fn run_database_step(
        &self,
        step: &MigrationStep,
        script: &str,
        tracked: Option<Version>,
    ) -> DbResult<()> {
        let what = format!("Migration {step}");
        self.retry
            .run(&what, move || async move {
                let admin = self.connector.admin().await?;
                admin.execute_batch(script).await
            })
            .await?;

        if let Some(version) = tracked {
            self.retry
                .run("Writing tracked version", move || {
                    self.store.write_version(version, None)
                })
                .await?;
        }
        Ok(())
    }

    /// Run a schema script and its version update as one transaction
    async fn run_schema_step(
        &self,
        conn: &dyn Database,
        step: &MigrationStep,
        script: &str,
        tracked: Option<Version>,
    ) -> DbResult<()> {
        let what = format!("Migration {step}");
        self.retry
            .run(&what, move || self.apply_in_transaction(conn, script, tracked))
            .await
    }

    async fn apply_in_transaction(
        &self,
        conn: &dyn Database,
        script: &str,
        tracked: Option<Version>,
    ) -> DbResult<()> {
        let tx = Transaction::begin(conn).await?;
        let result: DbResult<()> = async {
            tx.execute_batch(script).await?;
            if let Some(version) = tracked {
                self.store.write_version(version, Some(&tx)).await?;
            }
            Ok(())
        }
        .await;

        match result {
            Ok(()) => tx.commit().await,
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    log::warn!("Rollback failed: {rollback_err}");
                }
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "migrator_test.rs"]
mod tests;
