//! Error types for mt-runner

use mt_core::{CoreError, MigrationStep, Version};
use mt_db::DbError;
use thiserror::Error;

/// Migration run errors
#[derive(Error, Debug)]
pub enum RunError {
    /// A down step was planned for a version without a down script (R001)
    #[error("[R001] Down script is missing for version {version}")]
    MissingDownScript { version: Version },

    /// A step failed after exhausting its retries (R002)
    #[error("[R002] Migration step {step} failed: {source}")]
    StepFailed {
        step: MigrationStep,
        #[source]
        source: DbError,
    },

    /// Reading or writing the tracked version failed (R003)
    #[error("[R003] Version storage failed: {0}")]
    Storage(#[from] DbError),

    /// The path could not be planned
    #[error(transparent)]
    Plan(#[from] CoreError),
}

/// Result type alias for RunError
pub type RunResult<T> = Result<T, RunError>;
