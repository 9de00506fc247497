//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use mt_core::{MigrationSet, MigrationStep, Version};
use serde::Serialize;
use std::fmt;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors run before the process ends.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only, nothing to show the user
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit status of a run stopped by a missing migration
pub(crate) const EXIT_HALTED: i32 = 3;

/// A step as shown to the user
#[derive(Debug, Serialize)]
pub(crate) struct StepView {
    pub version: Version,
    pub direction: String,
    /// `None` when no migration is loaded for the version
    pub name: Option<String>,
}

impl StepView {
    pub fn new(step: &MigrationStep, definitions: &MigrationSet) -> Self {
        Self {
            version: step.version,
            direction: step.direction.to_string(),
            name: definitions.get(step.version).map(|d| d.name.clone()),
        }
    }
}

impl fmt::Display for StepView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{:>5}  {:<4}  {name}", self.version, self.direction),
            None => write!(f, "{:>5}  {:<4}  <missing>", self.version, self.direction),
        }
    }
}

/// Text form of a tracked version
pub(crate) fn format_version(version: Option<Version>) -> String {
    match version {
        Some(v) => v.to_string(),
        None => "not initialized".to_string(),
    }
}

/// Print `value` as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
