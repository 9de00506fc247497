//! Migration definitions, planned steps, and the loaded definition set.

use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Schema version number. Version `0` is the database initialization migration.
pub type Version = u32;

/// Lowest version any migration may carry.
pub const MIN_VERSION: Version = 0;

/// Direction a migration script moves the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply the migration
    Up,
    /// Revert the migration
    Down,
}

impl Direction {
    /// File name keyword for this direction (`up` / `down`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schema version with its up script and optional down script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationDefinition {
    /// Version this migration moves the schema to
    pub version: Version,

    /// Human-readable label taken from the script file name
    pub name: String,

    /// SQL applying the migration
    pub up_script: String,

    /// SQL reverting the migration, if the migration can be rolled back
    pub down_script: Option<String>,
}

impl MigrationDefinition {
    /// Script for the given direction, `None` when no down script exists
    pub fn script(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Up => Some(&self.up_script),
            Direction::Down => self.down_script.as_deref(),
        }
    }

    /// `<version>_<name>`, matching the script file stem
    pub fn label(&self) -> String {
        format!("{}_{}", self.version, self.name)
    }
}

/// A single planned unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MigrationStep {
    /// Version whose script runs
    pub version: Version,

    /// Which script of that version runs
    pub direction: Direction,
}

impl MigrationStep {
    /// Create an up step
    pub fn up(version: Version) -> Self {
        Self {
            version,
            direction: Direction::Up,
        }
    }

    /// Create a down step
    pub fn down(version: Version) -> Self {
        Self {
            version,
            direction: Direction::Down,
        }
    }

    /// Version the schema is at once this step has been applied.
    ///
    /// Up at `V` leaves the schema at `V`; down at `V` leaves it at `V - 1`.
    /// Returns `None` for a down step at version 0, which has no version below.
    pub fn resulting_version(&self) -> Option<Version> {
        match self.direction {
            Direction::Up => Some(self.version),
            Direction::Down => self.version.checked_sub(1),
        }
    }
}

impl fmt::Display for MigrationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.version, self.direction)
    }
}

/// Ordered, immutable plan produced by [`crate::plan::plan`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MigrationPath {
    steps: Vec<MigrationStep>,
}

impl MigrationPath {
    /// Planned steps in execution order
    pub fn steps(&self) -> &[MigrationStep] {
        &self.steps
    }

    /// Number of planned steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// `true` when there is nothing to do
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Iterate the steps in execution order
    pub fn iter(&self) -> std::slice::Iter<'_, MigrationStep> {
        self.steps.iter()
    }
}

impl From<Vec<MigrationStep>> for MigrationPath {
    fn from(steps: Vec<MigrationStep>) -> Self {
        Self { steps }
    }
}

impl<'a> IntoIterator for &'a MigrationPath {
    type Item = &'a MigrationStep;
    type IntoIter = std::slice::Iter<'a, MigrationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl fmt::Display for MigrationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{step}")?;
        }
        f.write_str("]")
    }
}

/// All migration definitions available for one run, keyed by version.
///
/// Built once before planning and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct MigrationSet {
    definitions: BTreeMap<Version, MigrationDefinition>,
}

impl MigrationSet {
    /// Build the set, rejecting two definitions for the same version
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = MigrationDefinition>,
    ) -> CoreResult<Self> {
        let mut map = BTreeMap::new();
        for definition in definitions {
            let version = definition.version;
            if map.insert(version, definition).is_some() {
                return Err(CoreError::DuplicateVersion { version });
            }
        }
        Ok(Self { definitions: map })
    }

    /// Definition for `version`, if one was loaded
    pub fn get(&self, version: Version) -> Option<&MigrationDefinition> {
        self.definitions.get(&version)
    }

    /// Whether a definition exists for `version`
    pub fn contains(&self, version: Version) -> bool {
        self.definitions.contains_key(&version)
    }

    /// Highest loaded version
    pub fn latest_version(&self) -> Option<Version> {
        self.definitions.keys().next_back().copied()
    }

    /// Number of loaded definitions
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// `true` when no definitions were loaded
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate definitions in ascending version order
    pub fn iter(&self) -> impl Iterator<Item = &MigrationDefinition> {
        self.definitions.values()
    }
}

#[cfg(test)]
#[path = "migration_test.rs"]
mod tests;
