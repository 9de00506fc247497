//! Migration path planning.
//!
//! [`plan`] is a pure function of its inputs: the same current version,
//! requested start, target and drop flag always produce the same path.

use crate::error::{CoreError, CoreResult};
use crate::migration::{MigrationPath, MigrationStep, Version, MIN_VERSION};

/// Inputs for a planning request, as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanRequest {
    /// Version to roll back to before rolling forward, if any
    pub start: Option<Version>,
    /// Version the database should end at
    pub target: Version,
    /// Tear the database down and rebuild it from version 0
    pub drop: bool,
}

impl PlanRequest {
    /// Request a plan to `target` with no explicit start and no drop
    pub fn to(target: Version) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    /// Set the explicit start version
    pub fn from_version(mut self, start: Version) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the drop flag
    pub fn with_drop(mut self, drop: bool) -> Self {
        self.drop = drop;
        self
    }

    /// Check the requested bounds without looking at any database
    pub fn validate(&self) -> CoreResult<()> {
        validate_range(self.start, self.target)
    }

    /// Plan against a database currently at `current`
    pub fn plan(&self, current: Option<Version>) -> CoreResult<MigrationPath> {
        plan(current, self.start, self.target, self.drop)
    }
}

/// Reject bounds the planner cannot work with.
///
/// Versions are unsigned, so the lower bound of [`MIN_VERSION`] holds by
/// construction; negative input is rejected where it is parsed.
fn validate_range(start: Option<Version>, target: Version) -> CoreResult<()> {
    if let Some(start) = start {
        if target < start {
            return Err(CoreError::InvalidRange {
                message: format!("to version {target} is below from version {start}"),
            });
        }
    }
    Ok(())
}

fn ups(first: Version, last: Version) -> impl Iterator<Item = MigrationStep> {
    (first..=last).map(MigrationStep::up)
}

/// Down steps from `from` to `above + 1`, descending
fn downs(from: Version, above: Version) -> impl Iterator<Item = MigrationStep> {
    (above.saturating_add(1)..=from).rev().map(MigrationStep::down)
}

/// Steps that move a database at `current` straight to `target`
fn linear(current: Version, target: Version) -> Vec<MigrationStep> {
    if target <= current {
        downs(current, target).collect()
    } else {
        ups(current + 1, target).collect()
    }
}

/// Compute the ordered steps taking a database from `current` to `target`.
///
/// * `current == None` (fresh database): up `0..=target`.
/// * `drop`: down at 0, then up `0..=target`.
/// * no `start`, or `current <= start`: straight down or up to `target`.
/// * `start < current`: down to `start`, then up from `start + 1` to `target`.
///   The up scripts of the versions rolled back are applied again.
pub fn plan(
    current: Option<Version>,
    start: Option<Version>,
    target: Version,
    drop: bool,
) -> CoreResult<MigrationPath> {
    validate_range(start, target)?;

    let steps: Vec<MigrationStep> = match (current, start) {
        (None, _) => ups(MIN_VERSION, target).collect(),
        (Some(_), _) if drop => std::iter::once(MigrationStep::down(MIN_VERSION))
            .chain(ups(MIN_VERSION, target))
            .collect(),
        (Some(current), None) => linear(current, target),
        (Some(current), Some(start)) if current <= start => linear(current, target),
        (Some(current), Some(start)) if current > start => downs(current, start)
            .chain(ups(start + 1, target))
            .collect(),
        (Some(_), Some(_)) => {
            return Err(CoreError::PlanningExhausted {
                current,
                start,
                target,
                drop,
            })
        }
    };

    let path = MigrationPath::from(steps);
    log::info!("Current db version: {current:?}");
    log::info!("Generated migration path: {path}");
    Ok(path)
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
