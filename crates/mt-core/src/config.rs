//! Configuration types and parsing for migrations.yml

use crate::error::{CoreError, CoreResult};
use crate::loader::{DirectorySource, ScriptSource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default config file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "migrations.yml";

const MEMORY_DB_PATH: &str = ":memory:";

/// Top-level configuration: script sources, target databases, retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where migration scripts come from
    pub sources: Vec<SourceConfig>,

    /// Databases that can be migrated
    #[serde(rename = "db")]
    pub targets: Vec<TargetConfig>,

    /// Retry behaviour for database operations
    #[serde(default)]
    pub retry: RetryConfig,

    /// Directory relative paths are resolved against (the config file's directory)
    #[serde(skip)]
    root: PathBuf,
}

/// Script source type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Local directory of `.sql` files
    Directory,
}

/// A named collection of migration scripts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Identifier referenced by targets
    pub id: String,

    /// Source type
    #[serde(rename = "type")]
    pub source_type: SourceType,

    /// Directory holding the scripts
    pub path: String,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// A database that migrations are applied to
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Identifier passed on the command line (`--name`)
    pub id: String,

    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Name of the database (a schema inside the DuckDB file)
    pub name: String,

    /// Id of the script source to read migrations from
    pub source: String,

    /// DuckDB file path, or `:memory:` for a throwaway database
    pub path: String,
}

/// Retry settings for database operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry, in seconds
    #[serde(default = "default_initial_delay_secs")]
    pub initial_delay_secs: u64,

    /// Factor the delay grows by after each retry
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_secs: default_initial_delay_secs(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_secs() -> u64 {
    10
}

fn default_backoff_multiplier() -> u32 {
    2
}

/// A target together with the source its scripts come from
#[derive(Debug, Clone, Copy)]
pub struct ResolvedTarget<'a> {
    /// The target database
    pub target: &'a TargetConfig,
    /// The source referenced by the target
    pub source: &'a SourceConfig,
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// Relative paths inside the file are resolved against the file's directory.
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        log::debug!("Reading config file: {}", path.display());
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::parse(&content, root).map_err(|e| match e {
            CoreError::ConfigParseError { message, .. } => CoreError::ConfigParseError {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    /// Load `migrations.yml` from a directory
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        Self::load(&dir.join(DEFAULT_CONFIG_FILE))
    }

    /// Parse and validate configuration text, resolving relative paths against `root`
    pub fn parse(content: &str, root: impl Into<PathBuf>) -> CoreResult<Self> {
        let mut config: Config =
            serde_yaml::from_str(content).map_err(|e| CoreError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        config.root = root.into();
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        let mut source_ids = HashSet::new();
        for source in &self.sources {
            if source.id.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "Source id cannot be empty".to_string(),
                });
            }
            if !source_ids.insert(source.id.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Duplicate source id '{}'", source.id),
                });
            }
        }

        let mut target_ids = HashSet::new();
        for target in &self.targets {
            if target.id.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "Target id cannot be empty".to_string(),
                });
            }
            if target.name.is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Target '{}' has an empty database name", target.id),
                });
            }
            if !target_ids.insert(target.id.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("Duplicate target id '{}'", target.id),
                });
            }
            if !source_ids.contains(target.source.as_str()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!(
                        "Target '{}' uses unknown source '{}'",
                        target.id, target.source
                    ),
                });
            }
        }

        if self.retry.max_attempts == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "retry.max_attempts must be at least 1".to_string(),
            });
        }
        if self.retry.backoff_multiplier == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "retry.backoff_multiplier must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Directory relative paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the list of available target ids
    pub fn available_targets(&self) -> Vec<&str> {
        self.targets.iter().map(|t| t.id.as_str()).collect()
    }

    /// Look up a target and its source by target id
    pub fn target(&self, id: &str) -> CoreResult<ResolvedTarget<'_>> {
        let target = self
            .targets
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::UnknownTarget {
                name: id.to_string(),
                available: self.available_targets().join(", "),
            })?;

        // validate() guarantees the source exists
        let source = self
            .sources
            .iter()
            .find(|s| s.id == target.source)
            .ok_or_else(|| CoreError::ConfigInvalid {
                message: format!(
                    "Target '{}' uses unknown source '{}'",
                    target.id, target.source
                ),
            })?;

        Ok(ResolvedTarget { target, source })
    }

    /// Absolute directory of a directory source
    pub fn source_dir(&self, source: &SourceConfig) -> PathBuf {
        self.root.join(&source.path)
    }

    /// Build the script source described by `source`
    pub fn script_source(&self, source: &SourceConfig) -> Box<dyn ScriptSource> {
        match source.source_type {
            SourceType::Directory => Box::new(DirectorySource::new(self.source_dir(source))),
        }
    }

    /// Database path for a target, with relative paths resolved against the config root
    pub fn db_path(&self, target: &TargetConfig) -> String {
        if target.path == MEMORY_DB_PATH {
            return target.path.clone();
        }
        self.root.join(&target.path).display().to_string()
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
