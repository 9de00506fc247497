//! Migration script discovery and parsing.
//!
//! Scripts are named `<version>_<name>.<up|down>.sql`. Every version needs an
//! up script; the down script is optional. Files that do not match the
//! pattern are ignored.

use crate::error::{CoreError, CoreResult};
use crate::migration::{Direction, MigrationDefinition, MigrationSet, Version};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const BEGIN_COMMAND: &str = "BEGIN;";
const COMMIT_COMMAND: &str = "COMMIT;";

static SCRIPT_NAME_RE: OnceLock<Regex> = OnceLock::new();

fn script_name_re() -> &'static Regex {
    SCRIPT_NAME_RE
        .get_or_init(|| Regex::new(r"^(\d+)_(.+)\.(up|down)\.sql$").expect("valid regex"))
}

/// Supplier of migration definitions
pub trait ScriptSource {
    /// Short description used in log lines
    fn describe(&self) -> String;

    /// Read and parse every migration definition the source holds
    fn load_definitions(&self) -> CoreResult<Vec<MigrationDefinition>>;
}

/// A raw script file as read from a source
#[derive(Debug, Clone)]
pub struct ScriptFile {
    /// File name without directory, e.g. `3_add_users.up.sql`
    pub file_name: String,

    /// File contents
    pub contents: String,
}

impl ScriptFile {
    /// Create a script file from a name and its contents
    pub fn new(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }
}

/// Parsed components of a script file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptName {
    /// Migration version
    pub version: Version,
    /// Label between the version and the direction
    pub name: String,
    /// Direction keyword
    pub direction: Direction,
}

/// Parse `<version>_<name>.<up|down>.sql`.
///
/// Returns `Ok(None)` for names that are not migration scripts and an error
/// for names that match but carry an unusable version.
pub fn parse_script_name(file_name: &str) -> CoreResult<Option<ScriptName>> {
    let Some(caps) = script_name_re().captures(file_name) else {
        return Ok(None);
    };

    let version = caps[1]
        .parse::<Version>()
        .map_err(|e| CoreError::InvalidScriptName {
            file: file_name.to_string(),
            reason: format!("version '{}' out of range: {e}", &caps[1]),
        })?;
    let direction = match &caps[3] {
        "up" => Direction::Up,
        _ => Direction::Down,
    };

    Ok(Some(ScriptName {
        version,
        name: caps[2].to_string(),
        direction,
    }))
}

/// Normalize a script body.
///
/// Trailing whitespace is removed along with a leading `BEGIN;` and a trailing
/// `COMMIT;`, since every step already runs inside its own transaction.
pub fn prepare_script(raw: &str) -> String {
    let script = raw.trim();
    let script = script.strip_prefix(BEGIN_COMMAND).unwrap_or(script);
    let script = script.strip_suffix(COMMIT_COMMAND).unwrap_or(script);
    script.trim().to_string()
}

#[derive(Default)]
struct PendingDefinition {
    name: String,
    up: Option<(String, String)>,
    down: Option<(String, String)>,
}

/// Group script files into migration definitions.
///
/// Files are processed in file-name order, so the name of a version comes from
/// the first of its files. Fails on two files for the same
/// `(version, direction)` and on a version without an up script.
pub fn parse_script_files(
    files: impl IntoIterator<Item = ScriptFile>,
) -> CoreResult<Vec<MigrationDefinition>> {
    let mut files: Vec<ScriptFile> = files.into_iter().collect();
    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));

    let mut pending: BTreeMap<Version, PendingDefinition> = BTreeMap::new();

    for file in files {
        let Some(parsed) = parse_script_name(&file.file_name)? else {
            log::debug!("Skipping non-migration file: {}", file.file_name);
            continue;
        };

        let entry = pending
            .entry(parsed.version)
            .or_insert_with(|| PendingDefinition {
                name: parsed.name.clone(),
                ..Default::default()
            });

        let slot = match parsed.direction {
            Direction::Up => &mut entry.up,
            Direction::Down => &mut entry.down,
        };

        if let Some((first, _)) = slot {
            return Err(CoreError::DuplicateScript {
                version: parsed.version,
                direction: parsed.direction,
                first: first.clone(),
                second: file.file_name,
            });
        }

        *slot = Some((file.file_name, prepare_script(&file.contents)));
    }

    pending
        .into_iter()
        .map(|(version, def)| {
            let Some((_, up_script)) = def.up else {
                return Err(CoreError::MissingUpScript {
                    version,
                    name: def.name,
                });
            };
            Ok(MigrationDefinition {
                version,
                name: def.name,
                up_script,
                down_script: def.down.map(|(_, script)| script),
            })
        })
        .collect()
}

/// Load all definitions from `source` into an immutable [`MigrationSet`]
pub fn load_migration_set(source: &dyn ScriptSource) -> CoreResult<MigrationSet> {
    log::info!("Loading migration scripts from {}", source.describe());
    let definitions = source.load_definitions()?;
    log::info!("Loaded {} migration definitions", definitions.len());
    MigrationSet::from_definitions(definitions)
}

/// Scripts stored as files in a local directory (non-recursive)
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
}

impl DirectorySource {
    /// Create a source reading from `dir`
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the scripts are read from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_files(&self) -> CoreResult<Vec<ScriptFile>> {
        if !self.dir.is_dir() {
            return Err(CoreError::SourceNotFound {
                path: self.dir.display().to_string(),
            });
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| CoreError::IoWithPath {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !file_name.ends_with(".sql") {
                continue;
            }
            let contents =
                std::fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
                    path: path.display().to_string(),
                    source: e,
                })?;
            files.push(ScriptFile::new(file_name, contents));
        }
        Ok(files)
    }
}

impl ScriptSource for DirectorySource {
    fn describe(&self) -> String {
        format!("directory {}", self.dir.display())
    }

    fn load_definitions(&self) -> CoreResult<Vec<MigrationDefinition>> {
        let files = self.read_files()?;
        log::debug!("Read {} sql files from {}", files.len(), self.dir.display());
        parse_script_files(files)
    }
}

#[cfg(test)]
#[path = "loader_test.rs"]
mod tests;
