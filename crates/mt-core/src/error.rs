//! Error types for mt-core

use crate::migration::{Direction, Version};
use thiserror::Error;

/// Core error type for migration-tool
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config {path}: {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Target id not present in the config
    #[error("[E004] Target '{name}' not present in config. Available targets: {available}")]
    UnknownTarget { name: String, available: String },

    /// E005: Migration script source directory not found
    #[error("[E005] Migration source directory not found: {path}")]
    SourceNotFound { path: String },

    /// E006: Two script files map to the same (version, direction)
    #[error("[E006] Migration version {version} has multiple {direction} scripts: {first} and {second}")]
    DuplicateScript {
        version: Version,
        direction: Direction,
        first: String,
        second: String,
    },

    /// E007: A version has a down script but no up script
    #[error("[E007] Migration version {version} ({name}) has no up script")]
    MissingUpScript { version: Version, name: String },

    /// E009: Script file name matches the pattern but cannot be used
    #[error("[E009] Invalid migration script name '{file}': {reason}")]
    InvalidScriptName { file: String, reason: String },

    /// E008: Two definitions share a version
    #[error("[E008] Duplicate migration definition for version {version}")]
    DuplicateVersion { version: Version },

    /// P001: Malformed version bounds
    #[error("[P001] Invalid migration range: {message}")]
    InvalidRange { message: String },

    /// P002: The planner reached a combination of inputs it does not handle
    #[error("[P002] Unhandled migration path for current={current:?}, from={start:?}, to={target}, drop={drop}")]
    PlanningExhausted {
        current: Option<Version>,
        start: Option<Version>,
        target: Version,
        drop: bool,
    },

    /// E014: IO error
    #[error("[E014] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E016: IO error with file path context
    #[error("[E016] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
