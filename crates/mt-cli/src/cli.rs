//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use mt_core::{PlanRequest, Version};

/// mt - Plan and apply versioned SQL migrations
#[derive(Parser, Debug)]
#[command(name = "mt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the configuration file (default: ./migrations.yml)
    #[arg(short, long, global = true, env = "MT_CONFIG")]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Migrate a database to a version
    Migrate(MigrateArgs),

    /// Show the migrations a migrate would run, without running them
    Plan(PlanArgs),

    /// Show the tracked version of a database
    Status(StatusArgs),

    /// List the migrations available for a database
    List(ListArgs),
}

/// Which database to migrate and where to take it
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Database id from the configuration file
    #[arg(short, long)]
    pub name: String,

    /// Roll back to this version first, then migrate forward
    #[arg(long, value_parser = parse_version, allow_negative_numbers = true)]
    pub from: Option<Version>,

    /// Version to migrate to
    #[arg(long, value_parser = parse_version, allow_negative_numbers = true)]
    pub to: Version,

    /// Drop the database and rebuild it from version 0
    #[arg(long)]
    pub drop: bool,
}

impl RequestArgs {
    /// Planner input for these arguments
    pub fn plan_request(&self) -> PlanRequest {
        PlanRequest {
            start: self.from,
            target: self.to,
            drop: self.drop,
        }
    }
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Database id from the configuration file
    #[arg(short, long)]
    pub name: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Database id from the configuration file
    #[arg(short, long)]
    pub name: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

/// Parse a version number, rejecting negative values
fn parse_version(value: &str) -> Result<Version, String> {
    let parsed: i64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a version number"))?;
    if parsed < 0 {
        return Err("Version can't have negative value".to_string());
    }
    Version::try_from(parsed).map_err(|_| format!("version {parsed} is too large"))
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
