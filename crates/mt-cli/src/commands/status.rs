//! Status command implementation

use anyhow::Result;
use mt_core::Version;
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{format_version, print_json};
use crate::context::RuntimeContext;

#[derive(Serialize)]
struct StatusOutput<'a> {
    database: &'a str,
    current: Option<Version>,
    latest: Option<Version>,
}

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let migrator = ctx.migrator(&args.name)?;

    let output = StatusOutput {
        database: &args.name,
        current: migrator.read_current_version().await?,
        latest: migrator.definitions().latest_version(),
    };

    match args.output {
        OutputFormat::Json => print_json(&output),
        OutputFormat::Text => {
            println!("{}: {}", output.database, format_version(output.current));
            if let Some(latest) = output.latest {
                if output.current.is_some_and(|current| current < latest) {
                    println!("  latest available version is {latest}");
                }
            }
            Ok(())
        }
    }
}
