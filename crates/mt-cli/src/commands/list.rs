//! List command implementation

use anyhow::Result;
use mt_core::Version;
use serde::Serialize;

use crate::cli::{GlobalArgs, ListArgs, OutputFormat};
use crate::commands::common::print_json;
use crate::context::RuntimeContext;

#[derive(Serialize)]
struct MigrationInfo<'a> {
    version: Version,
    name: &'a str,
    reversible: bool,
}

/// Execute the list command
pub async fn execute(args: &ListArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let definitions = ctx.definitions(&args.name)?;

    let infos: Vec<MigrationInfo> = definitions
        .iter()
        .map(|d| MigrationInfo {
            version: d.version,
            name: &d.name,
            reversible: d.down_script.is_some(),
        })
        .collect();

    match args.output {
        OutputFormat::Json => print_json(&infos),
        OutputFormat::Text => {
            if infos.is_empty() {
                println!("No migrations found for {}", args.name);
                return Ok(());
            }
            println!("{:>7}  {:<4}  NAME", "VERSION", "DOWN");
            for info in &infos {
                let down = if info.reversible { "yes" } else { "no" };
                println!("{:>7}  {:<4}  {}", info.version, down, info.name);
            }
            println!("\n{} migrations", infos.len());
            Ok(())
        }
    }
}
