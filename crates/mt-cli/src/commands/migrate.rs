//! Migrate command implementation

use anyhow::Result;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{format_version, ExitCode, StepView, EXIT_HALTED};
use crate::context::RuntimeContext;

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let name = &args.request.name;
    let request = args.request.plan_request();
    request.validate()?;
    let migrator = ctx.migrator(name)?;

    let planned = migrator.plan(&request).await?;
    if planned.path.is_empty() {
        println!(
            "{name} is already at version {}, nothing to do",
            format_version(planned.current)
        );
        return Ok(());
    }

    let summary = migrator.execute(&planned.path).await?;

    println!("Applied {} migration(s) to {name}:", summary.applied.len());
    for step in &summary.applied {
        println!("  {}", StepView::new(step, migrator.definitions()));
    }

    if let Some(step) = summary.halted_at {
        eprintln!(
            "Stopped at {step}: no migration {} found for {name}",
            step.version
        );
        return Err(ExitCode(EXIT_HALTED).into());
    }

    let current = migrator.read_current_version().await?;
    println!("{name} is now at version {}", format_version(current));
    Ok(())
}
