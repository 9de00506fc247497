//! Plan command implementation

use anyhow::Result;
use mt_core::Version;
use serde::Serialize;

use crate::cli::{GlobalArgs, OutputFormat, PlanArgs};
use crate::commands::common::{format_version, print_json, StepView};
use crate::context::RuntimeContext;

#[derive(Serialize)]
struct PlanOutput<'a> {
    database: &'a str,
    current: Option<Version>,
    target: Version,
    steps: Vec<StepView>,
}

/// Execute the plan command
pub async fn execute(args: &PlanArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = RuntimeContext::new(global)?;
    let request = args.request.plan_request();
    request.validate()?;
    let migrator = ctx.migrator(&args.request.name)?;

    let planned = migrator.plan(&request).await?;
    let steps: Vec<StepView> = planned
        .path
        .iter()
        .map(|step| StepView::new(step, migrator.definitions()))
        .collect();

    match args.output {
        OutputFormat::Json => print_json(&PlanOutput {
            database: &args.request.name,
            current: planned.current,
            target: request.target,
            steps,
        }),
        OutputFormat::Text => {
            println!(
                "{}: version {} -> {}",
                args.request.name,
                format_version(planned.current),
                request.target
            );
            if steps.is_empty() {
                println!("Nothing to do");
            } else {
                println!("{:>5}  {:<4}  NAME", "STEP", "DIR");
                for step in &steps {
                    println!("{step}");
                }
            }
            Ok(())
        }
    }
}
