//! Compile command implementation (dry run)

use anyhow::Result;
use mt_core::Statement;
use mt_engine::MigrationPlan;

use crate::cli::{CompileArgs, GlobalArgs, OutputFormat};
use crate::context::ProjectContext;

/// Execute the compile command
pub async fn execute(args: &CompileArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let migrator = ctx.read_only_migrator(global.target.as_deref()).await?;

    let target = args.to.resolve(migrator.latest_version());
    let plan = migrator.plan(target);
    ctx.verbose(&format!(
        "Planned {} steps from version {} to {}",
        plan.steps.len(),
        plan.from,
        plan.to
    ));

    match args.output {
        OutputFormat::Text => print!("{}", render_script(&plan)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
    }
    Ok(())
}

/// Render a plan as a commented SQL script
fn render_script(plan: &MigrationPlan) -> String {
    if plan.is_empty() {
        return format!("-- already at version {}\n", plan.from);
    }

    let mut out = format!("-- migrate from version {} to {}\n", plan.from, plan.to);
    for step in &plan.steps {
        out.push('\n');
        match &step.key {
            Some(key) => out.push_str(&format!(
                "-- {} {}: {}\n",
                step.direction, step.version, key
            )),
            None => {
                out.push_str(&format!(
                    "-- {} {}: no migration found, version only\n",
                    step.direction, step.version
                ));
                continue;
            }
        }
        for statement in &step.statements {
            match statement {
                Statement::Sql(sql) => out.push_str(&format!("{};\n", sql)),
                Statement::Diagnostic(text) => out.push_str(&format!("{}\n", text)),
            }
        }
    }
    out
}
