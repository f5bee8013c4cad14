//! Goto command implementation

use anyhow::{Context, Result};
use mt_engine::Direction;

use crate::cli::{GlobalArgs, GotoArgs};
use crate::context::ProjectContext;

/// Execute the goto command
pub async fn execute(args: &GotoArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let mut migrator = ctx.migrator(global.target.as_deref()).await?;

    let target = args.to.resolve(migrator.latest_version());
    ctx.verbose(&format!(
        "Requested version {}, migrating to {}",
        target,
        migrator.clamp_target(target)
    ));

    let report = migrator
        .migrate(target)
        .await
        .with_context(|| format!("Migration stopped at version {}", migrator.current_version()))?;

    if report.is_noop() {
        println!("Already at version {}", report.to);
        return Ok(());
    }

    let verb = match report.direction {
        Some(Direction::Down) => "Reverted",
        _ => "Applied",
    };
    for key in &report.applied {
        println!("  {} {}", verb, key);
    }
    println!("Migrated from version {} to {}", report.from, report.to);
    Ok(())
}
