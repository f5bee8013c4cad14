//! New command implementation

use anyhow::{Context, Result};
use mt_core::scaffold::new_descriptor_file;

use crate::cli::{GlobalArgs, NewArgs};
use crate::context::ProjectContext;

/// Execute the new command
pub async fn execute(args: &NewArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;

    if !ctx.migrations_dir.exists() {
        ctx.verbose(&format!("Creating {}", ctx.migrations_dir.display()));
        std::fs::create_dir_all(&ctx.migrations_dir).with_context(|| {
            format!(
                "Failed to create migrations directory: {}",
                ctx.migrations_dir.display()
            )
        })?;
    }

    let now = chrono::Local::now().naive_local();
    let path = new_descriptor_file(&ctx.migrations_dir, &args.name, now)
        .context("Failed to create migration")?;

    println!("Created {}", path.display());
    Ok(())
}
