//! List command implementation

use anyhow::Result;
use mt_engine::Migrator;
use serde::Serialize;

use crate::cli::{GlobalArgs, ListArgs, OutputFormat};
use crate::context::ProjectContext;

/// Migration information for display
#[derive(Debug, Serialize)]
struct MigrationInfo {
    version: usize,
    key: String,
    applied: bool,
    current: bool,
    explicit_down: bool,
}

#[derive(Debug, Serialize)]
struct ListOutput {
    current_version: usize,
    latest_version: usize,
    migrations: Vec<MigrationInfo>,
}

/// Execute the list command
pub async fn execute(args: &ListArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = ProjectContext::load(global)?;
    let migrator = ctx.read_only_migrator(global.target.as_deref()).await?;
    let output = collect(&migrator);

    match args.output {
        OutputFormat::Text => print_text(&output),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
    }
    Ok(())
}

fn collect(migrator: &Migrator) -> ListOutput {
    let current = migrator.current_version();
    let migrations = migrator
        .descriptors()
        .iter()
        .enumerate()
        .map(|(i, d)| MigrationInfo {
            version: i + 1,
            key: d.key.to_string(),
            applied: i < current,
            current: i + 1 == current,
            explicit_down: d.has_explicit_down(),
        })
        .collect();

    ListOutput {
        current_version: current,
        latest_version: migrator.latest_version(),
        migrations,
    }
}

fn print_text(output: &ListOutput) {
    println!(
        "Current version: {} of {}",
        output.current_version, output.latest_version
    );
    if output.current_version > output.latest_version {
        println!(
            "  warning: database is ahead of the {} migrations found",
            output.latest_version
        );
    }

    if output.migrations.is_empty() {
        println!("No migrations found.");
        return;
    }

    let width = output.migrations.len().to_string().len();
    for m in &output.migrations {
        let marker = if m.current { " (current)" } else { "" };
        println!("{:>width$}: {}{}", m.version, m.key, marker, width = width);
    }
}
