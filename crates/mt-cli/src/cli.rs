//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Manatee - versioned, declarative schema migrations
#[derive(Parser, Debug)]
#[command(name = "manatee")]
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

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Named target (database connection) from the config
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override the migrations directory
    #[arg(short, long, global = true)]
    pub migrations: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current version and every migration
    List(ListArgs),

    /// Migrate the database to a version
    Goto(GotoArgs),

    /// Print the statements a migration would run, without running them or
    /// creating the version table
    Compile(CompileArgs),

    /// Create a new, empty migration file
    New(NewArgs),
}

/// Requested version: a number or `last`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetVersion {
    Latest,
    Version(i64),
}

impl TargetVersion {
    /// Resolve against the number of migrations available
    pub fn resolve(self, latest: usize) -> i64 {
        match self {
            TargetVersion::Latest => i64::try_from(latest).unwrap_or(i64::MAX),
            TargetVersion::Version(v) => v,
        }
    }
}

/// Parse `last`/`latest` or an integer
pub fn parse_target_version(s: &str) -> Result<TargetVersion, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "last" | "latest" => Ok(TargetVersion::Latest),
        other => other
            .parse::<i64>()
            .map(TargetVersion::Version)
            .map_err(|_| format!("expected a version number or 'last', got '{}'", s)),
    }
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the goto command
#[derive(Args, Debug)]
pub struct GotoArgs {
    /// Target version (number, or `last`)
    #[arg(long, default_value = "last", value_parser = parse_target_version, allow_hyphen_values = true)]
    pub to: TargetVersion,
}

/// Arguments for the compile command
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Target version (number, or `last`)
    #[arg(long, default_value = "last", value_parser = parse_target_version, allow_hyphen_values = true)]
    pub to: TargetVersion,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Arguments for the new command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Descriptive name, appended to the timestamp
    pub name: String,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON output
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
