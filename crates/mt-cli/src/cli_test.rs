use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_goto_defaults_to_last() {
    let cli = Cli::try_parse_from(["manatee", "goto"]).unwrap();
    match cli.command {
        Commands::Goto(args) => assert_eq!(args.to, TargetVersion::Latest),
        other => panic!("expected goto, got {other:?}"),
    }
}

#[test]
fn test_goto_numeric_and_negative_targets() {
    let cli = Cli::try_parse_from(["manatee", "goto", "--to", "3"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Goto(GotoArgs {
            to: TargetVersion::Version(3)
        })
    ));

    let cli = Cli::try_parse_from(["manatee", "goto", "--to", "-1"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Goto(GotoArgs {
            to: TargetVersion::Version(-1)
        })
    ));
}

#[test]
fn test_goto_rejects_garbage_target() {
    assert!(Cli::try_parse_from(["manatee", "goto", "--to", "soon"]).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "manatee",
        "compile",
        "--to",
        "0",
        "--output",
        "json",
        "--target",
        "prod",
        "--migrations",
        "db/migrations",
        "-v",
    ])
    .unwrap();

    assert!(cli.global.verbose);
    assert_eq!(cli.global.target.as_deref(), Some("prod"));
    assert_eq!(cli.global.migrations.as_deref(), Some("db/migrations"));
    assert_eq!(cli.global.project_dir, ".");
    match cli.command {
        Commands::Compile(args) => {
            assert_eq!(args.to, TargetVersion::Version(0));
            assert_eq!(args.output, OutputFormat::Json);
        }
        other => panic!("expected compile, got {other:?}"),
    }
}

#[test]
fn test_new_requires_name() {
    assert!(Cli::try_parse_from(["manatee", "new"]).is_err());
    let cli = Cli::try_parse_from(["manatee", "new", "add_users"]).unwrap();
    assert!(matches!(cli.command, Commands::New(NewArgs { ref name }) if name == "add_users"));
}

#[test]
fn test_target_version_resolve() {
    assert_eq!(parse_target_version("LAST"), Ok(TargetVersion::Latest));
    assert_eq!(parse_target_version(" 7 "), Ok(TargetVersion::Version(7)));
    assert_eq!(TargetVersion::Latest.resolve(4), 4);
    assert_eq!(TargetVersion::Version(2).resolve(4), 2);
}
