use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_parse_version() {
    assert_eq!(parse_version("0"), Ok(0));
    assert_eq!(parse_version("42"), Ok(42));
    assert_eq!(
        parse_version("-1"),
        Err("Version can't have negative value".to_string())
    );
    assert!(parse_version("two").is_err());
    assert!(parse_version("99999999999").is_err());
}

#[test]
fn test_migrate_args() {
    let cli = Cli::try_parse_from([
        "mt", "migrate", "--name", "app", "--from", "2", "--to", "5", "--drop",
    ])
    .unwrap();

    match cli.command {
        Commands::Migrate(args) => {
            let request = args.request.plan_request();
            assert_eq!(args.request.name, "app");
            assert_eq!(request.start, Some(2));
            assert_eq!(request.target, 5);
            assert!(request.drop);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_negative_version_rejected() {
    let err = Cli::try_parse_from(["mt", "migrate", "--name", "app", "--to", "-3"]).unwrap_err();
    assert!(err.to_string().contains("Version can't have negative value"));
}

#[test]
fn test_to_is_required() {
    assert!(Cli::try_parse_from(["mt", "plan", "--name", "app"]).is_err());
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from([
        "mt", "status", "--name", "app", "--output", "json", "-c", "db.yml", "-v",
    ])
    .unwrap();

    assert!(cli.global.verbose);
    assert_eq!(cli.global.config.as_deref(), Some("db.yml"));
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, OutputFormat::Json),
        other => panic!("unexpected command: {other:?}"),
    }
}
