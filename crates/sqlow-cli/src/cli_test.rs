use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_run_args_parse() {
    let cli = Cli::try_parse_from([
        "sqlow",
        "run",
        "migrations",
        "-r",
        "-d",
        "-e",
        "maria",
        "-H",
        "db.internal",
        "-P",
        "3307",
        "-p",
        "secret",
        "-o",
        "tls:true",
    ])
    .unwrap();

    let Commands::Run(args) = cli.command;
    assert_eq!(args.path, PathBuf::from("migrations"));
    assert!(args.recursive);
    assert!(args.dry_run);
    assert!(!args.skip_invalid);
    assert_eq!(args.connection.engine, Some(Engine::MariaDb));
    assert_eq!(args.connection.host.as_deref(), Some("db.internal"));
    assert_eq!(args.connection.port, Some(3307));
    assert_eq!(args.connection.password, "secret");
    assert_eq!(args.connection.options.as_deref(), Some("tls:true"));
    assert_eq!(cli.global.config, PathBuf::from("./config.yml"));
}

#[test]
fn test_global_args_after_subcommand() {
    let cli = Cli::try_parse_from(["sqlow", "run", "m.yml", "-p", "x", "-v", "-c", "db.yml"])
        .unwrap();
    assert!(cli.global.verbose);
    assert_eq!(cli.global.config, PathBuf::from("db.yml"));
}

#[test]
fn test_unknown_engine_is_rejected() {
    let result = Cli::try_parse_from(["sqlow", "run", "m.yml", "-p", "x", "-e", "oracle"]);
    assert!(result.is_err());
}
