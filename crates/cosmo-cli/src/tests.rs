use super::*;

#[test]
fn parses_services_command() {
    let cli = Cli::try_parse_from(["cosmo-cli", "services"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Services { full: false }));
}

#[test]
fn parses_services_full_flag() {
    let cli =
        Cli::try_parse_from(["cosmo-cli", "services", "--full"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Services { full: true }));
}

#[test]
fn parses_service_slug() {
    let cli = Cli::try_parse_from(["cosmo-cli", "service", "chistka-lica"])
        .expect("expected valid cli args");
    match cli.command {
        Commands::Service { slug } => assert_eq!(slug, "chistka-lica"),
        other => panic!("expected service command, got {other:?}"),
    }
}

#[test]
fn service_requires_slug() {
    assert!(Cli::try_parse_from(["cosmo-cli", "service"]).is_err());
}

#[test]
fn parses_search_query_with_cyrillic() {
    let cli = Cli::try_parse_from(["cosmo-cli", "search", "чистка лица"])
        .expect("expected valid cli args");
    match cli.command {
        Commands::Search { query } => assert_eq!(query, "чистка лица"),
        other => panic!("expected search command, got {other:?}"),
    }
}

#[test]
fn parses_argument_free_commands() {
    let catalog = Cli::try_parse_from(["cosmo-cli", "catalog"]).expect("expected valid cli args");
    let works = Cli::try_parse_from(["cosmo-cli", "works"]).expect("expected valid cli args");
    let slugs = Cli::try_parse_from(["cosmo-cli", "slugs"]).expect("expected valid cli args");

    assert!(matches!(catalog.command, Commands::Catalog));
    assert!(matches!(works.command, Commands::Works));
    assert!(matches!(slugs.command, Commands::Slugs));
}

#[test]
fn missing_command_is_an_error() {
    assert!(Cli::try_parse_from(["cosmo-cli"]).is_err());
}

#[test]
fn unknown_command_is_an_error() {
    assert!(Cli::try_parse_from(["cosmo-cli", "collect"]).is_err());
}
