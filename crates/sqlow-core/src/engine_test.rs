use super::*;

#[test]
fn test_parse_engine_identifiers() {
    assert_eq!("postgres".parse::<Engine>().unwrap(), Engine::Postgres);
    assert_eq!("maria".parse::<Engine>().unwrap(), Engine::MariaDb);
    assert_eq!("mariadb".parse::<Engine>().unwrap(), Engine::MariaDb);
    assert_eq!("mysql".parse::<Engine>().unwrap(), Engine::MySql);
}

#[test]
fn test_unsupported_engine_is_rejected() {
    let err = "oracle".parse::<Engine>().unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedEngine { ref engine } if engine == "oracle"));
    assert!(err.to_string().contains("[C001]"));
}

#[test]
fn test_engine_identifiers_are_case_sensitive() {
    assert!("Postgres".parse::<Engine>().is_err());
}

#[test]
fn test_postgres_capabilities() {
    let caps = Engine::Postgres.capabilities();
    assert_eq!(caps.family, EngineFamily::Postgres);
    assert!(caps.multi_statement_exec);
    assert!(caps.dry_run);
}

#[test]
fn test_mysql_family_cannot_dry_run() {
    for engine in [Engine::MariaDb, Engine::MySql] {
        let caps = engine.capabilities();
        assert_eq!(caps.family, EngineFamily::MySql);
        assert!(!caps.multi_statement_exec);
        assert!(!caps.dry_run);
    }
}

#[test]
fn test_engine_deserializes_from_yaml() {
    let engine: Engine = serde_yaml::from_str("maria").unwrap();
    assert_eq!(engine, Engine::MariaDb);

    let err = serde_yaml::from_str::<Engine>("sqlite").unwrap_err();
    assert!(err.to_string().contains("Unsupported engine type: sqlite"));
}

#[test]
fn test_display_round_trips_through_parse() {
    for engine in Engine::ALL {
        assert_eq!(engine.to_string().parse::<Engine>().unwrap(), engine);
    }
}
