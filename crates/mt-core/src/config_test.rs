use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: test_project").unwrap();
    assert_eq!(config.name, "test_project");
    assert_eq!(config.migrations_path, "migrations");
    assert_eq!(config.version_table, "SchemaInfo");
    assert_eq!(config.database.db_type, DbType::DuckDb);
    assert_eq!(config.database.path, ":memory:");
    assert!(config.targets.is_empty());

    let root = PathBuf::from("/tmp/test");
    assert_eq!(
        config.migrations_path_absolute(&root),
        root.join("migrations")
    );
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: shop
migrations_path: db/migrate
version_table: schema_version
database:
  type: duckdb
  path: ./dev.duckdb
targets:
  prod:
    database:
      type: duckdb
      path: /srv/prod.duckdb
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.migrations_path, "db/migrate");
    assert_eq!(config.version_table, "schema_version");
    assert_eq!(config.database_for(None).unwrap().path, "./dev.duckdb");
    assert_eq!(
        config.database_for(Some("prod")).unwrap().path,
        "/srv/prod.duckdb"
    );
    assert_eq!(config.target_names(), vec!["prod"]);
}

#[test]
fn test_unknown_target_lists_available() {
    let yaml = r#"
name: shop
targets:
  staging:
    database: { path: staging.duckdb }
  prod:
    database: { path: prod.duckdb }
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let err = config.database_for(Some("qa")).unwrap_err();
    match err {
        CoreError::UnknownTarget { name, available } => {
            assert_eq!(name, "qa");
            assert_eq!(available, "prod, staging");
        }
        other => panic!("expected UnknownTarget, got {other:?}"),
    }
}

#[test]
fn test_unknown_field_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: test\nmigration_dir: x");
    assert!(result.is_err());
}

#[test]
fn test_empty_name_invalid() {
    let config: Config = serde_yaml::from_str("name: ''").unwrap();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_version_table_must_be_identifier() {
    let config: Config =
        serde_yaml::from_str("name: test\nversion_table: 'x; DROP TABLE y'").unwrap();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("manatee.yml"), "name: from_yml").unwrap();
    std::fs::write(dir.path().join("manatee.yaml"), "name: from_yaml").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yml");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
    assert!(err.to_string().contains("manatee.yml"));
}

#[test]
fn test_load_runs_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("manatee.yml");
    std::fs::write(&path, "name: ''").unwrap();
    assert!(matches!(
        Config::load(&path),
        Err(CoreError::ConfigInvalid { .. })
    ));
}
