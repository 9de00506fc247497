use super::*;
use std::path::PathBuf;

const FULL_CONFIG: &str = r#"
sources:
  - id: core
    type: directory
    path: migrations
db:
  - id: analytics
    type: duckdb
    name: analytics
    source: core
    path: warehouse.duckdb
  - id: scratch
    name: scratch
    source: core
    path: ":memory:"
retry:
  max_attempts: 5
  initial_delay_secs: 1
  backoff_multiplier: 3
"#;

#[test]
fn test_parse_full_config() {
    let config = Config::parse(FULL_CONFIG, "/srv/project").unwrap();
    assert_eq!(config.sources.len(), 1);
    assert_eq!(config.targets.len(), 2);
    assert_eq!(
        config.retry,
        RetryConfig {
            max_attempts: 5,
            initial_delay_secs: 1,
            backoff_multiplier: 3,
        }
    );
    assert_eq!(config.available_targets(), vec!["analytics", "scratch"]);
}

#[test]
fn test_defaults() {
    let config = Config::parse(FULL_CONFIG.split("retry:").next().unwrap(), "/srv").unwrap();
    assert_eq!(config.retry, RetryConfig::default());
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.initial_delay_secs, 10);
    assert_eq!(config.retry.backoff_multiplier, 2);

    let scratch = config.target("scratch").unwrap().target;
    assert_eq!(scratch.db_type, DbType::DuckDb);
    assert_eq!(scratch.path, ":memory:");
    assert_eq!(config.db_path(scratch), ":memory:");
}

#[test]
fn test_resolve_target_and_paths() {
    let config = Config::parse(FULL_CONFIG, "/srv/project").unwrap();
    let resolved = config.target("analytics").unwrap();

    assert_eq!(resolved.target.name, "analytics");
    assert_eq!(resolved.source.id, "core");
    assert_eq!(
        config.source_dir(resolved.source),
        PathBuf::from("/srv/project/migrations")
    );
    assert_eq!(
        PathBuf::from(config.db_path(resolved.target)),
        PathBuf::from("/srv/project/warehouse.duckdb")
    );
    assert!(config
        .script_source(resolved.source)
        .describe()
        .contains("migrations"));
}

#[test]
fn test_unknown_target() {
    let config = Config::parse(FULL_CONFIG, "/srv").unwrap();
    let err = config.target("missing").unwrap_err();
    match err {
        CoreError::UnknownTarget { name, available } => {
            assert_eq!(name, "missing");
            assert_eq!(available, "analytics, scratch");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rejects_unknown_source_reference() {
    let yaml = r#"
sources:
  - id: core
    type: directory
    path: migrations
db:
  - id: analytics
    name: analytics
    source: elsewhere
    path: app.duckdb
"#;
    let err = Config::parse(yaml, "/srv").unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
    assert!(err.to_string().contains("elsewhere"));
}

#[test]
fn test_rejects_duplicate_ids() {
    let yaml = r#"
sources:
  - id: core
    type: directory
    path: a
  - id: core
    type: directory
    path: b
db: []
"#;
    let err = Config::parse(yaml, "/srv").unwrap_err();
    assert!(err.to_string().contains("Duplicate source id 'core'"));

    let yaml = r#"
sources:
  - id: core
    type: directory
    path: a
db:
  - id: t
    name: one
    source: core
    path: one.duckdb
  - id: t
    name: two
    source: core
    path: two.duckdb
"#;
    let err = Config::parse(yaml, "/srv").unwrap_err();
    assert!(err.to_string().contains("Duplicate target id 't'"));
}

#[test]
fn test_rejects_target_without_path() {
    let yaml = r#"
sources:
  - id: core
    type: directory
    path: migrations
db:
  - id: analytics
    name: analytics
    source: core
"#;
    let err = Config::parse(yaml, "/srv").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
    assert!(err.to_string().contains("path"));
}

#[test]
fn test_rejects_zero_attempts() {
    let yaml = r#"
sources: []
db: []
retry:
  max_attempts: 0
"#;
    let err = Config::parse(yaml, "/srv").unwrap_err();
    assert!(err.to_string().contains("max_attempts"));
}

#[test]
fn test_rejects_unknown_fields() {
    let yaml = r#"
sources: []
db: []
extra: true
"#;
    let err = Config::parse(yaml, "/srv").unwrap_err();
    assert!(matches!(err, CoreError::ConfigParseError { .. }));
}

#[test]
fn test_rejects_unknown_source_type() {
    let yaml = r#"
sources:
  - id: core
    type: github
    path: migrations
db: []
"#;
    assert!(Config::parse(yaml, "/srv").is_err());
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), FULL_CONFIG).unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.root(), dir.path());
    let resolved = config.target("analytics").unwrap();
    assert_eq!(
        config.source_dir(resolved.source),
        dir.path().join("migrations")
    );
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_reports_file_path_on_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.yml");
    std::fs::write(&path, "sources: [").unwrap();

    let err = Config::load(&path).unwrap_err();
    match err {
        CoreError::ConfigParseError { path: reported, .. } => {
            assert_eq!(reported, path.display().to_string());
        }
        other => panic!("unexpected error: {other}"),
    }
}
