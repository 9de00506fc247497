use super::*;

#[test]
fn test_parse_script_name() {
    let parsed = parse_script_name("3_add_users.up.sql").unwrap().unwrap();
    assert_eq!(parsed.version, 3);
    assert_eq!(parsed.name, "add_users");
    assert_eq!(parsed.direction, Direction::Up);

    let parsed = parse_script_name("0012_drop.old.columns.down.sql")
        .unwrap()
        .unwrap();
    assert_eq!(parsed.version, 12);
    assert_eq!(parsed.name, "drop.old.columns");
    assert_eq!(parsed.direction, Direction::Down);
}

#[test]
fn test_parse_script_name_ignores_other_files() {
    for name in [
        "README.md",
        "3_add_users.sql",
        "add_users.up.sql",
        "3_.up.sql",
        "3_add_users.sideways.sql",
        "x3_add_users.up.sql",
    ] {
        assert!(
            parse_script_name(name).unwrap().is_none(),
            "expected {name} to be ignored"
        );
    }
}

#[test]
fn test_parse_script_name_version_overflow() {
    let err = parse_script_name("99999999999_huge.up.sql").unwrap_err();
    assert!(matches!(err, CoreError::InvalidScriptName { .. }));
}

#[test]
fn test_prepare_script_strips_transaction_wrapper() {
    let raw = "BEGIN;\nCREATE TABLE t (id INT);\nCOMMIT;\n\n";
    assert_eq!(prepare_script(raw), "CREATE TABLE t (id INT);");
}

#[test]
fn test_prepare_script_keeps_plain_body() {
    let raw = "CREATE TABLE t (id INT);   \n";
    assert_eq!(prepare_script(raw), "CREATE TABLE t (id INT);");
}

#[test]
fn test_parse_script_files_groups_by_version() {
    let files = vec![
        ScriptFile::new("1_users.up.sql", "CREATE TABLE users (id INT);"),
        ScriptFile::new("1_users.down.sql", "DROP TABLE users;"),
        ScriptFile::new("0_init.up.sql", "CREATE SCHEMA app;"),
        ScriptFile::new("2_orders.up.sql", "CREATE TABLE orders (id INT);"),
        ScriptFile::new("notes.txt", "ignored"),
    ];

    let defs = parse_script_files(files).unwrap();
    assert_eq!(defs.len(), 3);

    assert_eq!(defs[0].version, 0);
    assert_eq!(defs[0].name, "init");
    assert!(defs[0].down_script.is_none());

    assert_eq!(defs[1].version, 1);
    assert_eq!(defs[1].up_script, "CREATE TABLE users (id INT);");
    assert_eq!(defs[1].down_script.as_deref(), Some("DROP TABLE users;"));

    assert_eq!(defs[2].version, 2);
    assert!(defs[2].down_script.is_none());
}

#[test]
fn test_parse_script_files_name_from_first_file() {
    let files = vec![
        ScriptFile::new("4_users_v2.up.sql", "SELECT 1;"),
        ScriptFile::new("4_users.down.sql", "SELECT 2;"),
    ];
    let defs = parse_script_files(files).unwrap();
    // "4_users.down.sql" sorts before "4_users_v2.up.sql"
    assert_eq!(defs[0].name, "users");
}

#[test]
fn test_parse_script_files_rejects_duplicate_direction() {
    let files = vec![
        ScriptFile::new("1_users.up.sql", "SELECT 1;"),
        ScriptFile::new("1_accounts.up.sql", "SELECT 2;"),
    ];
    let err = parse_script_files(files).unwrap_err();
    match err {
        CoreError::DuplicateScript {
            version,
            direction,
            first,
            second,
        } => {
            assert_eq!(version, 1);
            assert_eq!(direction, Direction::Up);
            assert_eq!(first, "1_accounts.up.sql");
            assert_eq!(second, "1_users.up.sql");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_parse_script_files_requires_up_script() {
    let files = vec![
        ScriptFile::new("0_init.up.sql", "CREATE SCHEMA app;"),
        ScriptFile::new("1_users.down.sql", "DROP TABLE users;"),
    ];
    let err = parse_script_files(files).unwrap_err();
    assert!(matches!(err, CoreError::MissingUpScript { version: 1, .. }));
}

#[test]
fn test_directory_source_loads_sql_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("0_init.up.sql"), "CREATE SCHEMA app;").unwrap();
    std::fs::write(dir.path().join("0_init.down.sql"), "DROP SCHEMA app CASCADE;").unwrap();
    std::fs::write(
        dir.path().join("1_users.up.sql"),
        "BEGIN;\nCREATE TABLE users (id INT);\nCOMMIT;",
    )
    .unwrap();
    std::fs::write(dir.path().join("README.md"), "# migrations").unwrap();
    std::fs::create_dir(dir.path().join("2_nested.up.sql")).unwrap();

    let source = DirectorySource::new(dir.path());
    let set = load_migration_set(&source).unwrap();

    assert_eq!(set.len(), 2);
    assert_eq!(set.latest_version(), Some(1));
    assert_eq!(
        set.get(1).unwrap().up_script,
        "CREATE TABLE users (id INT);"
    );
    assert!(source.describe().contains("directory"));
}

#[test]
fn test_directory_source_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let source = DirectorySource::new(dir.path().join("does_not_exist"));
    let err = source.load_definitions().unwrap_err();
    assert!(matches!(err, CoreError::SourceNotFound { .. }));
}
