use people_core::db::migrations::latest_version;
use people_core::db::{open_db, open_db_from_config, open_db_in_memory, DbError};
use people_core::{StoreConfig, StoreTarget};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_people_table() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "people");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO people (id, name) VALUES ('11111111-2222-4333-8444-555555555555', 'Gina');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_db_from_config_resolves_file_target() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("configured.db");
    let config = StoreConfig {
        target: StoreTarget::File(path.clone()),
        ..StoreConfig::in_memory()
    };

    let conn = open_db_from_config(&config).unwrap();
    assert_table_exists(&conn, "people");
    assert!(path.exists());
}

#[test]
fn in_memory_stores_are_independent() {
    let first = open_db_in_memory().unwrap();
    first
        .execute(
            "INSERT INTO people (id, name) VALUES ('11111111-2222-4333-8444-555555555555', 'Gina');",
            [],
        )
        .unwrap();

    let second = open_db_from_config(&StoreConfig::in_memory()).unwrap();
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM people;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
