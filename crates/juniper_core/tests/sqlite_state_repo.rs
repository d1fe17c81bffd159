use chrono::NaiveDate;
use juniper_core::db::migrations::latest_version;
use juniper_core::{
    open_db, open_db_in_memory, Consultation, DbError, LedgerStore, RepoError,
    SqliteStateRepository, StateRepository, STATE_DOCUMENT_KEY,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("juniper.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv_store");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
fn missing_key_loads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::new(&conn);
    assert_eq!(repo.key(), STATE_DOCUMENT_KEY);
    assert!(repo.load_document().unwrap().is_none());
}

#[test]
fn save_overwrites_previous_document() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::new(&conn);

    repo.save_document(r#"{"days":{}}"#).unwrap();
    repo.save_document(r#"{"masterConsultations":[]}"#).unwrap();

    assert_eq!(
        repo.load_document().unwrap().as_deref(),
        Some(r#"{"masterConsultations":[]}"#)
    );
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_store;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn blank_document_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStateRepository::new(&conn);
    assert!(matches!(
        repo.save_document("  "),
        Err(RepoError::InvalidData(_))
    ));
}

#[test]
fn keys_are_isolated() {
    let conn = open_db_in_memory().unwrap();
    let primary = SqliteStateRepository::new(&conn);
    let scratch = SqliteStateRepository::with_key(&conn, "scratch");

    scratch.save_document("{}").unwrap();
    assert!(primary.load_document().unwrap().is_none());
}

#[test]
fn ledger_survives_reopening_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("juniper.sqlite3");
    let day: NaiveDate = "2024-01-10".parse().unwrap();

    let id = {
        let conn = open_db(&path).unwrap();
        let mut store = LedgerStore::open(SqliteStateRepository::new(&conn));
        store
            .append(Consultation::new("Kim", "010-1234-5678", "piano", ""), day)
            .unwrap()
    };

    let conn = open_db(&path).unwrap();
    let store = LedgerStore::open(SqliteStateRepository::new(&conn));
    let report = store.day_report(day);
    assert_eq!(report.consultations.len(), 1);
    assert_eq!(report.consultations[0].item.id, id);
    assert_eq!(report.consultations[0].date, day);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "expected table `{table_name}` to exist");
}
