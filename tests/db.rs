//! Integration tests for the database handle.

use odds::db::{Database, DbConfig, DbError};
use odds::logging::LogSink;
use rusqlite::types::Value;

fn memory() -> Database {
    Database::connect(&DbConfig::default().with_dsn("sqlite::memory:"), None).unwrap()
}

#[test]
fn exec_insert_and_query() {
    let db = memory();
    db.exec_batch(
        "CREATE TABLE hosts (id INTEGER PRIMARY KEY, name TEXT NOT NULL, seen INTEGER);",
    )
    .unwrap();

    assert_eq!(db.exec("INSERT INTO hosts (name, seen) VALUES ('alpha', 10)").unwrap(), 1);
    assert_eq!(db.last_insert_id(), 1);

    {
        let mut stmt = db.prepare("INSERT INTO hosts (name, seen) VALUES (?1, ?2)").unwrap();
        stmt.execute(rusqlite::params!["beta", 20]).unwrap();
    }
    assert_eq!(db.last_insert_id(), 2);

    let result = db
        .query("SELECT name, seen FROM hosts WHERE seen > ?1 ORDER BY id", [5])
        .unwrap();
    assert_eq!(result.columns, vec!["name", "seen"]);
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.get(1, "name"), Some(&Value::Text("beta".into())));
    assert_eq!(result.get(0, "seen"), Some(&Value::Integer(10)));
    assert_eq!(result.get(0, "missing"), None);
}

#[test]
fn failures_are_recorded_as_last_error() {
    let db = memory();
    assert!(db.last_error().is_none());

    let err = db.exec("SELECT * FROM nowhere").unwrap_err();
    assert!(matches!(err, DbError::Sql(_)));

    let message = db.last_error().unwrap();
    assert!(message.contains("nowhere"));

    // A later success keeps the last failure around.
    db.exec_batch("CREATE TABLE t (x INTEGER);").unwrap();
    assert_eq!(db.last_error(), Some(message));
}

#[test]
fn foreign_keys_are_enforced() {
    let db = memory();
    db.exec_batch(
        "CREATE TABLE parent (id INTEGER PRIMARY KEY);
         CREATE TABLE child (
             id INTEGER PRIMARY KEY,
             parent_id INTEGER NOT NULL REFERENCES parent (id)
         );",
    )
    .unwrap();

    assert!(db.exec("INSERT INTO child (parent_id) VALUES (42)").is_err());
}

#[test]
fn file_database_persists_between_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odds.db");
    let cfg = DbConfig::default()
        .with_dsn(format!("sqlite:{}", path.display()))
        .with_username("ignored")
        .with_password("ignored");

    {
        let db = Database::connect(&cfg, None).unwrap();
        db.exec_batch(
            "CREATE TABLE kv (k TEXT PRIMARY KEY, v TEXT); INSERT INTO kv VALUES ('a', 'b');",
        )
        .unwrap();
    }

    let db = Database::connect(&cfg, None).unwrap();
    let result = db.query("SELECT v FROM kv WHERE k = 'a'", []).unwrap();
    assert_eq!(result.rows, vec![vec![Value::Text("b".into())]]);
}

#[test]
fn connection_failure_is_logged_then_returned() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("odds.log");
    let sink = LogSink::new(&log_path);

    let target = dir.path().join("missing").join("odds.db");
    let cfg = DbConfig::default().with_dsn(target.display().to_string());
    let err = Database::connect(&cfg, Some(&sink)).unwrap_err();
    assert!(matches!(err, DbError::Connect { .. }));

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.lines().count(), 1);
    assert!(log.contains("[ERROR] Database connection failed: failed to connect to"));
}

#[test]
fn missing_dsn_is_logged_then_returned() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("odds.log");
    let sink = LogSink::new(&log_path);

    let err = Database::connect(&DbConfig::default(), Some(&sink)).unwrap_err();
    assert!(matches!(err, DbError::MissingDsn));

    let log = std::fs::read_to_string(&log_path).unwrap();
    assert!(
        log.trim_end()
            .ends_with("[ERROR] Database connection failed: no database DSN configured")
    );
}
