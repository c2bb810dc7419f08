use tempfile::tempdir;
use yektayar_lib::db::init;
use yektayar_lib::{run_startup_checks, Database, DbConfig, DbError, GateStatus};

#[tokio::test]
async fn gate_is_ready_after_initialization() {
    let dir = tempdir().expect("temp dir");
    let config = DbConfig::new(dir.path().join("gate.sqlite3"));

    let setup = Database::new();
    let pool = setup.initialize(&config).await.expect("initialize");
    init::create_missing_tables(&pool).await.expect("create");
    setup.close().await;

    let db = Database::new();
    let report = run_startup_checks(&db, &config).await.expect("gate passes");
    assert_eq!(report.status, GateStatus::Ready);
    db.close().await;
}

#[tokio::test]
async fn gate_degrades_when_optional_tables_are_missing() {
    let dir = tempdir().expect("temp dir");
    let config = DbConfig::new(dir.path().join("gate.sqlite3"));

    let setup = Database::new();
    let pool = setup.initialize(&config).await.expect("initialize");
    for def in yektayar_lib::REQUIRED_TABLES {
        for stmt in def
            .create_sql
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            sqlx::query(stmt).execute(&pool).await.expect("create table");
        }
    }
    setup.close().await;

    let db = Database::new();
    let report = run_startup_checks(&db, &config).await.expect("gate passes");
    assert_eq!(report.status, GateStatus::Degraded);
    assert_eq!(report.status.exit_code(), 0);
    db.close().await;
}

#[tokio::test]
async fn gate_fails_fast_on_an_empty_database() {
    let dir = tempdir().expect("temp dir");
    let config = DbConfig::new(dir.path().join("gate.sqlite3"));

    let db = Database::new();
    match run_startup_checks(&db, &config).await {
        Err(DbError::SchemaVerification { missing }) => {
            assert!(missing.contains(&"users".to_string()));
        }
        other => panic!("expected SchemaVerification, got {other:?}"),
    }
    db.close().await;
}

#[tokio::test]
async fn gate_reports_timeout_not_missing_tables() {
    let dir = tempdir().expect("temp dir");
    let mut config = DbConfig::new(dir.path().join("gate.sqlite3"));
    config.startup_timeout_ms = 0;

    let db = Database::new();
    match run_startup_checks(&db, &config).await {
        Err(DbError::StartupTimeout { timeout_ms }) => assert_eq!(timeout_ms, 0),
        other => panic!("expected StartupTimeout, got {other:?}"),
    }
    db.close().await;
}
