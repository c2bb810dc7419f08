use sqlx::SqlitePool;
use tempfile::tempdir;
use yektayar_lib::db::{init, schema};
use yektayar_lib::{verify_tables, Database, DbConfig, GateStatus};

async fn open_db(dir: &tempfile::TempDir) -> (Database, SqlitePool) {
    let config = DbConfig::new(dir.path().join("init.sqlite3"));
    let db = Database::new();
    let pool = db.initialize(&config).await.expect("initialize");
    (db, pool)
}

#[tokio::test]
async fn creates_every_registry_table_from_empty() {
    let dir = tempdir().expect("temp dir");
    let (db, pool) = open_db(&dir).await;

    let created = init::create_missing_tables(&pool).await.expect("create");
    let mut expected: Vec<String> = schema::REQUIRED_TABLES
        .iter()
        .map(|t| t.name.to_string())
        .collect();
    expected.extend(schema::OPTIONAL_TABLES.iter().map(|t| t.name.to_string()));
    assert_eq!(created, expected);

    let result = verify_tables(&pool).await;
    assert_eq!(result.status(), GateStatus::Ready);

    db.close().await;
}

#[tokio::test]
async fn second_run_creates_nothing() {
    let dir = tempdir().expect("temp dir");
    let (db, pool) = open_db(&dir).await;

    init::create_missing_tables(&pool).await.expect("first run");
    let created = init::create_missing_tables(&pool).await.expect("second run");
    assert!(created.is_empty());

    db.close().await;
}

#[tokio::test]
async fn only_missing_tables_are_created() {
    let dir = tempdir().expect("temp dir");
    let (db, pool) = open_db(&dir).await;

    let users = schema::find("users").expect("users definition");
    for stmt in users
        .create_sql
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        sqlx::query(stmt).execute(&pool).await.expect("create users");
    }

    let created = init::create_missing_tables(&pool).await.expect("create");
    assert!(!created.contains(&"users".to_string()));
    assert!(created.contains(&"sessions".to_string()));

    db.close().await;
}

#[tokio::test]
async fn seed_defaults_is_idempotent() {
    let dir = tempdir().expect("temp dir");
    let (db, pool) = open_db(&dir).await;
    init::create_missing_tables(&pool).await.expect("create");

    init::seed_defaults(&pool).await.expect("first seed");
    init::seed_defaults(&pool).await.expect("second seed");

    let settings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
        .fetch_one(&pool)
        .await
        .expect("count settings");
    assert_eq!(settings, 6);

    let pages: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pages WHERE slug = 'about-us'")
        .fetch_one(&pool)
        .await
        .expect("count pages");
    assert_eq!(pages, 1);

    db.close().await;
}

#[tokio::test]
async fn seeding_never_overwrites_operator_edits() {
    let dir = tempdir().expect("temp dir");
    let (db, pool) = open_db(&dir).await;
    init::create_missing_tables(&pool).await.expect("create");
    init::seed_defaults(&pool).await.expect("seed");

    sqlx::query("UPDATE settings SET value = 'support@yektayar.example' WHERE key = 'contact_email'")
        .execute(&pool)
        .await
        .expect("edit setting");

    init::seed_defaults(&pool).await.expect("reseed");
    let value: String =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = 'contact_email'")
            .fetch_one(&pool)
            .await
            .expect("read setting");
    assert_eq!(value, "support@yektayar.example");

    db.close().await;
}
