use anyhow::Result;
use assert_cmd::Command;
use tempfile::tempdir;

#[test]
fn init_creates_tables_and_verify_passes() -> Result<()> {
    let tmp = tempdir()?;
    let db_path = tmp.path().join("yektayar.sqlite3");

    let output = Command::cargo_bin("init_db")?
        .args(["--db", db_path.to_str().unwrap()])
        .output()?;
    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Created tables:"));
    assert!(stdout.contains("users"));
    assert!(stdout.contains("Status       : ready"));

    let verify = Command::cargo_bin("verify_db")?
        .args(["--db", db_path.to_str().unwrap()])
        .output()?;
    assert!(verify.status.success());
    Ok(())
}

#[test]
fn second_init_has_nothing_to_create() -> Result<()> {
    let tmp = tempdir()?;
    let db_path = tmp.path().join("yektayar.sqlite3");

    Command::cargo_bin("init_db")?
        .args(["--db", db_path.to_str().unwrap()])
        .output()?;
    let output = Command::cargo_bin("init_db")?
        .args(["--db", db_path.to_str().unwrap()])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing to create."));
    Ok(())
}

#[test]
fn dry_run_prints_the_plan_without_creating() -> Result<()> {
    let tmp = tempdir()?;
    let db_path = tmp.path().join("yektayar.sqlite3");

    let output = Command::cargo_bin("init_db")?
        .args(["--db", db_path.to_str().unwrap(), "--dry-run"])
        .output()?;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Plan (create):"));
    assert!(stdout.contains("users"));

    // Nothing was created, so verification still fails.
    let verify = Command::cargo_bin("verify_db")?
        .args(["--db", db_path.to_str().unwrap()])
        .output()?;
    assert_eq!(verify.status.code(), Some(1));
    Ok(())
}

#[tokio::test]
async fn skip_seed_leaves_settings_empty() -> Result<()> {
    let tmp = tempdir()?;
    let db_path = tmp.path().join("yektayar.sqlite3");

    let output = Command::cargo_bin("init_db")?
        .args(["--db", db_path.to_str().unwrap(), "--skip-seed"])
        .output()?;
    assert!(output.status.success());

    let db = yektayar_lib::Database::new();
    let pool = db.initialize(&yektayar_lib::DbConfig::new(&db_path)).await?;
    let settings: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
        .fetch_one(&pool)
        .await?;
    assert_eq!(settings, 0);
    db.close().await;

    // Re-running with seeding enabled fills in the defaults.
    let output = Command::cargo_bin("init_db")?
        .args(["--db", db_path.to_str().unwrap()])
        .output()?;
    assert!(output.status.success());
    Ok(())
}
