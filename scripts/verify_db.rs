use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use yektayar_lib::db::{report, verify};
use yektayar_lib::{Database, DbConfig, DbError, GateStatus};

/// Standalone table verification for deploy tooling: exits 0 when the
/// database is ready or degraded, 1 when it is not usable.
#[derive(Parser)]
#[command(name = "verify_db", about = "Verify expected tables exist in a YektaYar database")]
struct Args {
    /// Path to the SQLite database file.
    #[arg(long)]
    db: PathBuf,
    /// Emit the raw JSON report instead of the table view.
    #[arg(long)]
    json: bool,
    /// Budget for the whole pass (connection plus checks), in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    yektayar_lib::logging::init();
    let args = Args::parse();

    if !args.db.exists() {
        return Err(anyhow!(
            "database not found at {} (run init_db first)",
            args.db.display()
        ));
    }

    let config = DbConfig::new(&args.db);
    let db = Database::new();
    let result = tokio::time::timeout(Duration::from_millis(args.timeout_ms), async {
        let pool = db.initialize(&config).await?;
        db.verify_connection().await?;
        Ok::<_, DbError>(verify::verify_tables(&pool).await)
    })
    .await
    .map_err(|_| DbError::StartupTimeout {
        timeout_ms: args.timeout_ms,
    })??;

    let rendered = report::build_report(&result);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rendered).context("serialize verification report")?
        );
    } else {
        report::print_report(&rendered);
    }
    db.close().await;

    match rendered.status {
        GateStatus::Failed => process::exit(1),
        _ => Ok(()),
    }
}
