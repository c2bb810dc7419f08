use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use yektayar_lib::db::{init, report, verify};
use yektayar_lib::{Database, DbConfig, GateStatus};

/// Standalone database initialization: create every missing registry table
/// and seed the default rows, then verify.
#[derive(Parser)]
#[command(name = "init_db", about = "Create and seed a YektaYar database")]
struct Args {
    /// Path to the SQLite database file (created if missing).
    #[arg(long)]
    db: PathBuf,
    /// Print what would be created without executing any DDL.
    #[arg(long)]
    dry_run: bool,
    /// Create tables only; skip the default settings and pages rows.
    #[arg(long)]
    skip_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    yektayar_lib::logging::init();
    let args = Args::parse();

    let config = DbConfig::new(&args.db);
    let db = Database::new();
    let pool = db.initialize(&config).await.context("open database")?;

    if args.dry_run {
        let result = verify::verify_tables(&pool).await;
        let mut plan: Vec<&String> = result.missing_required.iter().collect();
        plan.extend(result.missing_optional.iter());
        if plan.is_empty() {
            println!("Nothing to create.");
        } else {
            println!("Plan (create):");
            for name in plan {
                println!("  {name}");
            }
        }
        db.close().await;
        return Ok(());
    }

    let created = init::create_missing_tables(&pool)
        .await
        .context("create missing tables")?;
    if created.is_empty() {
        println!("Nothing to create.");
    } else {
        println!("Created tables:");
        for name in &created {
            println!("  {name}");
        }
    }

    if !args.skip_seed {
        init::seed_defaults(&pool).await.context("seed defaults")?;
    }

    let result = verify::verify_tables(&pool).await;
    report::print_report(&report::build_report(&result));
    db.close().await;

    match result.status() {
        GateStatus::Failed => process::exit(1),
        _ => Ok(()),
    }
}
