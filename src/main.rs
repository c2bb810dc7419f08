use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use yektayar_lib::db::{init, report, verify};
use yektayar_lib::{run_startup_checks, Database, DbConfig, DbError, GateStatus};

#[derive(Debug, Parser)]
#[command(name = "yektayar", about = "YektaYar backend database tooling", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database readiness and initialization commands.
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Run the startup verification pass and report table status.
    Verify {
        /// Emit the raw JSON report instead of the table view.
        #[arg(long)]
        json: bool,
    },
    /// Create missing tables from the schema registry and seed defaults.
    Init {
        /// Create tables only; skip the default settings and pages rows.
        #[arg(long)]
        skip_seed: bool,
    },
    /// Check database connectivity with a round-trip query.
    Ping,
}

fn main() {
    yektayar_lib::logging::init();

    let cli = Cli::parse();
    match handle_cli(cli.command) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(1);
        }
    }
}

fn handle_cli(command: Commands) -> Result<i32> {
    match command {
        Commands::Db(db) => handle_db_command(db),
    }
}

fn handle_db_command(command: DbCommand) -> Result<i32> {
    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let config = DbConfig::new(default_db_path().context("determine database path")?);

    match command {
        DbCommand::Verify { json } => runtime.block_on(handle_db_verify(&config, json)),
        DbCommand::Init { skip_seed } => runtime.block_on(handle_db_init(&config, skip_seed)),
        DbCommand::Ping => runtime.block_on(handle_db_ping(&config)),
    }
}

async fn handle_db_verify(config: &DbConfig, json: bool) -> Result<i32> {
    let db = Database::new();

    if json {
        let pool = db.initialize(config).await?;
        db.verify_connection().await?;
        let result = verify::verify_tables(&pool).await;
        let rendered = report::build_report(&result);
        println!(
            "{}",
            serde_json::to_string_pretty(&rendered).context("serialize verification report")?
        );
        db.close().await;
        return Ok(result.status().exit_code());
    }

    let outcome = run_startup_checks(&db, config).await;
    db.close().await;
    match outcome {
        Ok(report) => Ok(report.status.exit_code()),
        Err(err @ DbError::SchemaVerification { .. }) => {
            // The report has already been printed; the exit code carries
            // the failure.
            eprintln!("Error: {err}");
            Ok(GateStatus::Failed.exit_code())
        }
        Err(err) => Err(err.into()),
    }
}

async fn handle_db_init(config: &DbConfig, skip_seed: bool) -> Result<i32> {
    let db = Database::new();
    let pool = db.initialize(config).await?;

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

    if !skip_seed {
        init::seed_defaults(&pool).await.context("seed defaults")?;
    }

    let result = verify::verify_tables(&pool).await;
    report::print_report(&report::build_report(&result));
    db.close().await;
    Ok(result.status().exit_code())
}

async fn handle_db_ping(config: &DbConfig) -> Result<i32> {
    let db = Database::new();
    db.initialize(config).await?;
    db.verify_connection().await?;
    db.close().await;
    println!("Database connection OK.");
    Ok(0)
}

fn default_db_path() -> Result<PathBuf> {
    if let Ok(fake) = std::env::var("YEKTAYAR_FAKE_APPDATA") {
        return Ok(PathBuf::from(fake).join("yektayar.sqlite3"));
    }

    let base = dirs::data_dir()
        .or_else(|| std::env::current_dir().ok())
        .ok_or_else(|| anyhow::anyhow!("failed to resolve application data directory"))?;
    Ok(base.join("com.yektayar.backend").join("yektayar.sqlite3"))
}
