//! Database readiness layer: connection lifecycle, schema verification,
//! and the startup gate that decides whether the backend may begin serving.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, SqlitePool};
use ts_rs::TS;

pub mod error;
pub mod init;
pub mod report;
pub mod schema;
pub mod verify;

pub use error::DbError;

/// Outcome of the startup gate.
///
/// `Ready` and `Degraded` allow the process to proceed; `Failed` aborts the
/// startup attempt. A missing optional table never fails the gate, and a
/// present optional table never upgrades a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GateStatus {
    Ready,
    Degraded,
    Failed,
}

impl GateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateStatus::Ready => "ready",
            GateStatus::Degraded => "degraded",
            GateStatus::Failed => "failed",
        }
    }

    /// Process exit contract: `Ready`/`Degraded` exit 0, `Failed` non-zero.
    pub fn exit_code(&self) -> i32 {
        match self {
            GateStatus::Ready | GateStatus::Degraded => 0,
            GateStatus::Failed => 1,
        }
    }
}

/// Driver-level settings for the process-wide connection.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub db_path: PathBuf,
    pub max_connections: u32,
    pub busy_timeout_ms: u32,
    /// Budget for the whole startup pass: connection plus every existence
    /// check. Elapsing it is a `Failed` outcome, not "tables missing".
    pub startup_timeout_ms: u64,
}

impl DbConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        DbConfig {
            db_path: db_path.into(),
            max_connections: 8,
            busy_timeout_ms: 5_000,
            startup_timeout_ms: 30_000,
        }
    }
}

enum Lifecycle {
    Uninitialized,
    Connected(SqlitePool),
    Closed,
}

/// Owner of the single process-wide database handle.
///
/// The pool lives behind a lifecycle slot; `close()` and `handle()`
/// resolve under the same lock, which is never held across an await.
/// Once closed, the manager stays closed; re-connecting takes a fresh
/// `Database`.
pub struct Database {
    lifecycle: Mutex<Lifecycle>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    pub fn new() -> Self {
        Database {
            lifecycle: Mutex::new(Lifecycle::Uninitialized),
        }
    }

    /// Establish the connection. Calling this on an already-connected
    /// manager returns the existing handle, so defensive callers in
    /// scripts are safe.
    pub async fn initialize(&self, config: &DbConfig) -> Result<SqlitePool, DbError> {
        {
            let guard = self.lock();
            match &*guard {
                Lifecycle::Connected(pool) => return Ok(pool.clone()),
                Lifecycle::Closed => return Err(DbError::ConnectionClosed),
                Lifecycle::Uninitialized => {}
            }
        }

        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DbError::Connection(sqlx::Error::Io(e)))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Full)
            .foreign_keys(true)
            .log_statements(log::LevelFilter::Off);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(DbError::Connection)?;

        sqlx::query(&format!("PRAGMA busy_timeout = {};", config.busy_timeout_ms))
            .execute(&pool)
            .await
            .ok();
        sqlx::query("PRAGMA wal_autocheckpoint = 1000;")
            .execute(&pool)
            .await
            .ok();

        log_effective_pragmas(&pool, &config.db_path).await;

        let mut guard = self.lock();
        match &*guard {
            // Lost a race with another initializer: keep the first pool.
            Lifecycle::Connected(existing) => {
                let existing = existing.clone();
                drop(guard);
                pool.close().await;
                Ok(existing)
            }
            Lifecycle::Closed => {
                drop(guard);
                pool.close().await;
                Err(DbError::ConnectionClosed)
            }
            Lifecycle::Uninitialized => {
                *guard = Lifecycle::Connected(pool.clone());
                Ok(pool)
            }
        }
    }

    /// Liveness probe: one trivial round trip, independent of schema state.
    pub async fn verify_connection(&self) -> Result<(), DbError> {
        let pool = self.handle()?;
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&pool)
            .await
            .map_err(DbError::Connection)?;
        Ok(())
    }

    /// The query handle for verifiers and repositories. Pool clones share
    /// the same underlying connections.
    pub fn handle(&self) -> Result<SqlitePool, DbError> {
        match &*self.lock() {
            Lifecycle::Uninitialized => Err(DbError::NotInitialized),
            Lifecycle::Connected(pool) => Ok(pool.clone()),
            Lifecycle::Closed => Err(DbError::ConnectionClosed),
        }
    }

    /// Release the connection. Safe to call repeatedly; every call after
    /// the first is a no-op, as is closing a manager that never connected.
    pub async fn close(&self) {
        let pool = {
            let mut guard = self.lock();
            match std::mem::replace(&mut *guard, Lifecycle::Closed) {
                Lifecycle::Connected(pool) => Some(pool),
                Lifecycle::Uninitialized => {
                    *guard = Lifecycle::Uninitialized;
                    None
                }
                Lifecycle::Closed => None,
            }
        };
        if let Some(pool) = pool {
            pool.close().await;
            tracing::info!(target: "yektayar", event = "db_closed");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(|e| e.into_inner())
    }
}

async fn log_effective_pragmas(pool: &SqlitePool, db_path: &std::path::Path) {
    use tracing::{info, warn};

    let (sqlite_ver,): (String,) = sqlx::query_as("select sqlite_version()")
        .fetch_one(pool)
        .await
        .unwrap_or((String::from("unknown"),));

    let jm: (String,) = sqlx::query_as("PRAGMA journal_mode;")
        .fetch_one(pool)
        .await
        .unwrap_or((String::from("unknown"),));

    let fks: (i64,) = sqlx::query_as("PRAGMA foreign_keys;")
        .fetch_one(pool)
        .await
        .unwrap_or((i64::MIN,));

    let busy: (i64,) = sqlx::query_as("PRAGMA busy_timeout;")
        .fetch_one(pool)
        .await
        .unwrap_or((i64::MIN,));

    info!(
        target: "yektayar",
        event = "db_open",
        path = %db_path.display(),
        sqlite_version = %sqlite_ver,
        journal_mode = %jm.0,
        foreign_keys = %fks.0,
        busy_timeout_ms = %busy.0
    );

    if !jm.0.eq_ignore_ascii_case("wal") {
        warn!(
            target: "yektayar",
            event = "db_open_warning",
            msg = "journal_mode != WAL; running with reduced crash safety"
        );
    }
}

/// Run the full startup gate: connect, probe, verify the schema, and print
/// the report. `Ready` and `Degraded` return the report; a `Failed` pass
/// returns `SchemaVerification` after the report has been printed, and an
/// elapsed budget returns `StartupTimeout`.
pub async fn run_startup_checks(
    db: &Database,
    config: &DbConfig,
) -> Result<report::VerificationReport, DbError> {
    let budget = Duration::from_millis(config.startup_timeout_ms);
    match tokio::time::timeout(budget, startup_checks_inner(db, config)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(DbError::StartupTimeout {
            timeout_ms: config.startup_timeout_ms,
        }),
    }
}

async fn startup_checks_inner(
    db: &Database,
    config: &DbConfig,
) -> Result<report::VerificationReport, DbError> {
    let pool = db.initialize(config).await?;
    db.verify_connection().await?;

    let result = verify::verify_tables(&pool).await;
    let rendered = report::build_report(&result);
    report::print_report(&rendered);

    match result.status() {
        GateStatus::Failed => Err(DbError::SchemaVerification {
            missing: result.blocking_tables(),
        }),
        _ => Ok(rendered),
    }
}
