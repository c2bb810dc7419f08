//! Table existence verification against the live database catalog.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use ts_rs::TS;

use super::error::DbError;
use super::schema::{self, TableDefinition};
use super::GateStatus;

/// A catalog query that failed outright, as opposed to reporting the table
/// absent. The table is still counted as missing, but the report renders
/// the error so operators do not mistake "cannot determine" for "absent".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TableCheckError {
    pub table: String,
    pub error: String,
}

/// Outcome of one verification pass. Constructed fresh per pass and never
/// mutated afterwards; two passes against an unchanged database compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Expected tables found in the database, registry declaration order.
    pub existing: Vec<String>,
    /// Required tables not found, registry declaration order.
    pub missing_required: Vec<String>,
    /// Optional tables not found, registry declaration order.
    pub missing_optional: Vec<String>,
    /// Existence checks that failed with a query error.
    pub check_errors: Vec<TableCheckError>,
    /// Number of user tables present in the database, expected or not.
    pub total_tables: usize,
    /// SHA-256 over the ordered catalog rows, for comparing environments.
    pub schema_hash: String,
}

impl VerificationResult {
    /// True when startup may proceed. A failed existence check refuses
    /// startup even for an optional table.
    pub fn ok(&self) -> bool {
        self.missing_required.is_empty() && self.check_errors.is_empty()
    }

    pub fn status(&self) -> GateStatus {
        if !self.ok() {
            GateStatus::Failed
        } else if self.missing_optional.is_empty() {
            GateStatus::Ready
        } else {
            GateStatus::Degraded
        }
    }

    /// Total number of registry entries this result covers.
    pub fn expected_tables(&self) -> usize {
        self.existing.len() + self.missing_required.len() + self.missing_optional.len()
    }

    /// Every table that blocks startup: missing required tables first,
    /// then tables whose existence could not be determined.
    pub fn blocking_tables(&self) -> Vec<String> {
        let mut blocking = self.missing_required.clone();
        for check in &self.check_errors {
            if !blocking.contains(&check.table) {
                blocking.push(check.table.clone());
            }
        }
        blocking
    }
}

/// Check whether a single table exists in the catalog.
pub async fn table_exists(pool: &SqlitePool, name: &str) -> Result<bool, sqlx::Error> {
    let row: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

/// Run a full verification pass over the schema registry.
///
/// Existence checks run sequentially. The pass itself never errors:
/// catalog failures are captured per table.
pub async fn verify_tables(pool: &SqlitePool) -> VerificationResult {
    verify_definitions(pool, &schema::all_tables()).await
}

pub(crate) async fn verify_definitions(
    pool: &SqlitePool,
    defs: &[TableDefinition],
) -> VerificationResult {
    let mut outcomes: Vec<(TableDefinition, Result<bool, String>)> = Vec::with_capacity(defs.len());
    for def in defs {
        let outcome = match table_exists(pool, def.name).await {
            Ok(found) => Ok(found),
            Err(err) => {
                tracing::warn!(
                    target: "yektayar",
                    event = "table_check_failed",
                    table = %def.name,
                    error = %err
                );
                Err(err.to_string())
            }
        };
        outcomes.push((*def, outcome));
    }

    let mut result = partition(outcomes);
    result.total_tables = count_user_tables(pool).await.unwrap_or(0);
    result.schema_hash = compute_schema_hash(pool).await.unwrap_or_default();
    result
}

/// Verify and fail fast: the entry point startup code calls.
///
/// The error carries every table that blocked startup, `missing_required`
/// first, then tables whose existence could not be determined.
pub async fn verify_tables_or_fail(pool: &SqlitePool) -> Result<VerificationResult, DbError> {
    let result = verify_tables(pool).await;
    if result.ok() {
        return Ok(result);
    }
    Err(DbError::SchemaVerification {
        missing: result.blocking_tables(),
    })
}

/// Pure classification step: partitions registry entries by check outcome,
/// preserving input order within each partition.
fn partition(outcomes: Vec<(TableDefinition, Result<bool, String>)>) -> VerificationResult {
    let mut existing = Vec::new();
    let mut missing_required = Vec::new();
    let mut missing_optional = Vec::new();
    let mut check_errors = Vec::new();

    for (def, outcome) in outcomes {
        let found = match outcome {
            Ok(found) => found,
            Err(error) => {
                check_errors.push(TableCheckError {
                    table: def.name.to_string(),
                    error,
                });
                false
            }
        };
        if found {
            existing.push(def.name.to_string());
        } else if def.required {
            missing_required.push(def.name.to_string());
        } else {
            missing_optional.push(def.name.to_string());
        }
    }

    VerificationResult {
        existing,
        missing_required,
        missing_optional,
        check_errors,
        total_tables: 0,
        schema_hash: String::new(),
    }
}

async fn count_user_tables(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_one(pool)
    .await?;
    Ok(count as usize)
}

async fn compute_schema_hash(pool: &SqlitePool) -> Result<String, sqlx::Error> {
    let rows: Vec<(String, String, String, Option<String>)> = sqlx::query_as(
        "SELECT type, name, tbl_name, sql FROM sqlite_master\n         WHERE type IN ('table','index','trigger','view')\n         ORDER BY type, name",
    )
    .fetch_all(pool)
    .await?;

    let mut hasher = Sha256::new();
    for (ty, name, tbl, sql) in rows {
        hasher.update(ty.as_bytes());
        hasher.update([0u8]);
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(tbl.as_bytes());
        hasher.update([0u8]);
        if let Some(sql) = sql {
            hasher.update(sql.as_bytes());
        }
        hasher.update([0u8]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}
