use thiserror::Error;

/// Failures surfaced by the database readiness layer.
///
/// `NotInitialized` and `ConnectionClosed` indicate the caller violated the
/// connection lifecycle contract; they are never recovered. The remaining
/// variants describe the database itself and are fatal to the startup
/// attempt that observed them.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),
    #[error("database has not been initialized")]
    NotInitialized,
    #[error("database connection is closed")]
    ConnectionClosed,
    #[error("missing required tables: {}", missing.join(", "))]
    SchemaVerification { missing: Vec<String> },
    #[error("database startup checks timed out after {timeout_ms} ms")]
    StartupTimeout { timeout_ms: u64 },
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
}

impl DbError {
    /// Stable machine-readable code for log events and API payloads.
    pub fn code(&self) -> &'static str {
        match self {
            DbError::Connection(_) => "DB_CONNECTION_FAILED",
            DbError::NotInitialized => "DB_NOT_INITIALIZED",
            DbError::ConnectionClosed => "DB_CONNECTION_CLOSED",
            DbError::SchemaVerification { .. } => "DB_SCHEMA_VERIFICATION_FAILED",
            DbError::StartupTimeout { .. } => "DB_STARTUP_TIMEOUT",
            DbError::Sql(_) => "DB_QUERY_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_verification_lists_tables_in_message() {
        let err = DbError::SchemaVerification {
            missing: vec!["users".into(), "sessions".into()],
        };
        assert_eq!(err.to_string(), "missing required tables: users, sessions");
        assert_eq!(err.code(), "DB_SCHEMA_VERIFICATION_FAILED");
    }

    #[test]
    fn lifecycle_errors_have_stable_codes() {
        assert_eq!(DbError::NotInitialized.code(), "DB_NOT_INITIALIZED");
        assert_eq!(DbError::ConnectionClosed.code(), "DB_CONNECTION_CLOSED");
        assert_eq!(
            DbError::StartupTimeout { timeout_ms: 30_000 }.code(),
            "DB_STARTUP_TIMEOUT"
        );
    }
}
