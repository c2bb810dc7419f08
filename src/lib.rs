//! YektaYar backend database layer.
//!
//! The backend refuses to serve requests until the database gate passes:
//! the connection is established, a liveness probe answers, and every
//! required table from the schema registry exists. See [`db`] for the
//! connection manager, registry, verifier, and reporter.

pub mod db;
pub mod logging;

pub use db::error::DbError;
pub use db::report::{build_report, print_report, render_report, VerificationReport};
pub use db::schema::{TableDefinition, OPTIONAL_TABLES, REQUIRED_TABLES};
pub use db::verify::{verify_tables, verify_tables_or_fail, VerificationResult};
pub use db::{run_startup_checks, Database, DbConfig, GateStatus};
