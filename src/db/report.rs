//! Operator-facing rendering of verification results.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::schema;
use super::verify::{TableCheckError, VerificationResult};
use super::GateStatus;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TableLine {
    pub name: String,
    pub description: String,
}

/// Structured verification report, serialized for the admin panel and the
/// `--json` CLI mode. Section ordering is fixed: found tables, then missing
/// required (critical), then missing optional (advisory).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VerificationReport {
    pub status: GateStatus,
    pub found: Vec<TableLine>,
    pub missing_required: Vec<TableLine>,
    pub missing_optional: Vec<TableLine>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub check_errors: Vec<TableCheckError>,
    #[ts(type = "number")]
    pub total_tables: usize,
    pub schema_hash: String,
    pub app_version: String,
    pub generated_at: String,
}

fn table_line(name: &str) -> TableLine {
    TableLine {
        name: name.to_string(),
        description: schema::find(name)
            .map(|t| t.description.to_string())
            .unwrap_or_default(),
    }
}

/// Build the structured report for a verification result. Pure apart from
/// the `generated_at` timestamp.
pub fn build_report(result: &VerificationResult) -> VerificationReport {
    VerificationReport {
        status: result.status(),
        found: result.existing.iter().map(|n| table_line(n)).collect(),
        missing_required: result
            .missing_required
            .iter()
            .map(|n| table_line(n))
            .collect(),
        missing_optional: result
            .missing_optional
            .iter()
            .map(|n| table_line(n))
            .collect(),
        check_errors: result.check_errors.clone(),
        total_tables: result.total_tables,
        schema_hash: result.schema_hash.clone(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

/// Render the report as table-style text.
pub fn render_report(report: &VerificationReport) -> String {
    let expected =
        report.found.len() + report.missing_required.len() + report.missing_optional.len();
    let mut out = String::new();

    out.push_str("Database verification report\n");
    out.push_str(&format!("Status       : {}\n", report.status.as_str()));
    out.push_str(&format!(
        "Tables found : {}/{} expected ({} in database)\n",
        report.found.len(),
        expected,
        report.total_tables
    ));
    let hash = if report.schema_hash.is_empty() {
        "-"
    } else {
        report.schema_hash.as_str()
    };
    out.push_str(&format!("Schema hash  : {hash}\n"));
    out.push_str(&format!("App version  : {}\n", report.app_version));
    out.push_str(&format!("Generated at : {}\n", report.generated_at));

    if report.found.is_empty() {
        out.push_str("\nFound tables: none\n");
    } else {
        out.push_str("\nFound tables:\n");
        for line in &report.found {
            out.push_str(&format!("  {:<20} {}\n", line.name, line.description));
        }
    }

    if !report.missing_required.is_empty() {
        out.push_str("\nMissing required tables (critical):\n");
        for line in &report.missing_required {
            out.push_str(&format!("  {:<20} {}\n", line.name, line.description));
        }
        out.push_str("The backend cannot start until these tables exist; run `init_db` to create them.\n");
    }

    if !report.missing_optional.is_empty() {
        out.push_str("\nMissing optional tables (advisory):\n");
        for line in &report.missing_optional {
            out.push_str(&format!("  {:<20} {}\n", line.name, line.description));
        }
        out.push_str("Some features will be unavailable until these tables exist.\n");
    }

    if !report.check_errors.is_empty() {
        out.push_str("\nFailed existence checks:\n");
        for check in &report.check_errors {
            out.push_str(&format!(
                "  {:<20} {}\n",
                check.table,
                check.error.replace('\n', " ")
            ));
        }
    }

    out
}

/// Print the report to stdout. Never fails: if the write fails, a minimal
/// status line goes to stderr instead.
pub fn print_report(report: &VerificationReport) {
    use std::io::Write;

    let text = render_report(report);
    let mut stdout = std::io::stdout();
    if stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.flush())
        .is_err()
    {
        eprintln!("table verification: status={}", report.status.as_str());
    }
}
