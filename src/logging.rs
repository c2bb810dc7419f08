/// Install the tracing subscriber for binaries.
///
/// JSON lines to stderr, filtered by `YEKTAYAR_LOG` (defaults to info for
/// this crate, warn for sqlx). Stdout is reserved for reports and `--json`
/// payloads. Safe to call more than once; later calls are no-ops.
pub fn init() {
    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("YEKTAYAR_LOG").unwrap_or_else(|_| "yektayar=info,sqlx=warn".into()),
        )
        .json()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .try_init();
}
