// ==========================================
// NaviGate Alert Engine - Logging Setup
// ==========================================
// tracing + tracing-subscriber, level driven by RUST_LOG.
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging for the daemon.
///
/// # Environment
/// - RUST_LOG: filter expression (default: info),
///   e.g. RUST_LOG=debug or RUST_LOG=navigate_alerts=trace
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// Initialize logging for tests (debug level, test writer, idempotent).
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
