//! Structured logging using **tracing**.
//!
//! Pipeline stages emit `debug!` events (types found, members, planned ops);
//! the driver reports run-level events through [`log_event`]. The JSON
//! subscriber writes to stderr so stdout stays free for `--print` and
//! `--json` output.

use tracing::{error, info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at startup.
///
/// # Environment Variables
/// - `RUST_LOG`: Controls log filtering (e.g., `RUST_LOG=goenum_core=debug`)
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_current_span(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs a named event; `ERROR` and `WARN` map to their levels, anything else
/// is info.
pub fn log_event(event: &str, detail: &str) {
    match event.to_uppercase().as_str() {
        "ERROR" => error!(event = %event, detail = %detail),
        "WARN" | "WARNING" => warn!(event = %event, detail = %detail),
        _ => info!(event = %event, detail = %detail),
    }
}
