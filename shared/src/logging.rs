//! Shared logging utilities for consistent tracing across binaries

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Build the `EnvFilter` directive string for a base level
pub fn level_filter(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("readiness={base_level},shared={base_level},reqwest=warn,hyper=warn")
}

/// Initialize the stdout tracing subscriber with an optional log level
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = level_filter(log_level);

    // A subscriber may already be installed by an embedding application
    let _ = fmt()
        .with_env_filter(EnvFilter::new(&filter))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}

/// Initialize tracing at the default level
pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for evaluation-scoped debug logging
#[macro_export]
macro_rules! eval_debug {
    ($evaluation:expr, $($arg:tt)*) => {
        tracing::debug!(
            evaluation = %$evaluation,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for evaluation-scoped info logging
#[macro_export]
macro_rules! eval_info {
    ($evaluation:expr, $($arg:tt)*) => {
        tracing::info!(
            evaluation = %$evaluation,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for evaluation-scoped warning logging
#[macro_export]
macro_rules! eval_warn {
    ($evaluation:expr, $($arg:tt)*) => {
        tracing::warn!(
            evaluation = %$evaluation,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(component: &str, details: &str) {
    info!(
        component = component,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for shutdown messages
pub fn log_shutdown(component: &str, reason: &str) {
    info!(
        component = component,
        timestamp = format_timestamp(),
        "🛑 Shutting down: {}",
        reason
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(component: &str, context: &str, error: &dyn std::fmt::Display) {
    error!(
        component = component,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}
