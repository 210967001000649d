//! Logging utilities for the conversion programs.
//!
//! Each invocation installs its own subscriber (a daily-rotated log file plus
//! stderr) as the thread default and keeps it alive through the returned
//! guard. Helpers below give the pipeline steps uniform structured fields.

use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::subscriber::DefaultGuard;
use tracing::{debug, error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};
use uuid::Uuid;

use crate::colormaps::ColorRamp;
use crate::error::{Result, TilesError};

/// Environment variable naming the log directory
pub const LOG_PATH_ENV: &str = "LOG_PATH";

/// Log directory from `LOG_PATH`, `./logs` when unset
pub fn log_dir() -> PathBuf {
    std::env::var_os(LOG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install the file and stderr subscriber for the current thread.
///
/// `RUST_LOG` overrides `log_level`. Logging stops when the guard is dropped.
pub fn init_tracing(log_level: &str, log_dir: &Path, file_name: &str) -> Result<DefaultGuard> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };
    let filter = EnvFilter::try_new(&filter).map_err(|e| TilesError::Config {
        message: format!("Invalid log filter {}: {}", filter, e),
    })?;

    std::fs::create_dir_all(log_dir)?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .build(log_dir)
        .map_err(|e| TilesError::Config {
            message: format!("Failed to open log file in {}: {}", log_dir.display(), e),
        })?;

    let subscriber = Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false));

    Ok(tracing::subscriber::set_default(subscriber))
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation did not complete"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let step_id = Uuid::new_v4();

    debug!(
        operation = operation,
        step_id = %step_id,
        "Starting operation"
    );

    let result = f();

    info!(
        operation = operation,
        step_id = %step_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log the breakpoints and colors a raster is about to be styled with
pub fn log_ramp_summary(variable: &str, ramp: &ColorRamp) {
    info!(
        operation = "color_ramp",
        variable = variable,
        kind = ?ramp.kind(),
        stops = ramp.len(),
        "Color ramp built"
    );
    for stop in ramp.stops() {
        debug!(value = stop.value, color = %stop.hex(), "Color stop");
    }
}

/// Log an error with context
pub fn log_error(error: &TilesError, context: &str) {
    error!(
        error = %error,
        context = context,
        error_type = std::any::type_name_of_val(error),
        "Error occurred"
    );
}

/// Generate a unique run ID
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}
