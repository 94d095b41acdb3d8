//! Helpers that turn values into `tracing` fields

use std::time::Duration;

/// Records the error as an error value, so that the subscriber renders its
/// whole `source()` chain
#[must_use]
pub fn tracing_err<'a, E: std::error::Error + 'static>(err: &'a E) -> impl tracing::Value + 'a {
    err as &dyn std::error::Error
}

/// Durations are logged in seconds, the same unit the metrics use
pub(crate) fn tracing_duration(duration: Duration) -> impl tracing::Value {
    tracing::field::display(format_seconds(duration))
}

fn format_seconds(duration: Duration) -> String {
    format!("{:.3}s", duration.as_secs_f64())
}
