use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "nhl_terminal.log";

/// File-only logging; the terminal belongs to the UI. Returns the writer guard, which
/// must outlive the app for buffered lines to be flushed. `None` means logging is off.
pub fn init_logging(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let dir = log_dir?;

    // `rolling::daily` panics if it cannot create the first file, so check writability.
    if fs::create_dir_all(dir).is_err() {
        return None;
    }
    let marker = dir.join(".write_test");
    if fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&marker)
        .is_err()
    {
        return None;
    }
    let _ = fs::remove_file(&marker);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .try_init()
        .ok()?;
    Some(guard)
}
