use directories::ProjectDirs;
use std::fs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "WISHLETTER_LOG";

/// Sends tracing output to a daily log file in the data directory; the
/// terminal itself belongs to the UI. Keep the guard alive until exit so
/// buffered lines get flushed.
pub fn init() -> Option<WorkerGuard> {
    let dirs = ProjectDirs::from("", "", "wishletter")?;
    let log_dir = dirs.data_local_dir().join("logs");
    fs::create_dir_all(&log_dir).ok()?;

    let appender = tracing_appender::rolling::daily(log_dir, "wishletter.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
