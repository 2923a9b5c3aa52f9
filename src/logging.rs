use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "veil-home.log";
const DEFAULT_FILTER: &str = "info,veil_companion=debug,hyper=warn,reqwest=warn";
const LOG_RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Console output plus a daily file under the local data directory.
///
/// Keep the returned guard alive for as long as file logging should flush.
pub fn init_logging() -> WorkerGuard {
    let log_dir = log_directory();

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE));

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .with(
            fmt::layer()
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .init();

    tracing::info!(
        "Veil home {} logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );

    remove_stale_logs(&log_dir, LOG_RETENTION);

    guard
}

fn log_directory() -> PathBuf {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("veil-companion")
        .join("logs");

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create log directory: {}", e);
    }

    log_dir
}

/// Rotated files are `veil-home.log.<date>`; the bare name is never removed
fn is_rotated_log(filename: &str) -> bool {
    filename.starts_with(LOG_FILE) && filename != LOG_FILE
}

/// Rotated log files last modified before `now - max_age`
fn stale_logs(log_dir: &Path, max_age: Duration) -> std::io::Result<Vec<PathBuf>> {
    let cutoff = SystemTime::now()
        .checked_sub(max_age)
        .unwrap_or(SystemTime::UNIX_EPOCH);

    let stale = std::fs::read_dir(log_dir)?
        .flatten()
        .filter(|entry| entry.file_name().to_str().is_some_and(is_rotated_log))
        .filter(|entry| {
            entry
                .metadata()
                .and_then(|m| m.modified())
                .is_ok_and(|modified| modified < cutoff)
        })
        .map(|entry| entry.path())
        .collect();

    Ok(stale)
}

fn remove_stale_logs(log_dir: &Path, max_age: Duration) {
    let stale = match stale_logs(log_dir, max_age) {
        Ok(stale) => stale,
        Err(e) => {
            tracing::warn!("Failed to read log directory for cleanup: {}", e);
            return;
        }
    };

    for path in stale {
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!("Removed old log file: {:?}", path),
            Err(e) => tracing::warn!("Failed to remove old log file {:?}: {}", path, e),
        }
    }
}
