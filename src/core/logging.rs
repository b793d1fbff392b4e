//! File logging for the terminal UI.
//!
//! The TUI owns stdout/stderr while running, so everything goes to a JSON
//! file under `<data_dir>/logs`, rolled daily. Rolled files from previous
//! days are gzip-compressed in the background.
//!
//! Code logs through the `log` macros; `tracing-subscriber` picks those up
//! through its `log` bridge, alongside the `tracing` spans on API calls.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const LOG_FILE_PREFIX: &str = "sahityotsav.log";
const DEFAULT_FILTER: &str = "info";

/// Initialize file logging.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered lines are flushed on shutdown.
pub fn init_tui(data_dir: &Path) -> WorkerGuard {
    let log_dir = data_dir.join("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Failed to create logs directory {}: {e}", log_dir.display());
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(env_filter);

    // No stdout layer, the TUI owns the terminal
    if let Err(e) = tracing_subscriber::registry().with(file_layer).try_init() {
        eprintln!("Failed to initialize logging: {e}");
    }

    let compress_dir = log_dir.clone();
    std::thread::spawn(move || compress_old_logs(&compress_dir));

    log::info!(
        "Logging initialized. Writing to {} (daily rolling)",
        log_dir.join(LOG_FILE_PREFIX).display()
    );

    guard
}

/// Compress rolled log files that are not from today.
fn compress_old_logs(log_dir: &Path) {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };

    for path in entries.flatten().map(|e| e.path()) {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !should_compress(name, &today) {
            continue;
        }
        match compress_file(&path) {
            Ok(gz) => log::info!("Compressed old log {}", gz.display()),
            Err(e) => log::warn!("Failed to compress old log {}: {e}", path.display()),
        }
    }
}

/// Rolled files are named `<prefix>.YYYY-MM-DD`.
fn should_compress(file_name: &str, today: &str) -> bool {
    match file_name.strip_prefix(LOG_FILE_PREFIX) {
        Some(rest) => {
            rest.starts_with('.') && !rest.ends_with(".gz") && !rest.ends_with(today)
        }
        None => false,
    }
}

fn compress_file(path: &Path) -> io::Result<PathBuf> {
    let mut gz_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "No filename"))?
        .to_os_string();
    gz_name.push(".gz");
    let gz_path = path.with_file_name(gz_name);

    if gz_path.exists() {
        return Ok(gz_path);
    }

    let mut reader = io::BufReader::new(fs::File::open(path)?);
    let mut encoder = GzEncoder::new(fs::File::create(&gz_path)?, Compression::default());
    io::copy(&mut reader, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(gz_path)
}
