//! File logging.
//!
//! The terminal belongs to the UI, so log output goes to a file in the
//! platform data directory.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use lumen_config::{LoggingConfig, default_log_path};
use tracing::Level;

/// Install the global subscriber. Logging stays off if the file cannot be opened.
pub fn init(config: &LoggingConfig) {
    let Some(path) = default_log_path() else {
        return;
    };
    if let Some(parent) = path.parent()
        && fs::create_dir_all(parent).is_err()
    {
        return;
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(parse_level(&config.level))
        .try_init();
}

fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}
