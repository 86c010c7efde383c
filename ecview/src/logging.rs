//! File logging. The terminal belongs to the chart, so log lines go to a file.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};

use tracing_subscriber::EnvFilter;

/// Filter directives are read from this variable (default `info`).
pub const LOG_ENV: &str = "ECVIEW_LOG";

pub fn default_log_path() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("ecview")
        .join("ecview.log")
}

/// Installs the global subscriber. Returns false (and logs nothing) when the
/// file cannot be opened; the viewer runs regardless.
pub fn init(path: &Path) -> bool {
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return false;
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .is_ok()
}
