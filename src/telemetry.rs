//! Tracing setup.
//!
//! `HSK_DECK_LOG` controls the filter (e.g. "debug" or "info,hsk_deck::quiz=debug").
//! Output goes to a file because the terminal belongs to the UI.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "HSK_DECK_LOG";

/// Install the global subscriber writing to `log_path`. Returns false when
/// the file cannot be opened or a subscriber is already installed.
pub fn init_tracing(log_path: &Path) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(parent) = log_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(log_path) {
        Ok(file) => file,
        Err(_) => return false,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .is_ok()
}
