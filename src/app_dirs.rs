use directories::ProjectDirs;
use std::path::PathBuf;

pub const DB_FILE_NAME: &str = "progress.db";
pub const LOG_FILE_NAME: &str = "hsk-deck.log";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("hsk-deck"),
            )
        } else {
            ProjectDirs::from("", "", "hsk-deck")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(DB_FILE_NAME))
    }

    pub fn log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join(LOG_FILE_NAME))
    }

    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "hsk-deck") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("hsk_deck_config.json")
        }
    }
}
