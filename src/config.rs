use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::flashcard::{CardOrder, PracticeMode};
use crate::learn::DEFAULT_PAGE_SIZE;
use crate::quiz::QuizConfig;
use crate::vocabulary::HskLevel;

pub const DEFAULT_LOG_CAP: usize = 1000;
pub const DEFAULT_TUTOR_ENDPOINT: &str = "http://127.0.0.1:8787/api/chat";

/// User preferences, persisted as JSON. Missing fields take their defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub level: HskLevel,
    pub practice_mode: PracticeMode,
    pub card_order: CardOrder,
    pub quiz: QuizConfig,
    pub page_size: usize,
    /// Keep only this many study log entries; `None` keeps everything
    pub study_log_cap: Option<usize>,
    pub tutor_endpoint: String,
    pub speech_program: Option<String>,
    pub speech_voice: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: HskLevel::Hsk1,
            practice_mode: PracticeMode::Character,
            card_order: CardOrder::Sequential,
            quiz: QuizConfig::default(),
            page_size: DEFAULT_PAGE_SIZE,
            study_log_cap: Some(DEFAULT_LOG_CAP),
            tutor_endpoint: DEFAULT_TUTOR_ENDPOINT.to_string(),
            speech_program: Some("espeak-ng".to_string()),
            speech_voice: Some("cmn".to_string()),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
