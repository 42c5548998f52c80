use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::vocabulary::{HskLevel, VocabularyEntry};

/// User-assigned label for a word. Absent entries are `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum MasteryStatus {
    #[default]
    New,
    Learning,
    Known,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StudyKind {
    Study,
    Listen,
    Flashcard,
    Quiz,
}

/// One append-only activity record. Word fields are copied, not referenced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyLogEntry {
    #[serde(rename = "type")]
    pub kind: StudyKind,
    pub character: String,
    pub pinyin: String,
    pub meaning: String,
    pub level: HskLevel,
    pub timestamp: DateTime<Local>,
    pub date: String,
    pub time: String,
}

impl StudyLogEntry {
    pub fn new(kind: StudyKind, entry: &VocabularyEntry, level: HskLevel, at: DateTime<Local>) -> Self {
        Self {
            kind,
            character: entry.character.clone(),
            pinyin: entry.pinyin.clone(),
            meaning: entry.meaning.clone(),
            level,
            timestamp: at,
            date: date_string(at),
            time: at.format("%H:%M:%S").to_string(),
        }
    }
}

/// Calendar-day key used for streak comparison, e.g. "Mon Oct 19 2026"
pub fn date_string(at: DateTime<Local>) -> String {
    at.format("%a %b %d %Y").to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelStats {
    pub characters_learned: u32,
    pub quizzes_completed: u32,
    pub total_questions_answered: u32,
    pub correct_answers: u32,
}

/// Root persisted document.
///
/// Every field falls back to its default when missing so that documents
/// written by older versions keep their XP, streak and mastery data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressRecord {
    pub experience_points: u32,
    pub level: u32,
    pub points: u32,
    pub streak_days: u32,
    pub last_study_date: Option<String>,
    pub studied_characters: BTreeSet<String>,
    pub per_level_stats: BTreeMap<HskLevel, LevelStats>,
    pub mastery: BTreeMap<HskLevel, BTreeMap<String, MasteryStatus>>,
    pub study_log: Vec<StudyLogEntry>,
}

impl Default for ProgressRecord {
    fn default() -> Self {
        let mut record = Self {
            experience_points: 0,
            level: 1,
            points: 0,
            streak_days: 0,
            last_study_date: None,
            studied_characters: BTreeSet::new(),
            per_level_stats: BTreeMap::new(),
            mastery: BTreeMap::new(),
            study_log: Vec::new(),
        };
        record.backfill();
        record
    }
}

impl ProgressRecord {
    /// Make sure every known level has a stats entry
    pub fn backfill(&mut self) {
        for level in HskLevel::ALL {
            self.per_level_stats.entry(level).or_default();
        }
        if self.level == 0 {
            self.level = 1;
        }
    }

    pub fn stats(&self, level: HskLevel) -> LevelStats {
        self.per_level_stats.get(&level).copied().unwrap_or_default()
    }

    pub fn stats_mut(&mut self, level: HskLevel) -> &mut LevelStats {
        self.per_level_stats.entry(level).or_default()
    }

    pub fn status(&self, level: HskLevel, character: &str) -> MasteryStatus {
        self.mastery
            .get(&level)
            .and_then(|m| m.get(character))
            .copied()
            .unwrap_or_default()
    }
}
