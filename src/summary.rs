use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;

use crate::error::Result;
use crate::progress::{StudyLogEntry, Tracker};
use crate::util::percent;
use crate::vocabulary::{HskLevel, Vocabulary};

pub const RECENT_ACTIVITY_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSummary {
    pub level: HskLevel,
    pub total_words: usize,
    pub characters_learned: u32,
    /// Share of the level's words counted as learned
    pub completion: f64,
    pub learning: usize,
    pub known: usize,
    pub quizzes_completed: u32,
    pub total_questions_answered: u32,
    pub correct_answers: u32,
    pub accuracy: f64,
}

/// Dashboard rollup computed from the progress record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub level: u32,
    pub experience_points: u32,
    pub points: u32,
    pub streak_days: u32,
    pub last_study_date: Option<String>,
    pub studied_characters: usize,
    pub overall_accuracy: f64,
    pub levels: Vec<LevelSummary>,
    pub recent_activity: Vec<StudyLogEntry>,
}

impl ProgressSummary {
    pub fn build(tracker: &Tracker, vocab: &Vocabulary) -> Self {
        let record = tracker.record();

        let levels = HskLevel::ALL
            .into_iter()
            .map(|level| {
                let stats = tracker.level_stats(level);
                let total_words = vocab.len(level);
                let (learning, known) = tracker.mastery_counts(level);
                LevelSummary {
                    level,
                    total_words,
                    characters_learned: stats.characters_learned,
                    completion: percent(stats.characters_learned, total_words as u32),
                    learning,
                    known,
                    quizzes_completed: stats.quizzes_completed,
                    total_questions_answered: stats.total_questions_answered,
                    correct_answers: stats.correct_answers,
                    accuracy: tracker.accuracy(level),
                }
            })
            .collect();

        Self {
            level: record.level,
            experience_points: record.experience_points,
            points: record.points,
            streak_days: record.streak_days,
            last_study_date: record.last_study_date.clone(),
            studied_characters: record.studied_characters.len(),
            overall_accuracy: tracker.overall_accuracy(),
            levels,
            recent_activity: tracker
                .recent_activity(RECENT_ACTIVITY_LEN)
                .into_iter()
                .cloned()
                .collect(),
        }
    }

    pub fn level(&self, level: HskLevel) -> Option<&LevelSummary> {
        self.levels.iter().find(|l| l.level == level)
    }
}

/// One CSV row per level, with the global counters repeated on each row
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    level: HskLevel,
    total_words: usize,
    characters_learned: u32,
    learning: usize,
    known: usize,
    quizzes_completed: u32,
    total_questions_answered: u32,
    correct_answers: u32,
    accuracy: String,
    user_level: u32,
    experience_points: u32,
    points: u32,
    streak_days: u32,
    last_study_date: &'a str,
}

pub fn export<W: Write>(summary: &ProgressSummary, format: ExportFormat, mut writer: W) -> Result<()> {
    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, summary)?;
            writeln!(writer)?;
        }
        ExportFormat::Csv => {
            let mut csv = csv::Writer::from_writer(writer);
            for level in &summary.levels {
                csv.serialize(CsvRow {
                    level: level.level,
                    total_words: level.total_words,
                    characters_learned: level.characters_learned,
                    learning: level.learning,
                    known: level.known,
                    quizzes_completed: level.quizzes_completed,
                    total_questions_answered: level.total_questions_answered,
                    correct_answers: level.correct_answers,
                    accuracy: format!("{:.1}", level.accuracy),
                    user_level: summary.level,
                    experience_points: summary.experience_points,
                    points: summary.points,
                    streak_days: summary.streak_days,
                    last_study_date: summary.last_study_date.as_deref().unwrap_or(""),
                })?;
            }
            csv.flush()?;
        }
    }
    Ok(())
}
