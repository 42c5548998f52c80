//! Persistent learner progress: mastery labels, XP, streak, per-level quiz
//! statistics and the study log.

pub mod record;
pub mod rewards;
pub mod tracker;

pub use self::record::{LevelStats, MasteryStatus, ProgressRecord, StudyKind, StudyLogEntry};
pub use self::tracker::Tracker;
