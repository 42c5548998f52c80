use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use super::record::{date_string, LevelStats, MasteryStatus, ProgressRecord, StudyKind, StudyLogEntry};
use super::rewards::XP_PER_LEVEL;
use crate::error::Result;
use crate::runtime::{Clock, SystemClock};
use crate::storage::{KeyValueStore, PROGRESS_KEY};
use crate::util::percent;
use crate::vocabulary::{HskLevel, Vocabulary, VocabularyEntry};

/// Owns the progress record and writes it through to storage after every mutation.
pub struct Tracker {
    record: ProgressRecord,
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    log_cap: Option<usize>,
    level_sizes: BTreeMap<HskLevel, usize>,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("record", &self.record)
            .field("log_cap", &self.log_cap)
            .finish_non_exhaustive()
    }
}

impl Tracker {
    /// Read the persisted record, falling back to a fresh one when it is
    /// absent or unreadable.
    pub fn load(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>) -> Self {
        let record = match store.get(PROGRESS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<ProgressRecord>(&json) {
                Ok(mut record) => {
                    record.backfill();
                    debug!(
                        xp = record.experience_points,
                        level = record.level,
                        log_entries = record.study_log.len(),
                        "loaded progress"
                    );
                    record
                }
                Err(e) => {
                    warn!(error = %e, "stored progress is corrupt; starting from an empty record");
                    ProgressRecord::default()
                }
            },
            Ok(None) => {
                info!("no stored progress; starting from an empty record");
                ProgressRecord::default()
            }
            Err(e) => {
                warn!(error = %e, "could not read stored progress; starting from an empty record");
                ProgressRecord::default()
            }
        };

        Self {
            record,
            store,
            clock,
            log_cap: None,
            level_sizes: BTreeMap::new(),
        }
    }

    /// Load with the wall clock
    pub fn load_with_system_clock(store: Box<dyn KeyValueStore>) -> Self {
        Self::load(store, Box::new(SystemClock))
    }

    /// Keep only the most recent `cap` study log entries
    pub fn with_log_cap(mut self, cap: Option<usize>) -> Self {
        self.log_cap = cap;
        self.truncate_log();
        self
    }

    /// Remember level sizes so learned counters never exceed the vocabulary
    pub fn with_vocabulary(mut self, vocab: &Vocabulary) -> Self {
        self.level_sizes = vocab.sizes();
        self
    }

    pub fn record(&self) -> &ProgressRecord {
        &self.record
    }

    pub fn now(&self) -> chrono::DateTime<chrono::Local> {
        self.clock.now()
    }

    /// Serialize the whole record and overwrite the stored document
    pub fn save(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.record)?;
        self.store.set(PROGRESS_KEY, &json)
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "failed to persist progress");
        }
    }

    pub fn word_status(&self, level: HskLevel, character: &str) -> MasteryStatus {
        self.record.status(level, character)
    }

    /// Set a word's mastery and return the status it had before.
    ///
    /// The first transition into `Known` counts the word as learned; the
    /// previous status is read before it is overwritten.
    pub fn set_word_status(
        &mut self,
        level: HskLevel,
        character: &str,
        status: MasteryStatus,
    ) -> MasteryStatus {
        let previous = self.record.status(level, character);

        self.record
            .mastery
            .entry(level)
            .or_default()
            .insert(character.to_string(), status);

        if status == MasteryStatus::Known && previous != MasteryStatus::Known {
            self.count_learned(level);
        }

        debug!(%level, character, from = %previous, to = %status, "word status changed");
        self.persist();
        previous
    }

    fn count_learned(&mut self, level: HskLevel) {
        let cap = self.level_sizes.get(&level).copied();
        let stats = self.record.stats_mut(level);
        match cap {
            Some(cap) if stats.characters_learned as usize >= cap => {}
            _ => stats.characters_learned += 1,
        }
    }

    /// Append an activity entry and update streak, studied set and counters
    pub fn record_study_event(&mut self, kind: StudyKind, entry: &VocabularyEntry, level: HskLevel) {
        let now = self.clock.now();

        self.record
            .study_log
            .push(StudyLogEntry::new(kind, entry, level, now));
        self.truncate_log();

        let today = date_string(now);
        if self.record.last_study_date.as_deref() != Some(today.as_str()) {
            self.record.streak_days += 1;
            self.record.last_study_date = Some(today);
            info!(streak = self.record.streak_days, "study streak extended");
        }

        let first_sighting = self
            .record
            .studied_characters
            .insert(entry.character.clone());
        if kind == StudyKind::Study && first_sighting {
            self.count_learned(level);
        }

        self.persist();
    }

    fn truncate_log(&mut self) {
        if let Some(cap) = self.log_cap {
            let len = self.record.study_log.len();
            if len > cap {
                self.record.study_log.drain(..len - cap);
            }
        }
    }

    /// Grant XP and points, rolling every full 100 XP into a level
    pub fn award(&mut self, xp: u32, points: u32) {
        self.record.experience_points += xp;
        self.record.points += points;

        while self.record.experience_points >= XP_PER_LEVEL {
            self.record.experience_points -= XP_PER_LEVEL;
            self.record.level += 1;
            info!(level = self.record.level, "level up");
        }

        self.persist();
    }

    pub fn record_quiz_result(&mut self, level: HskLevel, total: u32, correct: u32) {
        let stats = self.record.stats_mut(level);
        stats.quizzes_completed += 1;
        stats.total_questions_answered += total;
        stats.correct_answers += correct;
        self.persist();
    }

    pub fn level_stats(&self, level: HskLevel) -> LevelStats {
        self.record.stats(level)
    }

    /// Quiz accuracy for one level as a percentage
    pub fn accuracy(&self, level: HskLevel) -> f64 {
        let stats = self.record.stats(level);
        percent(stats.correct_answers, stats.total_questions_answered)
    }

    /// Accuracy across all levels, summed before dividing
    pub fn overall_accuracy(&self) -> f64 {
        let (total, correct) = self
            .record
            .per_level_stats
            .values()
            .fold((0u32, 0u32), |(t, c), s| {
                (t + s.total_questions_answered, c + s.correct_answers)
            });
        percent(correct, total)
    }

    /// (learning, known) counts for a level
    pub fn mastery_counts(&self, level: HskLevel) -> (usize, usize) {
        self.record
            .mastery
            .get(&level)
            .map(|m| {
                m.values().fold((0, 0), |(l, k), s| match s {
                    MasteryStatus::Learning => (l + 1, k),
                    MasteryStatus::Known => (l, k + 1),
                    MasteryStatus::New => (l, k),
                })
            })
            .unwrap_or((0, 0))
    }

    /// Most recent log entries, newest first
    pub fn recent_activity(&self, n: usize) -> Vec<&StudyLogEntry> {
        self.record.study_log.iter().rev().take(n).collect()
    }

    /// Erase all progress. Irreversible; callers confirm with the user first.
    pub fn clear_all(&mut self) -> Result<()> {
        self.record = ProgressRecord::default();
        self.store.remove(PROGRESS_KEY)?;
        warn!("all progress cleared");
        Ok(())
    }

    /// Read an auxiliary JSON document; unreadable documents count as absent
    pub fn load_document<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(key) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    warn!(key, error = %e, "ignoring corrupt document");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key, error = %e, "could not read document");
                None
            }
        }
    }

    pub fn save_document<T: Serialize>(&mut self, key: &str, doc: &T) -> Result<()> {
        let json = serde_json::to_string(doc)?;
        self.store.set(key, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::FixedClock;
    use crate::storage::MemoryStore;
    use chrono::{Local, TimeZone};

    fn clock() -> FixedClock {
        FixedClock::new(Local.with_ymd_and_hms(2026, 10, 19, 10, 0, 0).unwrap())
    }

    fn tracker_with(store: &MemoryStore, clock: &FixedClock) -> Tracker {
        Tracker::load(Box::new(store.clone()), Box::new(clock.clone()))
    }

    fn word(c: &str) -> VocabularyEntry {
        VocabularyEntry::new(c, "pinyin", &format!("meaning of {c}"))
    }

    #[test]
    fn test_load_empty_store_gives_fresh_record() {
        let store = MemoryStore::new();
        let tracker = tracker_with(&store, &clock());
        assert_eq!(tracker.record(), &ProgressRecord::default());
    }

    #[test]
    fn test_load_corrupt_document_resets() {
        let mut store = MemoryStore::new();
        store.set(PROGRESS_KEY, "{ not json").unwrap();
        let tracker = tracker_with(&store, &clock());
        assert_eq!(tracker.record().level, 1);
        assert_eq!(tracker.record().experience_points, 0);
    }

    #[test]
    fn test_mutations_are_persisted_immediately() {
        let store = MemoryStore::new();
        let c = clock();
        let mut tracker = tracker_with(&store, &c);
        tracker.set_word_status(HskLevel::Hsk1, "猫", MasteryStatus::Learning);
        tracker.award(7, 3);

        let reloaded = tracker_with(&store, &c);
        assert_eq!(
            reloaded.word_status(HskLevel::Hsk1, "猫"),
            MasteryStatus::Learning
        );
        assert_eq!(reloaded.record().experience_points, 7);
        assert_eq!(reloaded.record().points, 3);
    }

    #[test]
    fn test_known_twice_counts_once() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());

        let first = tracker.set_word_status(HskLevel::Hsk1, "猫", MasteryStatus::Known);
        let second = tracker.set_word_status(HskLevel::Hsk1, "猫", MasteryStatus::Known);

        assert_eq!(first, MasteryStatus::New);
        assert_eq!(second, MasteryStatus::Known);
        assert_eq!(tracker.level_stats(HskLevel::Hsk1).characters_learned, 1);
    }

    #[test]
    fn test_known_after_learning_counts_once() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());

        tracker.set_word_status(HskLevel::Hsk1, "猫", MasteryStatus::Learning);
        assert_eq!(tracker.level_stats(HskLevel::Hsk1).characters_learned, 0);
        tracker.set_word_status(HskLevel::Hsk1, "猫", MasteryStatus::Known);
        tracker.set_word_status(HskLevel::Hsk1, "猫", MasteryStatus::Learning);
        tracker.set_word_status(HskLevel::Hsk1, "猫", MasteryStatus::Known);
        // demoting and promoting again counts a fresh transition
        assert_eq!(tracker.level_stats(HskLevel::Hsk1).characters_learned, 2);
    }

    #[test]
    fn test_learned_counter_clamped_to_vocabulary_size() {
        let vocab = Vocabulary::from_levels([(HskLevel::Hsk1, vec![word("猫")])]);
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock()).with_vocabulary(&vocab);

        tracker.record_study_event(StudyKind::Study, &word("猫"), HskLevel::Hsk1);
        tracker.set_word_status(HskLevel::Hsk1, "猫", MasteryStatus::Known);
        assert_eq!(tracker.level_stats(HskLevel::Hsk1).characters_learned, 1);
    }

    #[test]
    fn test_streak_once_per_day() {
        let store = MemoryStore::new();
        let c = clock();
        let mut tracker = tracker_with(&store, &c);

        tracker.record_study_event(StudyKind::Study, &word("我"), HskLevel::Hsk1);
        c.advance(chrono::Duration::hours(3));
        tracker.record_study_event(StudyKind::Listen, &word("你"), HskLevel::Hsk1);
        assert_eq!(tracker.record().streak_days, 1);

        c.advance(chrono::Duration::days(1));
        tracker.record_study_event(StudyKind::Quiz, &word("他"), HskLevel::Hsk1);
        assert_eq!(tracker.record().streak_days, 2);
        assert_eq!(
            tracker.record().last_study_date.as_deref(),
            Some("Tue Oct 20 2026")
        );
    }

    #[test]
    fn test_study_counts_first_sighting_only() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());

        tracker.record_study_event(StudyKind::Study, &word("我"), HskLevel::Hsk1);
        tracker.record_study_event(StudyKind::Study, &word("我"), HskLevel::Hsk1);
        assert_eq!(tracker.level_stats(HskLevel::Hsk1).characters_learned, 1);

        // seen first through a quiz: no longer a first sighting when studied
        tracker.record_study_event(StudyKind::Quiz, &word("你"), HskLevel::Hsk1);
        tracker.record_study_event(StudyKind::Study, &word("你"), HskLevel::Hsk1);
        assert_eq!(tracker.level_stats(HskLevel::Hsk1).characters_learned, 1);

        assert_eq!(tracker.record().studied_characters.len(), 2);
        assert_eq!(tracker.record().study_log.len(), 4);
    }

    #[test]
    fn test_level_up_single_rollover() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());
        tracker.award(95, 0);
        tracker.award(30, 0);
        assert_eq!(tracker.record().experience_points, 25);
        assert_eq!(tracker.record().level, 2);
    }

    #[test]
    fn test_level_up_loops_for_large_awards() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());
        tracker.award(250, 0);
        assert_eq!(tracker.record().experience_points, 50);
        assert_eq!(tracker.record().level, 3);
    }

    #[test]
    fn test_accuracy_guards_zero() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());
        assert_eq!(tracker.accuracy(HskLevel::Hsk1), 0.0);
        assert_eq!(tracker.overall_accuracy(), 0.0);

        tracker.record_quiz_result(HskLevel::Hsk1, 10, 5);
        tracker.record_quiz_result(HskLevel::Hsk2, 10, 10);
        assert_eq!(tracker.accuracy(HskLevel::Hsk1), 50.0);
        assert_eq!(tracker.overall_accuracy(), 75.0);
        assert_eq!(tracker.level_stats(HskLevel::Hsk2).quizzes_completed, 1);
    }

    #[test]
    fn test_log_cap_keeps_newest() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock()).with_log_cap(Some(2));
        for c in ["一", "二", "三"] {
            tracker.record_study_event(StudyKind::Flashcard, &word(c), HskLevel::Hsk1);
        }
        let log = &tracker.record().study_log;
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].character, "二");
        assert_eq!(tracker.recent_activity(1)[0].character, "三");
    }

    #[test]
    fn test_mastery_counts() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());
        tracker.set_word_status(HskLevel::Hsk1, "一", MasteryStatus::Learning);
        tracker.set_word_status(HskLevel::Hsk1, "二", MasteryStatus::Known);
        tracker.set_word_status(HskLevel::Hsk1, "三", MasteryStatus::Known);
        assert_eq!(tracker.mastery_counts(HskLevel::Hsk1), (1, 2));
        assert_eq!(tracker.mastery_counts(HskLevel::Hsk2), (0, 0));
    }

    #[test]
    fn test_clear_all_erases_document() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());
        tracker.award(50, 10);
        assert!(store.get(PROGRESS_KEY).unwrap().is_some());

        tracker.clear_all().unwrap();
        assert_eq!(tracker.record(), &ProgressRecord::default());
        assert!(store.get(PROGRESS_KEY).unwrap().is_none());
    }

    #[test]
    fn test_auxiliary_documents_roundtrip() {
        let store = MemoryStore::new();
        let mut tracker = tracker_with(&store, &clock());
        tracker
            .save_document("search_history", &vec!["ni".to_string()])
            .unwrap();
        let loaded: Option<Vec<String>> = tracker.load_document("search_history");
        assert_eq!(loaded, Some(vec!["ni".to_string()]));

        let missing: Option<Vec<String>> = tracker.load_document("nope");
        assert!(missing.is_none());
    }
}
