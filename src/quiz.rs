use clap::ValueEnum;
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::progress::rewards::{
    quiz_finish_points, quiz_finish_xp, QUIZ_ANSWER_POINTS, QUIZ_ANSWER_XP, QUIZ_CORRECT_SCORE,
    QUIZ_CORRECT_XP,
};
use crate::progress::{StudyKind, Tracker};
use crate::util::percent;
use crate::vocabulary::{HskLevel, Vocabulary, VocabularyEntry};

/// Allowed quiz lengths
pub const QUESTION_COUNTS: [usize; 4] = [10, 15, 20, 30];
/// Allowed whole-quiz countdowns in seconds; 0 disables the timer
pub const TIMER_CHOICES: [u32; 5] = [0, 300, 600, 900, 1200];
/// Delay before moving on after a correct answer
pub const AUTO_ADVANCE_SECS: f64 = 1.5;
/// Options shown per question, the correct one included
pub const OPTION_COUNT: usize = 4;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    CharToMeaning,
    CharToPinyin,
    MeaningToChar,
    /// The character is spoken aloud and the user picks it from the options
    Listening,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::CharToMeaning,
        QuestionType::CharToPinyin,
        QuestionType::MeaningToChar,
        QuestionType::Listening,
    ];

    pub fn prompt(self, entry: &VocabularyEntry) -> String {
        match self {
            QuestionType::CharToMeaning | QuestionType::CharToPinyin | QuestionType::Listening => {
                entry.character.clone()
            }
            QuestionType::MeaningToChar => entry.meaning.clone(),
        }
    }

    pub fn answer(self, entry: &VocabularyEntry) -> String {
        match self {
            QuestionType::CharToMeaning => entry.meaning.clone(),
            QuestionType::CharToPinyin => entry.pinyin.clone(),
            QuestionType::MeaningToChar | QuestionType::Listening => entry.character.clone(),
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuizOrder {
    #[default]
    Random,
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizConfig {
    pub question_type: QuestionType,
    pub order: QuizOrder,
    pub question_count: usize,
    pub timer_secs: u32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            question_type: QuestionType::CharToMeaning,
            order: QuizOrder::Random,
            question_count: QUESTION_COUNTS[0],
            timer_secs: 0,
        }
    }
}

impl QuizConfig {
    /// Step to the next allowed question count
    pub fn cycle_question_count(&mut self) {
        let pos = QUESTION_COUNTS
            .iter()
            .position(|&n| n == self.question_count)
            .map_or(0, |p| (p + 1) % QUESTION_COUNTS.len());
        self.question_count = QUESTION_COUNTS[pos];
    }

    pub fn cycle_timer(&mut self) {
        let pos = TIMER_CHOICES
            .iter()
            .position(|&n| n == self.timer_secs)
            .map_or(0, |p| (p + 1) % TIMER_CHOICES.len());
        self.timer_secs = TIMER_CHOICES[pos];
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    NotStarted,
    InProgress,
    Completed,
}

/// How a question was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Choice(usize),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub entry: VocabularyEntry,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct: usize,
    pub selected: Option<Answer>,
}

impl Question {
    fn build(entry: &VocabularyEntry, kind: QuestionType, pool: &[VocabularyEntry], rng: &mut StdRng) -> Self {
        let answer = kind.answer(entry);

        let mut distractors: Vec<String> = pool
            .iter()
            .map(|w| kind.answer(w))
            .filter(|candidate| *candidate != answer)
            .unique()
            .collect();
        distractors.shuffle(rng);
        distractors.truncate(OPTION_COUNT - 1);

        let mut options = distractors;
        options.push(answer.clone());
        options.shuffle(rng);
        let correct = options.iter().position(|o| *o == answer).unwrap_or_default();

        Self {
            entry: entry.clone(),
            prompt: kind.prompt(entry),
            options,
            correct,
            selected: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.selected.is_some()
    }

    /// `None` while unanswered
    pub fn is_correct(&self) -> Option<bool> {
        self.selected.map(|a| a == Answer::Choice(self.correct))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuizResult {
    pub total: u32,
    pub correct: u32,
    pub accuracy: f64,
    pub score: u32,
    pub xp_bonus: u32,
    pub points: u32,
}

/// Fixed-length multiple-choice test over one level.
///
/// The countdown lives in `time_left` and only exists while the quiz is
/// `InProgress`; every path out of that state clears it.
#[derive(Debug)]
pub struct QuizSession {
    level: HskLevel,
    words: Vec<VocabularyEntry>,
    config: QuizConfig,
    state: QuizState,
    questions: Vec<Question>,
    current: usize,
    score: u32,
    correct_count: u32,
    wrong_count: u32,
    wrong_answers: Vec<usize>,
    time_left: Option<f64>,
    pending_advance: Option<f64>,
    result: Option<QuizResult>,
    rng: StdRng,
}

impl QuizSession {
    pub fn new(vocab: &Vocabulary, level: HskLevel, config: QuizConfig) -> Self {
        Self::with_rng(vocab, level, config, StdRng::from_entropy())
    }

    pub fn with_rng(vocab: &Vocabulary, level: HskLevel, config: QuizConfig, rng: StdRng) -> Self {
        Self {
            level,
            words: vocab.words(level).to_vec(),
            config,
            state: QuizState::NotStarted,
            questions: Vec::new(),
            current: 0,
            score: 0,
            correct_count: 0,
            wrong_count: 0,
            wrong_answers: Vec::new(),
            time_left: None,
            pending_advance: None,
            result: None,
            rng,
        }
    }

    pub fn level(&self) -> HskLevel {
        self.level
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Takes effect on the next `start`
    pub fn set_config(&mut self, config: QuizConfig) {
        self.config = config;
    }

    pub fn set_level(&mut self, vocab: &Vocabulary, level: HskLevel) {
        self.abandon();
        self.level = level;
        self.words = vocab.words(level).to_vec();
        self.state = QuizState::NotStarted;
        self.result = None;
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn wrong_count(&self) -> u32 {
        self.wrong_count
    }

    pub fn wrong_answers(&self) -> Vec<&VocabularyEntry> {
        self.wrong_answers
            .iter()
            .filter_map(|&i| self.questions.get(i).map(|q| &q.entry))
            .collect()
    }

    /// Whole seconds left on the countdown, rounded up
    pub fn remaining_secs(&self) -> Option<u64> {
        self.time_left.map(|t| t.max(0.0).ceil() as u64)
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn start(&mut self) -> Result<()> {
        if self.words.is_empty() {
            return Err(Error::EmptyDeck);
        }

        let mut picks: Vec<usize> = (0..self.words.len()).collect();
        if self.config.order == QuizOrder::Random {
            picks.shuffle(&mut self.rng);
        }
        picks.truncate(self.config.question_count.max(1));

        let entries: Vec<VocabularyEntry> = picks.into_iter().map(|i| self.words[i].clone()).collect();
        self.begin(entries);
        info!(
            level = %self.level,
            questions = self.questions.len(),
            kind = %self.config.question_type,
            timer = self.config.timer_secs,
            "quiz started"
        );
        Ok(())
    }

    /// Fresh quiz over the questions missed last time
    pub fn retry_wrong_answers(&mut self) -> Result<()> {
        if self.state != QuizState::Completed || self.wrong_answers.is_empty() {
            return Err(Error::NothingToRetry);
        }
        let entries: Vec<VocabularyEntry> = self
            .wrong_answers
            .iter()
            .filter_map(|&i| self.questions.get(i).map(|q| q.entry.clone()))
            .collect();
        self.begin(entries);
        info!(questions = self.questions.len(), "retrying missed questions");
        Ok(())
    }

    fn begin(&mut self, entries: Vec<VocabularyEntry>) {
        let kind = self.config.question_type;
        let rng = &mut self.rng;
        let pool = &self.words;
        self.questions = entries
            .iter()
            .map(|entry| Question::build(entry, kind, pool, rng))
            .collect();

        self.current = 0;
        self.score = 0;
        self.correct_count = 0;
        self.wrong_count = 0;
        self.wrong_answers.clear();
        self.pending_advance = None;
        self.result = None;
        self.time_left = (self.config.timer_secs > 0).then(|| f64::from(self.config.timer_secs));
        self.state = QuizState::InProgress;
    }

    /// Answer the current question. Returns whether it was correct, or `None`
    /// when nothing happened (already answered, out of range, not running).
    pub fn select_answer(&mut self, tracker: &mut Tracker, choice: usize) -> Option<bool> {
        if self.state != QuizState::InProgress {
            return None;
        }
        let index = self.current;
        let question = self.questions.get_mut(index)?;
        if question.is_answered() || choice >= question.options.len() {
            return None;
        }

        question.selected = Some(Answer::Choice(choice));
        let correct = choice == question.correct;
        let entry = question.entry.clone();

        tracker.record_study_event(StudyKind::Quiz, &entry, self.level);
        if correct {
            self.score += QUIZ_CORRECT_SCORE;
            self.correct_count += 1;
            tracker.award(QUIZ_ANSWER_XP + QUIZ_CORRECT_XP, QUIZ_ANSWER_POINTS);
            self.pending_advance = Some(AUTO_ADVANCE_SECS);
        } else {
            self.wrong_count += 1;
            self.wrong_answers.push(index);
            tracker.award(QUIZ_ANSWER_XP, QUIZ_ANSWER_POINTS);
        }

        debug!(question = index, character = %entry.character, correct, "answer selected");
        Some(correct)
    }

    /// Undo a wrong answer on the current question so it can be answered again
    pub fn retry(&mut self) -> bool {
        if self.state != QuizState::InProgress {
            return false;
        }
        let index = self.current;
        let Some(question) = self.questions.get_mut(index) else {
            return false;
        };
        if question.is_correct() != Some(false) {
            return false;
        }

        question.selected = None;
        self.wrong_count = self.wrong_count.saturating_sub(1);
        self.wrong_answers.retain(|&i| i != index);
        debug!(question = index, "question reopened");
        true
    }

    /// Move forward. On the last question this finishes the quiz once
    /// every question has been answered.
    pub fn next(&mut self, tracker: &mut Tracker) -> bool {
        if self.state != QuizState::InProgress {
            return false;
        }
        self.pending_advance = None;

        if self.current + 1 < self.questions.len() {
            self.current += 1;
            return true;
        }
        if self.questions.iter().all(Question::is_answered) {
            self.finish(tracker);
        }
        false
    }

    /// Step back to review; answered questions stay locked
    pub fn previous(&mut self) -> bool {
        if self.state != QuizState::InProgress || self.current == 0 {
            return false;
        }
        self.pending_advance = None;
        self.current -= 1;
        true
    }

    /// Advance timers by `dt` seconds
    pub fn on_tick(&mut self, tracker: &mut Tracker, dt: f64) {
        if self.state != QuizState::InProgress {
            return;
        }

        if let Some(left) = self.time_left.as_mut() {
            *left -= dt;
            if *left <= 0.0 {
                self.expire(tracker);
                return;
            }
        }

        if let Some(delay) = self.pending_advance.as_mut() {
            *delay -= dt;
            if *delay <= 0.0 {
                self.next(tracker);
            }
        }
    }

    fn expire(&mut self, tracker: &mut Tracker) {
        let index = self.current;
        if let Some(question) = self.questions.get_mut(index) {
            if !question.is_answered() {
                question.selected = Some(Answer::TimedOut);
                self.wrong_count += 1;
                self.wrong_answers.push(index);
            }
        }
        info!(question = index, "quiz timer expired");
        self.finish(tracker);
    }

    /// Score the quiz and record it. Only the first call per run has any effect.
    pub fn finish(&mut self, tracker: &mut Tracker) -> Option<QuizResult> {
        if self.state != QuizState::InProgress {
            return None;
        }
        self.state = QuizState::Completed;
        self.time_left = None;
        self.pending_advance = None;

        let total = self.questions.len() as u32;
        let accuracy = percent(self.correct_count, total);
        let xp_bonus = quiz_finish_xp(accuracy, total);
        let points = quiz_finish_points(total);

        tracker.award(xp_bonus, points);
        tracker.record_quiz_result(self.level, total, self.correct_count);

        let result = QuizResult {
            total,
            correct: self.correct_count,
            accuracy,
            score: self.score,
            xp_bonus,
            points,
        };
        info!(
            level = %self.level,
            total,
            correct = self.correct_count,
            score = self.score,
            "quiz finished"
        );
        self.result = Some(result);
        Some(result)
    }

    /// Leave a running quiz without scoring it
    pub fn abandon(&mut self) {
        if self.state == QuizState::InProgress {
            info!(question = self.current, "quiz abandoned");
            self.state = QuizState::NotStarted;
            self.questions.clear();
            self.wrong_answers.clear();
            self.current = 0;
        }
        self.time_left = None;
        self.pending_advance = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::SystemClock;
    use crate::storage::MemoryStore;
    use assert_matches::assert_matches;
    use std::collections::HashSet;

    fn vocab() -> Vocabulary {
        let words = (1..=12)
            .map(|i| VocabularyEntry::new(&format!("字{i}"), &format!("zi{i}"), &format!("word {i}")))
            .chain([
                // shares pinyin with 字1
                VocabularyEntry::new("子", "zi1", "child"),
            ])
            .collect();
        Vocabulary::from_levels([
            (HskLevel::Hsk1, words),
            (HskLevel::Hsk2, vec![VocabularyEntry::new("猫", "māo", "cat")]),
            (HskLevel::Hsk3, vec![]),
        ])
    }

    fn tracker() -> Tracker {
        Tracker::load(Box::new(MemoryStore::new()), Box::new(SystemClock))
    }

    fn quiz(config: QuizConfig) -> QuizSession {
        QuizSession::with_rng(&vocab(), HskLevel::Hsk1, config, StdRng::seed_from_u64(3))
    }

    fn wrong_choice(q: &Question) -> usize {
        (q.correct + 1) % q.options.len()
    }

    #[test]
    fn test_options_are_unique_with_one_correct() {
        for kind in QuestionType::ALL {
            let mut q = quiz(QuizConfig {
                question_type: kind,
                question_count: 13,
                ..QuizConfig::default()
            });
            q.start().unwrap();
            for question in q.questions() {
                let unique: HashSet<&String> = question.options.iter().collect();
                assert_eq!(question.options.len(), OPTION_COUNT);
                assert_eq!(unique.len(), OPTION_COUNT, "{kind}: {:?}", question.options);
                let answer = kind.answer(&question.entry);
                assert_eq!(question.options.iter().filter(|o| **o == answer).count(), 1);
                assert_eq!(question.options[question.correct], answer);
            }
        }
    }

    #[test]
    fn test_small_pool_yields_fewer_options() {
        let mut q = QuizSession::new(&vocab(), HskLevel::Hsk2, QuizConfig::default());
        q.start().unwrap();
        assert_eq!(q.questions().len(), 1);
        assert_eq!(q.questions()[0].options, vec!["cat".to_string()]);
    }

    #[test]
    fn test_empty_level_cannot_start() {
        let mut q = QuizSession::new(&vocab(), HskLevel::Hsk3, QuizConfig::default());
        assert_matches!(q.start(), Err(Error::EmptyDeck));
        assert_eq!(q.state(), QuizState::NotStarted);
    }

    #[test]
    fn test_sequential_order_keeps_vocabulary_order() {
        let mut q = quiz(QuizConfig {
            order: QuizOrder::Sequential,
            ..QuizConfig::default()
        });
        q.start().unwrap();
        assert_eq!(q.questions().len(), 10);
        assert_eq!(q.questions()[0].entry.character, "字1");
        assert_eq!(q.questions()[9].entry.character, "字10");
    }

    #[test]
    fn test_select_answer_is_idempotent() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig::default());
        q.start().unwrap();
        let correct = q.current_question().unwrap().correct;

        assert_eq!(q.select_answer(&mut t, correct), Some(true));
        assert_eq!(q.select_answer(&mut t, correct), None);
        assert_eq!(q.score(), 10);
        assert_eq!(q.correct_count(), 1);
        assert_eq!(t.record().study_log.len(), 1);
        assert_eq!(
            t.record().experience_points,
            QUIZ_ANSWER_XP + QUIZ_CORRECT_XP
        );
    }

    #[test]
    fn test_wrong_answer_rewards_answering_only() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig::default());
        q.start().unwrap();
        let wrong = wrong_choice(q.current_question().unwrap());

        assert_eq!(q.select_answer(&mut t, wrong), Some(false));
        assert_eq!(q.score(), 0);
        assert_eq!(q.wrong_count(), 1);
        assert_eq!(q.wrong_answers().len(), 1);
        assert_eq!(t.record().experience_points, QUIZ_ANSWER_XP);
        assert_eq!(t.record().points, QUIZ_ANSWER_POINTS);
    }

    #[test]
    fn test_retry_reverses_wrong_bookkeeping() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig::default());
        q.start().unwrap();
        let question = q.current_question().unwrap().clone();

        q.select_answer(&mut t, wrong_choice(&question));
        assert!(q.retry());
        assert_eq!(q.wrong_count(), 0);
        assert!(q.wrong_answers().is_empty());
        assert!(!q.current_question().unwrap().is_answered());

        assert_eq!(q.select_answer(&mut t, question.correct), Some(true));
        assert!(!q.retry());
        assert_eq!(q.correct_count(), 1);
        assert_eq!(q.wrong_count(), 0);
    }

    #[test]
    fn test_previous_keeps_answers_locked() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig::default());
        q.start().unwrap();
        let wrong = wrong_choice(q.current_question().unwrap());
        q.select_answer(&mut t, wrong);
        q.next(&mut t);

        assert!(q.previous());
        assert_eq!(q.current_index(), 0);
        assert_eq!(q.select_answer(&mut t, 0), None);
        assert_eq!(q.current_question().unwrap().is_correct(), Some(false));
        assert!(!q.previous());
    }

    #[test]
    fn test_correct_answer_auto_advances() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig::default());
        q.start().unwrap();
        let correct = q.current_question().unwrap().correct;
        q.select_answer(&mut t, correct);

        q.on_tick(&mut t, 1.0);
        assert_eq!(q.current_index(), 0);
        q.on_tick(&mut t, 1.0);
        assert_eq!(q.current_index(), 1);
        q.on_tick(&mut t, 5.0);
        assert_eq!(q.current_index(), 1);
    }

    #[test]
    fn test_next_does_not_finish_with_unanswered_questions() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig::default());
        q.start().unwrap();
        while q.next(&mut t) {}
        assert_eq!(q.current_index(), 9);
        assert_eq!(q.state(), QuizState::InProgress);
    }

    #[test]
    fn test_all_correct_finishes_with_full_score() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig::default());
        q.start().unwrap();

        while q.state() == QuizState::InProgress {
            let correct = q.current_question().unwrap().correct;
            q.select_answer(&mut t, correct);
            q.next(&mut t);
        }

        let result = *q.result().unwrap();
        assert_eq!(result.score, 100);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.xp_bonus, quiz_finish_xp(100.0, 10));
        assert_eq!(result.points, 50);

        let stats = t.level_stats(HskLevel::Hsk1);
        assert_eq!(stats.quizzes_completed, 1);
        assert_eq!(stats.total_questions_answered, 10);
        assert_eq!(stats.correct_answers, 10);
    }

    #[test]
    fn test_timer_expiry_marks_current_wrong_and_finishes_once() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig {
            timer_secs: 1,
            ..QuizConfig::default()
        });
        q.start().unwrap();
        assert_eq!(q.remaining_secs(), Some(1));

        q.on_tick(&mut t, 0.5);
        assert_eq!(q.state(), QuizState::InProgress);
        q.on_tick(&mut t, 0.5);
        assert_eq!(q.state(), QuizState::Completed);
        assert_eq!(q.questions()[0].selected, Some(Answer::TimedOut));
        assert_eq!(q.wrong_count(), 1);
        assert_eq!(q.remaining_secs(), None);

        q.on_tick(&mut t, 1.0);
        assert_eq!(q.finish(&mut t), None);
        assert_eq!(t.level_stats(HskLevel::Hsk1).quizzes_completed, 1);
    }

    #[test]
    fn test_abandon_clears_timer() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig {
            timer_secs: 300,
            ..QuizConfig::default()
        });
        q.start().unwrap();
        q.abandon();

        assert_eq!(q.state(), QuizState::NotStarted);
        assert_eq!(q.remaining_secs(), None);
        q.on_tick(&mut t, 1000.0);
        assert_eq!(t.level_stats(HskLevel::Hsk1).quizzes_completed, 0);
    }

    #[test]
    fn test_retry_wrong_answers_builds_mini_quiz() {
        let mut t = tracker();
        let mut q = quiz(QuizConfig::default());
        assert_matches!(q.retry_wrong_answers(), Err(Error::NothingToRetry));
        q.start().unwrap();

        let mut missed = Vec::new();
        while q.state() == QuizState::InProgress {
            let question = q.current_question().unwrap().clone();
            let choice = if q.current_index() % 3 == 0 {
                missed.push(question.entry.character.clone());
                wrong_choice(&question)
            } else {
                question.correct
            };
            q.select_answer(&mut t, choice);
            q.next(&mut t);
        }
        assert_eq!(q.wrong_count(), 4);

        q.retry_wrong_answers().unwrap();
        assert_eq!(q.state(), QuizState::InProgress);
        let characters: Vec<String> = q
            .questions()
            .iter()
            .map(|q| q.entry.character.clone())
            .collect();
        assert_eq!(characters, missed);
        assert_eq!(q.score(), 0);
        assert_eq!(q.wrong_count(), 0);
    }

    #[test]
    fn test_config_cycles() {
        let mut config = QuizConfig::default();
        config.cycle_question_count();
        assert_eq!(config.question_count, 15);
        config.question_count = 30;
        config.cycle_question_count();
        assert_eq!(config.question_count, 10);

        config.cycle_timer();
        assert_eq!(config.timer_secs, 300);
        config.timer_secs = 7;
        config.cycle_timer();
        assert_eq!(config.timer_secs, 0);

        assert_eq!(QuestionType::Listening.next(), QuestionType::CharToMeaning);
    }
}
