use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::progress::rewards::{
    FLASHCARD_ADVANCE_POINTS, FLASHCARD_ADVANCE_XP, KNOWN_BONUS_POINTS, KNOWN_BONUS_XP,
};
use crate::progress::{MasteryStatus, StudyKind, Tracker};
use crate::storage::FLASHCARD_KEY;
use crate::vocabulary::{HskLevel, Vocabulary, VocabularyEntry};

/// Which field of a word is shown on the front of the card
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PracticeMode {
    #[default]
    Character,
    Pinyin,
    Meaning,
}

impl PracticeMode {
    pub fn next(self) -> Self {
        match self {
            PracticeMode::Character => PracticeMode::Pinyin,
            PracticeMode::Pinyin => PracticeMode::Meaning,
            PracticeMode::Meaning => PracticeMode::Character,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CardOrder {
    #[default]
    Sequential,
    Shuffled,
    /// Only words still `New`; recomputed on every mastery change
    UnlearnedOnly,
}

impl CardOrder {
    pub fn next(self) -> Self {
        match self {
            CardOrder::Sequential => CardOrder::Shuffled,
            CardOrder::Shuffled => CardOrder::UnlearnedOnly,
            CardOrder::UnlearnedOnly => CardOrder::Sequential,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Front,
    Back,
}

/// Grade a user can give a flipped card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Learning,
    Known,
}

impl From<Grade> for MasteryStatus {
    fn from(grade: Grade) -> Self {
        match grade {
            Grade::Learning => MasteryStatus::Learning,
            Grade::Known => MasteryStatus::Known,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeOutcome {
    pub previous: MasteryStatus,
    pub bonus_awarded: bool,
    /// False when the graded card was the last one and the session stayed put
    pub advanced: bool,
}

/// Text laid out on the two faces of the current card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFaces {
    pub prompt: String,
    pub answers: Vec<(&'static str, String)>,
    pub breakdown: String,
}

impl CardFaces {
    fn new(entry: &VocabularyEntry, practice: PracticeMode) -> Self {
        let character = ("Character", entry.character.clone());
        let pinyin = ("Pinyin", entry.pinyin.clone());
        let meaning = ("Meaning", entry.meaning.clone());

        let (prompt, answers) = match practice {
            PracticeMode::Character => (entry.character.clone(), vec![pinyin, meaning]),
            PracticeMode::Pinyin => (entry.pinyin.clone(), vec![character, meaning]),
            PracticeMode::Meaning => (entry.meaning.clone(), vec![character, pinyin]),
        };

        Self {
            prompt,
            answers,
            breakdown: entry.breakdown.clone(),
        }
    }
}

/// Resume state persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardSnapshot {
    pub level: HskLevel,
    pub practice: PracticeMode,
    pub order: CardOrder,
    pub index: usize,
    #[serde(default)]
    pub shuffled: Option<Vec<usize>>,
}

impl FlashcardSnapshot {
    fn matches(&self, level: HskLevel, practice: PracticeMode, order: CardOrder) -> bool {
        self.level == level && self.practice == practice && self.order == order
    }
}

/// One-card-at-a-time review over a view of a level's vocabulary.
///
/// The view is a list of indices into `words`. `Shuffled` caches its
/// permutation until the level changes; `UnlearnedOnly` is rebuilt from live
/// mastery whenever a card is graded or [`FlashcardSession::refresh`] is called.
#[derive(Debug)]
pub struct FlashcardSession {
    level: HskLevel,
    words: Vec<VocabularyEntry>,
    practice: PracticeMode,
    order: CardOrder,
    shuffled: Option<Vec<usize>>,
    view: Vec<usize>,
    index: usize,
    face: Face,
    rng: StdRng,
}

impl FlashcardSession {
    pub fn new(
        vocab: &Vocabulary,
        level: HskLevel,
        practice: PracticeMode,
        order: CardOrder,
        tracker: &Tracker,
    ) -> Self {
        Self::with_rng(vocab, level, practice, order, StdRng::from_entropy(), tracker)
    }

    pub fn with_rng(
        vocab: &Vocabulary,
        level: HskLevel,
        practice: PracticeMode,
        order: CardOrder,
        rng: StdRng,
        tracker: &Tracker,
    ) -> Self {
        let mut session = Self {
            level,
            words: vocab.words(level).to_vec(),
            practice,
            order,
            shuffled: None,
            view: Vec::new(),
            index: 0,
            face: Face::Front,
            rng,
        };
        session.rebuild_view(tracker);
        session
    }

    /// Restore the last saved session when it was saved with the same level,
    /// practice mode and order; otherwise start fresh from those settings.
    pub fn resume(
        vocab: &Vocabulary,
        practice: PracticeMode,
        order: CardOrder,
        level: HskLevel,
        tracker: &Tracker,
    ) -> Self {
        let mut session = Self::new(vocab, level, practice, order, tracker);
        match tracker.load_document::<FlashcardSnapshot>(FLASHCARD_KEY) {
            Some(snapshot) if snapshot.matches(level, practice, order) => {
                session.apply_snapshot(snapshot, tracker);
            }
            Some(snapshot) => {
                debug!(
                    saved = %snapshot.level,
                    requested = %level,
                    "saved flashcard session does not match settings, starting fresh"
                );
            }
            None => {}
        }
        session
    }

    fn apply_snapshot(&mut self, snapshot: FlashcardSnapshot, tracker: &Tracker) {
        if let Some(order) = snapshot.shuffled {
            if is_permutation(&order, self.words.len()) {
                self.shuffled = Some(order);
                self.rebuild_view(tracker);
            }
        }
        self.index = snapshot.index.min(self.view.len().saturating_sub(1));
        debug!(level = %self.level, index = self.index, "flashcard session restored");
    }

    pub fn snapshot(&self) -> FlashcardSnapshot {
        FlashcardSnapshot {
            level: self.level,
            practice: self.practice,
            order: self.order,
            index: self.index,
            shuffled: self.shuffled.clone(),
        }
    }

    pub fn save_state(&self, tracker: &mut Tracker) -> Result<()> {
        tracker.save_document(FLASHCARD_KEY, &self.snapshot())
    }

    fn rebuild_view(&mut self, tracker: &Tracker) {
        self.view = match self.order {
            CardOrder::Sequential => (0..self.words.len()).collect(),
            CardOrder::Shuffled => {
                let words_len = self.words.len();
                let rng = &mut self.rng;
                self.shuffled
                    .get_or_insert_with(|| {
                        let mut order: Vec<usize> = (0..words_len).collect();
                        order.shuffle(rng);
                        order
                    })
                    .clone()
            }
            CardOrder::UnlearnedOnly => self
                .words
                .iter()
                .enumerate()
                .filter(|(_, w)| tracker.word_status(self.level, &w.character) == MasteryStatus::New)
                .map(|(i, _)| i)
                .collect(),
        };
    }

    /// Recompute the view from live mastery, keeping the current card when it is still present
    pub fn refresh(&mut self, tracker: &Tracker) {
        let current = self.view.get(self.index).copied();
        self.rebuild_view(tracker);
        self.index = current
            .and_then(|word| self.view.iter().position(|&i| i == word))
            .unwrap_or_else(|| self.index.min(self.view.len().saturating_sub(1)));
    }

    pub fn level(&self) -> HskLevel {
        self.level
    }

    pub fn practice(&self) -> PracticeMode {
        self.practice
    }

    pub fn order(&self) -> CardOrder {
        self.order
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of cards in the current view
    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn current(&self) -> Option<&VocabularyEntry> {
        self.view.get(self.index).map(|&i| &self.words[i])
    }

    /// Characters in view order
    pub fn characters(&self) -> Vec<&str> {
        self.view
            .iter()
            .map(|&i| self.words[i].character.as_str())
            .collect()
    }

    pub fn faces(&self) -> Option<CardFaces> {
        self.current().map(|entry| CardFaces::new(entry, self.practice))
    }

    pub fn flip(&mut self) {
        self.face = match self.face {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
        };
    }

    pub fn set_practice(&mut self, practice: PracticeMode) {
        self.practice = practice;
        self.face = Face::Front;
    }

    pub fn set_order(&mut self, order: CardOrder, tracker: &Tracker) {
        if order == self.order {
            return;
        }
        self.order = order;
        self.rebuild_view(tracker);
        self.index = 0;
        self.face = Face::Front;
        info!(order = %order, cards = self.view.len(), "flashcard order changed");
    }

    /// Switch to another level; any cached shuffle is discarded
    pub fn set_level(&mut self, vocab: &Vocabulary, level: HskLevel, tracker: &Tracker) {
        self.level = level;
        self.words = vocab.words(level).to_vec();
        self.shuffled = None;
        self.rebuild_view(tracker);
        self.index = 0;
        self.face = Face::Front;
        info!(%level, cards = self.view.len(), "flashcard level changed");
    }

    /// Log the card being left and pay the flat per-card reward
    fn leave_current(&mut self, tracker: &mut Tracker) {
        if let Some(entry) = self.current().cloned() {
            tracker.record_study_event(StudyKind::Flashcard, &entry, self.level);
            tracker.award(FLASHCARD_ADVANCE_XP, FLASHCARD_ADVANCE_POINTS);
        }
    }

    /// Move to the next card. Returns false at the end of the view.
    pub fn advance(&mut self, tracker: &mut Tracker) -> bool {
        self.face = Face::Front;
        if self.index + 1 >= self.view.len() {
            return false;
        }
        self.leave_current(tracker);
        self.index += 1;
        true
    }

    pub fn retreat(&mut self) -> bool {
        self.face = Face::Front;
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Grade the current card and move on. `None` on an empty view.
    pub fn grade(&mut self, tracker: &mut Tracker, grade: Grade) -> Option<GradeOutcome> {
        let entry = self.current()?.clone();
        let status = MasteryStatus::from(grade);

        let previous = tracker.set_word_status(self.level, &entry.character, status);
        let bonus_awarded = status == MasteryStatus::Known && previous != MasteryStatus::Known;
        if bonus_awarded {
            tracker.award(KNOWN_BONUS_XP, KNOWN_BONUS_POINTS);
        }

        let advanced = match self.order {
            CardOrder::UnlearnedOnly => {
                // a graded card is never New, so it always drops out of the view
                let was_last = self.index + 1 >= self.view.len();
                if !was_last {
                    self.leave_current(tracker);
                }
                self.rebuild_view(tracker);
                self.index = self.index.min(self.view.len().saturating_sub(1));
                self.face = Face::Front;
                !was_last && !self.view.is_empty()
            }
            CardOrder::Sequential | CardOrder::Shuffled => self.advance(tracker),
        };

        debug!(
            character = %entry.character,
            from = %previous,
            to = %status,
            bonus_awarded,
            advanced,
            "card graded"
        );

        Some(GradeOutcome {
            previous,
            bonus_awarded,
            advanced,
        })
    }
}

fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    order.iter().all(|&i| i < len && !std::mem::replace(&mut seen[i], true))
}
