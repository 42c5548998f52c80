use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::progress::rewards::{LISTEN_XP, STUDY_POINTS, STUDY_XP};
use crate::progress::{StudyKind, Tracker};
use crate::speech::Speaker;
use crate::storage::SEARCH_HISTORY_KEY;
use crate::vocabulary::{matches_query, HskLevel, Vocabulary, VocabularyEntry};

pub const SEARCH_HISTORY_CAP: usize = 10;
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Recent search queries, newest first, without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchHistory {
    queries: Vec<String>,
}

impl SearchHistory {
    pub fn load(tracker: &Tracker) -> Self {
        tracker
            .load_document::<SearchHistory>(SEARCH_HISTORY_KEY)
            .unwrap_or_default()
    }

    pub fn save(&self, tracker: &mut Tracker) {
        if let Err(e) = tracker.save_document(SEARCH_HISTORY_KEY, self) {
            warn!(error = %e, "failed to persist search history");
        }
    }

    pub fn push(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        self.queries.retain(|q| q != query);
        self.queries.insert(0, query.to_string());
        self.queries.truncate(SEARCH_HISTORY_CAP);
        true
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }
}

/// Paged, searchable listing of one level's words
#[derive(Debug)]
pub struct LearnView {
    level: HskLevel,
    words: Vec<VocabularyEntry>,
    query: String,
    matches: Vec<usize>,
    page: usize,
    page_size: usize,
    selected: usize,
    history: SearchHistory,
}

impl LearnView {
    pub fn new(vocab: &Vocabulary, level: HskLevel, page_size: usize, tracker: &Tracker) -> Self {
        let mut view = Self {
            level,
            words: vocab.words(level).to_vec(),
            query: String::new(),
            matches: Vec::new(),
            page: 0,
            page_size: page_size.max(1),
            selected: 0,
            history: SearchHistory::load(tracker),
        };
        view.refilter();
        view
    }

    fn refilter(&mut self) {
        self.matches = self
            .words
            .iter()
            .enumerate()
            .filter(|(_, w)| matches_query(w, &self.query))
            .map(|(i, _)| i)
            .collect();
        self.page = 0;
        self.selected = 0;
    }

    pub fn level(&self) -> HskLevel {
        self.level
    }

    pub fn set_level(&mut self, vocab: &Vocabulary, level: HskLevel) {
        self.level = level;
        self.words = vocab.words(level).to_vec();
        self.refilter();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.refilter();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.refilter();
    }

    /// Store the current query in the search history
    pub fn commit_search(&mut self, tracker: &mut Tracker) {
        if self.history.push(&self.query) {
            debug!(query = %self.query, results = self.matches.len(), "search committed");
            self.history.save(tracker);
        }
    }

    /// Re-run a query from history by position
    pub fn recall(&mut self, position: usize) -> bool {
        match self.history.queries().get(position).cloned() {
            Some(query) => {
                self.set_query(&query);
                true
            }
            None => false,
        }
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.matches.len().div_ceil(self.page_size).max(1)
    }

    pub fn page_items(&self) -> Vec<&VocabularyEntry> {
        self.matches
            .iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|&i| &self.words[i])
            .collect()
    }

    pub fn next_page(&mut self) -> bool {
        if self.page + 1 >= self.page_count() {
            return false;
        }
        self.page += 1;
        self.selected = 0;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        self.selected = 0;
        true
    }

    /// Cursor position within the current page
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let on_page = self.page_items().len();
        if self.selected + 1 < on_page {
            self.selected += 1;
        } else if self.next_page() {
            self.selected = 0;
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else if self.prev_page() {
            self.selected = self.page_items().len().saturating_sub(1);
        }
    }

    pub fn selected_entry(&self) -> Option<&VocabularyEntry> {
        self.page_items().get(self.selected).copied()
    }

    /// Record the selected word as studied and pay the study reward
    pub fn mark_studied(&self, tracker: &mut Tracker) -> Option<VocabularyEntry> {
        let entry = self.selected_entry()?.clone();
        tracker.record_study_event(StudyKind::Study, &entry, self.level);
        tracker.award(STUDY_XP, STUDY_POINTS);
        Some(entry)
    }

    /// Speak the selected word and record the listen.
    /// A failing speech backend is logged and the event is still recorded.
    pub fn listen(&self, tracker: &mut Tracker, speaker: &dyn Speaker) -> Option<VocabularyEntry> {
        let entry = self.selected_entry()?.clone();
        if let Err(e) = speaker.speak(&entry.character) {
            warn!(error = %e, character = %entry.character, "speech unavailable");
        }
        tracker.record_study_event(StudyKind::Listen, &entry, self.level);
        tracker.award(LISTEN_XP, 0);
        Some(entry)
    }
}
