use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fs::File;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::flashcard::{FlashcardSession, Grade};
use crate::learn::LearnView;
use crate::progress::Tracker;
use crate::quiz::{QuestionType, QuizOrder, QuizSession, QuizState};
use crate::runtime::AppEvent;
use crate::speech::Speaker;
use crate::summary::{export, ExportFormat, ProgressSummary};
use crate::tutor::{spawn_request, TutorChat, TutorClient, TutorError};
use crate::vocabulary::{HskLevel, Vocabulary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum View {
    Learn,
    Flashcards,
    Quiz,
    Progress,
    Tutor,
}

impl View {
    pub const ALL: [View; 5] = [
        View::Learn,
        View::Flashcards,
        View::Quiz,
        View::Progress,
        View::Tutor,
    ];

    pub fn position(self) -> usize {
        Self::ALL.iter().position(|v| *v == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Top-level controller: owns the tracker and every view's session state,
/// and routes keys to whichever view is active.
pub struct App {
    pub config: Config,
    pub vocab: Vocabulary,
    pub tracker: Tracker,
    pub view: View,
    pub learn: LearnView,
    pub flashcards: FlashcardSession,
    pub quiz: QuizSession,
    pub tutor: TutorChat,
    /// Learn view is capturing keystrokes for its search box
    pub searching: bool,
    /// A reset was requested and waits for confirmation
    pub confirm_reset: bool,
    pub status: Option<String>,
    history_cursor: usize,
    spoken_question: Option<usize>,
    export_dir: PathBuf,
    speaker: Box<dyn Speaker>,
    tutor_client: Option<Arc<TutorClient>>,
    events: Option<Sender<AppEvent>>,
}

impl App {
    pub fn new(config: Config, vocab: Vocabulary, tracker: Tracker, speaker: Box<dyn Speaker>) -> Self {
        let level = config.level;
        let learn = LearnView::new(&vocab, level, config.page_size, &tracker);
        let flashcards = FlashcardSession::resume(
            &vocab,
            config.practice_mode,
            config.card_order,
            level,
            &tracker,
        );
        let quiz = QuizSession::new(&vocab, level, config.quiz);

        Self {
            config,
            vocab,
            tracker,
            view: View::Learn,
            learn,
            flashcards,
            quiz,
            tutor: TutorChat::default(),
            searching: false,
            confirm_reset: false,
            status: None,
            history_cursor: 0,
            spoken_question: None,
            export_dir: PathBuf::from("."),
            speaker,
            tutor_client: None,
            events: None,
        }
    }

    /// Enable the tutor view; replies are posted to `events`
    pub fn with_tutor(mut self, client: TutorClient, events: Sender<AppEvent>) -> Self {
        self.tutor_client = Some(Arc::new(client));
        self.events = Some(events);
        self
    }

    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.export_dir = dir;
        self
    }

    pub fn level(&self) -> HskLevel {
        self.config.level
    }

    pub fn switch_view(&mut self, view: View) {
        if self.view == View::Quiz && view != View::Quiz {
            self.quiz.abandon();
            self.spoken_question = None;
        }
        if view == View::Flashcards {
            self.flashcards.refresh(&self.tracker);
        }
        self.searching = false;
        self.confirm_reset = false;
        self.status = None;
        self.view = view;
        info!(%view, "view changed");
    }

    pub fn set_level(&mut self, level: HskLevel) {
        self.config.level = level;
        self.learn.set_level(&self.vocab, level);
        if self.flashcards.level() != level {
            self.flashcards.set_level(&self.vocab, level, &self.tracker);
        }
        self.quiz.set_level(&self.vocab, level);
        self.spoken_question = None;
        self.save_flashcards();
        self.status = Some(format!("Switched to {}", level.to_string().to_uppercase()));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }

        match key.code {
            KeyCode::Tab => {
                self.switch_view(self.view.next());
                return Control::Continue;
            }
            KeyCode::BackTab => {
                self.switch_view(self.view.prev());
                return Control::Continue;
            }
            KeyCode::Esc if self.searching => {
                self.searching = false;
                return Control::Continue;
            }
            KeyCode::Esc => return Control::Quit,
            _ => {}
        }

        // free-text views take every remaining key
        if self.searching {
            self.on_search_key(key);
            return Control::Continue;
        }
        if self.view == View::Tutor {
            self.on_tutor_key(key);
            return Control::Continue;
        }

        if self.confirm_reset {
            self.on_confirm_key(key);
            return Control::Continue;
        }

        match key.code {
            KeyCode::Char('q') => return Control::Quit,
            KeyCode::Char(']') => self.set_level(self.level().next()),
            KeyCode::Char('[') => self.set_level(self.level().prev()),
            _ => match self.view {
                View::Learn => self.on_learn_key(key),
                View::Flashcards => self.on_flashcard_key(key),
                View::Quiz => self.on_quiz_key(key),
                View::Progress => self.on_progress_key(key),
                View::Tutor => {}
            },
        }
        Control::Continue
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.learn.commit_search(&mut self.tracker);
                self.searching = false;
            }
            KeyCode::Backspace => self.learn.pop_query_char(),
            KeyCode::Char(c) => self.learn.push_query_char(c),
            _ => {}
        }
    }

    fn on_learn_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('/') => {
                self.searching = true;
                self.history_cursor = 0;
            }
            KeyCode::Char('h') => {
                let count = self.learn.history().queries().len();
                if count > 0 {
                    self.learn.recall(self.history_cursor % count);
                    self.history_cursor += 1;
                }
            }
            KeyCode::Char('x') => self.learn.set_query(""),
            KeyCode::Down | KeyCode::Char('j') => self.learn.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.learn.select_prev(),
            KeyCode::Right | KeyCode::PageDown => {
                self.learn.next_page();
            }
            KeyCode::Left | KeyCode::PageUp => {
                self.learn.prev_page();
            }
            KeyCode::Char('s') | KeyCode::Enter => {
                if let Some(entry) = self.learn.mark_studied(&mut self.tracker) {
                    self.status = Some(format!("Studied {}", entry.character));
                }
            }
            KeyCode::Char('l') => {
                self.learn.listen(&mut self.tracker, self.speaker.as_ref());
            }
            _ => {}
        }
    }

    fn on_flashcard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Down => self.flashcards.flip(),
            KeyCode::Right | KeyCode::Char('n') => {
                self.flashcards.advance(&mut self.tracker);
            }
            KeyCode::Left | KeyCode::Char('p') => {
                self.flashcards.retreat();
            }
            KeyCode::Char('k') => self.grade_card(Grade::Known),
            KeyCode::Char('l') => self.grade_card(Grade::Learning),
            KeyCode::Char('s') => {
                if let Some(entry) = self.flashcards.current() {
                    if let Err(e) = self.speaker.speak(&entry.character) {
                        warn!(error = %e, "speech unavailable");
                    }
                }
            }
            KeyCode::Char('m') => {
                let practice = self.flashcards.practice().next();
                self.flashcards.set_practice(practice);
                self.config.practice_mode = practice;
            }
            KeyCode::Char('o') => {
                let order = self.flashcards.order().next();
                self.flashcards.set_order(order, &self.tracker);
                self.config.card_order = order;
            }
            _ => return,
        }
        self.save_flashcards();
    }

    fn grade_card(&mut self, grade: Grade) {
        if let Some(outcome) = self.flashcards.grade(&mut self.tracker, grade) {
            self.status = outcome
                .bonus_awarded
                .then(|| "New word learned!".to_string());
        }
    }

    fn save_flashcards(&mut self) {
        if let Err(e) = self.flashcards.save_state(&mut self.tracker) {
            warn!(error = %e, "failed to persist flashcard state");
        }
    }

    fn on_quiz_key(&mut self, key: KeyEvent) {
        match self.quiz.state() {
            QuizState::NotStarted => match key.code {
                KeyCode::Enter => self.start_quiz(),
                KeyCode::Char('t') => {
                    self.config.quiz.question_type = self.config.quiz.question_type.next();
                }
                KeyCode::Char('c') => self.config.quiz.cycle_question_count(),
                KeyCode::Char('m') => self.config.quiz.cycle_timer(),
                KeyCode::Char('o') => {
                    self.config.quiz.order = match self.config.quiz.order {
                        QuizOrder::Random => QuizOrder::Sequential,
                        QuizOrder::Sequential => QuizOrder::Random,
                    };
                }
                _ => {}
            },
            QuizState::InProgress => match key.code {
                KeyCode::Char(c @ '1'..='4') => {
                    let choice = c as usize - '1' as usize;
                    self.quiz.select_answer(&mut self.tracker, choice);
                }
                KeyCode::Right | KeyCode::Char('n') | KeyCode::Enter => {
                    self.quiz.next(&mut self.tracker);
                }
                KeyCode::Left | KeyCode::Char('p') => {
                    self.quiz.previous();
                }
                KeyCode::Char('r') => {
                    if self.quiz.retry() {
                        self.spoken_question = None;
                    }
                }
                KeyCode::Char('s') => self.spoken_question = None,
                KeyCode::Char('f') => {
                    self.quiz.finish(&mut self.tracker);
                }
                KeyCode::Char('x') => self.quiz.abandon(),
                _ => {}
            },
            QuizState::Completed => match key.code {
                KeyCode::Enter => self.start_quiz(),
                KeyCode::Char('w') => match self.quiz.retry_wrong_answers() {
                    Ok(()) => self.spoken_question = None,
                    Err(e) => self.status = Some(e.to_string()),
                },
                KeyCode::Char('x') => self.quiz.abandon(),
                _ => {}
            },
        }
        self.announce_question();
    }

    fn start_quiz(&mut self) {
        self.quiz.set_config(self.config.quiz);
        self.spoken_question = None;
        if let Err(e) = self.quiz.start() {
            self.status = Some(e.to_string());
        }
    }

    /// Speak the current question once when it is a listening question
    fn announce_question(&mut self) {
        if self.quiz.state() != QuizState::InProgress
            || self.quiz.config().question_type != QuestionType::Listening
        {
            return;
        }
        let index = self.quiz.current_index();
        if self.spoken_question == Some(index) {
            return;
        }
        if let Some(question) = self.quiz.current_question() {
            if question.is_answered() {
                return;
            }
            if let Err(e) = self.speaker.speak(&question.prompt) {
                warn!(error = %e, "speech unavailable");
            }
            self.spoken_question = Some(index);
        }
    }

    fn on_progress_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') => {
                self.confirm_reset = true;
                self.status = Some("Erase ALL progress? Press y to confirm, any other key to cancel".into());
            }
            KeyCode::Char('e') => self.export_to_file(ExportFormat::Json),
            KeyCode::Char('c') => self.export_to_file(ExportFormat::Csv),
            _ => {}
        }
    }

    fn on_confirm_key(&mut self, key: KeyEvent) {
        self.confirm_reset = false;
        if key.code == KeyCode::Char('y') {
            self.status = Some(match self.reset_progress() {
                Ok(()) => "Progress erased".to_string(),
                Err(e) => format!("Reset failed: {e}"),
            });
        } else {
            self.status = Some("Reset cancelled".to_string());
        }
    }

    /// Erase every piece of progress. Callers must have confirmed with the user.
    pub fn reset_progress(&mut self) -> Result<()> {
        self.quiz.abandon();
        self.tracker.clear_all()?;
        self.flashcards.refresh(&self.tracker);
        Ok(())
    }

    fn export_to_file(&mut self, format: ExportFormat) {
        let path = self.export_dir.join(format!("hsk-deck-progress.{format}"));
        let summary = ProgressSummary::build(&self.tracker, &self.vocab);
        let outcome = File::create(&path)
            .map_err(crate::Error::from)
            .and_then(|file| export(&summary, format, file));
        self.status = Some(match outcome {
            Ok(()) => {
                info!(path = %path.display(), %format, "progress exported");
                format!("Exported to {}", path.display())
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "export failed");
                format!("Export failed: {e}")
            }
        });
    }

    fn on_tutor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.send_tutor_message(),
            KeyCode::Backspace => self.tutor.pop_char(),
            KeyCode::Char(c) => self.tutor.push_char(c),
            _ => {}
        }
    }

    fn send_tutor_message(&mut self) {
        let (Some(client), Some(events)) = (self.tutor_client.clone(), self.events.clone()) else {
            self.status = Some("Tutor is not configured".to_string());
            return;
        };
        if let Some((message, history)) = self.tutor.submit() {
            spawn_request(client, message, history, events);
        }
    }

    pub fn on_tutor_reply(&mut self, result: std::result::Result<String, TutorError>) {
        self.tutor.receive(result);
    }

    /// Advance timers by `dt` seconds. Returns true when the screen should redraw.
    pub fn on_tick(&mut self, dt: f64) -> bool {
        if self.quiz.state() != QuizState::InProgress {
            return false;
        }
        self.quiz.on_tick(&mut self.tracker, dt);
        self.announce_question();
        true
    }

    pub fn summary(&self) -> ProgressSummary {
        ProgressSummary::build(&self.tracker, &self.vocab)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flashcard::CardOrder;
    use crate::runtime::SystemClock;
    use crate::speech::SilentSpeaker;
    use crate::storage::MemoryStore;
    use crate::vocabulary::VocabularyEntry;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct RecordingSpeaker {
        spoken: Rc<RefCell<Vec<String>>>,
    }

    impl Speaker for RecordingSpeaker {
        fn speak(&self, text: &str) -> std::io::Result<()> {
            self.spoken.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    fn vocab() -> Vocabulary {
        let level = |prefix: &str| {
            (1..=12)
                .map(|i| {
                    VocabularyEntry::new(
                        &format!("{prefix}{i}"),
                        &format!("{prefix}pin{i}"),
                        &format!("{prefix} meaning {i}"),
                    )
                })
                .collect::<Vec<_>>()
        };
        Vocabulary::from_levels([(HskLevel::Hsk1, level("一")), (HskLevel::Hsk2, level("二"))])
    }

    fn app_with(store: &MemoryStore, speaker: Box<dyn Speaker>) -> App {
        let tracker = Tracker::load(Box::new(store.clone()), Box::new(SystemClock));
        App::new(Config::default(), vocab(), tracker, speaker)
    }

    fn app() -> App {
        app_with(&MemoryStore::new(), Box::new(SilentSpeaker))
    }

    fn press(app: &mut App, code: KeyCode) -> Control {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_tab_cycles_views() {
        let mut app = app();
        assert_eq!(app.view, View::Learn);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.view, View::Flashcards);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.view, View::Tutor);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert_eq!(press(&mut app, KeyCode::Char('q')), Control::Quit);
        assert_eq!(
            app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Control::Quit
        );
        assert_eq!(press(&mut app, KeyCode::Esc), Control::Quit);
    }

    #[test]
    fn test_tutor_view_captures_letters() {
        let mut app = app();
        app.switch_view(View::Tutor);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Control::Continue);
        assert_eq!(app.tutor.input(), "q");

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.status.as_deref(), Some("Tutor is not configured"));
        assert!(!app.tutor.is_pending());
    }

    #[test]
    fn test_search_mode_edits_query() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        for c in "meaning 1".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.learn.query(), "meaning 1");
        // 1, 10, 11, 12
        assert_eq!(app.learn.match_count(), 4);

        press(&mut app, KeyCode::Enter);
        assert!(!app.searching);
        assert_eq!(app.learn.history().queries(), ["meaning 1".to_string()]);
    }

    #[test]
    fn test_leaving_quiz_abandons_it() {
        let mut app = app();
        app.switch_view(View::Quiz);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.quiz.state(), QuizState::InProgress);

        press(&mut app, KeyCode::Tab);
        assert_eq!(app.quiz.state(), QuizState::NotStarted);
        assert!(!app.on_tick(10.0));
    }

    #[test]
    fn test_level_switch_reaches_every_view() {
        let mut app = app();
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.level(), HskLevel::Hsk2);
        assert_eq!(app.learn.level(), HskLevel::Hsk2);
        assert_eq!(app.flashcards.level(), HskLevel::Hsk2);
        assert_eq!(app.quiz.level(), HskLevel::Hsk2);
        assert_eq!(app.flashcards.current().unwrap().character, "二1");
    }

    #[test]
    fn test_flashcard_state_is_resumed() {
        let store = MemoryStore::new();
        {
            let mut app = app_with(&store, Box::new(SilentSpeaker));
            app.switch_view(View::Flashcards);
            press(&mut app, KeyCode::Char('o'));
            assert_eq!(app.flashcards.order(), CardOrder::Shuffled);
            press(&mut app, KeyCode::Right);
            press(&mut app, KeyCode::Right);
        }
        let config = Config {
            card_order: CardOrder::Shuffled,
            ..Config::default()
        };
        let tracker = Tracker::load(Box::new(store.clone()), Box::new(SystemClock));
        let app = App::new(config, vocab(), tracker, Box::new(SilentSpeaker));
        assert_eq!(app.flashcards.order(), CardOrder::Shuffled);
        assert_eq!(app.flashcards.index(), 2);
    }

    #[test]
    fn test_configured_settings_win_over_saved_flashcards() {
        let store = MemoryStore::new();
        {
            let mut app = app_with(&store, Box::new(SilentSpeaker));
            app.switch_view(View::Flashcards);
            press(&mut app, KeyCode::Right);
            assert_eq!(app.flashcards.index(), 1);
        }

        let config = Config {
            level: HskLevel::Hsk2,
            card_order: CardOrder::UnlearnedOnly,
            ..Config::default()
        };
        let tracker = Tracker::load(Box::new(store.clone()), Box::new(SystemClock));
        let app = App::new(config, vocab(), tracker, Box::new(SilentSpeaker));
        assert_eq!(app.level(), HskLevel::Hsk2);
        assert_eq!(app.config.level, HskLevel::Hsk2);
        assert_eq!(app.flashcards.level(), HskLevel::Hsk2);
        assert_eq!(app.flashcards.order(), CardOrder::UnlearnedOnly);
        assert_eq!(app.flashcards.index(), 0);
        assert_eq!(app.learn.level(), HskLevel::Hsk2);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut app = app();
        app.tracker.award(40, 4);
        app.switch_view(View::Progress);

        press(&mut app, KeyCode::Char('r'));
        assert!(app.confirm_reset);
        press(&mut app, KeyCode::Char('n'));
        assert!(!app.confirm_reset);
        assert_eq!(app.tracker.record().experience_points, 40);

        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.tracker.record().experience_points, 0);
        assert_eq!(app.status.as_deref(), Some("Progress erased"));
    }

    #[test]
    fn test_listening_quiz_speaks_each_question_once() {
        let speaker = RecordingSpeaker::default();
        let mut app = app_with(&MemoryStore::new(), Box::new(speaker.clone()));
        app.config.quiz.question_type = QuestionType::Listening;
        app.switch_view(View::Quiz);

        press(&mut app, KeyCode::Enter);
        assert_eq!(speaker.spoken.borrow().len(), 1);
        app.on_tick(0.1);
        assert_eq!(speaker.spoken.borrow().len(), 1);

        let correct = app.quiz.current_question().unwrap().correct;
        press(&mut app, KeyCode::Char(char::from(b'1' + correct as u8)));
        app.on_tick(2.0);
        assert_eq!(app.quiz.current_index(), 1);
        assert_eq!(speaker.spoken.borrow().len(), 2);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app().with_export_dir(dir.path().to_path_buf());
        app.switch_view(View::Progress);
        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Char('c'));

        assert!(dir.path().join("hsk-deck-progress.json").exists());
        assert!(dir.path().join("hsk-deck-progress.csv").exists());
    }
}
