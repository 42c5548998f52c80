use ratatui::{layout::Rect, Frame};

use super::{flashcards, learn, progress, quiz, tutor};
use crate::app::{App, View};
use crate::quiz::QuizState;

/// A UI Screen boundary: renders one view into the body area
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect);
    /// Key help shown in the footer
    fn help(&self, app: &App) -> &'static str;
}

pub struct LearnScreen;

impl Screen for LearnScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        learn::render(app, f, area);
    }

    fn help(&self, app: &App) -> &'static str {
        if app.searching {
            "type to search · enter save · esc done"
        } else {
            "/ search · h history · x clear · ↑↓ select · ←→ page · s studied · l listen · [ ] level · q quit"
        }
    }
}

pub struct FlashcardScreen;

impl Screen for FlashcardScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        flashcards::render(app, f, area);
    }

    fn help(&self, _app: &App) -> &'static str {
        "space flip · k known · l learning · ←→ move · s speak · m mode · o order · [ ] level · q quit"
    }
}

pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        quiz::render(app, f, area);
    }

    fn help(&self, app: &App) -> &'static str {
        match app.quiz.state() {
            QuizState::NotStarted => "enter start · t type · c count · m timer · o order · [ ] level · q quit",
            QuizState::InProgress => "1-4 answer · ←→ move · r retry · s replay audio · f finish · x abandon",
            QuizState::Completed => "enter new quiz · w retry missed · x close · q quit",
        }
    }
}

pub struct ProgressScreen;

impl Screen for ProgressScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        progress::render(app, f, area);
    }

    fn help(&self, _app: &App) -> &'static str {
        "e export json · c export csv · r reset progress · [ ] level · q quit"
    }
}

pub struct TutorScreen;

impl Screen for TutorScreen {
    fn render(&self, app: &App, f: &mut Frame, area: Rect) {
        tutor::render(app, f, area);
    }

    fn help(&self, _app: &App) -> &'static str {
        "type a message · enter send · tab switch view · esc quit"
    }
}

/// Helper to construct the screen for the active view
pub fn current_screen(view: View) -> Box<dyn Screen> {
    match view {
        View::Learn => Box::new(LearnScreen),
        View::Flashcards => Box::new(FlashcardScreen),
        View::Quiz => Box::new(QuizScreen),
        View::Progress => Box::new(ProgressScreen),
        View::Tutor => Box::new(TutorScreen),
    }
}
