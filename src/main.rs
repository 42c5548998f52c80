use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::KeyEventKind,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::File,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};
use tracing::{info, warn};

use hsk_deck::{
    app::{App, Control},
    app_dirs::{AppDirs, DB_FILE_NAME, LOG_FILE_NAME},
    config::{Config, ConfigStore, FileConfigStore},
    flashcard::{CardOrder, PracticeMode},
    progress::Tracker,
    quiz::{QuestionType, QuizOrder, QUESTION_COUNTS, TIMER_CHOICES},
    runtime::{AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    speech::speaker_for,
    storage::SqliteStore,
    summary::{export, ExportFormat, ProgressSummary},
    telemetry,
    tutor::TutorClient,
    ui,
    vocabulary::{HskLevel, Vocabulary},
};

/// terminal HSK vocabulary trainer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Study HSK 1-6 vocabulary in the terminal: browse and search words, review flashcards, take timed multiple-choice quizzes and track mastery, XP and streaks across sessions."
)]
pub struct Cli {
    /// HSK level to study
    #[clap(short = 'l', long, value_enum)]
    level: Option<HskLevel>,

    /// which side of the flashcard is shown first
    #[clap(short = 'p', long, value_enum)]
    practice: Option<PracticeMode>,

    /// flashcard ordering
    #[clap(short = 'o', long, value_enum)]
    order: Option<CardOrder>,

    /// quiz question type
    #[clap(short = 't', long, value_enum)]
    quiz_type: Option<QuestionType>,

    /// quiz question ordering
    #[clap(long, value_enum)]
    quiz_order: Option<QuizOrder>,

    /// number of quiz questions (10, 15, 20 or 30)
    #[clap(short = 'n', long, value_parser = parse_question_count)]
    questions: Option<usize>,

    /// whole-quiz countdown in seconds (0, 300, 600, 900 or 1200)
    #[clap(long, value_parser = parse_timer)]
    timer: Option<u32>,

    /// chat tutor endpoint
    #[clap(long)]
    tutor_url: Option<String>,

    /// print a progress summary in the given format and exit
    #[clap(long, value_enum)]
    export: Option<ExportFormat>,

    /// write the export to this file instead of stdout
    #[clap(long, requires = "export")]
    output: Option<PathBuf>,

    /// erase all progress and exit; needs --yes
    #[clap(long)]
    reset: bool,

    /// confirm --reset
    #[clap(long, requires = "reset")]
    yes: bool,

    /// directory holding the progress database and log file
    #[clap(long)]
    data_dir: Option<PathBuf>,
}

fn parse_question_count(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if QUESTION_COUNTS.contains(&n) {
        Ok(n)
    } else {
        Err(format!("must be one of {QUESTION_COUNTS:?}"))
    }
}

fn parse_timer(s: &str) -> Result<u32, String> {
    let n: u32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if TIMER_CHOICES.contains(&n) {
        Ok(n)
    } else {
        Err(format!("must be one of {TIMER_CHOICES:?}"))
    }
}

impl Cli {
    /// Layer command-line overrides on top of the stored preferences
    fn apply(&self, config: &mut Config) {
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(practice) = self.practice {
            config.practice_mode = practice;
        }
        if let Some(order) = self.order {
            config.card_order = order;
        }
        if let Some(kind) = self.quiz_type {
            config.quiz.question_type = kind;
        }
        if let Some(order) = self.quiz_order {
            config.quiz.order = order;
        }
        if let Some(n) = self.questions {
            config.quiz.question_count = n;
        }
        if let Some(secs) = self.timer {
            config.quiz.timer_secs = secs;
        }
        if let Some(url) = &self.tutor_url {
            config.tutor_endpoint = url.clone();
        }
    }

    fn db_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(DB_FILE_NAME))
    }

    /// Where the Progress view writes its exports
    fn export_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(AppDirs::state_dir)
    }

    fn log_path(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.join(LOG_FILE_NAME),
            None => AppDirs::log_path().unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME)),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.reset && !cli.yes {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::MissingRequiredArgument,
            "--reset erases all progress permanently; add --yes to confirm",
        )
        .exit();
    }

    telemetry::init_tracing(&cli.log_path());

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply(&mut config);

    let vocab = Vocabulary::bundled()?;
    let store = match cli.db_path() {
        Some(path) => SqliteStore::open(path)?,
        None => SqliteStore::open_default()?,
    };
    let mut tracker = Tracker::load_with_system_clock(Box::new(store))
        .with_vocabulary(&vocab)
        .with_log_cap(config.study_log_cap);

    if cli.reset {
        tracker.clear_all()?;
        println!("All progress erased.");
        return Ok(());
    }

    if let Some(format) = cli.export {
        let summary = ProgressSummary::build(&tracker, &vocab);
        match &cli.output {
            Some(path) => export(&summary, format, File::create(path)?)?,
            None => export(&summary, format, io::stdout().lock())?,
        }
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let speaker = speaker_for(config.speech_program.as_deref(), config.speech_voice.as_deref());
    let mut app = App::new(config, vocab, tracker, speaker);
    match TutorClient::new(app.config.tutor_endpoint.clone()) {
        Ok(client) => app = app.with_tutor(client, runner.sender()),
        Err(e) => warn!(error = %e, "tutor disabled"),
    }
    if let Some(dir) = cli.export_dir() {
        app = app.with_export_dir(dir);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(level = %app.level(), "session started");
    let outcome = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = config_store.save(&app.config) {
        warn!(error = %e, "failed to save preferences");
    }
    info!("session ended");

    outcome
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;
    let mut last_tick = Instant::now();

    loop {
        let event = runner.step();

        // keys can starve timeouts, so timers follow the wall clock
        let elapsed = last_tick.elapsed();
        if elapsed.as_secs_f64() >= runner.tick_secs() {
            last_tick = Instant::now();
            if app.on_tick(elapsed.as_secs_f64()) {
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }

        match event {
            AppEvent::Tick => {}
            AppEvent::Resize => {
                terminal.draw(|f| ui::draw(app, f))?;
            }
            AppEvent::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(key) == Control::Quit {
                    break;
                }
                terminal.draw(|f| ui::draw(app, f))?;
            }
            AppEvent::TutorReply(result) => {
                app.on_tutor_reply(result);
                terminal.draw(|f| ui::draw(app, f))?;
            }
        }
    }

    Ok(())
}
