use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::quiz::{Answer, Question, QuestionType, QuizState};
use crate::util::format_clock;

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    match app.quiz.state() {
        QuizState::NotStarted => render_setup(app, f, area),
        QuizState::InProgress => render_question(app, f, area),
        QuizState::Completed => render_result(app, f, area),
    }
}

fn render_setup(app: &App, f: &mut Frame, area: Rect) {
    let cfg = &app.config.quiz;
    let timer = if cfg.timer_secs == 0 {
        "off".to_string()
    } else {
        format_clock(u64::from(cfg.timer_secs))
    };
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:>10}: "), Style::default().add_modifier(Modifier::DIM)),
            Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
        ])
    };

    let lines = vec![
        Line::from(""),
        row("Level", app.level().to_string().to_uppercase()),
        row("Type", cfg.question_type.to_string()),
        row("Questions", cfg.question_count.to_string()),
        row("Timer", timer),
        row("Order", cfg.order.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "press enter to start",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )),
    ];
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("New quiz")),
        area,
    );
}

fn option_style(question: &Question, i: usize) -> Style {
    match question.selected {
        None => Style::default(),
        Some(_) if i == question.correct => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        Some(Answer::Choice(c)) if c == i => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Some(_) => Style::default().add_modifier(Modifier::DIM),
    }
}

fn render_question(app: &App, f: &mut Frame, area: Rect) {
    let quiz = &app.quiz;
    let Some(question) = quiz.current_question() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let mut header = format!(
        "Question {}/{} · score {} · ✓ {} ✗ {}",
        quiz.current_index() + 1,
        quiz.questions().len(),
        quiz.score(),
        quiz.correct_count(),
        quiz.wrong_count()
    );
    if let Some(secs) = quiz.remaining_secs() {
        header.push_str(&format!(" · ⏱ {}", format_clock(secs)));
    }
    f.render_widget(Paragraph::new(header), chunks[0]);

    let prompt = if quiz.config().question_type == QuestionType::Listening && !question.is_answered() {
        "🔊 listen and pick the word (s to replay)".to_string()
    } else {
        question.prompt.clone()
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            prompt,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(question.options.iter().enumerate().map(|(i, option)| {
        Line::from(Span::styled(format!("{}. {option}", i + 1), option_style(question, i)))
    }));
    lines.push(Line::from(""));

    let feedback = match question.selected {
        None => None,
        Some(Answer::TimedOut) => Some(("Time is up", Color::Red)),
        Some(_) if question.is_correct() == Some(true) => Some(("Correct!", Color::Green)),
        Some(_) => Some(("Wrong · r to retry, n for next", Color::Red)),
    };
    if let Some((text, color)) = feedback {
        lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
        lines.push(Line::from(Span::styled(
            question.entry.breakdown.clone(),
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    }

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title(quiz.config().question_type.to_string())),
        chunks[1],
    );
}

fn render_result(app: &App, f: &mut Frame, area: Rect) {
    let quiz = &app.quiz;
    let mut lines = vec![Line::from("")];

    if let Some(result) = quiz.result() {
        lines.push(Line::from(Span::styled(
            format!("Score {} · {}/{} correct · {:.0}%", result.score, result.correct, result.total, result.accuracy),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("+{} XP · +{} points", result.xp_bonus, result.points)));
    }

    let missed = quiz.wrong_answers();
    if !missed.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Missed:",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.extend(missed.into_iter().map(|entry| Line::from(entry.breakdown.clone())));
    }

    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Results")),
        area,
    );
}
