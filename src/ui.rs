pub mod charting;
pub mod flashcards;
pub mod learn;
pub mod progress;
pub mod quiz;
pub mod screen;
pub mod tutor;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::progress::MasteryStatus;
use crate::util::truncate_to_width;

const HORIZONTAL_MARGIN: u16 = 1;

pub fn status_style(status: MasteryStatus) -> Style {
    match status {
        MasteryStatus::New => Style::default().add_modifier(Modifier::DIM),
        MasteryStatus::Learning => Style::default().fg(Color::Yellow),
        MasteryStatus::Known => Style::default().fg(Color::Green),
    }
}

/// Paint the whole application: tab bar, active view, status and key help
pub fn draw(app: &App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(3), // tabs
            Constraint::Min(0),    // body
            Constraint::Length(1), // status
            Constraint::Length(1), // help
        ])
        .split(f.area());

    let record = app.tracker.record();
    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.to_string())).collect();
    let tabs = Tabs::new(titles)
        .select(app.view.position())
        .block(Block::default().borders(Borders::ALL).title(format!(
            "hsk-deck · {} · Lv {} · {} XP · {} pts · {}🔥",
            app.level().to_string().to_uppercase(),
            record.level,
            record.experience_points,
            record.points,
            record.streak_days
        )))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    let screen = screen::current_screen(app.view);
    screen.render(app, f, chunks[1]);

    if let Some(status) = &app.status {
        let style = if app.confirm_reset {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        f.render_widget(Paragraph::new(Span::styled(status.clone(), style)), chunks[2]);
    }

    let help = truncate_to_width(screen.help(app), chunks[3].width as usize);
    f.render_widget(
        Paragraph::new(Span::styled(help, Style::default().add_modifier(Modifier::DIM))),
        chunks[3],
    );
}
