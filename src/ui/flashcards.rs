use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::status_style;
use crate::app::App;
use crate::flashcard::Face;

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let session = &app.flashcards;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let info = format!(
        "{} · mode: {} · order: {} · card {}/{}",
        session.level().to_string().to_uppercase(),
        session.practice(),
        session.order(),
        if session.is_empty() { 0 } else { session.index() + 1 },
        session.len()
    );
    f.render_widget(
        Paragraph::new(info).style(Style::default().add_modifier(Modifier::DIM)),
        chunks[0],
    );

    let block = Block::default().borders(Borders::ALL).title(match session.face() {
        Face::Front => "Front",
        Face::Back => "Back",
    });

    let (Some(faces), Some(entry)) = (session.faces(), session.current()) else {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No cards to show",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from("Every word in this view is already being learned. Press o to change order."),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(empty, chunks[1]);
        return;
    };

    let status = app.tracker.word_status(session.level(), &entry.character);
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            faces.prompt.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    match session.face() {
        Face::Front => lines.push(Line::from(Span::styled(
            "press space to flip",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        ))),
        Face::Back => {
            for (label, value) in &faces.answers {
                lines.push(Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().add_modifier(Modifier::DIM)),
                    Span::styled(value.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                faces.breakdown.clone(),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(status.to_string(), status_style(status))));

    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    f.render_widget(card, chunks[1]);
}
