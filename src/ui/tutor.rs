use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::tutor::Role;

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let chat = &app.tutor;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line> = chat
        .turns()
        .iter()
        .map(|turn| {
            let (who, color) = match turn.role {
                Role::User => ("you", Color::Yellow),
                Role::Assistant => ("tutor", Color::Cyan),
            };
            Line::from(vec![
                Span::styled(format!("{who}: "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::raw(turn.content.clone()),
            ])
        })
        .collect();
    if chat.is_pending() {
        lines.push(Line::from(Span::styled(
            "tutor is typing…",
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        )));
    }
    if let Some(error) = chat.last_error() {
        lines.push(Line::from(Span::styled(error.to_string(), Style::default().fg(Color::Red))));
    }

    // keep the newest lines in view
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .block(Block::default().borders(Borders::ALL).title("Tutor")),
        chunks[0],
    );

    f.render_widget(
        Paragraph::new(format!("{}▏", chat.input()))
            .block(Block::default().borders(Borders::ALL).title("Message")),
        chunks[1],
    );
}
