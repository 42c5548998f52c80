use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::status_style;
use crate::app::App;

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let view = &app.learn;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // search box
            Constraint::Min(0),    // word table
            Constraint::Length(1), // history
        ])
        .split(area);

    let cursor = if app.searching { "▏" } else { "" };
    let search = Paragraph::new(Line::from(vec![
        Span::raw(view.query()),
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Search ({} matches)", view.match_count()))
            .border_style(if app.searching {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            }),
    );
    f.render_widget(search, chunks[0]);

    let header = Row::new(["Character", "Pinyin", "Meaning", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let rows = view.page_items().into_iter().enumerate().map(|(i, entry)| {
        let status = app.tracker.word_status(view.level(), &entry.character);
        let row = Row::new([
            Cell::from(entry.character.clone()),
            Cell::from(entry.pinyin.clone()),
            Cell::from(entry.meaning.clone()),
            Cell::from(Span::styled(status.to_string(), status_style(status))),
        ]);
        if i == view.selected() {
            row.style(Style::default().add_modifier(Modifier::REVERSED))
        } else {
            row
        }
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(18),
            Constraint::Min(20),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(format!(
        "{} · page {}/{}",
        view.level().to_string().to_uppercase(),
        view.page() + 1,
        view.page_count()
    )));
    f.render_widget(table, chunks[1]);

    let history = view.history().queries().join(" · ");
    let history = Paragraph::new(Line::from(vec![
        Span::styled("Recent: ", Style::default().add_modifier(Modifier::DIM)),
        Span::raw(history),
    ]));
    f.render_widget(history, chunks[2]);
}
