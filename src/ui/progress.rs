use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{BarChart, Block, Borders, Gauge, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use super::charting::{completion_bars, format_label, ratio};
use crate::app::App;
use crate::progress::rewards::XP_PER_LEVEL;

pub fn render(app: &App, f: &mut Frame, area: Rect) {
    let summary = app.summary();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // headline
            Constraint::Length(3), // xp gauge
            Constraint::Min(8),    // charts + table
            Constraint::Length(7), // recent activity
        ])
        .split(area);

    let headline = Paragraph::new(Line::from(format!(
        "Level {} · {} points · {} day streak · {} words studied · {}% quiz accuracy",
        summary.level,
        summary.points,
        summary.streak_days,
        summary.studied_characters,
        format_label(summary.overall_accuracy),
    )))
    .block(Block::default().borders(Borders::ALL).title("Progress"));
    f.render_widget(headline, rows[0]);

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("XP to next level"))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio(summary.experience_points, XP_PER_LEVEL))
        .label(format!("{}/{}", summary.experience_points, XP_PER_LEVEL));
    f.render_widget(gauge, rows[1]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[2]);

    let bars = completion_bars(&summary);
    let data: Vec<(&str, u64)> = bars.iter().map(|(label, v)| (label.as_str(), *v)).collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Words learned (%)"))
        .data(data.as_slice())
        .max(100)
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(chart, middle[0]);

    let header = Row::new(["Level", "Learned", "Learning", "Known", "Quizzes", "Accuracy"])
        .style(Style::default().add_modifier(Modifier::BOLD));
    let table_rows = summary.levels.iter().map(|l| {
        let highlight = if l.level == app.level() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Row::new([
            l.level.to_string().to_uppercase(),
            format!("{}/{}", l.characters_learned, l.total_words),
            l.learning.to_string(),
            l.known.to_string(),
            l.quizzes_completed.to_string(),
            format!("{}%", format_label(l.accuracy)),
        ])
        .style(highlight)
    });
    let table = Table::new(
        table_rows,
        [
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(9),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("By level"));
    f.render_widget(table, middle[1]);

    let items: Vec<ListItem> = summary
        .recent_activity
        .iter()
        .map(|e| {
            ListItem::new(format!(
                "{} {} · {} · {} {} ({})",
                e.date, e.time, e.kind, e.character, e.pinyin, e.meaning
            ))
        })
        .collect();
    let recent = List::new(items).block(Block::default().borders(Borders::ALL).title("Recent activity"));
    f.render_widget(recent, rows[3]);
}
