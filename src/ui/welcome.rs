use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::attempt::ScoringMode;
use crate::storage::Storage;

pub fn render<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let attempt = app.attempt();
    let quiz = attempt.quiz();

    let kind = match attempt.mode() {
        ScoringMode::Batch => "Daily Quiz",
        ScoringMode::PerQuestion => "Quiz",
    };
    let subtitle = format!("{} · {} Questions", kind, quiz.question_count());

    let hint = if attempt.was_resumed() {
        format!(
            "to resume at question {} ({} answered)",
            attempt.current_index() + 1,
            attempt.answered_count()
        )
    } else {
        "to start".to_string()
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            quiz.title.to_uppercase(),
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(subtitle, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            quiz.description.clone().unwrap_or_default(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
        Line::from("q to quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Color::DarkGray),
        );

    frame.render_widget(widget, chunks[1]);
}
