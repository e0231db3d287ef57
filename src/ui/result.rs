use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::attempt::{Grade, WrongAnswer};
use crate::storage::Storage;

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let Some(view) = app.results() else {
        return;
    };
    let results = view.results();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(
        frame,
        chunks[1],
        results.score,
        results.total,
        results.percentage(),
        grade_color(results.grade()),
    );
    render_wrong_answers(frame, chunks[2], &results.wrong, app.result_scroll());
    render_rating(frame, chunks[3], view.rating());
    frame.render_widget(Paragraph::new(super::notice_line(app.notice())), chunks[4]);
    render_controls(frame, chunks[5], view.can_rate());
}

fn grade_color(grade: Grade) -> Color {
    match grade {
        Grade::Excellent => Color::Green,
        Grade::Good => Color::Cyan,
        Grade::Fair => Color::Yellow,
        Grade::Poor => Color::Red,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    score: usize,
    total: usize,
    percentage: f64,
    grade_color: Color,
) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} / {}  ({:.0}%)", score, total, percentage),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_wrong_answers(frame: &mut Frame, area: Rect, wrong: &[WrongAnswer], scroll: usize) {
    let lines: Vec<Line> = if wrong.is_empty() {
        vec![Line::from(Span::styled(
            " Perfect score, nothing to review.",
            Style::default().fg(Color::Green),
        ))]
    } else {
        wrong
            .iter()
            .map(|answer| {
                let given = if answer.given.is_empty() {
                    "(no answer)"
                } else {
                    answer.given.as_str()
                };
                Line::from(vec![
                    Span::styled(" - ", Style::default().fg(Color::Red)),
                    Span::styled(
                        format!("{:2}. ", answer.index + 1),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        truncate_question(&answer.question),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::styled(format!("  {}", given), Style::default().fg(Color::Red)),
                    Span::styled(" → ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        answer.correct_answer.as_str(),
                        Style::default().fg(Color::Green),
                    ),
                ])
            })
            .collect()
    };

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Review ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        )
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_rating(frame: &mut Frame, area: Rect, rating: Option<u8>) {
    let line = match rating {
        Some(stars) => Line::from(vec![
            Span::styled("Your rating: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                "★".repeat(stars as usize),
                Style::default().fg(Color::Yellow),
            ),
        ]),
        None => Line::from(Span::styled(
            "Rate this quiz with 1-5",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect, can_rate: bool) {
    let text = if can_rate {
        "j/k scroll  ·  1-5 rate  ·  q quit"
    } else {
        "j/k scroll  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_questions_are_truncated() {
        let long = "x".repeat(80);
        let preview = truncate_question(&long);
        assert_eq!(preview.chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert_eq!(truncate_question("short"), "short");
    }
}
