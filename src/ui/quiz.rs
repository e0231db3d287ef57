use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::storage::Storage;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let question = app.current_question();
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.text);

    let index = app.attempt().current_index();
    let saved = app.attempt().answer(index);
    if question.is_free_text() {
        render_text_input(frame, chunks[2], app.text_input());
    } else {
        render_options(
            frame,
            chunks[2],
            &question.choices(),
            app.selected_option(),
            saved,
        );
    }

    frame.render_widget(Paragraph::new(super::notice_line(app.notice())), chunks[3]);
    render_controls(frame, chunks[4], question.is_free_text());
}

fn render_progress<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let progress = format!(
        "{}/{}  ·  {} answered",
        app.current_question_number(),
        app.total_questions(),
        app.attempt().answered_count()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(
    frame: &mut Frame,
    area: Rect,
    options: &[String],
    selected: usize,
    saved: Option<&str>,
) {
    let mut lines: Vec<Line> = Vec::with_capacity(options.len() * 2);

    for (index, option) in options.iter().enumerate() {
        let is_selected = index == selected;
        let is_saved = saved == Some(option.as_str());
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };
        let check = if is_saved { " *" } else { "" };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('-');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(option.as_str(), style),
            Span::styled(check, Style::default().fg(Color::Green)),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_text_input(frame: &mut Frame, area: Rect, input: &str) {
    let widget = Paragraph::new(format!("{}_", input))
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Your answer ")
                .title_style(Style::default().fg(Color::Cyan))
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, free_text: bool) {
    let text = if free_text {
        "type answer  ·  ←/→ question  ·  enter submit  ·  esc quit"
    } else {
        "j/k navigate  ·  space pick  ·  h/l question  ·  enter submit  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
