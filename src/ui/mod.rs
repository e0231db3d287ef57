mod quiz;
mod result;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, Notice, Screen};
use crate::storage::Storage;

pub fn render<S: Storage>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen {
        Screen::Welcome => welcome::render(frame, area, app),
        Screen::Quiz => quiz::render(frame, area, app),
        Screen::Results => result::render(frame, area, app),
    }
}

fn notice_line(notice: Option<&Notice>) -> Line<'_> {
    match notice {
        None => Line::from(""),
        Some(Notice::Info(text)) => Line::from(Span::styled(
            text.as_str(),
            Style::default().fg(Color::Cyan),
        )),
        Some(Notice::Error(text)) => Line::from(Span::styled(
            text.as_str(),
            Style::default().fg(Color::Red).bold(),
        )),
        Some(Notice::Correct) => Line::from(Span::styled(
            "Correct!",
            Style::default().fg(Color::Green).bold(),
        )),
        Some(Notice::Incorrect { correct_answer }) => Line::from(vec![
            Span::styled("Wrong. ", Style::default().fg(Color::Red).bold()),
            Span::styled("Answer: ", Style::default().fg(Color::DarkGray)),
            Span::styled(correct_answer.as_str(), Style::default().fg(Color::White)),
        ]),
    }
}
