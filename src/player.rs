//! Terminal event loop driving an attempt.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Screen};
use crate::attempt::{AttemptController, AttemptResults};
use crate::errors::QuizResult;
use crate::gateway::ScoringGateway;
use crate::storage::Storage;
use crate::terminal::TerminalGuard;
use crate::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a key press asks the loop to do beyond updating state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit,
    Rate(u8),
}

/// Runs the attempt in the terminal until the user quits. Returns the
/// results if the attempt was completed.
pub async fn run<S, G>(
    attempt: AttemptController<S>,
    gateway: &G,
) -> QuizResult<Option<AttemptResults>>
where
    S: Storage,
    G: ScoringGateway + ?Sized,
{
    let mut app = App::new(attempt);
    let mut terminal = TerminalGuard::enter()?;

    while !app.should_quit {
        terminal.draw(|frame| ui::render(frame, &app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_input(&mut app, key) {
            Action::None => {}
            Action::Quit => app.should_quit = true,
            Action::Submit => app.submit(gateway).await,
            Action::Rate(rating) => app.rate(gateway, rating).await,
        }
    }

    Ok(app.finished_results())
}

pub fn handle_input<S: Storage>(app: &mut App<S>, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.screen {
        Screen::Welcome => handle_welcome_input(app, key.code),
        Screen::Quiz if app.current_question().is_free_text() => {
            handle_text_input(app, key.code)
        }
        Screen::Quiz => handle_choice_input(app, key.code),
        Screen::Results => handle_result_input(app, key.code),
    }
}

fn handle_welcome_input<S: Storage>(app: &mut App<S>, key: KeyCode) -> Action {
    match key {
        KeyCode::Enter => {
            app.start_quiz();
            Action::None
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

fn handle_choice_input<S: Storage>(app: &mut App<S>, key: KeyCode) -> Action {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Char(' ') => app.choose_highlighted(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_question(),
        KeyCode::Right | KeyCode::Char('l') => app.next_question(),
        KeyCode::Enter => return Action::Submit,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Action::Quit,
        _ => {}
    }
    Action::None
}

fn handle_text_input<S: Storage>(app: &mut App<S>, key: KeyCode) -> Action {
    match key {
        KeyCode::Char(c) => app.push_char(c),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Left => app.previous_question(),
        KeyCode::Right => app.next_question(),
        KeyCode::Enter => return Action::Submit,
        KeyCode::Esc => return Action::Quit,
        _ => {}
    }
    Action::None
}

fn handle_result_input<S: Storage>(app: &mut App<S>, key: KeyCode) -> Action {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(rating) = c.to_digit(10) {
                return Action::Rate(rating as u8);
            }
        }
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc | KeyCode::Enter => {
            return Action::Quit;
        }
        _ => {}
    }
    Action::None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuestionKind, Quiz};
    use crate::storage::MemoryStorage;

    fn app() -> App<MemoryStorage> {
        let quiz = Quiz {
            id: "1".to_string(),
            title: "Closures".to_string(),
            description: None,
            category: None,
            questions: vec![
                Question {
                    id: "a".to_string(),
                    text: "Trait for closures called once".to_string(),
                    kind: QuestionKind::MultipleChoice,
                    options: vec!["Fn".into(), "FnMut".into(), "FnOnce".into()],
                    correct_answer: Some("FnOnce".to_string()),
                },
                Question {
                    id: "b".to_string(),
                    text: "Keyword forcing capture by value".to_string(),
                    kind: QuestionKind::FreeText,
                    options: vec![],
                    correct_answer: Some("move".to_string()),
                },
            ],
        };
        App::new(AttemptController::for_quiz(quiz, MemoryStorage::new()).unwrap())
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn welcome_enter_starts_quiz() {
        let mut app = app();
        assert_eq!(handle_input(&mut app, press(KeyCode::Enter)), Action::None);
        assert_eq!(app.screen, Screen::Quiz);
    }

    #[test]
    fn choice_keys_move_and_pick() {
        let mut app = app();
        app.start_quiz();

        handle_input(&mut app, press(KeyCode::Char('k')));
        assert_eq!(app.selected_option(), 2);
        handle_input(&mut app, press(KeyCode::Char(' ')));
        assert_eq!(app.attempt().answer(0), Some("FnOnce"));
        assert_eq!(handle_input(&mut app, press(KeyCode::Enter)), Action::Submit);
    }

    #[test]
    fn free_text_captures_letters_that_are_shortcuts_elsewhere() {
        let mut app = app();
        app.start_quiz();
        handle_input(&mut app, press(KeyCode::Char('l')));
        assert_eq!(app.current_question_number(), 2);

        for c in "moveq".chars() {
            assert_eq!(handle_input(&mut app, press(KeyCode::Char(c))), Action::None);
        }
        handle_input(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.text_input(), "move");
        assert_eq!(handle_input(&mut app, press(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut app = app();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_input(&mut app, key), Action::Quit);
    }
}
