use crate::attempt::{AttemptController, AttemptResults, ResultsView, SubmitOutcome};
use crate::errors::{QuizError, QuizResult};
use crate::gateway::ScoringGateway;
use crate::models::Question;
use crate::storage::Storage;

const FREE_TEXT_MAX_LENGTH: usize = 200;

/// Which screen the player is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Welcome,
    Quiz,
    Results,
}

/// Inline message shown under the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
    Correct,
    Incorrect { correct_answer: String },
}

pub struct App<S: Storage> {
    pub screen: Screen,
    pub should_quit: bool,
    attempt: AttemptController<S>,
    results: Option<ResultsView>,
    selected_option: usize,
    text_input: String,
    notice: Option<Notice>,
    result_scroll: usize,
}

impl<S: Storage> App<S> {
    pub fn new(attempt: AttemptController<S>) -> Self {
        let mut app = Self {
            screen: Screen::Welcome,
            should_quit: false,
            attempt,
            results: None,
            selected_option: 0,
            text_input: String::new(),
            notice: None,
            result_scroll: 0,
        };
        app.sync_input();
        app
    }

    pub fn attempt(&self) -> &AttemptController<S> {
        &self.attempt
    }

    pub fn current_question(&self) -> &Question {
        self.attempt.current_question()
    }

    pub fn current_question_number(&self) -> usize {
        self.attempt.current_index() + 1
    }

    pub fn total_questions(&self) -> usize {
        self.attempt.question_count()
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn text_input(&self) -> &str {
        &self.text_input
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn results(&self) -> Option<&ResultsView> {
        self.results.as_ref()
    }

    pub fn finished_results(&self) -> Option<AttemptResults> {
        self.results.as_ref().map(|view| view.results().clone())
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn start_quiz(&mut self) {
        self.screen = Screen::Quiz;
        self.notice = None;
    }

    pub fn select_next_option(&mut self) {
        let count = self.current_question().choices().len();
        if count > 0 {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        let count = self.current_question().choices().len();
        if count > 0 {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    /// Records the highlighted option as the answer to the current question.
    pub fn choose_highlighted(&mut self) {
        let choice = self
            .current_question()
            .choices()
            .get(self.selected_option)
            .cloned();
        if let Some(choice) = choice {
            let index = self.attempt.current_index();
            let result = self.attempt.select_answer(index, choice);
            self.report(result);
        }
    }

    pub fn push_char(&mut self, c: char) {
        if self.text_input.chars().count() < FREE_TEXT_MAX_LENGTH {
            let mut text = self.text_input.clone();
            text.push(c);
            self.store_text(text);
        }
    }

    pub fn pop_char(&mut self) {
        let mut text = self.text_input.clone();
        if text.pop().is_some() {
            self.store_text(text);
        }
    }

    pub fn next_question(&mut self) {
        let result = self.attempt.advance();
        self.after_move(result);
    }

    pub fn previous_question(&mut self) {
        let result = self.attempt.retreat();
        self.after_move(result);
    }

    /// Submits the current question, moving to the results screen when the
    /// attempt completes. Failures are shown inline.
    pub async fn submit<G>(&mut self, gateway: &G)
    where
        G: ScoringGateway + ?Sized,
    {
        if !self.current_question().is_free_text() && self.current_answer().is_none() {
            self.choose_highlighted();
        }

        match self.attempt.submit_current(gateway).await {
            Ok(SubmitOutcome::Scored(feedback)) => {
                self.notice = Some(if feedback.correct {
                    Notice::Correct
                } else {
                    Notice::Incorrect {
                        correct_answer: feedback.correct_answer,
                    }
                });
                self.sync_input();
            }
            Ok(SubmitOutcome::Advanced) => {
                self.notice = None;
                self.sync_input();
            }
            Ok(SubmitOutcome::Completed(results)) => {
                self.results = Some(ResultsView::new(results));
                self.screen = Screen::Results;
                self.notice = None;
                self.result_scroll = 0;
            }
            Err(e) => self.show_error(&e),
        }
    }

    pub async fn rate<G>(&mut self, gateway: &G, rating: u8)
    where
        G: ScoringGateway + ?Sized,
    {
        let Some(view) = self.results.as_mut() else {
            return;
        };
        match view.rate(gateway, rating).await {
            Ok(()) => self.notice = Some(Notice::Info(format!("Thanks for rating {}/5", rating))),
            Err(e) => self.show_error(&e),
        }
    }

    pub fn scroll_results_down(&mut self) {
        let wrong = self
            .results
            .as_ref()
            .map(|view| view.results().wrong.len())
            .unwrap_or(0);
        self.result_scroll = (self.result_scroll + 1).min(wrong.saturating_sub(1));
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    fn current_answer(&self) -> Option<&str> {
        self.attempt.answer(self.attempt.current_index())
    }

    /// The buffer only changes once the answer is stored, so the screen
    /// always shows what is saved.
    fn store_text(&mut self, text: String) {
        let index = self.attempt.current_index();
        match self.attempt.select_answer(index, text.clone()) {
            Ok(()) => self.text_input = text,
            Err(e) => self.show_error(&e),
        }
    }

    fn after_move(&mut self, result: QuizResult<bool>) {
        match result {
            Ok(true) => {
                self.notice = None;
                self.sync_input();
            }
            Ok(false) => {}
            Err(e) => self.show_error(&e),
        }
    }

    /// Points the cursor or text buffer at the stored answer, if any.
    fn sync_input(&mut self) {
        let answer = self.current_answer().map(str::to_string);
        let question = self.current_question();
        let free_text = question.is_free_text();
        let position = answer
            .as_deref()
            .and_then(|a| question.choices().iter().position(|c| c == a));

        if free_text {
            self.text_input = answer.unwrap_or_default();
            self.selected_option = 0;
        } else {
            self.selected_option = position.unwrap_or(0);
            self.text_input.clear();
        }
    }

    fn report(&mut self, result: QuizResult<()>) {
        if let Err(e) = result {
            self.show_error(&e);
        }
    }

    fn show_error(&mut self, error: &QuizError) {
        let message = if error.is_remote() {
            format!("{} (progress saved, try again)", error)
        } else {
            error.to_string()
        };
        self.notice = Some(Notice::Error(message));
    }
}
