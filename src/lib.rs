//! # quiz-player
//!
//! Terminal client for the quiz platform: browse quizzes, play a quiz or the
//! daily quiz question by question, resume interrupted attempts, review
//! results and rate what you played.
//!
//! The heart of the crate is [`AttemptController`], the attempt state
//! machine. It keeps the current question index and answers in a
//! [`Storage`] so an attempt survives restarts, and talks to a
//! [`ScoringGateway`] for verdicts.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_player::{AttemptController, LocalGateway, MemoryStorage, QuizError};
//! use quiz_player::load_quiz_from_json;
//!
//! # async fn play() -> Result<(), QuizError> {
//! let quiz = load_quiz_from_json("quiz.json")?;
//! let gateway = LocalGateway::new(quiz.clone());
//! let mut attempt = AttemptController::for_quiz(quiz, MemoryStorage::new())?;
//!
//! attempt.select_answer(0, "String")?;
//! let outcome = attempt.submit_current(&gateway).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

mod app;
pub mod attempt;
pub mod catalog;
pub mod config;
mod data;
pub mod errors;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod player;
pub mod protocol;
pub mod storage;
pub mod streak;
pub mod terminal;
mod ui;

pub use app::{App, Notice, Screen};
pub use attempt::{
    AttemptController, AttemptKey, AttemptResults, ResultsView, ScoringMode, SubmitOutcome,
};
pub use catalog::{CatalogQuery, SortOrder, categories, filter_quizzes};
pub use config::Config;
pub use data::{LoadError, check_answer_key, load_quiz_from_json, validate_quiz};
pub use errors::{QuizError, QuizResult};
pub use gateway::{ApiClient, LocalGateway, ScoringGateway};
pub use models::{Question, QuestionKind, Quiz, QuizSummary};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use streak::{StreakSummary, StreakTracker};
