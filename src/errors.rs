use std::io;

use thiserror::Error;

use crate::data::LoadError;

/// Error type for every quiz-player operation.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Failed to load quiz: {0}")]
    Load(#[from] LoadError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Question {} has no answer yet", .index + 1)]
    NoAnswer { index: usize },

    #[error("Attempt is already finished")]
    AttemptFinished,
}

impl QuizError {
    /// True for failures of the remote collaborator, as opposed to misuse of
    /// the attempt itself. These leave the attempt resumable.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            QuizError::Network(_)
                | QuizError::Api { .. }
                | QuizError::Unauthorized(_)
                | QuizError::NotFound(_)
        )
    }
}

pub type QuizResult<T> = Result<T, QuizError>;
