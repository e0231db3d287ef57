//! Request and response bodies exchanged with the quiz REST API.
//!
//! All bodies are JSON with camelCase field names.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One answer sent to `POST /quizzes/{id}/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub question_id: String,
    pub answer: String,
}

/// Verdict for one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub correct: bool,
    pub correct_answer: String,
}

/// Full answer set sent to `POST /quizzes/{id}/submit-all`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSubmission {
    pub answers: Vec<AnswerSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionVerdict {
    pub question_id: String,
    pub correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFeedback {
    #[serde(default)]
    pub score: Option<usize>,
    pub results: Vec<QuestionVerdict>,
}

/// Aggregate score posted to `POST /quiz-results` when an attempt completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    pub quiz_id: String,
    pub score: usize,
    pub total: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSubmission {
    pub rating: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Error body the API returns alongside non-2xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(alias = "error")]
    pub message: String,
}

pub const RATING_MIN: u8 = 1;
pub const RATING_MAX: u8 = 5;

/// Username validation constants.
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 32;
pub const PASSWORD_MIN_LENGTH: usize = 6;

pub fn validate_rating(rating: u8) -> Result<(), &'static str> {
    if (RATING_MIN..=RATING_MAX).contains(&rating) {
        Ok(())
    } else {
        Err("Rating must be between 1 and 5")
    }
}

/// Validates registration input before it is sent.
///
/// Returns `Ok(())` if valid, or `Err` with an error message.
pub fn validate_registration(registration: &Registration) -> Result<(), &'static str> {
    let username = registration.username.trim();

    if username.len() < USERNAME_MIN_LENGTH {
        return Err("Username must be at least 3 characters");
    }

    if username.len() > USERNAME_MAX_LENGTH {
        return Err("Username must be at most 32 characters");
    }

    if !registration.email.contains('@') {
        return Err("Email address is not valid");
    }

    if registration.password.len() < PASSWORD_MIN_LENGTH {
        return Err("Password must be at least 6 characters");
    }

    Ok(())
}
