use chrono::NaiveDate;

use crate::errors::{QuizError, QuizResult};
use crate::gateway::ScoringGateway;
use crate::protocol::validate_rating;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongAnswer {
    pub index: usize,
    pub question: String,
    pub given: String,
    pub correct_answer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Excellent,
    Good,
    Fair,
    Poor,
}

/// Outcome of a finished attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptResults {
    pub quiz_id: String,
    pub title: String,
    pub score: usize,
    pub total: usize,
    pub wrong: Vec<WrongAnswer>,
    pub daily_date: Option<NaiveDate>,
}

impl AttemptResults {
    pub fn percentage(&self) -> f64 {
        if self.total > 0 {
            (self.score as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    pub fn grade(&self) -> Grade {
        match self.percentage() as u32 {
            90..=100 => Grade::Excellent,
            70..=89 => Grade::Good,
            50..=69 => Grade::Fair,
            _ => Grade::Poor,
        }
    }

    pub fn is_perfect(&self) -> bool {
        self.wrong.is_empty() && self.score == self.total
    }
}

/// Terminal phase of an attempt: the results plus the one-shot rating.
#[derive(Debug, Clone)]
pub struct ResultsView {
    results: AttemptResults,
    rating: Option<u8>,
}

impl ResultsView {
    pub fn new(results: AttemptResults) -> Self {
        Self {
            results,
            rating: None,
        }
    }

    pub fn results(&self) -> &AttemptResults {
        &self.results
    }

    pub fn rating(&self) -> Option<u8> {
        self.rating
    }

    pub fn can_rate(&self) -> bool {
        self.rating.is_none()
    }

    /// Submits a 1-5 rating. A quiz is rated at most once per attempt; a
    /// failed request leaves it unrated so the user may try again.
    pub async fn rate<G>(&mut self, gateway: &G, rating: u8) -> QuizResult<()>
    where
        G: ScoringGateway + ?Sized,
    {
        if self.rating.is_some() {
            return Err(QuizError::Validation("Quiz already rated".to_string()));
        }
        validate_rating(rating).map_err(|e| QuizError::Validation(e.to_string()))?;

        gateway.rate_quiz(&self.results.quiz_id, rating).await?;
        log::info!("Rated quiz {} with {}", self.results.quiz_id, rating);
        self.rating = Some(rating);
        Ok(())
    }
}
