//! Scoring collaborators the attempt controller talks to.

mod http;
mod local;

pub use http::ApiClient;
pub use local::LocalGateway;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::errors::QuizResult;
use crate::protocol::{
    AnswerFeedback, AnswerSubmission, BatchFeedback, BatchSubmission, ResultSubmission,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScoringGateway: Send + Sync {
    /// Scores a single answer.
    async fn submit_answer(
        &self,
        quiz_id: &str,
        submission: &AnswerSubmission,
    ) -> QuizResult<AnswerFeedback>;

    /// Scores a complete answer set in one request.
    async fn submit_all(&self, quiz_id: &str, batch: &BatchSubmission)
    -> QuizResult<BatchFeedback>;

    /// Records the aggregate score of a finished attempt.
    async fn post_result(&self, result: &ResultSubmission) -> QuizResult<()>;

    async fn rate_quiz(&self, quiz_id: &str, rating: u8) -> QuizResult<()>;
}
