use async_trait::async_trait;

use crate::errors::{QuizError, QuizResult};
use crate::models::Quiz;
use crate::protocol::{
    AnswerFeedback, AnswerSubmission, BatchFeedback, BatchSubmission, QuestionVerdict,
    ResultSubmission,
};

use super::ScoringGateway;

/// Grades against the correct answers embedded in a quiz file, for playing
/// without a server. Results and ratings are only logged.
pub struct LocalGateway {
    quiz: Quiz,
}

impl LocalGateway {
    pub fn new(quiz: Quiz) -> Self {
        Self { quiz }
    }

    fn grade(&self, submission: &AnswerSubmission) -> QuizResult<QuestionVerdict> {
        let question = self
            .quiz
            .questions
            .iter()
            .find(|q| q.id == submission.question_id)
            .ok_or_else(|| QuizError::NotFound(format!("question {}", submission.question_id)))?;

        let correct_answer = question.correct_answer.clone().ok_or_else(|| {
            QuizError::Validation(format!("question {} has no answer key", question.id))
        })?;

        Ok(QuestionVerdict {
            question_id: question.id.clone(),
            correct: question.grade(&submission.answer).unwrap_or(false),
            correct_answer,
        })
    }
}

#[async_trait]
impl ScoringGateway for LocalGateway {
    async fn submit_answer(
        &self,
        quiz_id: &str,
        submission: &AnswerSubmission,
    ) -> QuizResult<AnswerFeedback> {
        if quiz_id != self.quiz.id {
            return Err(QuizError::NotFound(format!("quiz {}", quiz_id)));
        }
        let verdict = self.grade(submission)?;
        Ok(AnswerFeedback {
            correct: verdict.correct,
            correct_answer: verdict.correct_answer,
        })
    }

    async fn submit_all(
        &self,
        quiz_id: &str,
        batch: &BatchSubmission,
    ) -> QuizResult<BatchFeedback> {
        if quiz_id != self.quiz.id {
            return Err(QuizError::NotFound(format!("quiz {}", quiz_id)));
        }
        let results = batch
            .answers
            .iter()
            .map(|answer| self.grade(answer))
            .collect::<QuizResult<Vec<_>>>()?;
        let score = results.iter().filter(|r| r.correct).count();

        Ok(BatchFeedback {
            score: Some(score),
            results,
        })
    }

    async fn post_result(&self, result: &ResultSubmission) -> QuizResult<()> {
        log::info!(
            "Offline result for quiz {}: {}/{}",
            result.quiz_id,
            result.score,
            result.total
        );
        Ok(())
    }

    async fn rate_quiz(&self, quiz_id: &str, rating: u8) -> QuizResult<()> {
        log::info!("Offline rating for quiz {}: {}", quiz_id, rating);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, QuestionKind};

    fn gateway() -> LocalGateway {
        LocalGateway::new(Quiz {
            id: "quiz-1".into(),
            title: "Traits".into(),
            description: None,
            category: None,
            questions: vec![
                Question {
                    id: "a".into(),
                    text: "Object safe?".into(),
                    kind: QuestionKind::TrueFalse,
                    options: vec![],
                    correct_answer: Some("False".into()),
                },
                Question {
                    id: "b".into(),
                    text: "Keyword for trait objects".into(),
                    kind: QuestionKind::FreeText,
                    options: vec![],
                    correct_answer: Some("dyn".into()),
                },
            ],
        })
    }

    fn answer(question_id: &str, answer: &str) -> AnswerSubmission {
        AnswerSubmission {
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }

    #[tokio::test]
    async fn grades_single_answers() {
        let gateway = gateway();

        let feedback = gateway
            .submit_answer("quiz-1", &answer("b", " DYN "))
            .await
            .unwrap();
        assert!(feedback.correct);

        let feedback = gateway
            .submit_answer("quiz-1", &answer("a", "True"))
            .await
            .unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.correct_answer, "False");
    }

    #[tokio::test]
    async fn grades_batches() {
        let batch = BatchSubmission {
            answers: vec![answer("a", "False"), answer("b", "impl")],
        };
        let feedback = gateway().submit_all("quiz-1", &batch).await.unwrap();
        assert_eq!(feedback.score, Some(1));
        assert_eq!(feedback.results.len(), 2);
        assert!(!feedback.results[1].correct);
    }

    #[tokio::test]
    async fn unknown_quiz_or_question_is_not_found() {
        let gateway = gateway();
        assert!(matches!(
            gateway.submit_answer("other", &answer("a", "True")).await,
            Err(QuizError::NotFound(_))
        ));
        assert!(matches!(
            gateway.submit_answer("quiz-1", &answer("zzz", "True")).await,
            Err(QuizError::NotFound(_))
        ));
    }
}
