//! The quiz-attempt state machine.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::data::validate_quiz;
use crate::errors::{QuizError, QuizResult};
use crate::gateway::ScoringGateway;
use crate::models::{Question, Quiz};
use crate::protocol::{AnswerFeedback, AnswerSubmission, BatchSubmission, ResultSubmission};
use crate::storage::Storage;

use super::results::{AttemptResults, WrongAnswer};
use super::snapshot::{AttemptKey, AttemptSnapshot, write_json};

/// How answers reach the scoring gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Each submit scores the current answer and moves on.
    PerQuestion,
    /// Answers are collected and scored together on the final submit.
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptPhase {
    Answering,
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The answer was scored and the attempt moved to the next question.
    Scored(AnswerFeedback),
    /// Batch mode: the answer was kept and the attempt moved on.
    Advanced,
    /// The final question was submitted and the attempt is finished.
    Completed(AttemptResults),
}

pub struct AttemptController<S: Storage> {
    quiz: Quiz,
    key: AttemptKey,
    mode: ScoringMode,
    storage: S,
    answers: BTreeMap<usize, String>,
    feedback: BTreeMap<usize, AnswerFeedback>,
    current: usize,
    phase: AttemptPhase,
    results: Option<AttemptResults>,
    resumed: bool,
}

impl<S: Storage> AttemptController<S> {
    /// Regular quiz: keyed by quiz id, scored question by question.
    pub fn for_quiz(quiz: Quiz, storage: S) -> QuizResult<Self> {
        let key = AttemptKey::Quiz(quiz.id.clone());
        Self::resume(quiz, key, ScoringMode::PerQuestion, storage)
    }

    /// Daily quiz: keyed by date and quiz id, scored as one batch at the end.
    /// Saved attempts for other days or other daily quizzes are dropped.
    pub fn for_daily(quiz: Quiz, date: NaiveDate, storage: S) -> QuizResult<Self> {
        let key = AttemptKey::Daily {
            quiz_id: quiz.id.clone(),
            date,
        };
        AttemptSnapshot::clear_daily(&storage, Some(&key))?;
        Self::resume(quiz, key, ScoringMode::Batch, storage)
    }

    /// Builds a controller, restoring any snapshot persisted under `key`.
    pub fn resume(quiz: Quiz, key: AttemptKey, mode: ScoringMode, storage: S) -> QuizResult<Self> {
        validate_quiz(&quiz)?;

        let snapshot = AttemptSnapshot::load(&storage, &key)?;
        let resumed = !snapshot.is_empty();
        let count = quiz.question_count();

        let mut answers = snapshot.answers;
        answers.retain(|index, answer| {
            quiz.questions
                .get(*index)
                .is_some_and(|question| !answer.is_empty() && question.accepts(answer))
        });
        let mut feedback = snapshot.feedback;
        feedback.retain(|index, _| answers.contains_key(index));
        let current = snapshot.current_index.min(count - 1);

        if resumed {
            log::info!(
                "Resuming attempt {} at question {} with {} answers",
                key.answers_key(),
                current + 1,
                answers.len()
            );
        }

        Ok(Self {
            quiz,
            key,
            mode,
            storage,
            answers,
            feedback,
            current,
            phase: AttemptPhase::Answering,
            results: None,
            resumed,
        })
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn is_finished(&self) -> bool {
        self.phase == AttemptPhase::Finished
    }

    /// True when the controller picked up a previously persisted attempt.
    pub fn was_resumed(&self) -> bool {
        self.resumed
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn question_count(&self) -> usize {
        self.quiz.question_count()
    }

    pub fn current_question(&self) -> &Question {
        &self.quiz.questions[self.current]
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 == self.question_count()
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answers(&self) -> &BTreeMap<usize, String> {
        &self.answers
    }

    pub fn feedback(&self, index: usize) -> Option<&AnswerFeedback> {
        self.feedback.get(&index)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Correct answers scored so far.
    pub fn score(&self) -> usize {
        self.feedback.values().filter(|f| f.correct).count()
    }

    pub fn results(&self) -> Option<&AttemptResults> {
        self.results.as_ref()
    }

    /// Records `value` as the answer to question `index`. An empty value
    /// clears the answer.
    pub fn select_answer(&mut self, index: usize, value: impl Into<String>) -> QuizResult<()> {
        self.ensure_answering()?;
        if index >= self.question_count() {
            return Err(QuizError::Validation(format!(
                "question index {} out of range",
                index
            )));
        }
        if self.feedback.contains_key(&index) {
            return Err(QuizError::Validation(format!(
                "question {} is already scored",
                index + 1
            )));
        }

        let value = value.into();
        if !value.is_empty() && !self.quiz.questions[index].accepts(&value) {
            return Err(QuizError::Validation(format!(
                "{:?} is not an option for question {}",
                value,
                index + 1
            )));
        }
        if value.is_empty() {
            self.answers.remove(&index);
        } else {
            self.answers.insert(index, value);
        }
        write_json(&self.storage, &self.key.answers_key(), &self.answers)
    }

    /// Moves to the next question. Returns false when already on the last.
    pub fn advance(&mut self) -> QuizResult<bool> {
        self.ensure_answering()?;
        if self.is_last() {
            return Ok(false);
        }
        self.move_to(self.current + 1)?;
        Ok(true)
    }

    /// Moves to the previous question. Returns false when already on the first.
    pub fn retreat(&mut self) -> QuizResult<bool> {
        self.ensure_answering()?;
        if self.current == 0 {
            return Ok(false);
        }
        self.move_to(self.current - 1)?;
        Ok(true)
    }

    /// Submits the current answer. On the last question this scores anything
    /// still outstanding, posts the aggregate result and finishes the attempt.
    ///
    /// Any error leaves the attempt and its persisted snapshot as they were,
    /// so the user can retry or resume later.
    pub async fn submit_current<G>(&mut self, gateway: &G) -> QuizResult<SubmitOutcome>
    where
        G: ScoringGateway + ?Sized,
    {
        self.ensure_answering()?;
        let index = self.current;
        let answer = self
            .answers
            .get(&index)
            .cloned()
            .ok_or(QuizError::NoAnswer { index })?;

        match self.mode {
            ScoringMode::PerQuestion => {
                let feedback = match self.feedback.get(&index) {
                    Some(existing) => existing.clone(),
                    None => self.score_one(gateway, index, answer).await?,
                };

                if self.is_last() {
                    self.score_outstanding(gateway).await?;
                    self.finish(gateway).await.map(SubmitOutcome::Completed)
                } else {
                    self.move_to(index + 1)?;
                    Ok(SubmitOutcome::Scored(feedback))
                }
            }
            ScoringMode::Batch => {
                if !self.is_last() {
                    self.move_to(index + 1)?;
                    return Ok(SubmitOutcome::Advanced);
                }
                if self.feedback.len() < self.question_count() {
                    self.score_batch(gateway).await?;
                }
                self.finish(gateway).await.map(SubmitOutcome::Completed)
            }
        }
    }

    /// Abandons the attempt and forgets its persisted state.
    pub fn cancel(self) -> QuizResult<()> {
        log::info!("Cancelling attempt {}", self.key.answers_key());
        AttemptSnapshot::clear(&self.storage, &self.key)
    }

    fn ensure_answering(&self) -> QuizResult<()> {
        match self.phase {
            AttemptPhase::Answering => Ok(()),
            AttemptPhase::Finished => Err(QuizError::AttemptFinished),
        }
    }

    fn move_to(&mut self, index: usize) -> QuizResult<()> {
        write_json(&self.storage, &self.key.index_key(), &index)?;
        self.current = index;
        Ok(())
    }

    async fn score_one<G>(
        &mut self,
        gateway: &G,
        index: usize,
        answer: String,
    ) -> QuizResult<AnswerFeedback>
    where
        G: ScoringGateway + ?Sized,
    {
        let submission = AnswerSubmission {
            question_id: self.quiz.questions[index].id.clone(),
            answer,
        };
        let feedback = gateway
            .submit_answer(&self.quiz.id, &submission)
            .await
            .inspect_err(|e| log::warn!("Scoring question {} failed: {}", index + 1, e))?;

        self.feedback.insert(index, feedback.clone());
        write_json(&self.storage, &self.key.feedback_key(), &self.feedback)?;
        Ok(feedback)
    }

    /// Scores answers to earlier questions the user skipped past without
    /// submitting.
    async fn score_outstanding<G>(&mut self, gateway: &G) -> QuizResult<()>
    where
        G: ScoringGateway + ?Sized,
    {
        let pending: Vec<(usize, String)> = self
            .answers
            .iter()
            .filter(|(index, _)| !self.feedback.contains_key(index))
            .map(|(index, answer)| (*index, answer.clone()))
            .collect();

        for (index, answer) in pending {
            self.score_one(gateway, index, answer).await?;
        }
        Ok(())
    }

    async fn score_batch<G>(&mut self, gateway: &G) -> QuizResult<()>
    where
        G: ScoringGateway + ?Sized,
    {
        let mut answers = Vec::with_capacity(self.question_count());
        for (index, question) in self.quiz.questions.iter().enumerate() {
            let answer = self
                .answers
                .get(&index)
                .ok_or(QuizError::NoAnswer { index })?;
            answers.push(AnswerSubmission {
                question_id: question.id.clone(),
                answer: answer.clone(),
            });
        }

        let batch = gateway
            .submit_all(&self.quiz.id, &BatchSubmission { answers })
            .await
            .inspect_err(|e| log::warn!("Scoring answer set failed: {}", e))?;

        let mut feedback = BTreeMap::new();
        for (index, question) in self.quiz.questions.iter().enumerate() {
            let verdict = batch
                .results
                .iter()
                .find(|v| v.question_id == question.id)
                .ok_or_else(|| {
                    QuizError::Validation(format!("no verdict for question {}", question.id))
                })?;
            feedback.insert(
                index,
                AnswerFeedback {
                    correct: verdict.correct,
                    correct_answer: verdict.correct_answer.clone(),
                },
            );
        }

        write_json(&self.storage, &self.key.feedback_key(), &feedback)?;
        self.feedback = feedback;
        Ok(())
    }

    async fn finish<G>(&mut self, gateway: &G) -> QuizResult<AttemptResults>
    where
        G: ScoringGateway + ?Sized,
    {
        let results = self.build_results();
        gateway
            .post_result(&ResultSubmission {
                quiz_id: results.quiz_id.clone(),
                score: results.score,
                total: results.total,
                daily_date: results.daily_date,
            })
            .await
            .inspect_err(|e| log::warn!("Posting result failed: {}", e))?;

        self.phase = AttemptPhase::Finished;
        if let Err(e) = AttemptSnapshot::clear(&self.storage, &self.key) {
            log::warn!("Attempt finished but its snapshot was not cleared: {}", e);
        }
        log::info!(
            "Finished quiz {}: {}/{}",
            results.quiz_id,
            results.score,
            results.total
        );

        self.results = Some(results.clone());
        Ok(results)
    }

    fn build_results(&self) -> AttemptResults {
        // Unanswered questions count as wrong.
        let wrong = self
            .quiz
            .questions
            .iter()
            .enumerate()
            .filter_map(|(index, question)| {
                let correct_answer = match self.feedback.get(&index) {
                    Some(f) if f.correct => return None,
                    Some(f) => f.correct_answer.clone(),
                    None => question.correct_answer.clone().unwrap_or_default(),
                };
                Some(WrongAnswer {
                    index,
                    question: question.text.clone(),
                    given: self.answers.get(&index).cloned().unwrap_or_default(),
                    correct_answer,
                })
            })
            .collect();

        AttemptResults {
            quiz_id: self.quiz.id.clone(),
            title: self.quiz.title.clone(),
            score: self.score(),
            total: self.question_count(),
            wrong,
            daily_date: self.key.daily_date(),
        }
    }
}
