use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{QuestionKind, Quiz};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("quiz must contain at least one question")]
    Empty,

    #[error("question {id}: {reason}")]
    InvalidQuestion { id: String, reason: String },
}

/// Reads a quiz file in the same JSON shape `GET /quizzes/{id}` returns.
pub fn load_quiz_from_json<P: AsRef<Path>>(path: P) -> Result<Quiz, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let quiz: Quiz = serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    validate_quiz(&quiz)?;
    check_answer_key(&quiz)?;
    log::debug!(
        "Loaded quiz {} ({} questions) from {}",
        quiz.id,
        quiz.question_count(),
        path.display()
    );

    Ok(quiz)
}

/// Checks the structural rules the attempt flow relies on. Applies to quizzes
/// from any source, including the server.
pub fn validate_quiz(quiz: &Quiz) -> Result<(), LoadError> {
    if quiz.questions.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut seen = HashSet::new();
    for question in &quiz.questions {
        let invalid = |reason: &str| LoadError::InvalidQuestion {
            id: question.id.clone(),
            reason: reason.to_string(),
        };

        if !seen.insert(question.id.as_str()) {
            return Err(invalid("duplicate question id"));
        }

        if question.kind == QuestionKind::MultipleChoice && question.options.len() < 2 {
            return Err(invalid("multiple-choice needs at least two options"));
        }
    }

    Ok(())
}

/// Offline quiz files grade against their own answer key, so every embedded
/// answer must be reachable from the options, compared the way grading does.
pub fn check_answer_key(quiz: &Quiz) -> Result<(), LoadError> {
    for question in &quiz.questions {
        if let Some(correct) = &question.correct_answer {
            if !question.accepts(correct) {
                return Err(LoadError::InvalidQuestion {
                    id: question.id.clone(),
                    reason: "correct answer is not one of the options".to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;

    fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("quiz-{}.json", uuid::Uuid::new_v4()));
        fs::write(&path, contents).unwrap();
        path
    }

    fn choice(id: &str, options: &[&str], correct: &str) -> Question {
        Question {
            id: id.to_string(),
            text: "?".to_string(),
            kind: QuestionKind::MultipleChoice,
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: Some(correct.to_string()),
        }
    }

    fn quiz(questions: Vec<Question>) -> Quiz {
        Quiz {
            id: "quiz-1".to_string(),
            title: "Borrowing".to_string(),
            description: None,
            category: None,
            questions,
        }
    }

    #[test]
    fn loads_valid_file() {
        let path = write_temp(
            r#"{
                "id": "quiz-1",
                "title": "Borrowing",
                "questions": [
                    { "id": "a", "text": "1+1?", "type": "multiple-choice",
                      "options": ["1", "2"], "correctAnswer": "2" },
                    { "id": "b", "text": "Name the crab", "type": "free-text",
                      "correctAnswer": "Ferris" }
                ]
            }"#,
        );
        let quiz = load_quiz_from_json(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(quiz.question_count(), 2);
        assert_eq!(quiz.questions[1].kind, QuestionKind::FreeText);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_quiz_from_json("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Read { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let path = write_temp("{ not json");
        let err = load_quiz_from_json(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn rejects_empty_quiz() {
        assert!(matches!(validate_quiz(&quiz(vec![])), Err(LoadError::Empty)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dup = quiz(vec![
            choice("a", &["x", "y"], "x"),
            choice("a", &["x", "y"], "y"),
        ]);
        assert!(matches!(
            validate_quiz(&dup),
            Err(LoadError::InvalidQuestion { .. })
        ));
    }

    #[test]
    fn answer_key_is_checked_only_for_files() {
        let foreign = quiz(vec![choice("a", &["x", "y"], "z")]);
        assert!(validate_quiz(&foreign).is_ok());

        let err = check_answer_key(&foreign).unwrap_err();
        assert_eq!(
            err.to_string(),
            "question a: correct answer is not one of the options"
        );
    }

    #[test]
    fn answer_key_matches_like_grading() {
        let lowercase = quiz(vec![Question {
            id: "t".to_string(),
            text: "Ferris is a crab".to_string(),
            kind: QuestionKind::TrueFalse,
            options: vec![],
            correct_answer: Some("true".to_string()),
        }]);
        assert!(validate_quiz(&lowercase).is_ok());
        assert!(check_answer_key(&lowercase).is_ok());

        let padded = quiz(vec![choice("a", &["Stack", "Heap"], " heap ")]);
        assert!(check_answer_key(&padded).is_ok());
    }
}
