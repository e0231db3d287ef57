use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Question;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

/// Row of the quiz list as returned by `GET /quizzes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub question_count: Option<usize>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_tolerates_missing_optional_fields() {
        let json = r#"{ "id": "7", "title": "Ownership" }"#;
        let summary: QuizSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.title, "Ownership");
        assert!(summary.average_rating.is_none());
        assert!(summary.created_at.is_none());
    }

    #[test]
    fn quiz_counts_questions() {
        let json = r#"{
            "id": "7",
            "title": "Ownership",
            "category": "rust",
            "questions": [
                { "id": "a", "text": "Moves copy?", "type": "true-false" }
            ]
        }"#;
        let quiz: Quiz = serde_json::from_str(json).unwrap();
        assert_eq!(quiz.question_count(), 1);
        assert_eq!(quiz.category.as_deref(), Some("rust"));
        assert!(quiz.description.is_none());
    }
}
