use std::borrow::Cow;

use serde::{Deserialize, Serialize};

const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    #[serde(alias = "prompt", alias = "question")]
    pub text: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl Question {
    /// Options the player picks from. Free-text questions have none; a
    /// true/false question without explicit options gets `True`/`False`.
    pub fn choices(&self) -> Cow<'_, [String]> {
        match self.kind {
            QuestionKind::FreeText => Cow::Owned(Vec::new()),
            QuestionKind::TrueFalse if self.options.is_empty() => {
                Cow::Owned(TRUE_FALSE_OPTIONS.iter().map(|s| s.to_string()).collect())
            }
            _ => Cow::Borrowed(&self.options),
        }
    }

    pub fn is_free_text(&self) -> bool {
        self.kind == QuestionKind::FreeText
    }

    /// Grades `answer` against the embedded correct answer, if the quiz
    /// carries one. Comparison ignores surrounding whitespace and case.
    pub fn grade(&self, answer: &str) -> Option<bool> {
        self.correct_answer
            .as_deref()
            .map(|correct| normalize(correct) == normalize(answer))
    }

    /// Whether `answer` is something the player could have picked. Any text
    /// fits a free-text question; choice questions need one of their options.
    pub fn accepts(&self, answer: &str) -> bool {
        if self.is_free_text() {
            return true;
        }
        let answer = normalize(answer);
        self.choices().iter().any(|choice| normalize(choice) == answer)
    }
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(kind: QuestionKind, options: &[&str], correct: Option<&str>) -> Question {
        Question {
            id: "q-1".to_string(),
            text: "Pick one".to_string(),
            kind,
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.map(str::to_string),
        }
    }

    #[test]
    fn true_false_without_options_gets_defaults() {
        let q = question(QuestionKind::TrueFalse, &[], Some("True"));
        assert_eq!(q.choices().as_ref(), ["True", "False"]);
    }

    #[test]
    fn free_text_has_no_choices() {
        let q = question(QuestionKind::FreeText, &["ignored"], Some("Ferris"));
        assert!(q.choices().is_empty());
    }

    #[test]
    fn grading_ignores_case_and_whitespace() {
        let q = question(QuestionKind::FreeText, &[], Some("Ferris"));
        assert_eq!(q.grade("  ferris "), Some(true));
        assert_eq!(q.grade("Corro"), Some(false));

        let hidden = question(QuestionKind::FreeText, &[], None);
        assert_eq!(hidden.grade("anything"), None);
    }

    #[test]
    fn accepts_only_known_choices() {
        let tf = question(QuestionKind::TrueFalse, &[], Some("true"));
        assert!(tf.accepts("True"));
        assert!(tf.accepts(" false"));
        assert!(!tf.accepts("maybe"));

        let text = question(QuestionKind::FreeText, &[], None);
        assert!(text.accepts("anything at all"));
    }

    #[test]
    fn deserializes_wire_format() {
        let json = r#"{
            "id": "q-7",
            "prompt": "Is Rust memory safe?",
            "type": "true-false",
            "correctAnswer": "True"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::TrueFalse);
        assert_eq!(q.text, "Is Rust memory safe?");
        assert!(q.options.is_empty());
        assert_eq!(q.correct_answer.as_deref(), Some("True"));
    }

    #[test]
    fn rejects_unknown_kind() {
        let parsed = serde_json::from_str::<QuestionKind>("\"essay\"");
        assert!(parsed.is_err());
    }
}
