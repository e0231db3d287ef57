use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::QuizResult;
use crate::protocol::AnswerFeedback;
use crate::storage::Storage;

/// Identifies which attempt a snapshot belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttemptKey {
    Quiz(String),
    /// The daily quiz is regenerated each day, so its attempt is keyed by
    /// both the day and the quiz served on it.
    Daily { quiz_id: String, date: NaiveDate },
}

const DAILY_PREFIX: &str = "daily-";

impl AttemptKey {
    fn prefix(&self) -> String {
        match self {
            AttemptKey::Quiz(id) => format!("quiz-{}", id),
            AttemptKey::Daily { quiz_id, date } => {
                format!("{}{}-quiz-{}", DAILY_PREFIX, date.format("%Y-%m-%d"), quiz_id)
            }
        }
    }

    pub fn answers_key(&self) -> String {
        format!("{}-answers", self.prefix())
    }

    pub fn index_key(&self) -> String {
        format!("{}-answers-currentQuestionIndex", self.prefix())
    }

    pub fn feedback_key(&self) -> String {
        format!("{}-answers-results", self.prefix())
    }

    pub fn daily_date(&self) -> Option<NaiveDate> {
        match self {
            AttemptKey::Daily { date, .. } => Some(*date),
            AttemptKey::Quiz(_) => None,
        }
    }
}

/// Persisted state of an in-progress attempt.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttemptSnapshot {
    pub answers: BTreeMap<usize, String>,
    pub current_index: usize,
    pub feedback: BTreeMap<usize, AnswerFeedback>,
}

impl AttemptSnapshot {
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.feedback.is_empty() && self.current_index == 0
    }

    /// Reads whatever is stored for `key`. Values that fail to parse are
    /// discarded with a warning, as if never written.
    pub fn load<S: Storage + ?Sized>(storage: &S, key: &AttemptKey) -> QuizResult<Self> {
        Ok(Self {
            answers: read_json(storage, &key.answers_key())?.unwrap_or_default(),
            current_index: read_json(storage, &key.index_key())?.unwrap_or_default(),
            feedback: read_json(storage, &key.feedback_key())?.unwrap_or_default(),
        })
    }

    pub fn clear<S: Storage + ?Sized>(storage: &S, key: &AttemptKey) -> QuizResult<()> {
        storage.remove(&key.answers_key())?;
        storage.remove(&key.index_key())?;
        storage.remove(&key.feedback_key())?;
        Ok(())
    }

    /// Removes every saved daily attempt except `keep`. Returns how many
    /// keys were dropped.
    pub fn clear_daily<S: Storage + ?Sized>(
        storage: &S,
        keep: Option<&AttemptKey>,
    ) -> QuizResult<usize> {
        let keep = keep.map(AttemptKey::answers_key);
        let mut removed = 0;
        for key in storage.keys()? {
            if !is_daily_attempt_key(&key) {
                continue;
            }
            if keep.as_deref().is_some_and(|keep| key.starts_with(keep)) {
                continue;
            }
            storage.remove(&key)?;
            removed += 1;
        }
        if removed > 0 {
            log::info!("Dropped {} stale daily attempt keys", removed);
        }
        Ok(removed)
    }
}

fn is_daily_attempt_key(key: &str) -> bool {
    key.starts_with(DAILY_PREFIX) && key.contains("-answers")
}

pub(crate) fn write_json<S, T>(storage: &S, key: &str, value: &T) -> QuizResult<()>
where
    S: Storage + ?Sized,
    T: Serialize + ?Sized,
{
    storage.set(key, &serde_json::to_string(value)?)
}

pub(crate) fn read_json<S, T>(storage: &S, key: &str) -> QuizResult<Option<T>>
where
    S: Storage + ?Sized,
    T: DeserializeOwned,
{
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("Discarding unreadable value under {}: {}", key, e);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn keys_match_browser_layout() {
        let key = AttemptKey::Quiz("42".to_string());
        assert_eq!(key.answers_key(), "quiz-42-answers");
        assert_eq!(key.index_key(), "quiz-42-answers-currentQuestionIndex");
        assert_eq!(key.feedback_key(), "quiz-42-answers-results");

        let daily = AttemptKey::Daily {
            quiz_id: "ai-7".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
        };
        assert_eq!(daily.answers_key(), "daily-2026-03-09-quiz-ai-7-answers");
        assert_eq!(daily.daily_date(), NaiveDate::from_ymd_opt(2026, 3, 9));
    }

    #[test]
    fn answers_are_stored_as_index_keyed_object() {
        let storage = MemoryStorage::new();
        let mut answers = BTreeMap::new();
        answers.insert(0usize, "A".to_string());
        answers.insert(2usize, "True".to_string());

        write_json(&storage, "quiz-1-answers", &answers).unwrap();
        assert_eq!(
            storage.get("quiz-1-answers").unwrap().as_deref(),
            Some(r#"{"0":"A","2":"True"}"#)
        );
    }

    #[test]
    fn corrupt_values_are_dropped() {
        let storage = MemoryStorage::new();
        let key = AttemptKey::Quiz("1".to_string());
        storage.set(&key.answers_key(), "{oops").unwrap();
        storage.set(&key.index_key(), "2").unwrap();

        let snapshot = AttemptSnapshot::load(&storage, &key).unwrap();
        assert!(snapshot.answers.is_empty());
        assert_eq!(snapshot.current_index, 2);
    }

    #[test]
    fn clear_removes_every_key() {
        let storage = MemoryStorage::new();
        let key = AttemptKey::Quiz("1".to_string());
        storage.set(&key.answers_key(), "{}").unwrap();
        storage.set(&key.index_key(), "0").unwrap();
        storage.set(&key.feedback_key(), "{}").unwrap();
        storage.set("token", "keep-me").unwrap();

        AttemptSnapshot::clear(&storage, &key).unwrap();
        assert_eq!(storage.keys().unwrap(), vec!["token".to_string()]);
    }

    #[test]
    fn clear_daily_keeps_current_attempt_and_streak() {
        let storage = MemoryStorage::new();
        let today = AttemptKey::Daily {
            quiz_id: "ai-8".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        };
        let yesterday = AttemptKey::Daily {
            quiz_id: "ai-7".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
        };
        let regenerated = AttemptKey::Daily {
            quiz_id: "ai-8b".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
        };
        for key in [&today, &yesterday, &regenerated] {
            storage.set(&key.answers_key(), "{}").unwrap();
            storage.set(&key.index_key(), "1").unwrap();
        }
        storage.set("daily-streak", "[]").unwrap();
        storage.set("quiz-3-answers", "{}").unwrap();

        let removed = AttemptSnapshot::clear_daily(&storage, Some(&today)).unwrap();
        assert_eq!(removed, 4);
        assert_eq!(
            storage.keys().unwrap(),
            vec![
                "daily-2026-10-17-quiz-ai-8-answers".to_string(),
                "daily-2026-10-17-quiz-ai-8-answers-currentQuestionIndex".to_string(),
                "daily-streak".to_string(),
                "quiz-3-answers".to_string(),
            ]
        );

        AttemptSnapshot::clear_daily(&storage, None).unwrap();
        assert_eq!(
            storage.keys().unwrap(),
            vec!["daily-streak".to_string(), "quiz-3-answers".to_string()]
        );
    }
}
