use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::errors::{QuizError, QuizResult};

use super::Storage;

/// In-process storage. Clones share the same map, so a clone handed to a
/// controller can be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> QuizResult<Option<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> QuizResult<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> QuizResult<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> QuizResult<Vec<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> QuizError {
    QuizError::Storage("memory storage lock poisoned".to_string())
}
