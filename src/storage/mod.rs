//! Key/value persistence with the same contract as browser local storage.
//!
//! Values are opaque strings; callers serialize with `serde_json`.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::errors::QuizResult;

/// Key holding the bearer token after login.
pub const TOKEN_KEY: &str = "token";

pub trait Storage {
    fn get(&self, key: &str) -> QuizResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> QuizResult<()>;
    fn remove(&self, key: &str) -> QuizResult<()>;
    /// Every stored key, sorted.
    fn keys(&self) -> QuizResult<Vec<String>>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> QuizResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> QuizResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> QuizResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> QuizResult<Vec<String>> {
        (**self).keys()
    }
}
