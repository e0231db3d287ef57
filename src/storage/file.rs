use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::{QuizError, QuizResult};

use super::Storage;

/// One file per key under a directory. Writes go to a temporary sibling and
/// are renamed into place, so a crash never leaves a half-written value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn open<P: AsRef<Path>>(root: P) -> QuizResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        log::debug!("Using storage directory {}", root.display());
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> QuizResult<PathBuf> {
        if key.is_empty() || !key.chars().all(is_key_char) {
            return Err(QuizError::Storage(format!("invalid storage key {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> QuizResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> QuizResult<()> {
        let path = self.path_for(key)?;
        let tmp = self.root.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path).inspect_err(|_| {
            let _ = fs::remove_file(&tmp);
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> QuizResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> QuizResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let name = entry?.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            // Skip in-flight temporaries and anything not written by `set`.
            if name.starts_with('.') {
                continue;
            }
            if let Some(key) = name.strip_suffix(".json") {
                keys.push(key.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
