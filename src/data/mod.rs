mod loader;

pub use loader::{LoadError, check_answer_key, load_quiz_from_json, validate_quiz};
