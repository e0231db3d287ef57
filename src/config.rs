use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_STORAGE_DIR: &str = ".quiz-player";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const LOG_FILE_NAME: &str = "quiz-player.log";

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub storage_dir: PathBuf,
    pub request_timeout: Duration,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source, falling back to defaults
    /// for anything unset or unparsable.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage_dir: PathBuf = lookup("QUIZ_STORAGE_DIR")
            .unwrap_or_else(|| DEFAULT_STORAGE_DIR.to_string())
            .into();

        Self {
            api_url: lookup("QUIZ_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            request_timeout: Duration::from_secs(
                lookup("QUIZ_REQUEST_TIMEOUT_SECS")
                    .and_then(|s| s.parse().ok())
                    .filter(|secs| *secs > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            log_file: lookup("QUIZ_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| storage_dir.join(LOG_FILE_NAME)),
            storage_dir,
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_url: "http://127.0.0.1:9/api".to_string(),
            storage_dir: std::env::temp_dir().join("quiz-player-test"),
            request_timeout: Duration::from_secs(1),
            log_file: std::env::temp_dir().join("quiz-player-test.log"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));

        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.storage_dir, PathBuf::from(DEFAULT_STORAGE_DIR));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(
            config.log_file,
            PathBuf::from(DEFAULT_STORAGE_DIR).join("quiz-player.log")
        );
    }

    #[test]
    fn test_config_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("QUIZ_API_URL", "https://quiz.example/api"),
            ("QUIZ_STORAGE_DIR", "/tmp/qp"),
            ("QUIZ_REQUEST_TIMEOUT_SECS", "3"),
        ]));

        assert_eq!(config.api_url, "https://quiz.example/api");
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.log_file, PathBuf::from("/tmp/qp/quiz-player.log"));
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("QUIZ_REQUEST_TIMEOUT_SECS", "0")]));
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let config = Config::from_lookup(lookup_from(&[("QUIZ_REQUEST_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_test_config() {
        let config = Config::test_config();
        assert!(config.api_url.starts_with("http://127.0.0.1"));
    }
}
