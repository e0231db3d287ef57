use std::fs::{self, OpenOptions};
use std::path::Path;

use env_logger::{Builder, Env, Target};

use crate::errors::QuizResult;

const DEFAULT_FILTER: &str = "warn";

/// Sends log output to `log_file`; stdout belongs to the terminal UI.
/// Level comes from `RUST_LOG`, defaulting to warnings.
pub fn init(log_file: &Path) -> QuizResult<()> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;

    let result = Builder::from_env(Env::default().default_filter_or(DEFAULT_FILTER))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_secs()
        .try_init();

    if let Err(e) = result {
        eprintln!("Logger already initialised: {}", e);
    }
    Ok(())
}
