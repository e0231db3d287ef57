//! Quiz attempts: progression, persistence, scoring and results.

mod controller;
mod results;
mod snapshot;

pub use controller::{AttemptController, ScoringMode, SubmitOutcome};
pub use results::{AttemptResults, Grade, ResultsView, WrongAnswer};
pub use snapshot::{AttemptKey, AttemptSnapshot};
pub(crate) use snapshot::{read_json, write_json};
