//! Daily-quiz streak tracking.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use crate::attempt::{AttemptResults, read_json, write_json};
use crate::errors::QuizResult;
use crate::storage::Storage;

pub const STREAK_KEY: &str = "daily-streak";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakSummary {
    pub current: usize,
    pub longest: usize,
    pub completed_today: bool,
}

pub struct StreakTracker<S: Storage> {
    storage: S,
    days: BTreeSet<NaiveDate>,
}

impl<S: Storage> StreakTracker<S> {
    pub fn load(storage: S) -> QuizResult<Self> {
        let days = read_json(&storage, STREAK_KEY)?.unwrap_or_default();
        Ok(Self { storage, days })
    }

    /// Marks `day` as completed. Recording the same day twice is a no-op.
    pub fn record(&mut self, day: NaiveDate) -> QuizResult<()> {
        if self.days.insert(day) {
            write_json(&self.storage, STREAK_KEY, &self.days)?;
            log::debug!("Recorded daily quiz completion for {}", day);
        }
        Ok(())
    }

    /// Records the day of a completed daily attempt. Results of regular
    /// quizzes carry no day and leave the streak untouched.
    pub fn record_completion(
        &mut self,
        results: &AttemptResults,
    ) -> QuizResult<Option<NaiveDate>> {
        match results.daily_date {
            Some(day) => {
                self.record(day)?;
                Ok(Some(day))
            }
            None => Ok(None),
        }
    }

    pub fn summary(&self, today: NaiveDate) -> StreakSummary {
        StreakSummary {
            current: self.current(today),
            longest: self.longest(),
            completed_today: self.days.contains(&today),
        }
    }

    /// Consecutive days ending today, or ending yesterday when today's quiz
    /// is still open.
    pub fn current(&self, today: NaiveDate) -> usize {
        let start = if self.days.contains(&today) {
            today
        } else {
            match today.checked_sub_days(Days::new(1)) {
                Some(yesterday) if self.days.contains(&yesterday) => yesterday,
                _ => return 0,
            }
        };

        let mut count = 0;
        let mut day = Some(start);
        while let Some(d) = day.filter(|d| self.days.contains(d)) {
            count += 1;
            day = d.pred_opt();
        }
        count
    }

    pub fn longest(&self) -> usize {
        let mut longest = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;

        for day in &self.days {
            run = match previous.and_then(|p| p.succ_opt()) {
                Some(next) if next == *day => run + 1,
                _ => 1,
            };
            longest = longest.max(run);
            previous = Some(*day);
        }
        longest
    }
}
