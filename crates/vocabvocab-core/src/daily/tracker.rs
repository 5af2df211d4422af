//! Daily word target and day-over-day streak.
//!
//! ## Day transitions
//!
//! ```text
//! same day        -> count += 1
//! next day        -> count = 1, streak kept if yesterday met the target, else reset
//! gap of 2+ days  -> count = 1, streak reset
//! ```
//!
//! The streak is incremented when today's count lands exactly on the target,
//! or when the target is lowered to or below a count already reached today.
//! `target_reached` records the day of the last increment so it happens at
//! most once per day.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default number of words per day.
pub const DEFAULT_DAILY_TARGET: u32 = 50;

/// Words viewed on a given calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

/// Consecutive days on which the target was met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub current_streak: u32,
    pub start_date: NaiveDate,
}

impl Streak {
    fn fresh(today: NaiveDate) -> Self {
        Self {
            current_streak: 0,
            start_date: today,
        }
    }
}

/// A positive daily word target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct DailyTarget(NonZeroU32);

impl DailyTarget {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for DailyTarget {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_DAILY_TARGET).unwrap_or(NonZeroU32::MIN))
    }
}

impl TryFrom<i64> for DailyTarget {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        let invalid = |message: &str| ValidationError::InvalidDailyTarget {
            value: value.to_string(),
            message: message.to_string(),
        };
        if value <= 0 {
            return Err(invalid("must be a positive integer"));
        }
        let value = u32::try_from(value).map_err(|_| invalid("too large"))?;
        Self::new(value).ok_or_else(|| invalid("must be a positive integer"))
    }
}

impl FromStr for DailyTarget {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| ValidationError::InvalidDailyTarget {
                value: s.to_string(),
                message: "not a number".to_string(),
            })?;
        Self::try_from(value)
    }
}

impl From<DailyTarget> for u32 {
    fn from(target: DailyTarget) -> Self {
        target.get()
    }
}

impl fmt::Display for DailyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-day counting and streak state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DailyTracker {
    daily_count: Option<DailyCount>,
    streak: Option<Streak>,
    target: DailyTarget,
    target_reached: Option<NaiveDate>,
}

impl DailyTracker {
    pub fn new(
        daily_count: Option<DailyCount>,
        streak: Option<Streak>,
        target: DailyTarget,
        target_reached: Option<NaiveDate>,
    ) -> Self {
        Self {
            daily_count,
            streak,
            target,
            target_reached,
        }
    }

    /// Count one completed view on `today`.
    ///
    /// Returns `true` if this view incremented the streak.
    pub fn record_view(&mut self, today: NaiveDate) -> bool {
        let count = match self.daily_count {
            Some(daily) if daily.date == today => {
                let count = daily.count + 1;
                self.daily_count = Some(DailyCount { date: today, count });
                count
            }
            previous => {
                self.roll_over(previous, today);
                self.daily_count = Some(DailyCount {
                    date: today,
                    count: 1,
                });
                1
            }
        };

        if count == self.target.get() {
            self.award(today)
        } else {
            false
        }
    }

    fn roll_over(&mut self, previous: Option<DailyCount>, today: NaiveDate) {
        let keep = match previous {
            Some(prev) => {
                let gap = today.signed_duration_since(prev.date).num_days();
                gap == 1 && prev.count >= self.target.get()
            }
            None => false,
        };

        if keep {
            if self.streak.is_none() {
                self.streak = Some(Streak::fresh(today));
            }
        } else {
            if self.current_streak() > 0 {
                tracing::info!(lost = self.current_streak(), "daily streak reset");
            }
            self.streak = Some(Streak::fresh(today));
        }
    }

    /// Increment the streak unless it was already incremented today.
    fn award(&mut self, today: NaiveDate) -> bool {
        if self.target_reached == Some(today) {
            return false;
        }
        let streak = self.streak.get_or_insert_with(|| Streak::fresh(today));
        streak.current_streak += 1;
        self.target_reached = Some(today);
        tracing::info!(
            streak = streak.current_streak,
            target = self.target.get(),
            "daily target reached"
        );
        true
    }

    /// Change the target and re-check whether today's count now meets it.
    ///
    /// Returns `true` if the change incremented the streak.
    pub fn set_target(&mut self, target: DailyTarget, today: NaiveDate) -> bool {
        self.target = target;
        if self.today_word_count(today) >= target.get() {
            self.award(today)
        } else {
            false
        }
    }

    /// Words counted today; 0 when the stored day is not today.
    pub fn today_word_count(&self, today: NaiveDate) -> u32 {
        match self.daily_count {
            Some(daily) if daily.date == today => daily.count,
            _ => 0,
        }
    }

    pub fn current_streak(&self) -> u32 {
        self.streak.map(|s| s.current_streak).unwrap_or(0)
    }

    /// Start of the current streak; `today` for a learner with no streak yet.
    pub fn streak_start_date(&self, today: NaiveDate) -> NaiveDate {
        self.streak.map(|s| s.start_date).unwrap_or(today)
    }

    pub fn target(&self) -> DailyTarget {
        self.target
    }

    pub fn reached_today(&self, today: NaiveDate) -> bool {
        self.target_reached == Some(today)
    }

    pub fn daily_count(&self) -> Option<DailyCount> {
        self.daily_count
    }

    pub fn streak(&self) -> Option<Streak> {
        self.streak
    }

    pub fn target_reached(&self) -> Option<NaiveDate> {
        self.target_reached
    }
}
