mod clock;
mod tracker;

pub use clock::{Clock, FixedClock, SystemClock};
pub use tracker::{DailyCount, DailyTarget, DailyTracker, Streak, DEFAULT_DAILY_TARGET};
