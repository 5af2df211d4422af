use std::cell::Cell;
use std::rc::Rc;

use chrono::{Days, Local, NaiveDate};

/// Source of "today" for daily-target bookkeeping.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar day from the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Manually driven clock.
#[derive(Debug, Clone)]
pub struct FixedClock {
    day: Cell<NaiveDate>,
}

impl FixedClock {
    pub fn new(day: NaiveDate) -> Self {
        Self { day: Cell::new(day) }
    }

    pub fn set(&self, day: NaiveDate) {
        self.day.set(day);
    }

    /// Move forward by whole days.
    pub fn advance_days(&self, days: u64) {
        let next = self
            .day
            .get()
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX);
        self.day.set(next);
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.day.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
