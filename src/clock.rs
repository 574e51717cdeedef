use chrono::{Datelike, NaiveDate};

/// Source of the current calendar date.
///
/// Save requests default their target year/month to "now"; reading it through
/// this trait keeps that decision testable.
pub trait Clock {
    fn today(&self) -> NaiveDate;

    fn current_year(&self) -> i32 {
        self.today().year()
    }

    /// 1-indexed month.
    fn current_month(&self) -> u32 {
        self.today().month()
    }
}

/// Local wall-clock calendar.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Always reports the same day.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
