use crate::calendar::days_in_month;
use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The month currently shown by a calendar picker.
///
/// `month0` is zero based (0 = January, 11 = December). Constructors normalize any
/// overflowing month into the year, so a cursor always holds `0..=11`.
///
/// # Examples
///
/// ```
/// use cronoweath::CalendarCursor;
///
/// let mut cursor = CalendarCursor::new(2024, 11);
/// cursor.next_month();
/// assert_eq!(cursor, CalendarCursor::new(2025, 0));
/// assert_eq!(cursor.label(), "January 2025");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarCursor {
    pub year: i32,
    pub month0: u32,
}

impl CalendarCursor {
    /// Creates a cursor, folding months outside `0..=11` into the year
    /// (`new(2025, -1)` is December 2024, `new(2025, 12)` is January 2026).
    pub fn new(year: i32, month0: i32) -> Self {
        Self {
            year: year.saturating_add(month0.div_euclid(12)),
            month0: month0.rem_euclid(12) as u32,
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month0: date.month0(),
        }
    }

    /// The month containing today's local date.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    /// One-based month number, as chrono expects it.
    pub fn month(self) -> u32 {
        self.month0 + 1
    }

    pub fn prev_month(&mut self) {
        *self = Self::new(self.year, self.month0 as i32 - 1);
    }

    pub fn next_month(&mut self) {
        *self = Self::new(self.year, self.month0 as i32 + 1);
    }

    /// Number of days in the month, or `None` when the year is outside chrono's range.
    pub fn days_in_month(self) -> Option<u32> {
        days_in_month(self.year, self.month())
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month(), 1)
    }

    /// The date of `day` within the shown month, e.g. when a grid cell is picked.
    pub fn date_for_day(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month(), day)
    }

    pub fn contains(self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month0() == self.month0
    }

    /// `"March 2025"`.
    pub fn label(self) -> String {
        match self.first_day() {
            Some(first) => first.format("%B %Y").to_string(),
            None => format!("{:04}-{:02}", self.year, self.month()),
        }
    }
}

impl Default for CalendarCursor {
    fn default() -> Self {
        Self::today()
    }
}

impl From<NaiveDate> for CalendarCursor {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for CalendarCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}
