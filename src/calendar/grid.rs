use crate::calendar::cursor::CalendarCursor;
use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};

/// One cell of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarCell {
    /// Padding before the first or after the last day of the month.
    Empty,
    /// A one-based day of the month.
    Day(u32),
}

impl CalendarCell {
    pub fn day(self) -> Option<u32> {
        match self {
            CalendarCell::Day(day) => Some(day),
            CalendarCell::Empty => None,
        }
    }
}

pub type Week = [CalendarCell; 7];

/// Builds the month grid for `cursor` with weeks starting on Sunday.
pub fn build_calendar(cursor: CalendarCursor) -> Vec<Week> {
    build_calendar_starting(cursor, Weekday::Sun)
}

/// Builds the month grid for `cursor`, padded to whole weeks that start on `first_weekday`.
///
/// Returns an empty grid only for years chrono cannot represent.
///
/// # Examples
///
/// ```
/// use cronoweath::{build_calendar, CalendarCell, CalendarCursor};
///
/// // March 2025 starts on a Saturday.
/// let weeks = build_calendar(CalendarCursor::new(2025, 2));
/// assert_eq!(weeks.len(), 6);
/// assert_eq!(weeks[0][5], CalendarCell::Empty);
/// assert_eq!(weeks[0][6], CalendarCell::Day(1));
/// ```
pub fn build_calendar_starting(cursor: CalendarCursor, first_weekday: Weekday) -> Vec<Week> {
    let (Some(first_day), Some(days_in_month)) = (cursor.first_day(), cursor.days_in_month())
    else {
        return Vec::new();
    };

    let leading = (first_day.weekday().num_days_from_monday() + 7
        - first_weekday.num_days_from_monday())
        % 7;
    let total_cells = (leading + days_in_month).div_ceil(7) * 7;

    let cells: Vec<CalendarCell> = (0..total_cells)
        .map(|index| {
            let day = index as i64 - leading as i64 + 1;
            if (1..=days_in_month as i64).contains(&day) {
                CalendarCell::Day(day as u32)
            } else {
                CalendarCell::Empty
            }
        })
        .collect();

    cells
        .chunks_exact(7)
        .map(|chunk| {
            let mut week = [CalendarCell::Empty; 7];
            week.copy_from_slice(chunk);
            week
        })
        .collect()
}

/// Abbreviated weekday headers for a grid starting on `first_weekday`.
pub fn weekday_headers(first_weekday: Weekday) -> [&'static str; 7] {
    let mut headers = [""; 7];
    let mut weekday = first_weekday;
    for header in headers.iter_mut() {
        *header = weekday_abbreviation(weekday);
        weekday = weekday.succ();
    }
    headers
}

fn weekday_abbreviation(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
