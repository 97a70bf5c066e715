//! Shared traits, calendar windows, and period helpers for studio records.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exposes a stable identifier for records stored in the books.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to a record's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts a record into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// `YYYY-MM-DD`, or `undated` for records that carry no usable date.
pub fn date_label(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "undated".to_string(), |value| value.to_string())
}

/// Finds a record by identifier within a collection.
pub fn find_by_id<T: Identifiable>(items: &[T], id: Uuid) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Finds a mutable record by identifier within a collection.
pub fn find_by_id_mut<T: Identifiable>(items: &mut [T], id: Uuid) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
/// Reporting cadences used to scope period profit.
pub enum Period {
    #[default]
    Week,
    Month,
}

impl Period {
    /// Returns the closed window of this period that contains `reference`.
    pub fn window_containing(self, reference: NaiveDate) -> DateWindow {
        match self {
            Period::Week => DateWindow::week_containing(reference),
            Period::Month => DateWindow::month_containing(reference),
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" | "weekly" | "w" => Some(Period::Week),
            "month" | "monthly" | "m" => Some(Period::Month),
            _ => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Period::Week => "Weekly",
            Period::Month => "Monthly",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
/// Closed calendar interval; both `start` and `end` belong to the window.
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateWindowError> {
        if end < start {
            return Err(DateWindowError::InvalidRange);
        }
        Ok(Self { start, end })
    }

    /// Monday-to-Sunday week containing `reference`.
    pub fn week_containing(reference: NaiveDate) -> Self {
        let start = start_of_week(reference);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Calendar month containing `reference`.
    pub fn month_containing(reference: NaiveDate) -> Self {
        let start = start_of_month(reference);
        let end = NaiveDate::from_ymd_opt(
            reference.year(),
            reference.month(),
            days_in_month(reference.year(), reference.month()),
        )
        .unwrap_or(start);
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Missing dates never fall inside a window.
    pub fn contains_opt(&self, date: Option<NaiveDate>) -> bool {
        date.map(|value| self.contains(value)).unwrap_or(false)
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Monday-start weeks that overlap this window, in chronological order.
    pub fn overlapping_weeks(&self) -> Vec<DateWindow> {
        let mut weeks = Vec::new();
        let mut cursor = start_of_week(self.start);
        while cursor <= self.end {
            weeks.push(DateWindow::week_containing(cursor));
            cursor += Duration::weeks(1);
        }
        weeks
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Errors that can occur when constructing [`DateWindow`] values.
pub enum DateWindowError {
    InvalidRange,
}

impl fmt::Display for DateWindowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateWindowError::InvalidRange => f.write_str("date window end must not precede start"),
        }
    }
}

impl std::error::Error for DateWindowError {}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let delta = date.weekday().num_days_from_monday() as i64;
    date - Duration::days(delta)
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .map(|first_next| (first_next - Duration::days(1)).day())
        .unwrap_or(28)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-01-15 is a Wednesday.
        let window = DateWindow::week_containing(date(2025, 1, 15));
        assert_eq!(window.start, date(2025, 1, 13));
        assert_eq!(window.end, date(2025, 1, 19));

        let sunday = DateWindow::week_containing(date(2025, 1, 19));
        assert_eq!(sunday.start, date(2025, 1, 13));
    }

    #[test]
    fn month_window_handles_leap_february() {
        let window = DateWindow::month_containing(date(2024, 2, 10));
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, date(2024, 2, 29));
        assert_eq!(window.days(), 29);
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let window = DateWindow::new(date(2025, 3, 1), date(2025, 3, 31)).unwrap();
        assert!(window.contains(date(2025, 3, 1)));
        assert!(window.contains(date(2025, 3, 31)));
        assert!(!window.contains(date(2025, 4, 1)));
        assert!(!window.contains_opt(None));
    }

    #[test]
    fn single_day_window_is_valid() {
        let day = date(2025, 5, 5);
        let window = DateWindow::new(day, day).expect("same-day window");
        assert_eq!(window.days(), 1);
        assert!(DateWindow::new(day, date(2025, 5, 4)).is_err());
    }

    #[test]
    fn overlapping_weeks_cover_month_edges() {
        // March 2025 starts on a Saturday and ends on a Monday.
        let month = DateWindow::month_containing(date(2025, 3, 12));
        let weeks = month.overlapping_weeks();
        assert_eq!(weeks.first().unwrap().start, date(2025, 2, 24));
        assert_eq!(weeks.last().unwrap().start, date(2025, 3, 31));
        assert_eq!(weeks.len(), 6);
    }

    #[test]
    fn period_parse_accepts_aliases() {
        assert_eq!(Period::parse("Weekly"), Some(Period::Week));
        assert_eq!(Period::parse("m"), Some(Period::Month));
        assert_eq!(Period::parse("year"), None);
    }
}
