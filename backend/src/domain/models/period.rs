//! Domain models for accounting periods.
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A fiscal year. Monthly periods are generated as its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingPeriod {
    pub id: String,
    /// Display name, e.g. "FY2026".
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// A closed period accepts no new postings and no transitions of the
    /// postings already inside it.
    pub is_closed: bool,
    pub is_active: bool,
}

/// A month within a fiscal year.
///
/// Auto-generated monthly periods align to calendar month boundaries:
/// start on the 1st, end on the last day of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPeriod {
    pub id: String,
    pub accounting_period_id: String,
    /// Display name, e.g. "January 2026".
    pub name: String,
    pub month: u32,
    pub year: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_closed: bool,
    pub is_active: bool,
}

impl MonthlyPeriod {
    /// Whether the given date falls inside this period's date range.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Whether this period's month lies strictly after the given date's month.
    ///
    /// Compared as `(year, month)` tuples so the answer never depends on
    /// time-of-day or timezone handling.
    pub fn is_after_month_of(&self, date: NaiveDate) -> bool {
        (self.year, self.month) > (date.year(), date.month())
    }

    /// Whether this period's month lies strictly before the given date's month.
    pub fn is_before_month_of(&self, date: NaiveDate) -> bool {
        (self.year, self.month) < (date.year(), date.month())
    }
}

/// Last day of the given month, accounting for leap years. `None` for a
/// month outside `1..=12`.
pub fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let day = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => return None,
    };
    Some(day)
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
