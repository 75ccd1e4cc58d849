//! Calendar month used to group weekly payroll.
//!
//! This module contains the [`PayMonth`] type. A week belongs to the month of
//! its week-start date, so a week starting on 2024-07-29 is July's last week
//! even though most of its days fall in August.

use std::fmt;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar (year, month) pair.
///
/// Orders chronologically and serializes as `"YYYY-MM"`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayMonth;
/// use chrono::NaiveDate;
///
/// let month = PayMonth::from_date(NaiveDate::from_ymd_opt(2024, 6, 17).unwrap());
/// assert_eq!(month.to_string(), "2024-06");
/// assert_eq!(month.name(), "June");
/// assert_eq!(month.first_day(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PayMonth {
    year: i32,
    month: u32,
}

impl PayMonth {
    /// Returns the month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Returns the month number (1-12).
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Returns the first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        // Constructed only from valid dates, so day 1 always exists.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Returns the English month name (e.g., "June").
    pub fn name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }
}

impl fmt::Display for PayMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl From<PayMonth> for String {
    fn from(month: PayMonth) -> Self {
        month.to_string()
    }
}

impl TryFrom<String> for PayMonth {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NaiveDate::parse_from_str(&format!("{}-01", value.trim()), "%Y-%m-%d")
            .map(Self::from_date)
            .map_err(|e| format!("invalid pay month '{}': {}", value, e))
    }
}
