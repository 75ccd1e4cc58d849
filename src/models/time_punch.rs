//! Time punch model.
//!
//! A [`TimePunch`] is one day's login/logout pair for an employee, as
//! recorded by the attendance system.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A single day's attendance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePunch {
    /// Identifier of the employee who punched.
    pub employee_id: String,
    /// The calendar date of the punch.
    pub date: NaiveDate,
    /// The time the employee logged in.
    pub login: NaiveTime,
    /// The time the employee logged out.
    pub logout: NaiveTime,
}

impl TimePunch {
    /// Returns the day of the week of the punch.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::TimePunch;
    /// use chrono::{NaiveDate, NaiveTime, Weekday};
    ///
    /// let punch = TimePunch {
    ///     employee_id: "10001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
    ///     login: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
    ///     logout: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    /// };
    /// assert_eq!(punch.day_of_week(), Weekday::Wed);
    /// ```
    pub fn day_of_week(&self) -> Weekday {
        self.date.weekday()
    }
}
