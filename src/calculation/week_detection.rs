//! Week-start detection.
//!
//! Payroll weeks run Monday to Sunday. A week is reported under the calendar
//! month of its Monday, even when it ends in the following month.

use chrono::{Datelike, Days, NaiveDate};

use crate::models::PayMonth;

/// Returns the Monday on or before `date`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::week_start_of;
/// use chrono::NaiveDate;
///
/// // Sunday 2024-06-09 belongs to the week starting Monday 2024-06-03
/// let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
/// assert_eq!(week_start_of(sunday), NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
/// ```
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Returns the month the week containing `date` is reported under.
pub fn pay_month_of(date: NaiveDate) -> PayMonth {
    PayMonth::from_date(week_start_of(date))
}
