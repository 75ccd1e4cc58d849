//! Weekly time record model.

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayMonth;

/// Worked and overtime hours of one employee for one week.
///
/// Exactly one record exists per (employee, week-start). Records are created
/// by the time-log aggregator and never mutated afterwards.
///
/// # Example
///
/// ```
/// use payroll_engine::models::WeeklyTimeRecord;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = WeeklyTimeRecord {
///     employee_id: "10001".to_string(),
///     week_start: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     hours_worked: Decimal::new(40, 0),
///     overtime_hours: Decimal::ZERO,
/// };
/// assert_eq!(record.pay_month().to_string(), "2024-06");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyTimeRecord {
    /// Identifier of the employee.
    pub employee_id: String,
    /// The Monday beginning the week.
    pub week_start: NaiveDate,
    /// Total worked hours for the week, lunch excluded.
    pub hours_worked: Decimal,
    /// Total overtime hours for the week.
    pub overtime_hours: Decimal,
}

impl WeeklyTimeRecord {
    /// Returns the month this week is reported under.
    pub fn pay_month(&self) -> PayMonth {
        PayMonth::from_date(self.week_start)
    }

    /// Returns true if the week-start falls on a Monday.
    pub fn starts_on_monday(&self) -> bool {
        self.week_start.weekday() == Weekday::Mon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_monday() {
        let mut record = WeeklyTimeRecord {
            employee_id: "10001".to_string(),
            week_start: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            hours_worked: Decimal::new(32, 0),
            overtime_hours: Decimal::new(15, 1),
        };
        assert!(record.starts_on_monday());

        record.week_start = NaiveDate::from_ymd_opt(2024, 6, 4).unwrap();
        assert!(!record.starts_on_monday());
    }

    #[test]
    fn test_week_crossing_month_end_belongs_to_start_month() {
        let record = WeeklyTimeRecord {
            employee_id: "10001".to_string(),
            week_start: NaiveDate::from_ymd_opt(2024, 7, 29).unwrap(),
            hours_worked: Decimal::new(40, 0),
            overtime_hours: Decimal::ZERO,
        };
        assert_eq!(record.pay_month().to_string(), "2024-07");
    }
}
