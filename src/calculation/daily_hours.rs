//! Worked and overtime hours of a single punch.
//!
//! Logins before the scheduled start and logouts after the scheduled end are
//! clamped, so regular hours never exceed the scheduled day less lunch.
//! Overtime is measured separately on the unclamped logout, and only for
//! employees who logged in strictly before the grace cutoff.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;

use crate::config::WorkPolicy;
use crate::models::TimePunch;

use super::week_start_of;

/// Hours derived from one day's punch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyHours {
    /// The Monday of the punch's week.
    pub week_start: NaiveDate,
    /// Regular hours worked, lunch excluded, never negative.
    pub worked_hours: Decimal,
    /// Overtime hours; zero when not eligible.
    pub overtime_hours: Decimal,
    /// Whether the login was early enough to earn overtime.
    pub overtime_eligible: bool,
}

fn hours_between(start: NaiveTime, end: NaiveTime) -> Decimal {
    Decimal::from((end - start).num_minutes()) / Decimal::from(60)
}

/// Calculates the worked and overtime hours of one punch.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_daily_hours;
/// use payroll_engine::config::WorkPolicy;
/// use payroll_engine::models::TimePunch;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let punch = TimePunch {
///     employee_id: "10001".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     login: NaiveTime::from_hms_opt(7, 45, 0).unwrap(),
///     logout: NaiveTime::from_hms_opt(18, 30, 0).unwrap(),
/// };
/// let hours = calculate_daily_hours(&punch, &WorkPolicy::default());
/// assert_eq!(hours.worked_hours, Decimal::new(8, 0));
/// assert_eq!(hours.overtime_hours, Decimal::new(15, 1));
/// ```
pub fn calculate_daily_hours(punch: &TimePunch, policy: &WorkPolicy) -> DailyHours {
    let login = punch.login.max(policy.scheduled_start);
    let logout = punch.logout.min(policy.scheduled_end);

    let worked_hours = (hours_between(login, logout) - policy.lunch_hours).max(Decimal::ZERO);

    let overtime_eligible = punch.login < policy.grace_cutoff;
    let overtime_hours = if overtime_eligible {
        hours_between(policy.scheduled_end, punch.logout).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };

    DailyHours {
        week_start: week_start_of(punch.date),
        worked_hours,
        overtime_hours,
        overtime_eligible,
    }
}
