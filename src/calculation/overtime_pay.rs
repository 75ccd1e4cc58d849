//! Overtime pay.

use rust_decimal::Decimal;

use crate::config::WorkPolicy;
use crate::error::{PayrollError, PayrollResult};

/// Calculates overtime pay for a week.
///
/// Overtime pays `hourly_rate × premium × overtime_hours ÷ overtime_day_hours`;
/// zero or negative overtime hours pay nothing.
///
/// # Errors
///
/// Returns [`PayrollError::CalculationError`] when the product overflows or
/// the policy's `overtime_day_hours` is zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_overtime_pay;
/// use payroll_engine::config::WorkPolicy;
/// use rust_decimal::Decimal;
///
/// let pay = calculate_overtime_pay(Decimal::new(100, 0), Decimal::new(4, 0), &WorkPolicy::default());
/// assert_eq!(pay.unwrap(), Decimal::new(625, 1));
/// ```
pub fn calculate_overtime_pay(
    hourly_rate: Decimal,
    overtime_hours: Decimal,
    policy: &WorkPolicy,
) -> PayrollResult<Decimal> {
    if overtime_hours <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    hourly_rate
        .checked_mul(policy.overtime_premium)
        .and_then(|pay| pay.checked_mul(overtime_hours))
        .and_then(|pay| pay.checked_div(policy.overtime_day_hours))
        .ok_or_else(|| PayrollError::CalculationError {
            message: format!(
                "overtime pay for {} hours at rate {} (premium {}, day of {} hours) is out of range",
                overtime_hours, hourly_rate, policy.overtime_premium, policy.overtime_day_hours
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn overtime(rate: &str, hours: &str) -> PayrollResult<Decimal> {
        calculate_overtime_pay(dec(rate), dec(hours), &WorkPolicy::default())
    }

    #[test]
    fn test_no_overtime() {
        assert_eq!(overtime("100", "0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_overtime_pays_nothing() {
        assert_eq!(overtime("100", "-2").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_eight_hours_of_overtime() {
        // 100 × 1.25 × 8 ÷ 8
        assert_eq!(overtime("100", "8").unwrap(), dec("125"));
    }

    #[test]
    fn test_fractional_overtime() {
        assert_eq!(overtime("133.93", "1.5").unwrap(), dec("31.38984375"));
    }

    #[test]
    fn test_zero_day_hours_is_an_error() {
        let policy = WorkPolicy {
            overtime_day_hours: Decimal::ZERO,
            ..WorkPolicy::default()
        };
        let result = calculate_overtime_pay(dec("100"), dec("2"), &policy);
        assert!(matches!(result, Err(PayrollError::CalculationError { .. })));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let result = overtime("10000000000000000000", "100000000000");
        assert!(matches!(result, Err(PayrollError::CalculationError { .. })));
    }
}
