//! Weekly share of fixed monthly allowances.

use rust_decimal::Decimal;

use crate::config::WorkPolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::models::Allowances;

/// Spreads the monthly rice, phone and clothing allowances evenly over the
/// weeks of a month.
///
/// # Errors
///
/// Returns [`PayrollError::CalculationError`] when the allowances sum past
/// the decimal range or the policy's `weeks_per_month` is zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::weekly_allowance;
/// use payroll_engine::config::WorkPolicy;
/// use payroll_engine::models::Allowances;
/// use rust_decimal::Decimal;
///
/// let allowances = Allowances {
///     rice: Decimal::new(1500, 0),
///     phone: Decimal::new(500, 0),
///     clothing: Decimal::new(500, 0),
/// };
/// assert_eq!(weekly_allowance(&allowances, &WorkPolicy::default()).unwrap(), Decimal::new(625, 0));
/// ```
pub fn weekly_allowance(allowances: &Allowances, policy: &WorkPolicy) -> PayrollResult<Decimal> {
    allowances
        .total()
        .and_then(|total| total.checked_div(policy.weeks_per_month))
        .ok_or_else(|| PayrollError::CalculationError {
            message: format!(
                "weekly share of allowances {:?} over {} weeks is out of range",
                allowances, policy.weeks_per_month
            ),
        })
}
