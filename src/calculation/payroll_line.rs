//! Weekly payroll line calculation.
//!
//! Combines an employee's rates and allowances, one week's hours and the
//! weekly statutory deductions into a [`PayrollLine`]. All arithmetic is
//! exact; money and hour fields are rounded once, when the line is built.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::WorkPolicy;
use crate::error::{PayrollError, PayrollResult};
use crate::models::{DeductionAmounts, Employee, PayrollLine, WeeklyTimeRecord};

use super::{calculate_overtime_pay, weekly_allowance};

/// Rounds a money or hour amount to two decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(10125, 3)), Decimal::new(1013, 2));
/// assert_eq!(round_currency(Decimal::new(-10125, 3)), Decimal::new(-1013, 2));
/// ```
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Builds the payroll line of one employee for one week.
///
/// `weekly` holds the weekly-equivalent statutory deductions of the month the
/// week belongs to. When the employee carries a deduction override, its
/// government and gross totals replace the schedule totals and the reported
/// withholding tax is their difference.
///
/// # Errors
///
/// Returns [`PayrollError::CalculationError`] when an amount leaves the
/// decimal range.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll_line;
/// use payroll_engine::config::WorkPolicy;
/// use payroll_engine::models::{Allowances, DeductionAmounts, Employee, WeeklyTimeRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "10001".to_string(),
///     last_name: "Garcia".to_string(),
///     first_name: "Manuel".to_string(),
///     hourly_rate: Decimal::new(100, 0),
///     monthly_base_rate: Decimal::new(20000, 0),
///     allowances: Allowances {
///         rice: Decimal::new(600, 0),
///         phone: Decimal::new(300, 0),
///         clothing: Decimal::new(300, 0),
///     },
///     deduction_override: None,
/// };
/// let record = WeeklyTimeRecord {
///     employee_id: "10001".to_string(),
///     week_start: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     hours_worked: Decimal::new(40, 0),
///     overtime_hours: Decimal::ZERO,
/// };
/// let weekly = DeductionAmounts {
///     social_insurance: Decimal::new(225, 0),
///     health_insurance: Decimal::new(75, 0),
///     housing_fund: Decimal::new(25, 0),
///     withholding_tax: Decimal::ZERO,
/// };
///
/// let line = calculate_payroll_line(&employee, &record, &weekly, &WorkPolicy::default()).unwrap();
/// assert_eq!(line.gross_pay, Decimal::new(4000, 0));
/// assert_eq!(line.net_pay, Decimal::new(3975, 0));
/// ```
pub fn calculate_payroll_line(
    employee: &Employee,
    record: &WeeklyTimeRecord,
    weekly: &DeductionAmounts,
    policy: &WorkPolicy,
) -> PayrollResult<PayrollLine> {
    let out_of_range = |what: &str| PayrollError::CalculationError {
        message: format!(
            "{} for employee {} in week of {} is out of range",
            what, employee.id, record.week_start
        ),
    };
    let in_context = |err: PayrollError| match err {
        PayrollError::CalculationError { message } => PayrollError::CalculationError {
            message: format!("employee {}, week of {}: {}", employee.id, record.week_start, message),
        },
        other => other,
    };

    let gross_pay = employee
        .hourly_rate
        .checked_mul(record.hours_worked)
        .ok_or_else(|| out_of_range("gross pay"))?;
    let allowance = weekly_allowance(&employee.allowances, policy).map_err(in_context)?;
    let overtime_pay = calculate_overtime_pay(employee.hourly_rate, record.overtime_hours, policy)
        .map_err(in_context)?;

    let (government_deduction, gross_deduction) = match employee.deduction_override {
        Some(overrides) => (overrides.government, overrides.gross),
        None => (weekly.government_total(), weekly.gross_total()),
    };
    let withholding_tax = gross_deduction
        .checked_sub(government_deduction)
        .ok_or_else(|| out_of_range("withholding tax"))?;

    let taxable_pay = gross_pay
        .checked_sub(government_deduction)
        .ok_or_else(|| out_of_range("taxable pay"))?;
    let net_pay = gross_pay
        .checked_sub(gross_deduction)
        .and_then(|net| net.checked_add(allowance))
        .and_then(|net| net.checked_add(overtime_pay))
        .ok_or_else(|| out_of_range("net pay"))?;

    Ok(PayrollLine {
        week_start: record.week_start,
        hours_worked: round_currency(record.hours_worked),
        gross_pay: round_currency(gross_pay),
        taxable_pay: round_currency(taxable_pay),
        social_insurance: round_currency(weekly.social_insurance),
        housing_fund: round_currency(weekly.housing_fund),
        health_insurance: round_currency(weekly.health_insurance),
        withholding_tax: round_currency(withholding_tax),
        gross_deduction: round_currency(gross_deduction),
        overtime_pay: round_currency(overtime_pay),
        net_pay: round_currency(net_pay),
        government_deduction: round_currency(government_deduction),
        allowance: round_currency(allowance),
        overtime_hours: round_currency(record.overtime_hours),
    })
}
