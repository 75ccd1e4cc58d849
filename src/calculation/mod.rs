//! Calculation logic for the payroll engine.
//!
//! This module contains the statutory bracket tables and deduction
//! calculators, the aggregation of daily punches into weekly hours, and the
//! assembly of weekly payroll lines into a payroll run.

mod allowances;
mod bracket_table;
mod daily_hours;
mod health_insurance;
mod housing_fund;
mod overtime_pay;
mod payroll;
mod payroll_line;
mod social_insurance;
mod statutory_deductions;
mod time_log;
mod week_detection;
mod withholding_tax;

pub use allowances::weekly_allowance;
pub use bracket_table::{
    ContributionBracket, ContributionTable, TaxTable, TaxTier, canonical_social_insurance_table,
    canonical_withholding_table,
};
pub use daily_hours::{DailyHours, calculate_daily_hours};
pub use health_insurance::{HEALTH_INSURANCE_REF, HealthInsuranceResult, calculate_health_insurance};
pub use housing_fund::{HOUSING_FUND_REF, HousingFundResult, calculate_housing_fund};
pub use overtime_pay::calculate_overtime_pay;
pub use payroll::{
    PayrollAggregator, WARN_DUPLICATE_EMPLOYEE, WARN_NO_TIME_RECORDS, WARN_UNKNOWN_EMPLOYEE,
    run_payroll,
};
pub use payroll_line::{calculate_payroll_line, round_currency};
pub use social_insurance::{SOCIAL_INSURANCE_REF, SocialInsuranceResult, calculate_social_insurance};
pub use statutory_deductions::{StatutoryDeductions, calculate_statutory_deductions};
pub use time_log::{
    TimeLogAggregator, WARN_DUPLICATE_WEEK, WARN_NEGATIVE_HOURS, WARN_NON_MONDAY_WEEK,
    WARN_PUNCH_IN_IMPORTED_WEEK, WeeklyHours, aggregate_punches,
};
pub use week_detection::{pay_month_of, week_start_of};
pub use withholding_tax::{WITHHOLDING_TAX_REF, WithholdingTaxResult, calculate_withholding_tax};
