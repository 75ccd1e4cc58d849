//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod deductions;
mod employee;
mod pay_month;
mod payroll_result;
mod time_punch;
mod weekly_record;

pub use deductions::DeductionAmounts;
pub use employee::{Allowances, DeductionOverride, Employee};
pub use pay_month::PayMonth;
pub use payroll_result::{
    AuditStep, EmployeePayroll, MonthlyPayroll, PayrollLine, PayrollRun, PayrollWarning,
    WarningSeverity,
};
pub use time_punch::TimePunch;
pub use weekly_record::WeeklyTimeRecord;
