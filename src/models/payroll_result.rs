//! Payroll result models.
//!
//! This module contains the [`PayrollRun`] type and its associated structures
//! that capture all outputs of a payroll run: payroll lines grouped by month
//! and employee, warnings raised while reading input, and the audit steps of
//! each month's deduction derivation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DeductionAmounts, PayMonth};

/// One employee's payroll for one week.
///
/// Fields up to `net_pay` are in ledger order; exports must keep it.
/// Money and hour fields are rounded to two decimal places.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollLine;
/// use rust_decimal::Decimal;
/// use chrono::NaiveDate;
/// use std::str::FromStr;
///
/// let dec = |s: &str| Decimal::from_str(s).unwrap();
/// let line = PayrollLine {
///     week_start: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     hours_worked: dec("40.00"),
///     gross_pay: dec("4000.00"),
///     taxable_pay: dec("3675.00"),
///     social_insurance: dec("225.00"),
///     housing_fund: dec("25.00"),
///     health_insurance: dec("75.00"),
///     withholding_tax: dec("0.00"),
///     gross_deduction: dec("325.00"),
///     overtime_pay: dec("0.00"),
///     net_pay: dec("3975.00"),
///     government_deduction: dec("325.00"),
///     allowance: dec("300.00"),
///     overtime_hours: dec("0.00"),
/// };
/// assert_eq!(line.net_pay, line.gross_pay - line.gross_deduction + line.allowance + line.overtime_pay);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// The Monday beginning the week.
    pub week_start: NaiveDate,
    /// Hours worked in the week.
    pub hours_worked: Decimal,
    /// Hourly rate times hours worked.
    pub gross_pay: Decimal,
    /// Gross pay less government deductions.
    pub taxable_pay: Decimal,
    /// Weekly social-insurance deduction.
    pub social_insurance: Decimal,
    /// Weekly housing-fund deduction.
    pub housing_fund: Decimal,
    /// Weekly health-insurance deduction.
    pub health_insurance: Decimal,
    /// Weekly withholding tax.
    pub withholding_tax: Decimal,
    /// Government deductions plus withholding tax.
    pub gross_deduction: Decimal,
    /// Overtime premium pay.
    pub overtime_pay: Decimal,
    /// Take-home pay; negative when deductions exceed earnings.
    pub net_pay: Decimal,
    /// Social insurance plus health insurance plus housing fund.
    pub government_deduction: Decimal,
    /// Weekly share of the fixed allowances.
    pub allowance: Decimal,
    /// Overtime hours in the week.
    pub overtime_hours: Decimal,
}

/// The payroll lines of one employee for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPayroll {
    /// The calendar month of the week-starts below.
    pub month: PayMonth,
    /// Monthly statutory deductions the weekly amounts were derived from.
    pub monthly_deductions: DeductionAmounts,
    /// Payroll lines sorted by week-start ascending.
    pub lines: Vec<PayrollLine>,
    /// How the monthly deductions were derived.
    pub audit_steps: Vec<AuditStep>,
}

impl MonthlyPayroll {
    /// Sum of net pay over the month's lines.
    pub fn net_pay_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.net_pay).sum()
    }
}

/// All payroll of one employee in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayroll {
    /// Identifier of the employee.
    pub employee_id: String,
    /// Name shown on the ledger.
    pub employee_name: String,
    /// Months sorted ascending.
    pub months: Vec<MonthlyPayroll>,
}

impl EmployeePayroll {
    /// Iterates over every payroll line in chronological order.
    pub fn lines(&self) -> impl Iterator<Item = &PayrollLine> {
        self.months.iter().flat_map(|m| m.lines.iter())
    }
}

/// A single step in the audit trail recording a derivation.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The schedule table or policy the rule comes from.
    pub schedule_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// How serious a warning is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational; output is unaffected.
    Low,
    /// A value was defaulted; output may be off.
    Medium,
    /// A record was dropped from the run.
    High,
}

/// A warning raised while reading or aggregating input.
///
/// Warnings never abort a run; the affected row or field is skipped or
/// defaulted and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: WarningSeverity,
}

impl PayrollWarning {
    /// Creates a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// The complete result of a payroll run.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollRun;
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let run = PayrollRun {
///     run_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     engine_version: "0.1.0".to_string(),
///     schedule_version: "2023-01-01".to_string(),
///     employees: vec![],
///     warnings: vec![],
///     duration_us: 0,
/// };
/// assert_eq!(run.line_count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run was computed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that computed the run.
    pub engine_version: String,
    /// Version of the statutory schedule configuration.
    pub schedule_version: String,
    /// Employee payrolls in master-data order.
    pub employees: Vec<EmployeePayroll>,
    /// Warnings raised while building the run.
    pub warnings: Vec<PayrollWarning>,
    /// The computation duration in microseconds.
    pub duration_us: u64,
}

impl PayrollRun {
    /// Total number of payroll lines across all employees.
    pub fn line_count(&self) -> usize {
        self.employees.iter().map(|e| e.lines().count()).sum()
    }

    /// Finds the payroll of an employee by id.
    pub fn employee(&self, employee_id: &str) -> Option<&EmployeePayroll> {
        self.employees.iter().find(|e| e.employee_id == employee_id)
    }
}
