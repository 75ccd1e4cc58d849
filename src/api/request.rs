//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the `/payroll` and
//! `/deductions` endpoints.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Allowances, DeductionOverride, Employee, TimePunch, WeeklyTimeRecord};

/// Request body for the `/payroll` endpoint.
///
/// Time data may be supplied as raw punches, as pre-aggregated weekly
/// records, or both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRequest {
    /// Employee master data, in ledger order.
    pub employees: Vec<EmployeeRequest>,
    /// Daily punches.
    #[serde(default)]
    pub punches: Vec<PunchRequest>,
    /// Pre-aggregated weekly hours.
    #[serde(default)]
    pub weekly_records: Vec<WeeklyRecordRequest>,
}

impl PayrollRequest {
    /// Rejects negative rates, allowances, overrides and hours.
    ///
    /// Returns a message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        for employee in &self.employees {
            let mut fields = vec![
                ("hourly_rate", employee.hourly_rate),
                ("monthly_base_rate", employee.monthly_base_rate),
                ("allowances.rice", employee.allowances.rice),
                ("allowances.phone", employee.allowances.phone),
                ("allowances.clothing", employee.allowances.clothing),
            ];
            if let Some(deduction) = &employee.deduction_override {
                fields.push(("deduction_override.government", deduction.government));
                fields.push(("deduction_override.gross", deduction.gross));
            }
            check_non_negative(&format!("employee {}", employee.id), &fields)?;
        }
        for record in &self.weekly_records {
            check_non_negative(
                &format!("weekly record {} {}", record.employee_id, record.week_start),
                &[
                    ("hours_worked", record.hours_worked),
                    ("overtime_hours", record.overtime_hours),
                ],
            )?;
        }
        Ok(())
    }
}

fn check_non_negative(owner: &str, fields: &[(&str, Decimal)]) -> Result<(), String> {
    match fields.iter().find(|(_, value)| *value < Decimal::ZERO) {
        Some((name, value)) => Err(format!("{}: {} must not be negative, got {}", owner, name, value)),
        None => Ok(()),
    }
}

/// Employee information in a payroll request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier for the employee.
    pub id: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Rate paid per hour worked.
    pub hourly_rate: Decimal,
    /// Monthly base salary.
    pub monthly_base_rate: Decimal,
    /// Fixed monthly allowances.
    #[serde(default)]
    pub allowances: Allowances,
    /// Optional precomputed weekly deduction totals.
    #[serde(default)]
    pub deduction_override: Option<DeductionOverride>,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            last_name: req.last_name,
            first_name: req.first_name,
            hourly_rate: req.hourly_rate,
            monthly_base_rate: req.monthly_base_rate,
            allowances: req.allowances,
            deduction_override: req.deduction_override,
        }
    }
}

/// A daily punch in a payroll request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// Identifier of the employee who punched.
    pub employee_id: String,
    /// The calendar date of the punch.
    pub date: NaiveDate,
    /// Login time (e.g., "08:00:00").
    pub login: NaiveTime,
    /// Logout time (e.g., "17:00:00").
    pub logout: NaiveTime,
}

impl From<PunchRequest> for TimePunch {
    fn from(req: PunchRequest) -> Self {
        TimePunch {
            employee_id: req.employee_id,
            date: req.date,
            login: req.login,
            logout: req.logout,
        }
    }
}

/// A pre-aggregated week in a payroll request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyRecordRequest {
    /// Identifier of the employee.
    pub employee_id: String,
    /// The Monday beginning the week.
    pub week_start: NaiveDate,
    /// Hours worked in the week.
    pub hours_worked: Decimal,
    /// Overtime hours in the week.
    #[serde(default)]
    pub overtime_hours: Decimal,
}

impl From<WeeklyRecordRequest> for WeeklyTimeRecord {
    fn from(req: WeeklyRecordRequest) -> Self {
        WeeklyTimeRecord {
            employee_id: req.employee_id,
            week_start: req.week_start,
            hours_worked: req.hours_worked,
            overtime_hours: req.overtime_hours,
        }
    }
}

/// Request body for the `/deductions` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeductionsRequest {
    /// Monthly base salary.
    pub monthly_base_rate: Decimal,
    /// Date used to select the statutory schedule.
    pub effective_date: NaiveDate,
}

impl DeductionsRequest {
    /// Rejects a negative salary.
    pub fn validate(&self) -> Result<(), String> {
        check_non_negative("request", &[("monthly_base_rate", self.monthly_base_rate)])
    }
}
