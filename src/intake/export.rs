//! CSV export of weekly hours and payroll ledgers.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::calculation::{WeeklyHours, round_currency};
use crate::error::{PayrollError, PayrollResult};
use crate::models::PayrollRun;

use super::WEEKLY_HOURS_HEADERS;

/// Column layout of the payroll ledger export.
pub const LEDGER_HEADERS: [&str; 14] = [
    "employee_id",
    "employee_name",
    "month",
    "week_start",
    "hours_worked",
    "gross_pay",
    "taxable_pay",
    "social_insurance",
    "housing_fund",
    "health_insurance",
    "withholding_tax",
    "gross_deduction",
    "overtime_pay",
    "net_pay",
];

#[derive(Debug, Serialize)]
struct WeeklyHoursRow<'a> {
    employee_id: &'a str,
    week_start: String,
    hours_worked: String,
    overtime_hours: String,
}

#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    employee_id: &'a str,
    employee_name: &'a str,
    month: String,
    week_start: String,
    hours_worked: String,
    gross_pay: String,
    taxable_pay: String,
    social_insurance: String,
    housing_fund: String,
    health_insurance: String,
    withholding_tax: String,
    gross_deduction: String,
    overtime_pay: String,
    net_pay: String,
}

fn money(value: Decimal) -> String {
    format!("{:.2}", round_currency(value))
}

fn export_error(target: &str, err: impl std::fmt::Display) -> PayrollError {
    PayrollError::ExportFailed {
        target: target.to_string(),
        message: err.to_string(),
    }
}

fn create_output(path: &Path) -> PayrollResult<File> {
    File::create(path).map_err(|e| export_error(&path.display().to_string(), e))
}

/// Writes weekly hours in the weekly-hours intake layout.
///
/// Hours keep their full precision so the file reads back unchanged.
pub fn write_weekly_hours<W: Write>(writer: W, weekly: &WeeklyHours, target: &str) -> PayrollResult<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer
        .write_record(WEEKLY_HOURS_HEADERS)
        .map_err(|e| export_error(target, e))?;

    for record in weekly.records() {
        csv_writer
            .serialize(WeeklyHoursRow {
                employee_id: &record.employee_id,
                week_start: record.week_start.to_string(),
                hours_worked: record.hours_worked.normalize().to_string(),
                overtime_hours: record.overtime_hours.normalize().to_string(),
            })
            .map_err(|e| export_error(target, e))?;
    }

    csv_writer.flush().map_err(|e| export_error(target, e))
}

/// Writes weekly hours to a file.
pub fn export_weekly_hours<P: AsRef<Path>>(path: P, weekly: &WeeklyHours) -> PayrollResult<()> {
    let path = path.as_ref();
    let target = path.display().to_string();
    write_weekly_hours(create_output(path)?, weekly, &target)?;
    tracing::info!(path = %target, records = weekly.len(), "exported weekly hours");
    Ok(())
}

/// Writes the payroll ledger: one row per (employee, week), in run order.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::run_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::intake::write_payroll_ledger;
/// use payroll_engine::models::{Allowances, Employee, WeeklyTimeRecord};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employees = vec![Employee {
///     id: "10001".to_string(),
///     last_name: "Garcia".to_string(),
///     first_name: "Manuel".to_string(),
///     hourly_rate: Decimal::new(100, 0),
///     monthly_base_rate: Decimal::new(20000, 0),
///     allowances: Allowances::default(),
///     deduction_override: None,
/// }];
/// let weeks = vec![WeeklyTimeRecord {
///     employee_id: "10001".to_string(),
///     week_start: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     hours_worked: Decimal::new(40, 0),
///     overtime_hours: Decimal::ZERO,
/// }];
/// let run = run_payroll(&employees, &[], weeks, &ConfigLoader::canonical()).unwrap();
///
/// let mut out = Vec::new();
/// write_payroll_ledger(&mut out, &run, "memory").unwrap();
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.lines().nth(1).unwrap().starts_with("10001,Manuel Garcia,2024-06,2024-06-03,40.00,4000.00"));
/// ```
pub fn write_payroll_ledger<W: Write>(writer: W, run: &PayrollRun, target: &str) -> PayrollResult<()> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer
        .write_record(LEDGER_HEADERS)
        .map_err(|e| export_error(target, e))?;

    for employee in &run.employees {
        for month in &employee.months {
            for line in &month.lines {
                csv_writer
                    .serialize(LedgerRow {
                        employee_id: &employee.employee_id,
                        employee_name: &employee.employee_name,
                        month: month.month.to_string(),
                        week_start: line.week_start.to_string(),
                        hours_worked: money(line.hours_worked),
                        gross_pay: money(line.gross_pay),
                        taxable_pay: money(line.taxable_pay),
                        social_insurance: money(line.social_insurance),
                        housing_fund: money(line.housing_fund),
                        health_insurance: money(line.health_insurance),
                        withholding_tax: money(line.withholding_tax),
                        gross_deduction: money(line.gross_deduction),
                        overtime_pay: money(line.overtime_pay),
                        net_pay: money(line.net_pay),
                    })
                    .map_err(|e| export_error(target, e))?;
            }
        }
    }

    csv_writer.flush().map_err(|e| export_error(target, e))
}

/// Writes the payroll ledger to a file.
pub fn export_payroll_ledger<P: AsRef<Path>>(path: P, run: &PayrollRun) -> PayrollResult<()> {
    let path = path.as_ref();
    let target = path.display().to_string();
    write_payroll_ledger(create_output(path)?, run, &target)?;
    tracing::info!(
        path = %target,
        run_id = %run.run_id,
        lines = run.line_count(),
        "exported payroll ledger"
    );
    Ok(())
}
