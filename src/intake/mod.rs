//! Delimited-file intake and export.
//!
//! Every input file has a header row; columns are matched by name, values are
//! trimmed, and rows shorter than the header are skipped with a warning. A
//! bad row never aborts a load: it is skipped or defaulted and recorded as a
//! [`PayrollWarning`]. Only an absent or unreadable file is an error.
//!
//! | File | Columns |
//! |------|---------|
//! | employees | `employee_id,last_name,first_name,monthly_base_rate,hourly_rate,government_deduction,gross_deduction,rice_allowance,phone_allowance,clothing_allowance` |
//! | punches | `employee_id,last_name,first_name,date,login,logout` |
//! | weekly hours | `employee_id,week_start,hours_worked,overtime_hours` |

mod employees;
mod export;
mod punches;
mod weekly_hours;

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use tracing::warn;

use crate::error::{PayrollError, PayrollResult};
use crate::models::{PayrollWarning, WarningSeverity};

pub use employees::{EMPLOYEE_HEADERS, load_employees, read_employees};
pub use export::{
    LEDGER_HEADERS, export_payroll_ledger, export_weekly_hours, write_payroll_ledger,
    write_weekly_hours,
};
pub use punches::{PUNCH_HEADERS, load_punches, read_punches};
pub use weekly_hours::{WEEKLY_HOURS_HEADERS, load_weekly_hours, read_weekly_hours};

/// Warning code for a row with fewer fields than the header.
pub const WARN_SHORT_ROW: &str = "SHORT_ROW";
/// Warning code for a numeric field that could not be parsed.
pub const WARN_INVALID_NUMBER: &str = "INVALID_NUMBER";
/// Warning code for a date field that could not be parsed.
pub const WARN_INVALID_DATE: &str = "INVALID_DATE";
/// Warning code for a time field that could not be parsed.
pub const WARN_INVALID_TIME: &str = "INVALID_TIME";
/// Warning code for a row without an employee id.
pub const WARN_MISSING_EMPLOYEE_ID: &str = "MISSING_EMPLOYEE_ID";
/// Warning code for a row the CSV decoder rejected (e.g. invalid UTF-8).
pub const WARN_MALFORMED_ROW: &str = "MALFORMED_ROW";
/// Warning code for a negative numeric field.
pub const WARN_NEGATIVE_NUMBER: &str = "NEGATIVE_NUMBER";

/// Records read from one input file, with the warnings raised doing so.
#[derive(Debug, Clone, PartialEq)]
pub struct IntakeReport<T> {
    /// Rows that were accepted, in file order.
    pub records: Vec<T>,
    /// One warning per skipped row or defaulted field.
    pub warnings: Vec<PayrollWarning>,
}

impl<T> Default for IntakeReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> IntakeReport<T> {
    fn warn(&mut self, code: &str, message: String, severity: WarningSeverity) {
        warn!(code, "{}", message);
        self.warnings.push(PayrollWarning::new(code, message, severity));
    }
}

/// Opens an input file, mapping absence to `InputNotFound`.
fn open_input(path: &Path) -> PayrollResult<File> {
    File::open(path).map_err(|_| PayrollError::InputNotFound {
        path: path.display().to_string(),
    })
}

/// One row of a delimited file, addressed by column name.
struct Row<'a> {
    record: &'a StringRecord,
    columns: &'a HashMap<String, usize>,
    line: u64,
}

impl Row<'_> {
    /// The trimmed value of a column; empty when the column is absent.
    fn field(&self, column: &str) -> &str {
        self.columns
            .get(column)
            .and_then(|&i| self.record.get(i))
            .unwrap_or("")
    }

    /// Parses a decimal column; empty, unparseable or negative values become
    /// zero.
    ///
    /// Unparseable values raise a low-severity warning, negative ones a
    /// medium-severity warning.
    fn decimal_or_zero<T>(&self, column: &str, report: &mut IntakeReport<T>) -> Decimal {
        let value = self.field(column);
        if value.is_empty() {
            return Decimal::ZERO;
        }
        match parse_decimal(value) {
            Some(parsed) if parsed.is_sign_negative() && !parsed.is_zero() => {
                report.warn(
                    WARN_NEGATIVE_NUMBER,
                    format!(
                        "Line {}: {} '{}' is negative; using 0",
                        self.line, column, value
                    ),
                    WarningSeverity::Medium,
                );
                Decimal::ZERO
            }
            Some(parsed) => parsed,
            None => {
                report.warn(
                    WARN_INVALID_NUMBER,
                    format!(
                        "Line {}: {} '{}' is not a number; using 0",
                        self.line, column, value
                    ),
                    WarningSeverity::Low,
                );
                Decimal::ZERO
            }
        }
    }

    /// Parses a date column, skipping the row with a warning on failure.
    fn date<T>(&self, column: &str, report: &mut IntakeReport<T>) -> Option<NaiveDate> {
        let value = self.field(column);
        let parsed = parse_date(value);
        if parsed.is_none() {
            report.warn(
                WARN_INVALID_DATE,
                format!("Line {}: {} '{}' is not a date; row skipped", self.line, column, value),
                WarningSeverity::High,
            );
        }
        parsed
    }

    /// Parses a time column, skipping the row with a warning on failure.
    fn time<T>(&self, column: &str, report: &mut IntakeReport<T>) -> Option<NaiveTime> {
        let value = self.field(column);
        let parsed = parse_time(value);
        if parsed.is_none() {
            report.warn(
                WARN_INVALID_TIME,
                format!("Line {}: {} '{}' is not a time; row skipped", self.line, column, value),
                WarningSeverity::High,
            );
        }
        parsed
    }

    /// The employee id, or `None` with a warning when it is blank.
    fn employee_id<T>(&self, report: &mut IntakeReport<T>) -> Option<String> {
        let id = self.field("employee_id");
        if id.is_empty() {
            report.warn(
                WARN_MISSING_EMPLOYEE_ID,
                format!("Line {}: employee_id is empty; row skipped", self.line),
                WarningSeverity::High,
            );
            return None;
        }
        Some(id.to_string())
    }
}

/// Reads every row of a delimited file and hands well-formed rows to `parse_row`.
///
/// Fails with `InputParseError` when the header cannot be read or lacks a
/// required column, or when the underlying reader fails. Rows the decoder
/// rejects are skipped with a warning.
fn read_rows<R, T, F>(
    reader: R,
    source: &str,
    required: &[&str],
    mut parse_row: F,
) -> PayrollResult<IntakeReport<T>>
where
    R: Read,
    F: FnMut(&Row<'_>, &mut IntakeReport<T>) -> Option<T>,
{
    let parse_error = |message: String| PayrollError::InputParseError {
        path: source.to_string(),
        message,
    };

    let mut csv_reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| parse_error(e.to_string()))?
        .clone();
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect();

    if let Some(missing) = required.iter().find(|c| !columns.contains_key(**c)) {
        return Err(parse_error(format!("missing required column '{}'", missing)));
    }

    let mut report = IntakeReport::default();
    for result in csv_reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                return Err(parse_error(err.to_string()));
            }
            Err(err) => {
                let line = err.position().map(|p| p.line()).unwrap_or(0);
                report.warn(
                    WARN_MALFORMED_ROW,
                    format!("Line {}: {}; row skipped", line, err),
                    WarningSeverity::High,
                );
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < headers.len() {
            report.warn(
                WARN_SHORT_ROW,
                format!(
                    "Line {}: expected {} fields, found {}; row skipped",
                    line,
                    headers.len(),
                    record.len()
                ),
                WarningSeverity::High,
            );
            continue;
        }

        let row = Row {
            record: &record,
            columns: &columns,
            line,
        };
        if let Some(parsed) = parse_row(&row, &mut report) {
            report.records.push(parsed);
        }
    }

    tracing::debug!(
        source,
        records = report.records.len(),
        warnings = report.warnings.len(),
        "read input file"
    );
    Ok(report)
}

/// Parses a decimal, tolerating thousands separators.
fn parse_decimal(value: &str) -> Option<Decimal> {
    value.replace(',', "").parse::<Decimal>().ok()
}

/// Parses `YYYY-MM-DD` or `M/D/YYYY`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", "%m/%d/%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

/// Parses `HH:MM[:SS]` or `h:mm[:ss] AM/PM`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    ["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}
