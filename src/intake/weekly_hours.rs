//! Pre-aggregated weekly hours intake.

use std::io::Read;
use std::path::Path;

use crate::error::PayrollResult;
use crate::models::WeeklyTimeRecord;

use super::{IntakeReport, open_input, read_rows};

/// Column layout of the weekly hours file.
pub const WEEKLY_HOURS_HEADERS: [&str; 4] =
    ["employee_id", "week_start", "hours_worked", "overtime_hours"];

/// Loads weekly hours from a file.
///
/// # Errors
///
/// `InputNotFound` if the file does not exist, `InputParseError` if it lacks
/// a required column or cannot be decoded.
pub fn load_weekly_hours<P: AsRef<Path>>(path: P) -> PayrollResult<IntakeReport<WeeklyTimeRecord>> {
    let path = path.as_ref();
    read_weekly_hours(open_input(path)?, &path.display().to_string())
}

/// Reads weekly hours from any reader.
///
/// Week-starts are taken as written; the time-log aggregator rejects those
/// that are not Mondays.
pub fn read_weekly_hours<R: Read>(
    reader: R,
    source: &str,
) -> PayrollResult<IntakeReport<WeeklyTimeRecord>> {
    read_rows(reader, source, &WEEKLY_HOURS_HEADERS, |row, report| {
        let employee_id = row.employee_id(report)?;
        let week_start = row.date("week_start", report)?;
        Some(WeeklyTimeRecord {
            employee_id,
            week_start,
            hours_worked: row.decimal_or_zero("hours_worked", report),
            overtime_hours: row.decimal_or_zero("overtime_hours", report),
        })
    })
}
