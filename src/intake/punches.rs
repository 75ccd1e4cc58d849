//! Attendance punch intake.

use std::io::Read;
use std::path::Path;

use crate::error::PayrollResult;
use crate::models::TimePunch;

use super::{IntakeReport, open_input, read_rows};

/// Column layout of the punch file.
pub const PUNCH_HEADERS: [&str; 6] = [
    "employee_id",
    "last_name",
    "first_name",
    "date",
    "login",
    "logout",
];

const REQUIRED: [&str; 4] = ["employee_id", "date", "login", "logout"];

/// Loads punches from a file.
///
/// # Errors
///
/// `InputNotFound` if the file does not exist, `InputParseError` if it lacks
/// a required column or cannot be decoded.
pub fn load_punches<P: AsRef<Path>>(path: P) -> PayrollResult<IntakeReport<TimePunch>> {
    let path = path.as_ref();
    read_punches(open_input(path)?, &path.display().to_string())
}

/// Reads punches from any reader, in file order.
///
/// Rows with an unparseable date or time are skipped with a warning.
///
/// # Example
///
/// ```
/// use payroll_engine::intake::read_punches;
///
/// let data = "employee_id,last_name,first_name,date,login,logout\n\
///             10001,Garcia,Manuel,6/3/2024,8:59,18:31\n";
/// let report = read_punches(data.as_bytes(), "inline").unwrap();
/// assert_eq!(report.records[0].date.to_string(), "2024-06-03");
/// ```
pub fn read_punches<R: Read>(reader: R, source: &str) -> PayrollResult<IntakeReport<TimePunch>> {
    read_rows(reader, source, &REQUIRED, |row, report| {
        let employee_id = row.employee_id(report)?;
        let date = row.date("date", report)?;
        let login = row.time("login", report)?;
        let logout = row.time("logout", report)?;
        Some(TimePunch {
            employee_id,
            date,
            login,
            logout,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayrollError;
    use crate::intake::{WARN_INVALID_DATE, WARN_INVALID_TIME};
    use chrono::NaiveTime;

    const HEADER: &str = "employee_id,last_name,first_name,date,login,logout";

    fn read(rows: &[&str]) -> IntakeReport<TimePunch> {
        let data = format!("{}\n{}\n", HEADER, rows.join("\n"));
        read_punches(data.as_bytes(), "punches.csv").unwrap()
    }

    #[test]
    fn test_reads_both_date_and_time_styles() {
        let report = read(&[
            "10001,Garcia,Manuel,2024-06-03,08:59,18:31",
            "10001,Garcia,Manuel,6/4/2024,8:05 AM,5:00 PM",
        ]);

        assert!(report.warnings.is_empty());
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[1].login, NaiveTime::from_hms_opt(8, 5, 0).unwrap());
        assert_eq!(report.records[1].logout, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
    }

    #[test]
    fn test_keeps_file_order() {
        let report = read(&[
            "10002,Lim,Antonio,2024-06-04,08:00,17:00",
            "10001,Garcia,Manuel,2024-06-03,08:00,17:00",
        ]);
        let ids: Vec<&str> = report.records.iter().map(|p| p.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["10002", "10001"]);
    }

    #[test]
    fn test_bad_date_and_time_skip_row() {
        let report = read(&[
            "10001,Garcia,Manuel,2024-13-40,08:00,17:00",
            "10001,Garcia,Manuel,2024-06-03,morning,17:00",
            "10001,Garcia,Manuel,2024-06-04,08:00,17:00",
        ]);

        assert_eq!(report.records.len(), 1);
        let codes: Vec<&str> = report.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec![WARN_INVALID_DATE, WARN_INVALID_TIME]);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load_punches("/nonexistent/punches.csv"),
            Err(PayrollError::InputNotFound { .. })
        ));
    }
}
