//! Employee master data intake.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::PayrollResult;
use crate::models::{Allowances, DeductionOverride, Employee, WarningSeverity};

use super::{IntakeReport, Row, open_input, read_rows};

/// Column layout of the employee master file.
pub const EMPLOYEE_HEADERS: [&str; 10] = [
    "employee_id",
    "last_name",
    "first_name",
    "monthly_base_rate",
    "hourly_rate",
    "government_deduction",
    "gross_deduction",
    "rice_allowance",
    "phone_allowance",
    "clothing_allowance",
];

const REQUIRED: [&str; 5] = [
    "employee_id",
    "last_name",
    "first_name",
    "monthly_base_rate",
    "hourly_rate",
];

/// Warning code for a repeated employee id in the master file.
const WARN_DUPLICATE_EMPLOYEE: &str = "DUPLICATE_EMPLOYEE";

/// Loads employee master data from a file.
///
/// # Errors
///
/// `InputNotFound` if the file does not exist, `InputParseError` if it lacks
/// a required column or cannot be decoded.
pub fn load_employees<P: AsRef<Path>>(path: P) -> PayrollResult<IntakeReport<Employee>> {
    let path = path.as_ref();
    read_employees(open_input(path)?, &path.display().to_string())
}

/// Reads employee master data from any reader.
///
/// Repeated employee ids keep the first row. The deduction override is set
/// only when `government_deduction` or `gross_deduction` has a value.
///
/// # Example
///
/// ```
/// use payroll_engine::intake::read_employees;
///
/// let data = "employee_id,last_name,first_name,monthly_base_rate,hourly_rate\n\
///             10001,Garcia,Manuel,90000,535.71\n";
/// let report = read_employees(data.as_bytes(), "inline").unwrap();
/// assert_eq!(report.records[0].display_name(), "Manuel Garcia");
/// ```
pub fn read_employees<R: Read>(reader: R, source: &str) -> PayrollResult<IntakeReport<Employee>> {
    let mut seen = HashSet::new();
    read_rows(reader, source, &REQUIRED, |row, report| {
        let id = row.employee_id(report)?;
        if !seen.insert(id.clone()) {
            report.warn(
                WARN_DUPLICATE_EMPLOYEE,
                format!(
                    "Line {}: employee {} already loaded; row skipped",
                    row.line, id
                ),
                WarningSeverity::High,
            );
            return None;
        }
        Some(parse_employee(id, row, report))
    })
}

fn parse_employee(id: String, row: &Row<'_>, report: &mut IntakeReport<Employee>) -> Employee {
    let deduction_override =
        if row.field("government_deduction").is_empty() && row.field("gross_deduction").is_empty() {
            None
        } else {
            Some(DeductionOverride {
                government: row.decimal_or_zero("government_deduction", report),
                gross: row.decimal_or_zero("gross_deduction", report),
            })
        };

    Employee {
        id,
        last_name: row.field("last_name").to_string(),
        first_name: row.field("first_name").to_string(),
        hourly_rate: row.decimal_or_zero("hourly_rate", report),
        monthly_base_rate: row.decimal_or_zero("monthly_base_rate", report),
        allowances: Allowances {
            rice: row.decimal_or_zero("rice_allowance", report),
            phone: row.decimal_or_zero("phone_allowance", report),
            clothing: row.decimal_or_zero("clothing_allowance", report),
        },
        deduction_override,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PayrollError;
    use crate::intake::{WARN_INVALID_NUMBER, WARN_MISSING_EMPLOYEE_ID, WARN_SHORT_ROW};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const HEADER: &str = "employee_id,last_name,first_name,monthly_base_rate,hourly_rate,government_deduction,gross_deduction,rice_allowance,phone_allowance,clothing_allowance";

    fn read(rows: &[&str]) -> IntakeReport<Employee> {
        let data = format!("{}\n{}\n", HEADER, rows.join("\n"));
        read_employees(data.as_bytes(), "employees.csv").unwrap()
    }

    #[test]
    fn test_full_row() {
        let report = read(&["10001, Garcia ,Manuel,\"90,000\",535.71,,,1500,2000,1000"]);

        assert!(report.warnings.is_empty());
        let employee = &report.records[0];
        assert_eq!(employee.id, "10001");
        assert_eq!(employee.last_name, "Garcia");
        assert_eq!(employee.monthly_base_rate, dec("90000"));
        assert_eq!(employee.hourly_rate, dec("535.71"));
        assert_eq!(employee.allowances.total(), Some(dec("4500")));
        assert!(employee.deduction_override.is_none());
    }

    #[test]
    fn test_deduction_override() {
        let report = read(&["10002,Lim,Antonio,60000,357.14,650,2100,1500,1000,1000"]);

        let overrides = report.records[0].deduction_override.unwrap();
        assert_eq!(overrides.government, dec("650"));
        assert_eq!(overrides.gross, dec("2100"));
    }

    #[test]
    fn test_unparseable_number_defaults_to_zero() {
        let report = read(&["10003,Aquino,Bianca,sixty,255.80,,,1500,1000,1000"]);

        assert_eq!(report.records[0].monthly_base_rate, Decimal::ZERO);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, WARN_INVALID_NUMBER);
        assert_eq!(report.warnings[0].severity, WarningSeverity::Low);
    }

    #[test]
    fn test_duplicate_and_blank_ids_are_skipped() {
        let report = read(&[
            "10001,Garcia,Manuel,90000,535.71,,,1500,2000,1000",
            "10001,Garcia,Manuel,1,1,,,0,0,0",
            ",Nobody,Here,1,1,,,0,0,0",
        ]);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].monthly_base_rate, dec("90000"));
        let codes: Vec<&str> = report.warnings.iter().map(|w| w.code.as_str()).collect();
        assert_eq!(codes, vec![WARN_DUPLICATE_EMPLOYEE, WARN_MISSING_EMPLOYEE_ID]);
    }

    #[test]
    fn test_short_row_skipped() {
        let report = read(&["10004,Reyes,Isabella,52670"]);
        assert!(report.records.is_empty());
        assert_eq!(report.warnings[0].code, WARN_SHORT_ROW);
    }

    #[test]
    fn test_optional_columns_may_be_absent() {
        let data = "employee_id,last_name,first_name,monthly_base_rate,hourly_rate\n\
                    10005,Hernandez,Eduard,52670,313.51\n";
        let report = read_employees(data.as_bytes(), "inline").unwrap();
        assert_eq!(report.records[0].allowances, Allowances::default());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        match load_employees("/nonexistent/employees.csv") {
            Err(PayrollError::InputNotFound { path }) => assert!(path.ends_with("employees.csv")),
            other => panic!("Expected InputNotFound, got {:?}", other),
        }
    }
}
