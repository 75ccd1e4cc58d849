//! Payroll run aggregation.
//!
//! [`PayrollAggregator`] walks the employee master data in order, computes
//! the statutory deductions once per (employee, month) with the schedule in
//! effect on the first day of that month, and builds one payroll line per
//! weekly record.

use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ConfigLoader;
use crate::error::PayrollResult;
use crate::models::{
    Employee, EmployeePayroll, MonthlyPayroll, PayrollRun, PayrollWarning, TimePunch,
    WarningSeverity, WeeklyTimeRecord,
};

use super::{TimeLogAggregator, WeeklyHours, calculate_payroll_line, calculate_statutory_deductions};

/// Warning code for time records of an employee missing from master data.
pub const WARN_UNKNOWN_EMPLOYEE: &str = "UNKNOWN_EMPLOYEE";
/// Warning code for a master employee without time records.
pub const WARN_NO_TIME_RECORDS: &str = "NO_TIME_RECORDS";
/// Warning code for a repeated employee id in master data.
pub const WARN_DUPLICATE_EMPLOYEE: &str = "DUPLICATE_EMPLOYEE";

/// Builds payroll runs against a loaded configuration.
#[derive(Debug, Clone, Copy)]
pub struct PayrollAggregator<'a> {
    config: &'a ConfigLoader,
}

impl<'a> PayrollAggregator<'a> {
    /// Creates an aggregator using `config` for schedules and work policy.
    pub fn new(config: &'a ConfigLoader) -> Self {
        Self { config }
    }

    /// Builds the payroll of one employee from their weekly records.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleNotFound` when no statutory schedule is in effect on
    /// the first day of a month the employee has records in, and
    /// `CalculationError` when a line's amounts leave the decimal range.
    pub fn employee_payroll(
        &self,
        employee: &Employee,
        weekly: &WeeklyHours,
    ) -> PayrollResult<EmployeePayroll> {
        let policy = self.config.work_policy();
        let mut months = Vec::new();

        for (month, records) in weekly.by_month(&employee.id) {
            let schedule = self.config.schedule_for(month.first_day())?;
            let deductions =
                calculate_statutory_deductions(employee.monthly_base_rate, schedule, policy, 1);

            let lines = records
                .into_iter()
                .map(|record| calculate_payroll_line(employee, record, &deductions.weekly, policy))
                .collect::<PayrollResult<Vec<_>>>()?;

            debug!(
                employee_id = %employee.id,
                month = %month,
                weeks = lines.len(),
                "computed monthly payroll"
            );

            months.push(MonthlyPayroll {
                month,
                monthly_deductions: deductions.monthly,
                lines,
                audit_steps: deductions.audit_steps,
            });
        }

        Ok(EmployeePayroll {
            employee_id: employee.id.clone(),
            employee_name: employee.display_name(),
            months,
        })
    }

    /// Builds a payroll run for every employee in master-data order.
    ///
    /// Time records of employees missing from `employees` are excluded with an
    /// `UNKNOWN_EMPLOYEE` warning. Repeated employee ids keep the first entry.
    pub fn run(&self, employees: &[Employee], weekly: &WeeklyHours) -> PayrollResult<PayrollRun> {
        let start_time = Instant::now();
        let mut warnings = Vec::new();
        let mut seen: HashSet<&str> = HashSet::with_capacity(employees.len());
        let mut payrolls = Vec::with_capacity(employees.len());

        for employee in employees {
            if !seen.insert(employee.id.as_str()) {
                warn!(employee_id = %employee.id, "duplicate employee in master data");
                warnings.push(PayrollWarning::new(
                    WARN_DUPLICATE_EMPLOYEE,
                    format!(
                        "Employee {} appears more than once; the first entry is used",
                        employee.id
                    ),
                    WarningSeverity::High,
                ));
                continue;
            }

            if !weekly.contains(&employee.id) {
                warnings.push(PayrollWarning::new(
                    WARN_NO_TIME_RECORDS,
                    format!("Employee {} has no time records", employee.id),
                    WarningSeverity::Low,
                ));
            }

            payrolls.push(self.employee_payroll(employee, weekly)?);
        }

        for employee_id in weekly.employee_ids().filter(|id| !seen.contains(id)) {
            let count = weekly.records_for(employee_id).len();
            warn!(employee_id = %employee_id, records = count, "time records for unknown employee");
            warnings.push(PayrollWarning::new(
                WARN_UNKNOWN_EMPLOYEE,
                format!(
                    "{} weekly record(s) for employee {} excluded: not in master data",
                    count, employee_id
                ),
                WarningSeverity::High,
            ));
        }

        let run = PayrollRun {
            run_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            schedule_version: self.config.metadata().version.clone(),
            employees: payrolls,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        };

        info!(
            run_id = %run.run_id,
            employees = run.employees.len(),
            lines = run.line_count(),
            warnings = run.warnings.len(),
            duration_us = run.duration_us,
            "payroll run completed"
        );

        Ok(run)
    }
}

/// Aggregates punches and pre-aggregated weekly records, then builds the run.
///
/// Warnings from aggregation precede those of the run itself.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::run_payroll;
/// use payroll_engine::config::ConfigLoader;
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
///
/// let run = run_payroll(&employees, &[], weeks, &ConfigLoader::canonical()).unwrap();
/// assert_eq!(run.line_count(), 1);
/// ```
pub fn run_payroll(
    employees: &[Employee],
    punches: &[TimePunch],
    weekly_records: Vec<WeeklyTimeRecord>,
    config: &ConfigLoader,
) -> PayrollResult<PayrollRun> {
    let mut aggregator = TimeLogAggregator::new(config.work_policy());
    for record in weekly_records {
        aggregator.record_week(record);
    }
    for punch in punches {
        aggregator.record_punch(punch);
    }
    let (weekly, mut warnings) = aggregator.finish();

    let mut run = PayrollAggregator::new(config).run(employees, &weekly)?;
    warnings.append(&mut run.warnings);
    run.warnings = warnings;
    Ok(run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PayrollConfig, StatutorySchedule, WorkPolicy};
    use crate::error::PayrollError;
    use crate::models::Allowances;
    use chrono::{NaiveDate, NaiveTime};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn create_test_employee(id: &str, monthly: &str) -> Employee {
        Employee {
            id: id.to_string(),
            last_name: "Garcia".to_string(),
            first_name: "Manuel".to_string(),
            hourly_rate: dec("100"),
            monthly_base_rate: dec(monthly),
            allowances: Allowances {
                rice: dec("600"),
                phone: dec("300"),
                clothing: dec("300"),
            },
            deduction_override: None,
        }
    }

    fn make_week(employee_id: &str, week_start: &str, hours: &str) -> WeeklyTimeRecord {
        WeeklyTimeRecord {
            employee_id: employee_id.to_string(),
            week_start: make_date(week_start),
            hours_worked: dec(hours),
            overtime_hours: Decimal::ZERO,
        }
    }

    fn weekly(records: Vec<WeeklyTimeRecord>) -> WeeklyHours {
        WeeklyHours::from_records(records, &WorkPolicy::default()).0
    }

    #[test]
    fn test_lines_grouped_by_month_in_order() {
        let config = ConfigLoader::canonical();
        let hours = weekly(vec![
            make_week("10001", "2024-07-01", "40"),
            make_week("10001", "2024-06-24", "40"),
            make_week("10001", "2024-06-03", "40"),
        ]);

        let run = PayrollAggregator::new(&config)
            .run(&[create_test_employee("10001", "20000")], &hours)
            .unwrap();

        let payroll = run.employee("10001").unwrap();
        let months: Vec<String> = payroll.months.iter().map(|m| m.month.to_string()).collect();
        assert_eq!(months, vec!["2024-06", "2024-07"]);
        assert_eq!(payroll.months[0].lines.len(), 2);
        assert_eq!(payroll.months[0].lines[0].week_start, make_date("2024-06-03"));
        assert_eq!(payroll.months[0].monthly_deductions.social_insurance, dec("900"));
        assert_eq!(payroll.months[0].audit_steps.len(), 5);
    }

    #[test]
    fn test_every_week_of_month_gets_same_deductions() {
        let config = ConfigLoader::canonical();
        let hours = weekly(vec![
            make_week("10001", "2024-06-03", "40"),
            make_week("10001", "2024-06-10", "20"),
        ]);

        let run = PayrollAggregator::new(&config)
            .run(&[create_test_employee("10001", "30000")], &hours)
            .unwrap();
        let lines: Vec<_> = run.employee("10001").unwrap().lines().cloned().collect();

        assert_eq!(lines[0].gross_deduction, lines[1].gross_deduction);
        assert_eq!(lines[0].withholding_tax, dec("458.40"));
    }

    #[test]
    fn test_employees_follow_master_data_order() {
        let config = ConfigLoader::canonical();
        let hours = weekly(vec![
            make_week("10002", "2024-06-03", "40"),
            make_week("10001", "2024-06-03", "40"),
        ]);
        let employees = vec![
            create_test_employee("10001", "20000"),
            create_test_employee("10002", "20000"),
        ];

        let run = PayrollAggregator::new(&config).run(&employees, &hours).unwrap();
        let ids: Vec<&str> = run.employees.iter().map(|e| e.employee_id.as_str()).collect();
        assert_eq!(ids, vec!["10001", "10002"]);
    }

    #[test]
    fn test_unknown_employee_is_excluded_with_warning() {
        let config = ConfigLoader::canonical();
        let hours = weekly(vec![
            make_week("10001", "2024-06-03", "40"),
            make_week("99999", "2024-06-03", "40"),
        ]);

        let run = PayrollAggregator::new(&config)
            .run(&[create_test_employee("10001", "20000")], &hours)
            .unwrap();

        assert_eq!(run.employees.len(), 1);
        assert!(run.employee("99999").is_none());
        let warning = run
            .warnings
            .iter()
            .find(|w| w.code == WARN_UNKNOWN_EMPLOYEE)
            .unwrap();
        assert_eq!(warning.severity, WarningSeverity::High);
        assert!(warning.message.contains("99999"));
    }

    #[test]
    fn test_employee_without_records_has_no_months() {
        let config = ConfigLoader::canonical();
        let run = PayrollAggregator::new(&config)
            .run(&[create_test_employee("10001", "20000")], &WeeklyHours::default())
            .unwrap();

        assert!(run.employee("10001").unwrap().months.is_empty());
        assert_eq!(run.warnings[0].code, WARN_NO_TIME_RECORDS);
        assert_eq!(run.warnings[0].severity, WarningSeverity::Low);
    }

    #[test]
    fn test_duplicate_employee_keeps_first() {
        let config = ConfigLoader::canonical();
        let hours = weekly(vec![make_week("10001", "2024-06-03", "40")]);
        let employees = vec![
            create_test_employee("10001", "20000"),
            create_test_employee("10001", "90000"),
        ];

        let run = PayrollAggregator::new(&config).run(&employees, &hours).unwrap();
        assert_eq!(run.employees.len(), 1);
        assert_eq!(
            run.employees[0].months[0].monthly_deductions.social_insurance,
            dec("900")
        );
        assert!(run.warnings.iter().any(|w| w.code == WARN_DUPLICATE_EMPLOYEE));
    }

    #[test]
    fn test_schedule_selected_by_first_day_of_month() {
        let mut raised = StatutorySchedule::canonical();
        raised.effective_date = make_date("2024-07-01");
        raised.housing_fund.cap = dec("200");
        let config = ConfigLoader::from_config(PayrollConfig::new(
            ConfigLoader::canonical().metadata().clone(),
            WorkPolicy::default(),
            vec![StatutorySchedule::canonical(), raised],
        ));
        let hours = weekly(vec![
            make_week("10001", "2024-06-24", "40"),
            make_week("10001", "2024-07-01", "40"),
        ]);

        let run = PayrollAggregator::new(&config)
            .run(&[create_test_employee("10001", "20000")], &hours)
            .unwrap();
        let months = &run.employee("10001").unwrap().months;
        assert_eq!(months[0].monthly_deductions.housing_fund, dec("100"));
        assert_eq!(months[1].monthly_deductions.housing_fund, dec("200"));
    }

    #[test]
    fn test_month_before_any_schedule_fails() {
        let config = ConfigLoader::canonical();
        let hours = weekly(vec![make_week("10001", "2022-06-06", "40")]);

        let result = PayrollAggregator::new(&config)
            .run(&[create_test_employee("10001", "20000")], &hours);
        match result {
            Err(PayrollError::ScheduleNotFound { date }) => {
                assert_eq!(date, make_date("2022-06-01"));
            }
            other => panic!("Expected ScheduleNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_line_fails_the_run() {
        let config = ConfigLoader::canonical();
        let mut employee = create_test_employee("10001", "20000");
        employee.hourly_rate = dec("10000000000000000000");
        let hours = weekly(vec![make_week("10001", "2024-06-03", "10000000000000")]);

        let result = PayrollAggregator::new(&config).run(&[employee], &hours);
        assert!(matches!(result, Err(PayrollError::CalculationError { .. })));
    }

    #[test]
    fn test_run_payroll_merges_punches_and_weeks() {
        let config = ConfigLoader::canonical();
        let punches: Vec<TimePunch> = (10..=14)
            .map(|d| TimePunch {
                employee_id: "10001".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 6, d).unwrap(),
                login: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
                logout: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            })
            .collect();
        let weeks = vec![
            make_week("10001", "2024-06-03", "32"),
            make_week("10001", "2024-06-05", "8"),
        ];

        let run = run_payroll(
            &[create_test_employee("10001", "20000")],
            &punches,
            weeks,
            &config,
        )
        .unwrap();

        let hours: Vec<Decimal> = run
            .employee("10001")
            .unwrap()
            .lines()
            .map(|l| l.hours_worked)
            .collect();
        assert_eq!(hours, vec![dec("32"), dec("40")]);
        assert_eq!(run.warnings[0].code, crate::calculation::WARN_NON_MONDAY_WEEK);
    }
}
