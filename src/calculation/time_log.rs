//! Aggregation of daily punches into weekly hours.
//!
//! [`TimeLogAggregator`] accumulates punches (and optionally pre-aggregated
//! weekly records) into one bucket per (employee, week-start), then freezes
//! into [`WeeklyHours`] on [`TimeLogAggregator::finish`].

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::config::WorkPolicy;
use crate::models::{PayMonth, PayrollWarning, TimePunch, WarningSeverity, WeeklyTimeRecord};

use super::calculate_daily_hours;

/// Warning code for an imported week whose start is not a Monday.
pub const WARN_NON_MONDAY_WEEK: &str = "NON_MONDAY_WEEK_START";
/// Warning code for an imported week that already exists.
pub const WARN_DUPLICATE_WEEK: &str = "DUPLICATE_WEEK";
/// Warning code for a punch landing in an imported week.
pub const WARN_PUNCH_IN_IMPORTED_WEEK: &str = "PUNCH_IN_IMPORTED_WEEK";
/// Warning code for an imported week with negative hours.
pub const WARN_NEGATIVE_HOURS: &str = "NEGATIVE_HOURS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BucketSource {
    Punches,
    Imported,
}

#[derive(Debug, Clone)]
struct WeekBucket {
    source: BucketSource,
    hours_worked: Decimal,
    overtime_hours: Decimal,
}

/// Consuming accumulator of weekly hours per employee.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::TimeLogAggregator;
/// use payroll_engine::config::WorkPolicy;
/// use payroll_engine::models::TimePunch;
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let policy = WorkPolicy::default();
/// let mut aggregator = TimeLogAggregator::new(&policy);
/// for day in 3..=7 {
///     aggregator.record_punch(&TimePunch {
///         employee_id: "10001".to_string(),
///         date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
///         login: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///         logout: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
///     });
/// }
/// let (weekly, warnings) = aggregator.finish();
/// assert!(warnings.is_empty());
/// assert_eq!(weekly.records_for("10001")[0].hours_worked, Decimal::new(40, 0));
/// ```
#[derive(Debug)]
pub struct TimeLogAggregator<'a> {
    policy: &'a WorkPolicy,
    order: Vec<String>,
    buckets: HashMap<String, BTreeMap<NaiveDate, WeekBucket>>,
    warnings: Vec<PayrollWarning>,
}

impl<'a> TimeLogAggregator<'a> {
    /// Creates an empty aggregator using `policy` for punch clamping.
    pub fn new(policy: &'a WorkPolicy) -> Self {
        Self {
            policy,
            order: Vec::new(),
            buckets: HashMap::new(),
            warnings: Vec::new(),
        }
    }

    fn weeks_of(&mut self, employee_id: &str) -> &mut BTreeMap<NaiveDate, WeekBucket> {
        if !self.buckets.contains_key(employee_id) {
            self.order.push(employee_id.to_string());
        }
        self.buckets.entry(employee_id.to_string()).or_default()
    }

    fn warn(&mut self, code: &str, message: String) {
        tracing::warn!(code, "{}", message);
        self.warnings
            .push(PayrollWarning::new(code, message, WarningSeverity::High));
    }

    /// Adds one day's punch to its (employee, week-start) bucket.
    pub fn record_punch(&mut self, punch: &TimePunch) {
        let daily = calculate_daily_hours(punch, self.policy);
        let existing = self
            .weeks_of(&punch.employee_id)
            .get(&daily.week_start)
            .map(|bucket| bucket.source);

        if existing == Some(BucketSource::Imported) {
            self.warn(
                WARN_PUNCH_IN_IMPORTED_WEEK,
                format!(
                    "Punch for employee {} on {} skipped: week {} was imported as a weekly total",
                    punch.employee_id, punch.date, daily.week_start
                ),
            );
            return;
        }

        let bucket = self
            .weeks_of(&punch.employee_id)
            .entry(daily.week_start)
            .or_insert(WeekBucket {
                source: BucketSource::Punches,
                hours_worked: Decimal::ZERO,
                overtime_hours: Decimal::ZERO,
            });
        bucket.hours_worked += daily.worked_hours;
        bucket.overtime_hours += daily.overtime_hours;
    }

    /// Adds a pre-aggregated weekly record.
    ///
    /// Records not starting on a Monday, carrying negative hours, or
    /// colliding with an existing bucket are skipped with a warning.
    pub fn record_week(&mut self, record: WeeklyTimeRecord) {
        if record.hours_worked < Decimal::ZERO || record.overtime_hours < Decimal::ZERO {
            self.warn(
                WARN_NEGATIVE_HOURS,
                format!(
                    "Weekly record for employee {} skipped: week {} has negative hours ({} worked, {} overtime)",
                    record.employee_id, record.week_start, record.hours_worked, record.overtime_hours
                ),
            );
            return;
        }

        if !record.starts_on_monday() {
            self.warn(
                WARN_NON_MONDAY_WEEK,
                format!(
                    "Weekly record for employee {} skipped: week start {} is not a Monday",
                    record.employee_id, record.week_start
                ),
            );
            return;
        }

        if self
            .weeks_of(&record.employee_id)
            .contains_key(&record.week_start)
        {
            self.warn(
                WARN_DUPLICATE_WEEK,
                format!(
                    "Weekly record for employee {} skipped: week {} already recorded",
                    record.employee_id, record.week_start
                ),
            );
            return;
        }

        let bucket = WeekBucket {
            source: BucketSource::Imported,
            hours_worked: record.hours_worked,
            overtime_hours: record.overtime_hours,
        };
        self.weeks_of(&record.employee_id)
            .insert(record.week_start, bucket);
    }

    /// Freezes the accumulated buckets.
    pub fn finish(mut self) -> (WeeklyHours, Vec<PayrollWarning>) {
        let mut records = HashMap::with_capacity(self.order.len());
        for employee_id in &self.order {
            let weeks = self.buckets.remove(employee_id).unwrap_or_default();
            let list: Vec<WeeklyTimeRecord> = weeks
                .into_iter()
                .map(|(week_start, bucket)| WeeklyTimeRecord {
                    employee_id: employee_id.clone(),
                    week_start,
                    hours_worked: bucket.hours_worked,
                    overtime_hours: bucket.overtime_hours,
                })
                .collect();
            records.insert(employee_id.clone(), list);
        }

        tracing::debug!(
            employees = self.order.len(),
            warnings = self.warnings.len(),
            "aggregated weekly hours"
        );

        (
            WeeklyHours {
                order: self.order,
                records,
            },
            self.warnings,
        )
    }
}

/// Weekly hours per employee, frozen.
///
/// Employees iterate in first-encounter order; each employee's records are
/// sorted by week-start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyHours {
    order: Vec<String>,
    records: HashMap<String, Vec<WeeklyTimeRecord>>,
}

impl WeeklyHours {
    /// Builds weekly hours from pre-aggregated records.
    pub fn from_records(
        records: impl IntoIterator<Item = WeeklyTimeRecord>,
        policy: &WorkPolicy,
    ) -> (Self, Vec<PayrollWarning>) {
        let mut aggregator = TimeLogAggregator::new(policy);
        for record in records {
            aggregator.record_week(record);
        }
        aggregator.finish()
    }

    /// Employee ids in first-encounter order.
    pub fn employee_ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Records of one employee sorted by week-start; empty when unknown.
    pub fn records_for(&self, employee_id: &str) -> &[WeeklyTimeRecord] {
        self.records
            .get(employee_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Records of one employee grouped by the calendar month of the week-start.
    pub fn by_month(&self, employee_id: &str) -> BTreeMap<PayMonth, Vec<&WeeklyTimeRecord>> {
        let mut months: BTreeMap<PayMonth, Vec<&WeeklyTimeRecord>> = BTreeMap::new();
        for record in self.records_for(employee_id) {
            months.entry(record.pay_month()).or_default().push(record);
        }
        months
    }

    /// Every record, employee by employee.
    pub fn records(&self) -> impl Iterator<Item = &WeeklyTimeRecord> {
        self.order.iter().flat_map(|id| self.records_for(id).iter())
    }

    /// Whether the employee has any records.
    pub fn contains(&self, employee_id: &str) -> bool {
        self.records.contains_key(employee_id)
    }

    /// Total number of weekly records.
    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    /// Returns true if there are no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aggregates punches in order into weekly hours.
pub fn aggregate_punches<'p>(
    punches: impl IntoIterator<Item = &'p TimePunch>,
    policy: &WorkPolicy,
) -> (WeeklyHours, Vec<PayrollWarning>) {
    let mut aggregator = TimeLogAggregator::new(policy);
    for punch in punches {
        aggregator.record_punch(punch);
    }
    aggregator.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn make_punch(employee_id: &str, date: &str, login: &str, logout: &str) -> TimePunch {
        TimePunch {
            employee_id: employee_id.to_string(),
            date: make_date(date),
            login: NaiveTime::parse_from_str(login, "%H:%M").unwrap(),
            logout: NaiveTime::parse_from_str(logout, "%H:%M").unwrap(),
        }
    }

    fn make_week(employee_id: &str, week_start: &str, hours: &str, overtime: &str) -> WeeklyTimeRecord {
        WeeklyTimeRecord {
            employee_id: employee_id.to_string(),
            week_start: make_date(week_start),
            hours_worked: dec(hours),
            overtime_hours: dec(overtime),
        }
    }

    #[test]
    fn test_full_week_of_punches() {
        let punches: Vec<TimePunch> = (3..=7)
            .map(|d| make_punch("10001", &format!("2024-06-{:02}", d), "08:00", "17:00"))
            .collect();
        let (weekly, warnings) = aggregate_punches(&punches, &WorkPolicy::default());

        assert!(warnings.is_empty());
        let records = weekly.records_for("10001");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].week_start, make_date("2024-06-03"));
        assert_eq!(records[0].hours_worked, dec("40"));
        assert_eq!(records[0].overtime_hours, Decimal::ZERO);
    }

    #[test]
    fn test_overtime_accumulates_only_for_eligible_days() {
        let punches = vec![
            make_punch("10001", "2024-06-03", "08:00", "19:00"),
            make_punch("10001", "2024-06-04", "08:30", "19:00"),
        ];
        let (weekly, _) = aggregate_punches(&punches, &WorkPolicy::default());

        let record = &weekly.records_for("10001")[0];
        assert_eq!(record.overtime_hours, dec("2"));
        assert_eq!(record.hours_worked, dec("15.5"));
    }

    #[test]
    fn test_records_sorted_by_week_even_if_punches_are_not() {
        let punches = vec![
            make_punch("10001", "2024-06-12", "08:00", "17:00"),
            make_punch("10001", "2024-06-04", "08:00", "17:00"),
        ];
        let (weekly, _) = aggregate_punches(&punches, &WorkPolicy::default());

        let weeks: Vec<NaiveDate> = weekly.records_for("10001").iter().map(|r| r.week_start).collect();
        assert_eq!(weeks, vec![make_date("2024-06-03"), make_date("2024-06-10")]);
    }

    #[test]
    fn test_employees_keep_encounter_order() {
        let punches = vec![
            make_punch("10002", "2024-06-03", "08:00", "17:00"),
            make_punch("10001", "2024-06-03", "08:00", "17:00"),
            make_punch("10002", "2024-06-04", "08:00", "17:00"),
        ];
        let (weekly, _) = aggregate_punches(&punches, &WorkPolicy::default());

        let ids: Vec<&str> = weekly.employee_ids().collect();
        assert_eq!(ids, vec!["10002", "10001"]);
        assert_eq!(weekly.len(), 2);
    }

    #[test]
    fn test_by_month_groups_on_week_start() {
        let punches = vec![
            make_punch("10001", "2024-05-31", "08:00", "17:00"),
            make_punch("10001", "2024-06-01", "08:00", "17:00"),
            make_punch("10001", "2024-06-03", "08:00", "17:00"),
        ];
        let (weekly, _) = aggregate_punches(&punches, &WorkPolicy::default());
        let months = weekly.by_month("10001");

        let keys: Vec<String> = months.keys().map(|m| m.to_string()).collect();
        assert_eq!(keys, vec!["2024-05", "2024-06"]);
        assert_eq!(months.values().next().unwrap()[0].hours_worked, dec("16"));
    }

    #[test]
    fn test_imported_non_monday_week_is_skipped() {
        let (weekly, warnings) = WeeklyHours::from_records(
            vec![make_week("10001", "2024-06-04", "40", "0")],
            &WorkPolicy::default(),
        );

        assert!(weekly.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WARN_NON_MONDAY_WEEK);
    }

    #[test]
    fn test_imported_week_with_negative_hours_is_skipped() {
        let (weekly, warnings) = WeeklyHours::from_records(
            vec![make_week("10001", "2024-06-03", "-40", "0")],
            &WorkPolicy::default(),
        );

        assert!(weekly.is_empty());
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WARN_NEGATIVE_HOURS);
    }

    #[test]
    fn test_duplicate_imported_week_keeps_first() {
        let (weekly, warnings) = WeeklyHours::from_records(
            vec![
                make_week("10001", "2024-06-03", "40", "0"),
                make_week("10001", "2024-06-03", "12", "0"),
            ],
            &WorkPolicy::default(),
        );

        assert_eq!(weekly.records_for("10001")[0].hours_worked, dec("40"));
        assert_eq!(warnings[0].code, WARN_DUPLICATE_WEEK);
    }

    #[test]
    fn test_punch_into_imported_week_is_skipped() {
        let policy = WorkPolicy::default();
        let mut aggregator = TimeLogAggregator::new(&policy);
        aggregator.record_week(make_week("10001", "2024-06-03", "32", "1.5"));
        aggregator.record_punch(&make_punch("10001", "2024-06-05", "08:00", "17:00"));
        aggregator.record_punch(&make_punch("10001", "2024-06-10", "08:00", "17:00"));
        let (weekly, warnings) = aggregator.finish();

        let records = weekly.records_for("10001");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].hours_worked, dec("32"));
        assert_eq!(records[0].overtime_hours, dec("1.5"));
        assert_eq!(records[1].hours_worked, dec("8"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, WARN_PUNCH_IN_IMPORTED_WEEK);
    }

    #[test]
    fn test_imported_week_colliding_with_punches_is_skipped() {
        let policy = WorkPolicy::default();
        let mut aggregator = TimeLogAggregator::new(&policy);
        aggregator.record_punch(&make_punch("10001", "2024-06-05", "08:00", "17:00"));
        aggregator.record_week(make_week("10001", "2024-06-03", "40", "0"));
        let (weekly, warnings) = aggregator.finish();

        assert_eq!(weekly.records_for("10001")[0].hours_worked, dec("8"));
        assert_eq!(warnings[0].code, WARN_DUPLICATE_WEEK);
    }

    #[test]
    fn test_unknown_employee_has_no_records() {
        let weekly = WeeklyHours::default();
        assert!(weekly.records_for("missing").is_empty());
        assert!(weekly.by_month("missing").is_empty());
        assert!(!weekly.contains("missing"));
    }
}
