//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{
    ContributionTable, TaxTable, canonical_social_insurance_table, canonical_withholding_table,
};

/// Metadata about the statutory schedule set.
///
/// Contains identifying information about the schedule, including its
/// code, name, version, and source URL.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleMetadata {
    /// Short code of the schedule set (e.g., "PH_2023").
    pub code: String,
    /// The human-readable name of the schedule set.
    pub name: String,
    /// The version of the schedule set.
    pub version: String,
    /// URL to the official documentation.
    pub source_url: String,
}

/// Working-time rules applied to raw punches and overtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkPolicy {
    /// Start of the paid day; earlier logins are clamped to it.
    pub scheduled_start: NaiveTime,
    /// End of the paid day; later logouts are clamped to it.
    pub scheduled_end: NaiveTime,
    /// Logins strictly before this time keep overtime eligibility.
    pub grace_cutoff: NaiveTime,
    /// Unpaid lunch deducted from each day, in hours.
    pub lunch_hours: Decimal,
    /// Multiplier applied to the hourly rate for overtime.
    pub overtime_premium: Decimal,
    /// Divisor applied to overtime pay.
    pub overtime_day_hours: Decimal,
    /// Number of weeks a monthly amount is spread over.
    pub weeks_per_month: Decimal,
}

impl Default for WorkPolicy {
    fn default() -> Self {
        Self {
            scheduled_start: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            scheduled_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
            grace_cutoff: NaiveTime::from_hms_opt(8, 10, 0).unwrap_or(NaiveTime::MIN),
            lunch_hours: Decimal::ONE,
            overtime_premium: Decimal::new(125, 2),
            overtime_day_hours: Decimal::new(8, 0),
            weeks_per_month: Decimal::new(4, 0),
        }
    }
}

impl WorkPolicy {
    /// Checks the policy for values that would make calculations meaningless.
    pub fn validate(&self) -> Result<(), String> {
        if self.scheduled_start >= self.scheduled_end {
            return Err(format!(
                "scheduled_start {} must be before scheduled_end {}",
                self.scheduled_start, self.scheduled_end
            ));
        }
        if self.weeks_per_month <= Decimal::ZERO {
            return Err("weeks_per_month must be positive".to_string());
        }
        if self.overtime_day_hours <= Decimal::ZERO {
            return Err("overtime_day_hours must be positive".to_string());
        }
        if self.lunch_hours.is_sign_negative() {
            return Err("lunch_hours must not be negative".to_string());
        }
        Ok(())
    }
}

/// Health-insurance premium rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthInsuranceSchedule {
    /// Premium rate applied to the monthly salary.
    pub rate: Decimal,
    /// Minimum monthly premium.
    pub premium_floor: Decimal,
    /// Maximum monthly premium.
    pub premium_ceiling: Decimal,
    /// The premium is split between employer and employee by this divisor.
    pub employee_share_divisor: Decimal,
}

/// Housing-fund contribution rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HousingFundSchedule {
    /// Contribution rate applied to the monthly salary.
    pub rate: Decimal,
    /// Maximum monthly contribution.
    pub cap: Decimal,
}

/// The statutory deduction schedule in effect from a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutorySchedule {
    /// First day this schedule applies.
    pub effective_date: NaiveDate,
    /// Social-insurance contribution brackets.
    pub social_insurance: ContributionTable,
    /// Health-insurance premium rules.
    pub health_insurance: HealthInsuranceSchedule,
    /// Housing-fund contribution rules.
    pub housing_fund: HousingFundSchedule,
    /// Withholding-tax tiers.
    pub withholding_tax: TaxTable,
}

impl StatutorySchedule {
    /// The built-in schedule effective from 2023-01-01.
    pub fn canonical() -> Self {
        Self {
            effective_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or(NaiveDate::MIN),
            social_insurance: canonical_social_insurance_table().clone(),
            health_insurance: HealthInsuranceSchedule {
                rate: Decimal::new(3, 2),
                premium_floor: Decimal::new(300, 0),
                premium_ceiling: Decimal::new(1800, 0),
                employee_share_divisor: Decimal::new(2, 0),
            },
            housing_fund: HousingFundSchedule {
                rate: Decimal::new(2, 2),
                cap: Decimal::new(100, 0),
            },
            withholding_tax: canonical_withholding_table().clone(),
        }
    }

    /// Checks the rate rules that the bracket tables do not validate themselves.
    pub fn validate(&self) -> Result<(), String> {
        let health = &self.health_insurance;
        if health.premium_floor > health.premium_ceiling {
            return Err(format!(
                "health premium floor {} exceeds ceiling {}",
                health.premium_floor, health.premium_ceiling
            ));
        }
        if health.employee_share_divisor <= Decimal::ZERO {
            return Err("health employee_share_divisor must be positive".to_string());
        }
        if self.housing_fund.cap.is_sign_negative() {
            return Err("housing fund cap must not be negative".to_string());
        }
        if health.premium_floor.is_sign_negative() {
            return Err("health premium floor must not be negative".to_string());
        }
        for (name, rate) in [
            ("health insurance", health.rate),
            ("housing fund", self.housing_fund.rate),
        ] {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(format!("{} rate {} must lie in [0, 1]", name, rate));
            }
        }
        Ok(())
    }
}

/// The complete payroll configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a configuration directory.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    /// Schedule metadata.
    metadata: ScheduleMetadata,
    /// Working-time rules.
    work_policy: WorkPolicy,
    /// Statutory schedules by effective date (sorted oldest first).
    schedules: Vec<StatutorySchedule>,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(
        metadata: ScheduleMetadata,
        work_policy: WorkPolicy,
        schedules: Vec<StatutorySchedule>,
    ) -> Self {
        let mut sorted_schedules = schedules;
        sorted_schedules.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
        Self {
            metadata,
            work_policy,
            schedules: sorted_schedules,
        }
    }

    /// The built-in configuration: canonical schedule and default work policy.
    pub fn canonical() -> Self {
        Self::new(
            ScheduleMetadata {
                code: "PH_2023".to_string(),
                name: "Philippine Statutory Payroll Deductions".to_string(),
                version: "2023-01-01".to_string(),
                source_url: "https://www.bir.gov.ph/index.php/tax-information/withholding-tax.html"
                    .to_string(),
            },
            WorkPolicy::default(),
            vec![StatutorySchedule::canonical()],
        )
    }

    /// Returns the schedule metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    /// Returns the work policy.
    pub fn work_policy(&self) -> &WorkPolicy {
        &self.work_policy
    }

    /// Returns all statutory schedules.
    pub fn schedules(&self) -> &[StatutorySchedule] {
        &self.schedules
    }
}
