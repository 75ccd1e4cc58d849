//! Combined statutory deduction calculation.
//!
//! Computes all four monthly deductions once for a salary and derives the
//! weekly equivalent applied identically to every week of the month.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{StatutorySchedule, WorkPolicy};
use crate::models::{AuditStep, DeductionAmounts};

use super::{
    calculate_health_insurance, calculate_housing_fund, calculate_social_insurance,
    calculate_withholding_tax,
};

/// Monthly and weekly statutory deductions for one salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatutoryDeductions {
    /// Deductions for the whole month.
    pub monthly: DeductionAmounts,
    /// Monthly deductions divided by the weeks per month.
    pub weekly: DeductionAmounts,
    /// One step per deduction, in calculation order.
    pub audit_steps: Vec<AuditStep>,
}

/// Calculates every statutory deduction for a monthly base salary.
///
/// Audit steps are numbered from `start_step`.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_statutory_deductions;
/// use payroll_engine::config::{StatutorySchedule, WorkPolicy};
/// use rust_decimal::Decimal;
///
/// let deductions = calculate_statutory_deductions(
///     Decimal::new(3250, 0),
///     &StatutorySchedule::canonical(),
///     &WorkPolicy::default(),
///     1,
/// );
/// assert_eq!(deductions.monthly.social_insurance, Decimal::new(135, 0));
/// assert_eq!(deductions.weekly.social_insurance, Decimal::new(3375, 2));
/// ```
pub fn calculate_statutory_deductions(
    monthly_base_rate: Decimal,
    schedule: &StatutorySchedule,
    policy: &WorkPolicy,
    start_step: u32,
) -> StatutoryDeductions {
    let social = calculate_social_insurance(monthly_base_rate, schedule, start_step);
    let health = calculate_health_insurance(monthly_base_rate, schedule, start_step + 1);
    let housing = calculate_housing_fund(monthly_base_rate, schedule, start_step + 2);
    let tax = calculate_withholding_tax(monthly_base_rate, schedule, start_step + 3);

    let monthly = DeductionAmounts {
        social_insurance: social.monthly_amount,
        health_insurance: health.monthly_amount,
        housing_fund: housing.monthly_amount,
        withholding_tax: tax.monthly_amount,
    };
    let weekly = monthly.divided_by(policy.weeks_per_month);

    let weekly_step = AuditStep {
        step_number: start_step + 4,
        rule_id: "weekly_equivalent".to_string(),
        rule_name: "Weekly Deduction Equivalent".to_string(),
        schedule_ref: "work_policy.weeks_per_month".to_string(),
        input: serde_json::json!({
            "monthly_government_total": monthly.government_total().normalize().to_string(),
            "monthly_withholding_tax": monthly.withholding_tax.normalize().to_string(),
            "weeks_per_month": policy.weeks_per_month.normalize().to_string()
        }),
        output: serde_json::json!({
            "social_insurance": weekly.social_insurance.normalize().to_string(),
            "health_insurance": weekly.health_insurance.normalize().to_string(),
            "housing_fund": weekly.housing_fund.normalize().to_string(),
            "withholding_tax": weekly.withholding_tax.normalize().to_string()
        }),
        reasoning: format!(
            "Monthly deductions ${} ÷ {} = ${} per week",
            monthly.gross_total().normalize(),
            policy.weeks_per_month.normalize(),
            weekly.gross_total().normalize()
        ),
    };

    StatutoryDeductions {
        monthly,
        weekly,
        audit_steps: vec![
            social.audit_step,
            health.audit_step,
            housing.audit_step,
            tax.audit_step,
            weekly_step,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn calculate(salary: &str) -> StatutoryDeductions {
        calculate_statutory_deductions(
            dec(salary),
            &StatutorySchedule::canonical(),
            &WorkPolicy::default(),
            1,
        )
    }

    #[test]
    fn test_salary_20000() {
        let deductions = calculate("20000");
        assert_eq!(deductions.monthly.social_insurance, dec("900"));
        assert_eq!(deductions.monthly.health_insurance, dec("300"));
        assert_eq!(deductions.monthly.housing_fund, dec("100"));
        assert_eq!(deductions.monthly.withholding_tax, Decimal::ZERO);

        assert_eq!(deductions.weekly.social_insurance, dec("225"));
        assert_eq!(deductions.weekly.health_insurance, dec("75"));
        assert_eq!(deductions.weekly.housing_fund, dec("25"));
        assert_eq!(deductions.weekly.government_total(), dec("325"));
    }

    #[test]
    fn test_salary_3250_weekly_social_insurance() {
        let deductions = calculate("3250");
        assert_eq!(deductions.monthly.social_insurance, dec("135"));
        assert_eq!(deductions.weekly.social_insurance, dec("33.75"));
    }

    #[test]
    fn test_weekly_withholding_is_quarter_of_monthly() {
        let deductions = calculate("30000");
        assert_eq!(deductions.monthly.withholding_tax, dec("1833.6"));
        assert_eq!(deductions.weekly.withholding_tax, dec("458.4"));
    }

    #[test]
    fn test_negative_salary_gives_minimum_deductions() {
        let deductions = calculate("-1000");
        assert_eq!(deductions.monthly.social_insurance, dec("135"));
        assert_eq!(deductions.monthly.health_insurance, dec("150"));
        assert_eq!(deductions.monthly.housing_fund, Decimal::ZERO);
        assert_eq!(deductions.monthly.withholding_tax, Decimal::ZERO);
    }

    #[test]
    fn test_audit_steps_are_numbered_sequentially() {
        let deductions = calculate_statutory_deductions(
            dec("20000"),
            &StatutorySchedule::canonical(),
            &WorkPolicy::default(),
            10,
        );
        let numbers: Vec<u32> = deductions.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![10, 11, 12, 13, 14]);
        assert_eq!(deductions.audit_steps[4].rule_id, "weekly_equivalent");
    }
}
