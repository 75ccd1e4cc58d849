//! Social-insurance contribution calculation.
//!
//! The contribution is a flat monthly amount looked up from an enumerated
//! salary bracket table.

use rust_decimal::Decimal;

use crate::config::StatutorySchedule;
use crate::models::AuditStep;

/// The schedule reference recorded for social-insurance steps.
pub const SOCIAL_INSURANCE_REF: &str = "statutory.social_insurance";

/// The result of a social-insurance lookup, including the audit step.
#[derive(Debug, Clone)]
pub struct SocialInsuranceResult {
    /// Monthly employee contribution.
    pub monthly_amount: Decimal,
    /// Index of the matching bracket in the table.
    pub bracket_index: usize,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Looks up the monthly social-insurance contribution for a salary.
///
/// Salaries below zero resolve to the first bracket; salaries at or above
/// the ceiling bracket's lower bound pay the ceiling contribution.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_social_insurance;
/// use payroll_engine::config::StatutorySchedule;
/// use rust_decimal::Decimal;
///
/// let schedule = StatutorySchedule::canonical();
/// let result = calculate_social_insurance(Decimal::new(20000, 0), &schedule, 1);
/// assert_eq!(result.monthly_amount, Decimal::new(900, 0));
/// ```
pub fn calculate_social_insurance(
    monthly_base_rate: Decimal,
    schedule: &StatutorySchedule,
    step_number: u32,
) -> SocialInsuranceResult {
    let table = &schedule.social_insurance;
    let bracket = table.lookup(monthly_base_rate);
    let bracket_index = table
        .brackets()
        .iter()
        .position(|b| b == bracket)
        .unwrap_or(0);

    let reasoning = if bracket.contains(monthly_base_rate) {
        format!(
            "Salary ${} falls in bracket {} {}: contribution ${}",
            monthly_base_rate.normalize(),
            bracket_index,
            bracket.describe(),
            bracket.contribution.normalize()
        )
    } else {
        format!(
            "Salary ${} is below every bracket: lowest contribution ${} applies",
            monthly_base_rate.normalize(),
            bracket.contribution.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "social_insurance".to_string(),
        rule_name: "Social Insurance Contribution".to_string(),
        schedule_ref: SOCIAL_INSURANCE_REF.to_string(),
        input: serde_json::json!({
            "monthly_base_rate": monthly_base_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "bracket_index": bracket_index,
            "bracket": bracket.describe(),
            "monthly_amount": bracket.contribution.normalize().to_string()
        }),
        reasoning,
    };

    SocialInsuranceResult {
        monthly_amount: bracket.contribution,
        bracket_index,
        audit_step,
    }
}
