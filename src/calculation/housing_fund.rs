//! Housing-fund contribution calculation.

use rust_decimal::Decimal;

use crate::config::StatutorySchedule;
use crate::models::AuditStep;

/// The schedule reference recorded for housing-fund steps.
pub const HOUSING_FUND_REF: &str = "statutory.housing_fund";

/// The result of a housing-fund calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct HousingFundResult {
    /// Monthly employee contribution.
    pub monthly_amount: Decimal,
    /// Whether the cap reduced the contribution.
    pub cap_applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly housing-fund contribution: salary × rate, capped.
///
/// A negative salary contributes nothing.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_housing_fund;
/// use payroll_engine::config::StatutorySchedule;
/// use rust_decimal::Decimal;
///
/// let schedule = StatutorySchedule::canonical();
/// let result = calculate_housing_fund(Decimal::new(3000, 0), &schedule, 1);
/// assert_eq!(result.monthly_amount, Decimal::new(60, 0));
/// assert!(!result.cap_applied);
/// ```
pub fn calculate_housing_fund(
    monthly_base_rate: Decimal,
    schedule: &StatutorySchedule,
    step_number: u32,
) -> HousingFundResult {
    let housing = &schedule.housing_fund;
    let uncapped = monthly_base_rate.max(Decimal::ZERO) * housing.rate;

    let (monthly_amount, cap_applied) = if uncapped > housing.cap {
        (housing.cap, true)
    } else {
        (uncapped, false)
    };

    let reasoning = if cap_applied {
        format!(
            "${} × {} = ${} (capped at ${})",
            monthly_base_rate.normalize(),
            housing.rate.normalize(),
            uncapped.normalize(),
            monthly_amount.normalize()
        )
    } else {
        format!(
            "${} × {} = ${}",
            monthly_base_rate.normalize(),
            housing.rate.normalize(),
            monthly_amount.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "housing_fund".to_string(),
        rule_name: "Housing Fund Contribution".to_string(),
        schedule_ref: HOUSING_FUND_REF.to_string(),
        input: serde_json::json!({
            "monthly_base_rate": monthly_base_rate.normalize().to_string(),
            "rate": housing.rate.normalize().to_string(),
            "cap": housing.cap.normalize().to_string()
        }),
        output: serde_json::json!({
            "uncapped_amount": uncapped.normalize().to_string(),
            "monthly_amount": monthly_amount.normalize().to_string(),
            "cap_applied": cap_applied
        }),
        reasoning,
    };

    HousingFundResult {
        monthly_amount,
        cap_applied,
        audit_step,
    }
}
