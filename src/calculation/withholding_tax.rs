//! Withholding-tax calculation.
//!
//! Tax is progressive: the salary falls in the highest tier whose floor it
//! strictly exceeds, and owes the tier's base tax plus its rate applied to
//! the excess over the floor.

use rust_decimal::Decimal;

use crate::config::StatutorySchedule;
use crate::models::AuditStep;

/// The schedule reference recorded for withholding-tax steps.
pub const WITHHOLDING_TAX_REF: &str = "statutory.withholding_tax";

/// The result of a withholding-tax calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct WithholdingTaxResult {
    /// Monthly tax owed.
    pub monthly_amount: Decimal,
    /// Floor of the applied tier, `None` when the salary is exempt.
    pub tier_floor: Option<Decimal>,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly withholding tax for a salary.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_withholding_tax;
/// use payroll_engine::config::StatutorySchedule;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let schedule = StatutorySchedule::canonical();
/// let result = calculate_withholding_tax(Decimal::new(30000, 0), &schedule, 1);
/// assert_eq!(result.monthly_amount, Decimal::from_str("1833.6").unwrap());
/// ```
pub fn calculate_withholding_tax(
    monthly_base_rate: Decimal,
    schedule: &StatutorySchedule,
    step_number: u32,
) -> WithholdingTaxResult {
    let table = &schedule.withholding_tax;
    let tier = table.tier_for(monthly_base_rate);

    let (monthly_amount, reasoning, output) = match tier {
        Some(tier) => {
            let excess = monthly_base_rate - tier.floor;
            let amount = tier.tax_for(monthly_base_rate);
            (
                amount,
                format!(
                    "${} exceeds ${}: ${} + (${} × {}) = ${}",
                    monthly_base_rate.normalize(),
                    tier.floor.normalize(),
                    tier.base_tax.normalize(),
                    excess.normalize(),
                    tier.rate.normalize(),
                    amount.normalize()
                ),
                serde_json::json!({
                    "tier_floor": tier.floor.normalize().to_string(),
                    "base_tax": tier.base_tax.normalize().to_string(),
                    "rate": tier.rate.normalize().to_string(),
                    "excess": excess.normalize().to_string(),
                    "monthly_amount": amount.normalize().to_string()
                }),
            )
        }
        None => (
            Decimal::ZERO,
            format!(
                "${} does not exceed ${}: no tax",
                monthly_base_rate.normalize(),
                table.exempt_threshold().normalize()
            ),
            serde_json::json!({
                "tier_floor": null,
                "monthly_amount": "0"
            }),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "withholding_tax".to_string(),
        rule_name: "Withholding Tax".to_string(),
        schedule_ref: WITHHOLDING_TAX_REF.to_string(),
        input: serde_json::json!({
            "monthly_base_rate": monthly_base_rate.normalize().to_string()
        }),
        output,
        reasoning,
    };

    WithholdingTaxResult {
        monthly_amount,
        tier_floor: tier.map(|t| t.floor),
        audit_step,
    }
}
