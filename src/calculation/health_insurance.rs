//! Health-insurance contribution calculation.

use rust_decimal::Decimal;

use crate::config::StatutorySchedule;
use crate::models::AuditStep;

/// The schedule reference recorded for health-insurance steps.
pub const HEALTH_INSURANCE_REF: &str = "statutory.health_insurance";

/// The result of a health-insurance calculation, including the audit step.
#[derive(Debug, Clone)]
pub struct HealthInsuranceResult {
    /// Total monthly premium after clamping.
    pub premium: Decimal,
    /// Monthly employee share of the premium.
    pub monthly_amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates the monthly health-insurance employee share for a salary.
///
/// The premium is the salary times the schedule rate, clamped to the
/// premium floor and ceiling; the employee pays the premium divided by the
/// share divisor.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_health_insurance;
/// use payroll_engine::config::StatutorySchedule;
/// use rust_decimal::Decimal;
///
/// let schedule = StatutorySchedule::canonical();
/// let result = calculate_health_insurance(Decimal::new(20000, 0), &schedule, 1);
/// assert_eq!(result.premium, Decimal::new(600, 0));
/// assert_eq!(result.monthly_amount, Decimal::new(300, 0));
/// ```
pub fn calculate_health_insurance(
    monthly_base_rate: Decimal,
    schedule: &StatutorySchedule,
    step_number: u32,
) -> HealthInsuranceResult {
    let health = &schedule.health_insurance;
    let raw_premium = monthly_base_rate * health.rate;
    let premium = raw_premium.clamp(health.premium_floor, health.premium_ceiling);
    let monthly_amount = premium / health.employee_share_divisor;

    let clamp_note = if raw_premium < health.premium_floor {
        format!(" (raised to floor ${})", health.premium_floor.normalize())
    } else if raw_premium > health.premium_ceiling {
        format!(" (capped at ceiling ${})", health.premium_ceiling.normalize())
    } else {
        String::new()
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "health_insurance".to_string(),
        rule_name: "Health Insurance Contribution".to_string(),
        schedule_ref: HEALTH_INSURANCE_REF.to_string(),
        input: serde_json::json!({
            "monthly_base_rate": monthly_base_rate.normalize().to_string(),
            "rate": health.rate.normalize().to_string(),
            "premium_floor": health.premium_floor.normalize().to_string(),
            "premium_ceiling": health.premium_ceiling.normalize().to_string()
        }),
        output: serde_json::json!({
            "raw_premium": raw_premium.normalize().to_string(),
            "premium": premium.normalize().to_string(),
            "monthly_amount": monthly_amount.normalize().to_string()
        }),
        reasoning: format!(
            "${} × {} = ${}{}; employee share ${} ÷ {} = ${}",
            monthly_base_rate.normalize(),
            health.rate.normalize(),
            raw_premium.normalize(),
            clamp_note,
            premium.normalize(),
            health.employee_share_divisor.normalize(),
            monthly_amount.normalize()
        ),
    };

    HealthInsuranceResult {
        premium,
        monthly_amount,
        audit_step,
    }
}
