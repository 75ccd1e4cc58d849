//! Statutory deduction amounts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The four statutory deductions for one period (a month or a week).
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionAmounts;
/// use rust_decimal::Decimal;
///
/// let monthly = DeductionAmounts {
///     social_insurance: Decimal::new(900, 0),
///     health_insurance: Decimal::new(300, 0),
///     housing_fund: Decimal::new(100, 0),
///     withholding_tax: Decimal::ZERO,
/// };
/// assert_eq!(monthly.government_total(), Decimal::new(1300, 0));
/// assert_eq!(monthly.divided_by(Decimal::new(4, 0)).government_total(), Decimal::new(325, 0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionAmounts {
    /// Social-insurance contribution (employee share).
    pub social_insurance: Decimal,
    /// Health-insurance contribution (employee share).
    pub health_insurance: Decimal,
    /// Housing-fund contribution.
    pub housing_fund: Decimal,
    /// Withholding tax.
    pub withholding_tax: Decimal,
}

impl DeductionAmounts {
    /// Sum of the government contributions (withholding tax excluded).
    pub fn government_total(&self) -> Decimal {
        self.social_insurance + self.health_insurance + self.housing_fund
    }

    /// Government contributions plus withholding tax.
    pub fn gross_total(&self) -> Decimal {
        self.government_total() + self.withholding_tax
    }

    /// Divides every amount by `divisor`.
    ///
    /// A zero divisor leaves the amounts unchanged.
    pub fn divided_by(&self, divisor: Decimal) -> Self {
        if divisor.is_zero() {
            return *self;
        }
        Self {
            social_insurance: self.social_insurance / divisor,
            health_insurance: self.health_insurance / divisor,
            housing_fund: self.housing_fund / divisor,
            withholding_tax: self.withholding_tax / divisor,
        }
    }
}
