//! Employee master data.
//!
//! This module defines the [`Employee`] struct together with the fixed
//! [`Allowances`] and the optional precomputed [`DeductionOverride`] that
//! salary master data may carry.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fixed monthly allowances paid on top of wages.
///
/// Allowances are not taxed and are spread evenly across the weeks of a month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowances {
    /// Rice subsidy.
    #[serde(default)]
    pub rice: Decimal,
    /// Phone allowance.
    #[serde(default)]
    pub phone: Decimal,
    /// Clothing allowance.
    #[serde(default)]
    pub clothing: Decimal,
}

impl Allowances {
    /// Returns the sum of all allowances, or `None` if it overflows.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Allowances;
    /// use rust_decimal::Decimal;
    ///
    /// let allowances = Allowances {
    ///     rice: Decimal::new(1500, 0),
    ///     phone: Decimal::new(500, 0),
    ///     clothing: Decimal::new(500, 0),
    /// };
    /// assert_eq!(allowances.total(), Some(Decimal::new(2500, 0)));
    /// ```
    pub fn total(&self) -> Option<Decimal> {
        self.rice
            .checked_add(self.phone)
            .and_then(|sum| sum.checked_add(self.clothing))
    }
}

/// Precomputed weekly deduction totals supplied with master data.
///
/// When present these replace the schedule-derived totals on every payroll
/// line of the employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionOverride {
    /// Weekly total of social insurance, health insurance and housing fund.
    pub government: Decimal,
    /// Weekly total of government deductions plus withholding tax.
    pub gross: Decimal,
}

/// An employee as loaded from salary master data.
///
/// Employees are immutable for the duration of a payroll run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Family name.
    pub last_name: String,
    /// Given name.
    pub first_name: String,
    /// Rate paid per hour worked.
    pub hourly_rate: Decimal,
    /// Monthly base salary; every statutory deduction is derived from it.
    pub monthly_base_rate: Decimal,
    /// Fixed monthly allowances.
    #[serde(default)]
    pub allowances: Allowances,
    /// Optional precomputed weekly deduction totals.
    #[serde(default)]
    pub deduction_override: Option<DeductionOverride>,
}

impl Employee {
    /// Returns the name used on payroll ledgers ("first last").
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::{Allowances, Employee};
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "10001".to_string(),
    ///     last_name: "Garcia".to_string(),
    ///     first_name: "Manuel".to_string(),
    ///     hourly_rate: Decimal::new(535_71, 2),
    ///     monthly_base_rate: Decimal::new(90_000, 0),
    ///     allowances: Allowances::default(),
    ///     deduction_override: None,
    /// };
    /// assert_eq!(employee.display_name(), "Manuel Garcia");
    /// ```
    pub fn display_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.id.clone(),
        }
    }
}
