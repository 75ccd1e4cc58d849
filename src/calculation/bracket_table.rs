//! Statutory bracket tables.
//!
//! This module provides the two lookup structures the deduction schedule is
//! built from:
//!
//! - [`ContributionTable`]: enumerated salary intervals, each mapping to a flat
//!   monthly contribution (social insurance).
//! - [`TaxTable`]: marginal-rate tiers, each with a floor, a fixed base amount
//!   and a rate applied to the excess over the floor (withholding tax).
//!
//! Both are validated on construction: intervals must be ordered,
//! non-overlapping and cover `[0, ∞)`; tiers must have strictly ascending
//! floors. The canonical schedule is available as process-wide constants via
//! [`canonical_social_insurance_table`] and [`canonical_withholding_table`].

use std::sync::LazyLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_upper_inclusive() -> bool {
    true
}

/// One salary interval of a [`ContributionTable`].
///
/// By default the lower bound is exclusive and the upper bound inclusive,
/// i.e. `(lower, upper]`. A missing upper bound means the interval is
/// unbounded above.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::ContributionBracket;
/// use rust_decimal::Decimal;
///
/// let bracket = ContributionBracket {
///     lower: Decimal::new(3250, 0),
///     lower_inclusive: false,
///     upper: Some(Decimal::new(3750, 0)),
///     upper_inclusive: true,
///     contribution: Decimal::new(1575, 1),
/// };
/// assert!(!bracket.contains(Decimal::new(3250, 0)));
/// assert!(bracket.contains(Decimal::new(3500, 0)));
/// assert!(bracket.contains(Decimal::new(3750, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBracket {
    /// Lower salary bound.
    pub lower: Decimal,
    /// Whether a salary equal to `lower` falls in this bracket.
    #[serde(default)]
    pub lower_inclusive: bool,
    /// Upper salary bound, `None` for the open-ended ceiling bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Whether a salary equal to `upper` falls in this bracket.
    #[serde(default = "default_upper_inclusive")]
    pub upper_inclusive: bool,
    /// Flat monthly contribution for salaries in this bracket.
    pub contribution: Decimal,
}

impl ContributionBracket {
    /// Returns true if `salary` falls within this bracket.
    pub fn contains(&self, salary: Decimal) -> bool {
        let above_lower = if self.lower_inclusive {
            salary >= self.lower
        } else {
            salary > self.lower
        };
        let below_upper = match self.upper {
            None => true,
            Some(upper) if self.upper_inclusive => salary <= upper,
            Some(upper) => salary < upper,
        };
        above_lower && below_upper
    }

    /// Renders the interval in mathematical notation, e.g. `(3250, 3750]`.
    pub fn describe(&self) -> String {
        let open = if self.lower_inclusive { '[' } else { '(' };
        match self.upper {
            Some(upper) => {
                let close = if self.upper_inclusive { ']' } else { ')' };
                format!("{}{}, {}{}", open, self.lower.normalize(), upper.normalize(), close)
            }
            None => format!("{}{}, ∞)", open, self.lower.normalize()),
        }
    }
}

/// An enumerated contribution schedule.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::canonical_social_insurance_table;
/// use rust_decimal::Decimal;
///
/// let table = canonical_social_insurance_table();
/// assert_eq!(table.lookup(Decimal::new(3250, 0)).contribution, Decimal::new(135, 0));
/// assert_eq!(table.lookup(Decimal::new(24750, 0)).contribution, Decimal::new(1125, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ContributionBracket>", into = "Vec<ContributionBracket>")]
pub struct ContributionTable {
    brackets: Vec<ContributionBracket>,
}

impl ContributionTable {
    /// Builds a table, checking that the brackets are ordered, contiguous,
    /// non-overlapping and cover `[0, ∞)`.
    pub fn new(brackets: Vec<ContributionBracket>) -> Result<Self, String> {
        let first = brackets
            .first()
            .ok_or_else(|| "contribution table has no brackets".to_string())?;
        if !(first.lower.is_zero() && first.lower_inclusive) {
            return Err(format!(
                "first bracket must start at [0, found {}",
                first.describe()
            ));
        }

        for pair in brackets.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            let Some(upper) = current.upper else {
                return Err(format!(
                    "bracket {} is unbounded but is followed by {}",
                    current.describe(),
                    next.describe()
                ));
            };
            if upper != next.lower {
                return Err(format!(
                    "bracket {} is not contiguous with {}",
                    current.describe(),
                    next.describe()
                ));
            }
            if current.upper_inclusive == next.lower_inclusive {
                return Err(format!(
                    "brackets {} and {} must share their boundary exactly once",
                    current.describe(),
                    next.describe()
                ));
            }
        }

        if brackets.last().is_some_and(|b| b.upper.is_some()) {
            return Err("last bracket must be unbounded above".to_string());
        }
        if let Some(bracket) = brackets.iter().find(|b| b.contribution < Decimal::ZERO) {
            return Err(format!(
                "bracket {} has a negative contribution",
                bracket.describe()
            ));
        }

        Ok(Self { brackets })
    }

    /// Returns the bracket containing `salary`.
    ///
    /// Salaries below zero resolve to the first bracket.
    pub fn lookup(&self, salary: Decimal) -> &ContributionBracket {
        self.brackets
            .iter()
            .find(|b| b.contains(salary))
            .unwrap_or(&self.brackets[0])
    }

    /// Returns the brackets in ascending order.
    pub fn brackets(&self) -> &[ContributionBracket] {
        &self.brackets
    }

    /// Returns the highest contribution in the table.
    pub fn ceiling(&self) -> Decimal {
        self.brackets
            .iter()
            .map(|b| b.contribution)
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<Vec<ContributionBracket>> for ContributionTable {
    type Error = String;

    fn try_from(brackets: Vec<ContributionBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<ContributionTable> for Vec<ContributionBracket> {
    fn from(table: ContributionTable) -> Self {
        table.brackets
    }
}

/// One marginal tier of a [`TaxTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTier {
    /// Salaries strictly above this amount fall in the tier.
    pub floor: Decimal,
    /// Tax owed on the salary up to `floor`.
    pub base_tax: Decimal,
    /// Rate applied to the excess over `floor`.
    pub rate: Decimal,
}

impl TaxTier {
    /// Tax owed on `salary` under this tier.
    pub fn tax_for(&self, salary: Decimal) -> Decimal {
        self.base_tax + (salary - self.floor) * self.rate
    }
}

/// A progressive marginal-rate schedule.
///
/// Salaries at or below the lowest floor owe nothing.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::canonical_withholding_table;
/// use rust_decimal::Decimal;
///
/// let table = canonical_withholding_table();
/// assert_eq!(table.tax_for(Decimal::new(20832, 0)), Decimal::ZERO);
/// assert!(table.tax_for(Decimal::new(20833, 0)) > Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxTier>", into = "Vec<TaxTier>")]
pub struct TaxTable {
    tiers: Vec<TaxTier>,
}

impl TaxTable {
    /// Builds a table, checking that tier floors strictly ascend, rates lie
    /// in `[0, 1]` and no base tax exceeds its floor.
    pub fn new(tiers: Vec<TaxTier>) -> Result<Self, String> {
        if tiers.is_empty() {
            return Err("tax table has no tiers".to_string());
        }
        if let Some(pair) = tiers.windows(2).find(|pair| pair[0].floor >= pair[1].floor) {
            return Err(format!(
                "tier floors must ascend: {} is followed by {}",
                pair[0].floor.normalize(),
                pair[1].floor.normalize()
            ));
        }
        if tiers[0].floor.is_sign_negative() {
            return Err("lowest tier floor must not be negative".to_string());
        }
        // Tax on any salary stays within the salary itself.
        if let Some(tier) = tiers
            .iter()
            .find(|t| t.rate < Decimal::ZERO || t.rate > Decimal::ONE)
        {
            return Err(format!(
                "tier rate {} above {} must lie in [0, 1]",
                tier.rate.normalize(),
                tier.floor.normalize()
            ));
        }
        if let Some(tier) = tiers
            .iter()
            .find(|t| t.base_tax < Decimal::ZERO || t.base_tax > t.floor)
        {
            return Err(format!(
                "base tax {} must lie in [0, {}]",
                tier.base_tax.normalize(),
                tier.floor.normalize()
            ));
        }
        Ok(Self { tiers })
    }

    /// Returns the tier `salary` falls in, or `None` when it is exempt.
    pub fn tier_for(&self, salary: Decimal) -> Option<&TaxTier> {
        self.tiers.iter().rev().find(|t| salary > t.floor)
    }

    /// Tax owed on `salary`.
    pub fn tax_for(&self, salary: Decimal) -> Decimal {
        self.tier_for(salary)
            .map(|t| t.tax_for(salary))
            .unwrap_or(Decimal::ZERO)
    }

    /// The highest salary that owes no tax.
    pub fn exempt_threshold(&self) -> Decimal {
        self.tiers[0].floor
    }

    /// Returns the tiers in ascending order.
    pub fn tiers(&self) -> &[TaxTier] {
        &self.tiers
    }
}

impl TryFrom<Vec<TaxTier>> for TaxTable {
    type Error = String;

    fn try_from(tiers: Vec<TaxTier>) -> Result<Self, Self::Error> {
        Self::new(tiers)
    }
}

impl From<TaxTable> for Vec<TaxTier> {
    fn from(table: TaxTable) -> Self {
        table.tiers
    }
}

/// (lower, upper, contribution in tenths) of the bounded social-insurance brackets.
const SOCIAL_INSURANCE_ROWS: [(i64, i64, i64); 44] = [
    (0, 3250, 1350), (3250, 3750, 1575), (3750, 4250, 1800), (4250, 4750, 2025),
    (4750, 5250, 2250), (5250, 5750, 2475), (5750, 6250, 2700), (6250, 6750, 2925),
    (6750, 7250, 3150), (7250, 7750, 3375), (7750, 8250, 3600), (8250, 8750, 3825),
    (8750, 9250, 4050), (9250, 9750, 4275), (9750, 10250, 4500), (10250, 10750, 4725),
    (10750, 11250, 4950), (11250, 11750, 5175), (11750, 12250, 5400), (12250, 12750, 5625),
    (12750, 13250, 5850), (13250, 13750, 6075), (13750, 14250, 6300), (14250, 14750, 6525),
    (14750, 15250, 6750), (15250, 15750, 6975), (15750, 16250, 7200), (16250, 16750, 7425),
    (16750, 17250, 7650), (17250, 17750, 7875), (17750, 18250, 8100), (18250, 18750, 8325),
    (18750, 19250, 8550), (19250, 19750, 8775), (19750, 20250, 9000), (20250, 20750, 9225),
    (20750, 21250, 9450), (21250, 21750, 9675), (21750, 22250, 9900),
    (22250, 22750, 10125), (22750, 23250, 10350), (23250, 23750, 10575),
    (23750, 24250, 10800), (24250, 24750, 11025),
];

/// (lower, contribution in tenths) of the open-ended ceiling bracket.
const SOCIAL_INSURANCE_CEILING: (i64, i64) = (24750, 11250);

/// (floor, base tax in cents, rate in percent) of the withholding tiers.
const WITHHOLDING_TIERS: [(i64, i64, i64); 5] = [
    (20832, 0, 20),
    (33333, 250_000, 25),
    (66667, 1_083_300, 30),
    (166667, 4_083_333, 32),
    (666667, 20_083_333, 35),
];

fn build_social_insurance_table() -> ContributionTable {
    let last = SOCIAL_INSURANCE_ROWS.len() - 1;
    let mut brackets: Vec<ContributionBracket> = SOCIAL_INSURANCE_ROWS
        .iter()
        .enumerate()
        .map(|(i, &(lower, upper, tenths))| ContributionBracket {
            lower: Decimal::from(lower),
            // [0, 3250] is closed at both ends
            lower_inclusive: i == 0,
            upper: Some(Decimal::from(upper)),
            // the ceiling applies from 24750 itself
            upper_inclusive: i != last,
            contribution: Decimal::new(tenths, 1),
        })
        .collect();

    let (lower, tenths) = SOCIAL_INSURANCE_CEILING;
    brackets.push(ContributionBracket {
        lower: Decimal::from(lower),
        lower_inclusive: true,
        upper: None,
        upper_inclusive: true,
        contribution: Decimal::new(tenths, 1),
    });

    ContributionTable { brackets }
}

fn build_withholding_table() -> TaxTable {
    TaxTable {
        tiers: WITHHOLDING_TIERS
            .iter()
            .map(|&(floor, base_cents, percent)| TaxTier {
                floor: Decimal::from(floor),
                base_tax: Decimal::new(base_cents, 2),
                rate: Decimal::new(percent, 2),
            })
            .collect(),
    }
}

static SOCIAL_INSURANCE_TABLE: LazyLock<ContributionTable> =
    LazyLock::new(build_social_insurance_table);

static WITHHOLDING_TABLE: LazyLock<TaxTable> = LazyLock::new(build_withholding_table);

/// The canonical social-insurance contribution table.
pub fn canonical_social_insurance_table() -> &'static ContributionTable {
    &SOCIAL_INSURANCE_TABLE
}

/// The canonical withholding-tax table.
pub fn canonical_withholding_table() -> &'static TaxTable {
    &WITHHOLDING_TABLE
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn contribution(salary: &str) -> Decimal {
        canonical_social_insurance_table()
            .lookup(dec(salary))
            .contribution
    }

    #[test]
    fn test_canonical_tables_pass_validation() {
        let table = canonical_social_insurance_table();
        assert!(ContributionTable::new(table.brackets().to_vec()).is_ok());
        assert_eq!(table.brackets().len(), 45);

        let taxes = canonical_withholding_table();
        assert!(TaxTable::new(taxes.tiers().to_vec()).is_ok());
    }

    #[test]
    fn test_floor_bracket_includes_3250() {
        assert_eq!(contribution("0"), dec("135"));
        assert_eq!(contribution("3249.99"), dec("135"));
        assert_eq!(contribution("3250"), dec("135"));
        assert_eq!(contribution("3250.01"), dec("157.5"));
    }

    #[test]
    fn test_upper_bounds_are_inclusive_in_the_middle() {
        assert_eq!(contribution("3750"), dec("157.5"));
        assert_eq!(contribution("3750.01"), dec("180"));
        assert_eq!(contribution("20000"), dec("900"));
        assert_eq!(contribution("24250"), dec("1080"));
    }

    #[test]
    fn test_ceiling_applies_from_24750() {
        assert_eq!(contribution("24749.99"), dec("1102.5"));
        assert_eq!(contribution("24750"), dec("1125"));
        assert_eq!(contribution("1000000"), dec("1125"));
        assert_eq!(canonical_social_insurance_table().ceiling(), dec("1125"));
    }

    #[test]
    fn test_negative_salary_resolves_to_first_bracket() {
        assert_eq!(contribution("-500"), dec("135"));
    }

    #[test]
    fn test_every_salary_matches_exactly_one_bracket() {
        let table = canonical_social_insurance_table();
        for salary in (0..30_000).step_by(250) {
            let salary = Decimal::from(salary);
            let matches = table.brackets().iter().filter(|b| b.contains(salary)).count();
            assert_eq!(matches, 1, "salary {} matched {} brackets", salary, matches);
        }
    }

    #[test]
    fn test_rejects_gap_between_brackets() {
        let result = ContributionTable::new(vec![
            ContributionBracket {
                lower: dec("0"),
                lower_inclusive: true,
                upper: Some(dec("1000")),
                upper_inclusive: true,
                contribution: dec("10"),
            },
            ContributionBracket {
                lower: dec("1500"),
                lower_inclusive: false,
                upper: None,
                upper_inclusive: false,
                contribution: dec("20"),
            },
        ]);
        assert!(result.unwrap_err().contains("not contiguous"));
    }

    #[test]
    fn test_rejects_overlapping_boundary() {
        let result = ContributionTable::new(vec![
            ContributionBracket {
                lower: dec("0"),
                lower_inclusive: true,
                upper: Some(dec("1000")),
                upper_inclusive: true,
                contribution: dec("10"),
            },
            ContributionBracket {
                lower: dec("1000"),
                lower_inclusive: true,
                upper: None,
                upper_inclusive: false,
                contribution: dec("20"),
            },
        ]);
        assert!(result.unwrap_err().contains("exactly once"));
    }

    #[test]
    fn test_rejects_bounded_last_bracket() {
        let result = ContributionTable::new(vec![ContributionBracket {
            lower: dec("0"),
            lower_inclusive: true,
            upper: Some(dec("1000")),
            upper_inclusive: true,
            contribution: dec("10"),
        }]);
        assert!(result.unwrap_err().contains("unbounded"));
    }

    #[test]
    fn test_rejects_negative_contribution() {
        let result = ContributionTable::new(vec![ContributionBracket {
            lower: dec("0"),
            lower_inclusive: true,
            upper: None,
            upper_inclusive: false,
            contribution: dec("-10"),
        }]);
        assert!(result.unwrap_err().contains("negative contribution"));
    }

    #[test]
    fn test_tax_tiers_select_highest_exceeded_floor() {
        let table = canonical_withholding_table();
        assert!(table.tier_for(dec("20832")).is_none());
        assert_eq!(table.tier_for(dec("20833")).unwrap().floor, dec("20832"));
        assert_eq!(table.tier_for(dec("33333")).unwrap().floor, dec("20832"));
        assert_eq!(table.tier_for(dec("33334")).unwrap().floor, dec("33333"));
        assert_eq!(table.tier_for(dec("10000000")).unwrap().floor, dec("666667"));
        assert_eq!(table.exempt_threshold(), dec("20832"));
    }

    #[test]
    fn test_tax_table_rejects_unsorted_tiers() {
        let result = TaxTable::new(vec![
            TaxTier {
                floor: dec("500"),
                base_tax: dec("0"),
                rate: dec("0.1"),
            },
            TaxTier {
                floor: dec("100"),
                base_tax: dec("0"),
                rate: dec("0.2"),
            },
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tax_table_rejects_out_of_range_rate_and_base() {
        let tier = |floor: &str, base_tax: &str, rate: &str| TaxTier {
            floor: dec(floor),
            base_tax: dec(base_tax),
            rate: dec(rate),
        };
        assert!(TaxTable::new(vec![tier("100", "0", "1.5")]).is_err());
        assert!(TaxTable::new(vec![tier("100", "0", "-0.1")]).is_err());
        assert!(TaxTable::new(vec![tier("100", "150", "0.2")]).is_err());
        assert!(TaxTable::new(vec![tier("100", "100", "1")]).is_ok());
    }

    #[test]
    fn test_bracket_description() {
        let table = canonical_social_insurance_table();
        assert_eq!(table.brackets()[0].describe(), "[0, 3250]");
        assert_eq!(table.brackets()[1].describe(), "(3250, 3750]");
        assert_eq!(table.brackets()[43].describe(), "(24250, 24750)");
        assert_eq!(table.brackets()[44].describe(), "[24750, ∞)");
    }

    #[test]
    fn test_table_deserializes_with_default_bounds() {
        let yaml = r#"
- { lower: "0", lower_inclusive: true, upper: "1000", contribution: "10" }
- { lower: "1000", contribution: "20" }
"#;
        let table: ContributionTable = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.lookup(dec("1000")).contribution, dec("10"));
        assert_eq!(table.lookup(dec("1000.01")).contribution, dec("20"));
    }
}
