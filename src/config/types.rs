//! Configuration types for the statutory tables.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The statutory hourly minimum wage for one calendar year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumWageRate {
    /// The calendar year the rate applies to.
    pub year: i32,
    /// The hourly minimum wage in KRW.
    pub hourly: Decimal,
}

/// Structure of `minimum_wage.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct MinimumWageConfig {
    /// Where the published rates come from.
    #[serde(default)]
    pub source: String,
    /// One entry per year.
    pub rates: Vec<MinimumWageRate>,
}

/// Year-keyed lookup of statutory hourly minimum wages.
///
/// # Example
///
/// ```
/// use labor_engine::config::MinimumWageTable;
/// use rust_decimal::Decimal;
///
/// let table = MinimumWageTable::from_rates([(2024, Decimal::new(9860, 0))]);
/// assert_eq!(table.hourly_wage(2024).unwrap(), Decimal::new(9860, 0));
/// assert!(table.hourly_wage(2019).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MinimumWageTable {
    rates: BTreeMap<i32, Decimal>,
}

impl MinimumWageTable {
    /// Builds a table from `(year, hourly)` pairs. Later duplicates win.
    pub fn from_rates(rates: impl IntoIterator<Item = (i32, Decimal)>) -> Self {
        Self {
            rates: rates.into_iter().collect(),
        }
    }

    /// Returns the hourly minimum wage for `year`.
    pub fn hourly_wage(&self, year: i32) -> EngineResult<Decimal> {
        self.rates
            .get(&year)
            .copied()
            .ok_or(EngineError::MinimumWageNotFound { year })
    }

    /// Returns all configured years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rates.keys().copied()
    }

    /// Returns true when no rate is configured.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// One tier of the retirement-income service deduction.
///
/// The deduction for `years` inside this tier is
/// `base + (years - over_years) * per_year`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDeductionTier {
    /// Inclusive upper bound in years. `None` for the open-ended last tier.
    #[serde(default)]
    pub max_years: Option<u32>,
    /// Years already covered by `base`.
    pub over_years: u32,
    /// Deduction accumulated by the lower tiers.
    pub base: Decimal,
    /// Deduction per year inside this tier.
    pub per_year: Decimal,
}

/// One bracket of the progressive income tax table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Bracket floor; the rate applies to income above it.
    pub lower: Decimal,
    /// Inclusive upper bound. `None` for the open-ended top bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Marginal rate as a fraction (0.15 for 15%).
    pub rate: Decimal,
    /// Tax accumulated by the lower brackets.
    pub base: Decimal,
}

impl TaxBracket {
    /// Returns true when `income` falls inside this bracket.
    pub fn contains(&self, income: Decimal) -> bool {
        match self.upper {
            Some(upper) => income <= upper,
            None => true,
        }
    }

    /// Tax on `income` under the cumulative-bracket formula, or `None`
    /// when the amount leaves the `Decimal` range.
    pub fn tax_on(&self, income: Decimal) -> Option<Decimal> {
        let excess = income.checked_sub(self.lower)?.max(Decimal::ZERO);
        self.base.checked_add(excess.checked_mul(self.rate)?)
    }
}

/// Retirement income tax rules loaded from `retirement_tax.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRules {
    /// The tax year these rules were published for.
    pub effective_year: i32,
    /// Service deduction tiers, ascending.
    pub service_deduction: Vec<ServiceDeductionTier>,
    /// Progressive brackets, ascending.
    pub brackets: Vec<TaxBracket>,
    /// Statutory reduction applied to the calculated tax (0.20).
    pub reduction_rate: Decimal,
    /// Local income surtax rate on the retirement tax (0.10).
    pub local_tax_rate: Decimal,
}

impl TaxRules {
    /// Checks that both tables are non-empty and end with an open-ended entry.
    pub fn validate(&self) -> Result<(), String> {
        match self.service_deduction.last() {
            None => return Err("service_deduction must not be empty".to_string()),
            Some(tier) if tier.max_years.is_some() => {
                return Err("last service_deduction tier must omit max_years".to_string());
            }
            _ => {}
        }
        match self.brackets.last() {
            None => return Err("brackets must not be empty".to_string()),
            Some(bracket) if bracket.upper.is_some() => {
                return Err("last bracket must omit upper".to_string());
            }
            _ => {}
        }
        let ascending = self
            .brackets
            .windows(2)
            .all(|pair| pair[0].lower < pair[1].lower);
        if !ascending {
            return Err("brackets must be sorted by lower bound".to_string());
        }
        Ok(())
    }

    /// Returns the deduction tier that covers `years` of service.
    pub fn deduction_tier(&self, years: u32) -> EngineResult<&ServiceDeductionTier> {
        self.service_deduction
            .iter()
            .find(|tier| tier.max_years.is_none_or(|max| years <= max))
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("no service deduction tier covers {} years", years),
            })
    }

    /// Returns the bracket that `income` falls into.
    ///
    /// Upper bounds are inclusive, so income exactly on a boundary is taxed
    /// at the lower bracket's rate.
    pub fn bracket_for(&self, income: Decimal) -> EngineResult<&TaxBracket> {
        self.brackets
            .iter()
            .find(|bracket| bracket.contains(income))
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("no tax bracket covers income {}", income),
            })
    }
}

/// The complete statutory configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct LaborConfig {
    minimum_wage: MinimumWageTable,
    minimum_wage_source: String,
    tax_rules: TaxRules,
}

impl LaborConfig {
    /// Creates a new LaborConfig from its component parts.
    pub fn new(minimum_wage: MinimumWageConfig, tax_rules: TaxRules) -> Self {
        let table =
            MinimumWageTable::from_rates(minimum_wage.rates.iter().map(|r| (r.year, r.hourly)));
        Self {
            minimum_wage: table,
            minimum_wage_source: minimum_wage.source,
            tax_rules,
        }
    }

    /// Returns the minimum wage table.
    pub fn minimum_wage(&self) -> &MinimumWageTable {
        &self.minimum_wage
    }

    /// Returns the publication the minimum wage table was taken from.
    pub fn minimum_wage_source(&self) -> &str {
        &self.minimum_wage_source
    }

    /// Returns the retirement income tax rules.
    pub fn tax_rules(&self) -> &TaxRules {
        &self.tax_rules
    }
}
