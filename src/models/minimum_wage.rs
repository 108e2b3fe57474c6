//! Minimum wage compliance models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditStep;

/// Itemized monthly pay.
///
/// Only `base_pay` is required; every other component defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayComponents {
    /// Monthly base pay.
    pub base_pay: Decimal,
    /// Overtime pay.
    #[serde(default)]
    pub overtime_pay: Decimal,
    /// Night work pay.
    #[serde(default)]
    pub night_pay: Decimal,
    /// Holiday work pay.
    #[serde(default)]
    pub holiday_pay: Decimal,
    /// Fixed allowances paid every month.
    #[serde(default)]
    pub fixed_allowances: Decimal,
    /// Bonus. Never counts toward the minimum wage.
    #[serde(default)]
    pub bonus: Decimal,
    /// Meal subsidy.
    #[serde(default)]
    pub meal_allowance: Decimal,
    /// Transport subsidy.
    #[serde(default)]
    pub transport_allowance: Decimal,
}

impl PayComponents {
    /// Sum of every component, or `None` when it overflows.
    pub fn total(&self) -> Option<Decimal> {
        self.items()
            .into_iter()
            .try_fold(Decimal::ZERO, |sum, (_, amount)| sum.checked_add(amount))
    }

    /// Named components, for validation and audit output.
    pub fn items(&self) -> [(&'static str, Decimal); 8] {
        [
            ("base_pay", self.base_pay),
            ("overtime_pay", self.overtime_pay),
            ("night_pay", self.night_pay),
            ("holiday_pay", self.holiday_pay),
            ("fixed_allowances", self.fixed_allowances),
            ("bonus", self.bonus),
            ("meal_allowance", self.meal_allowance),
            ("transport_allowance", self.transport_allowance),
        ]
    }
}

/// Itemized working hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Contracted hours per week.
    pub weekly_hours: Decimal,
    /// Overtime hours in the month.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// Night hours in the month.
    #[serde(default)]
    pub night_hours: Decimal,
    /// Holiday hours in the month.
    #[serde(default)]
    pub holiday_hours: Decimal,
}

/// Input to the minimum wage checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumWageInput {
    /// Monthly pay.
    pub pay: PayComponents,
    /// Hours worked.
    pub hours: WorkingHours,
    /// The year whose statutory minimum applies.
    pub year: i32,
}

/// Result of the minimum wage check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinimumWageResult {
    /// The year checked.
    pub year: i32,
    /// The statutory hourly minimum for `year`.
    pub minimum_hourly_wage: Decimal,
    /// Sum of all pay components.
    pub total_pay: Decimal,
    /// Meal subsidy above the inclusion limit.
    pub excluded_meal: Decimal,
    /// Transport subsidy above the inclusion limit.
    pub excluded_transport: Decimal,
    /// Bonus, always excluded in full.
    pub excluded_bonus: Decimal,
    /// Pay counted toward the minimum wage.
    pub includable_pay: Decimal,
    /// `weekly_hours * 4.345`.
    pub monthly_regular_hours: Decimal,
    /// Regular plus overtime, night and holiday hours.
    pub total_hours: Decimal,
    /// `includable_pay / total_hours`, rounded to two decimals for reporting.
    pub effective_hourly_wage: Decimal,
    /// True when the exact (unrounded) hourly wage is below the minimum.
    pub is_violation: bool,
    /// Hourly shortfall, two decimals, zero when compliant.
    pub shortfall: Decimal,
    /// `minimum_hourly_wage * total_hours - includable_pay`, floored to whole won.
    pub monthly_shortfall: Decimal,
    /// Advisory messages.
    pub recommendations: Vec<String>,
    /// Rule decisions made during the calculation.
    pub audit_steps: Vec<AuditStep>,
}
