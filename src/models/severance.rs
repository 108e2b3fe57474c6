//! Severance pay and average wage models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditStep;

/// The retirement benefit scheme an employee is enrolled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    /// Defined benefit (퇴직금 / DB형).
    Db,
    /// Defined contribution (DC형).
    Dc,
    /// A DB/DC mix split by a ratio.
    Hybrid,
}

/// Plan-specific severance inputs.
///
/// Each variant carries exactly the fields its formula needs, so a DB plan
/// can never arrive without an average monthly pay.
///
/// # Example
///
/// ```
/// use labor_engine::models::{PlanType, SeverancePlan};
///
/// let json = r#"{"plan_type": "dc", "monthly_contribution": 200000, "annual_return_rate": 3.5}"#;
/// let plan: SeverancePlan = serde_json::from_str(json).unwrap();
/// assert_eq!(plan.plan_type(), PlanType::Dc);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "plan_type", rename_all = "snake_case")]
pub enum SeverancePlan {
    /// Defined benefit.
    Db {
        /// Average monthly wage over the final three months.
        average_monthly_pay: Decimal,
    },
    /// Defined contribution.
    Dc {
        /// Employer contribution per month.
        monthly_contribution: Decimal,
        /// Annual return in percent (3.5 for 3.5%).
        annual_return_rate: Decimal,
    },
    /// DB/DC mix.
    Hybrid {
        /// Average monthly wage for the DB portion.
        average_monthly_pay: Decimal,
        /// Monthly contribution for the DC portion.
        monthly_contribution: Decimal,
        /// Annual return in percent, recorded for the DC portion.
        annual_return_rate: Decimal,
        /// Share of the DB portion in percent, 0-100.
        db_ratio: Decimal,
    },
}

impl SeverancePlan {
    /// Returns the discriminator of this plan.
    pub fn plan_type(&self) -> PlanType {
        match self {
            SeverancePlan::Db { .. } => PlanType::Db,
            SeverancePlan::Dc { .. } => PlanType::Dc,
            SeverancePlan::Hybrid { .. } => PlanType::Hybrid,
        }
    }
}

/// Input to the severance calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceInput {
    /// First day of employment.
    pub employment_start: NaiveDate,
    /// Termination date. Must be after `employment_start`.
    pub employment_end: NaiveDate,
    /// Plan type and its inputs.
    #[serde(flatten)]
    pub plan: SeverancePlan,
}

/// Result of the severance calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeveranceResult {
    /// Days between start and end.
    pub working_days: i64,
    /// Completed 365-day years.
    pub working_years: i64,
    /// Completed calendar months.
    pub working_months: i64,
    /// The plan that was applied.
    pub plan_type: PlanType,
    /// Severance before any continuous-service bonus.
    pub severance_amount: Decimal,
    /// Extra month of pay per five years of service (DB only).
    pub continuous_service_bonus: Decimal,
    /// `severance_amount + continuous_service_bonus`.
    pub total_amount: Decimal,
    /// Human-readable formula.
    pub calculation_method: String,
    /// Rule decisions made during the calculation.
    pub audit_steps: Vec<AuditStep>,
}

/// Pay for one of the three months before termination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPayRecord {
    /// Base salary paid for the month.
    pub base_salary: Decimal,
    /// Allowances paid for the month.
    #[serde(default)]
    pub allowances: Vec<Decimal>,
    /// Days in the period. Required and positive.
    #[serde(default)]
    pub working_days: Option<u32>,
}

impl MonthlyPayRecord {
    /// Base salary plus allowances, or `None` when the sum overflows.
    pub fn total_pay(&self) -> Option<Decimal> {
        self.allowances
            .iter()
            .try_fold(self.base_salary, |sum, amount| sum.checked_add(*amount))
    }
}

/// Input to the average wage calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageWageInput {
    /// The three months preceding termination, oldest first.
    pub months: [MonthlyPayRecord; 3],
    /// Fixed bonus paid over the last year.
    #[serde(default)]
    pub annual_fixed_bonus: Option<Decimal>,
    /// Annual leave allowance paid over the last year.
    #[serde(default)]
    pub annual_leave_allowance: Option<Decimal>,
}

/// Result of the average wage calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AverageWageResult {
    /// Sum of base salary and allowances over the three months.
    pub total_pay: Decimal,
    /// Sum of working days over the three months.
    pub total_days: u32,
    /// `total_pay / total_days`.
    pub basic_daily_wage: Decimal,
    /// `annual_fixed_bonus / 365`.
    pub daily_fixed_bonus: Decimal,
    /// `annual_leave_allowance / 365`.
    pub daily_leave_allowance: Decimal,
    /// Sum of the three daily components.
    pub final_daily_wage: Decimal,
    /// `final_daily_wage * 30`, usable as a DB plan's average monthly pay.
    pub monthly_average_wage: Decimal,
    /// Rule decisions made during the calculation.
    pub audit_steps: Vec<AuditStep>,
}

/// One calendar period of the three-month averaging window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WagePeriod {
    /// First day, inclusive.
    pub start: NaiveDate,
    /// Last day, inclusive.
    pub end: NaiveDate,
    /// Calendar days in the period.
    pub days: u32,
}
