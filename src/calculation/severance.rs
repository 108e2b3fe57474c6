//! Severance pay calculation.
//!
//! This module computes retirement severance under the Employee Retirement
//! Benefit Security Act for defined-benefit (DB), defined-contribution (DC)
//! and hybrid plans.

use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrail, SeveranceInput, SeverancePlan, SeveranceResult};

use super::service_period::calendar_months_between;
use super::won::{checked_add, checked_div, checked_mul, checked_sub, floor_won, format_won};

/// Days of wage that make up one month of severance.
pub const DAYS_PER_SEVERANCE_MONTH: i64 = 30;

/// Days per year of service in the DB formula.
pub const DAYS_PER_SEVERANCE_YEAR: i64 = 365;

/// Years of service that earn one continuous-service bonus month.
pub const CONTINUOUS_SERVICE_INTERVAL_YEARS: i64 = 5;

const CLAUSE_DB: &str = "근로자퇴직급여 보장법 제8조";
const CLAUSE_DC: &str = "근로자퇴직급여 보장법 제20조";
const CLAUSE_HYBRID: &str = "근로자퇴직급여 보장법 제6조";

/// The DB formula's components for one service span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DbAmount {
    daily_wage: Decimal,
    severance: Decimal,
    bonus: Decimal,
}

/// Applies the DB formula.
///
/// `daily_wage = average_monthly_pay / 30`. From one year of service the
/// severance is 30 days of wage per 365 days worked, prorated continuously;
/// below one year it is one day of wage per day worked. The products are
/// taken on the monthly pay directly so no repeating decimal is truncated.
fn db_amount(
    average_monthly_pay: Decimal,
    working_days: i64,
    working_years: i64,
) -> EngineResult<DbAmount> {
    let days = Decimal::from(working_days);
    let daily_wage = checked_div(average_monthly_pay, Decimal::from(DAYS_PER_SEVERANCE_MONTH))?;

    let divisor = if working_days >= DAYS_PER_SEVERANCE_YEAR {
        DAYS_PER_SEVERANCE_YEAR
    } else {
        DAYS_PER_SEVERANCE_MONTH
    };
    let severance = checked_div(
        checked_mul(average_monthly_pay, days)?,
        Decimal::from(divisor),
    )?;

    let bonus_months = working_years / CONTINUOUS_SERVICE_INTERVAL_YEARS;
    let bonus = checked_mul(average_monthly_pay, Decimal::from(bonus_months))?;

    Ok(DbAmount {
        daily_wage,
        severance: floor_won(severance),
        bonus: floor_won(bonus),
    })
}

/// Future value of `months` monthly contributions at `annual_return_rate` percent.
///
/// Compounds monthly at `rate / 100 / 12`. A zero rate returns the principal.
fn dc_future_value(
    monthly_contribution: Decimal,
    annual_return_rate: Decimal,
    months: i64,
) -> EngineResult<Decimal> {
    let principal = checked_mul(monthly_contribution, Decimal::from(months))?;
    let monthly_rate = checked_div(
        checked_div(annual_return_rate, Decimal::ONE_HUNDRED)?,
        Decimal::from(12),
    )?;

    if monthly_rate <= Decimal::ZERO || months <= 0 {
        return Ok(floor_won(principal));
    }

    let growth = checked_add(Decimal::ONE, monthly_rate)?
        .checked_powu(months as u64)
        .ok_or_else(|| EngineError::CalculationError {
            message: format!("compound growth overflowed over {} months", months),
        })?;

    let future_value = checked_div(
        checked_mul(monthly_contribution, checked_sub(growth, Decimal::ONE)?)?,
        monthly_rate,
    )?;
    Ok(floor_won(future_value))
}

fn require_positive(field: &str, value: Decimal) -> EngineResult<()> {
    if value <= Decimal::ZERO {
        return Err(EngineError::invalid_input(field, "must be greater than zero"));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_input(field, "must not be negative"));
    }
    Ok(())
}

fn validate_plan(plan: &SeverancePlan) -> EngineResult<()> {
    match plan {
        SeverancePlan::Db {
            average_monthly_pay,
        } => require_positive("average_monthly_pay", *average_monthly_pay),
        SeverancePlan::Dc {
            monthly_contribution,
            annual_return_rate,
        } => {
            require_non_negative("monthly_contribution", *monthly_contribution)?;
            require_non_negative("annual_return_rate", *annual_return_rate)
        }
        SeverancePlan::Hybrid {
            average_monthly_pay,
            monthly_contribution,
            annual_return_rate,
            db_ratio,
        } => {
            require_non_negative("average_monthly_pay", *average_monthly_pay)?;
            require_non_negative("monthly_contribution", *monthly_contribution)?;
            require_non_negative("annual_return_rate", *annual_return_rate)?;
            if *db_ratio < Decimal::ZERO || *db_ratio > Decimal::ONE_HUNDRED {
                return Err(EngineError::invalid_input(
                    "db_ratio",
                    "must be between 0 and 100",
                ));
            }
            Ok(())
        }
    }
}

/// Calculates severance pay for one employment span.
///
/// * DB: 30 days of average wage per year of service, plus one month of
///   average wage for every five completed years.
/// * DC: monthly contributions compounded at the annual return rate.
/// * Hybrid: the DB amount and the DC principal weighted by `db_ratio`.
///   The DC share here is simple principal, not compounded.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when the end date is not after the
/// start date or a plan amount is negative, and
/// [`EngineError::CalculationError`] when an amount is too large to compute.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::calculate_severance;
/// use labor_engine::models::{SeveranceInput, SeverancePlan};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let input = SeveranceInput {
///     employment_start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
///     employment_end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     plan: SeverancePlan::Db {
///         average_monthly_pay: Decimal::from(3_000_000),
///     },
/// };
///
/// let result = calculate_severance(&input).unwrap();
/// assert_eq!(result.working_days, 365);
/// assert_eq!(result.severance_amount, Decimal::from(3_000_000));
/// assert_eq!(result.total_amount, Decimal::from(3_000_000));
/// ```
pub fn calculate_severance(input: &SeveranceInput) -> EngineResult<SeveranceResult> {
    if input.employment_end <= input.employment_start {
        return Err(EngineError::invalid_input(
            "employment_end",
            format!(
                "employment end {} must be after employment start {}",
                input.employment_end, input.employment_start
            ),
        ));
    }
    validate_plan(&input.plan)?;

    let working_days = (input.employment_end - input.employment_start).num_days();
    let working_years = working_days / DAYS_PER_SEVERANCE_YEAR;
    let working_months = calendar_months_between(input.employment_start, input.employment_end);

    let mut trail = AuditTrail::new();
    trail.record(
        "service_period",
        "Service Period",
        CLAUSE_DB,
        serde_json::json!({
            "employment_start": input.employment_start,
            "employment_end": input.employment_end
        }),
        serde_json::json!({
            "working_days": working_days,
            "working_years": working_years,
            "working_months": working_months
        }),
        format!(
            "{} days, {} completed years, {} completed months",
            working_days, working_years, working_months
        ),
    );

    let (severance_amount, continuous_service_bonus, calculation_method) = match &input.plan {
        SeverancePlan::Db {
            average_monthly_pay,
        } => {
            let db = db_amount(*average_monthly_pay, working_days, working_years)?;
            let mut method = if working_days >= DAYS_PER_SEVERANCE_YEAR {
                format!(
                    "DB형: 1일 평균임금 {}원 × 30일 × (근속일수 {}일 ÷ 365)",
                    format_won(db.daily_wage.round_dp(2)),
                    working_days
                )
            } else {
                format!(
                    "DB형: 1일 평균임금 {}원 × 근속일수 {}일",
                    format_won(db.daily_wage.round_dp(2)),
                    working_days
                )
            };
            if db.bonus > Decimal::ZERO {
                method.push_str(&format!(
                    " + 장기근속 가산 {}원 ({}년 근속)",
                    format_won(db.bonus),
                    working_years
                ));
            }

            trail.record(
                "db_severance",
                "Defined Benefit Severance",
                CLAUSE_DB,
                serde_json::json!({
                    "average_monthly_pay": average_monthly_pay.to_string(),
                    "working_days": working_days
                }),
                serde_json::json!({
                    "daily_wage": db.daily_wage.round_dp(2).to_string(),
                    "severance": db.severance.to_string()
                }),
                method.clone(),
            );
            trail.record(
                "continuous_service_bonus",
                "Continuous Service Bonus",
                CLAUSE_DB,
                serde_json::json!({ "working_years": working_years }),
                serde_json::json!({ "bonus": db.bonus.to_string() }),
                if db.bonus > Decimal::ZERO {
                    format!(
                        "{} completed years: {} bonus month(s)",
                        working_years,
                        working_years / CONTINUOUS_SERVICE_INTERVAL_YEARS
                    )
                } else {
                    "Fewer than 5 completed years: no bonus".to_string()
                },
            );

            (db.severance, db.bonus, method)
        }
        SeverancePlan::Dc {
            monthly_contribution,
            annual_return_rate,
        } => {
            let principal = floor_won(checked_mul(
                *monthly_contribution,
                Decimal::from(working_months),
            )?);
            let future_value =
                dc_future_value(*monthly_contribution, *annual_return_rate, working_months)?;
            let method = if *annual_return_rate > Decimal::ZERO {
                format!(
                    "DC형: 월 부담금 {}원 × {}개월, 연 수익률 {}% 월복리",
                    format_won(*monthly_contribution),
                    working_months,
                    annual_return_rate.normalize()
                )
            } else {
                format!(
                    "DC형: 월 부담금 {}원 × {}개월 (수익률 0%)",
                    format_won(*monthly_contribution),
                    working_months
                )
            };

            trail.record(
                "dc_future_value",
                "Defined Contribution Accumulation",
                CLAUSE_DC,
                serde_json::json!({
                    "monthly_contribution": monthly_contribution.to_string(),
                    "annual_return_rate": annual_return_rate.to_string(),
                    "months": working_months
                }),
                serde_json::json!({
                    "principal": principal.to_string(),
                    "future_value": future_value.to_string()
                }),
                method.clone(),
            );

            (future_value, Decimal::ZERO, method)
        }
        SeverancePlan::Hybrid {
            average_monthly_pay,
            monthly_contribution,
            annual_return_rate: _,
            db_ratio,
        } => {
            let db = db_amount(*average_monthly_pay, working_days, working_years)?;
            let db_share = *db_ratio / Decimal::ONE_HUNDRED;
            let dc_share = Decimal::ONE - db_share;
            let principal = checked_mul(*monthly_contribution, Decimal::from(working_months))?;

            let db_portion = checked_mul(db.severance, db_share)?;
            let dc_portion = checked_mul(principal, dc_share)?;
            let amount = floor_won(checked_add(db_portion, dc_portion)?);

            let method = format!(
                "혼합형: DB {}% ({}원) + DC {}% (원금 {}원)",
                db_ratio.normalize(),
                format_won(floor_won(db_portion)),
                (Decimal::ONE_HUNDRED - *db_ratio).normalize(),
                format_won(floor_won(dc_portion))
            );

            trail.record(
                "hybrid_severance",
                "Hybrid Severance",
                CLAUSE_HYBRID,
                serde_json::json!({
                    "db_ratio": db_ratio.to_string(),
                    "db_severance": db.severance.to_string(),
                    "dc_principal": floor_won(principal).to_string()
                }),
                serde_json::json!({
                    "db_portion": db_portion.round_dp(2).to_string(),
                    "dc_portion": dc_portion.round_dp(2).to_string(),
                    "amount": amount.to_string()
                }),
                format!("{} (DC share uses simple principal)", method),
            );

            (amount, Decimal::ZERO, method)
        }
    };

    let total_amount = checked_add(severance_amount, continuous_service_bonus)?;

    debug!(
        plan_type = ?input.plan.plan_type(),
        working_days,
        total_amount = %total_amount,
        "Severance calculated"
    );

    Ok(SeveranceResult {
        working_days,
        working_years,
        working_months,
        plan_type: input.plan.plan_type(),
        severance_amount,
        continuous_service_bonus,
        total_amount,
        calculation_method,
        audit_steps: trail.into_steps(),
    })
}
