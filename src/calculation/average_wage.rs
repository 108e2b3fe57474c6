//! Average wage calculation.
//!
//! The average daily wage that feeds a DB severance is the pay of the three
//! calendar months before termination divided by the days in those months,
//! plus a daily share of the annual fixed bonus and leave allowance.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrail, AverageWageInput, AverageWageResult, WagePeriod};

use super::service_period::inclusive_service_days;
use super::won::{checked_add, checked_div, checked_mul, floor_won, format_won};

/// Most days a monthly pay record can cover.
pub const MAX_DAYS_PER_MONTH: u32 = 31;

/// Days over which annual bonus and leave allowance are spread.
pub const DAYS_PER_YEAR: i64 = 365;

/// Months in the averaging window.
pub const AVERAGE_WAGE_MONTHS: u32 = 3;

const CLAUSE_AVERAGE_WAGE: &str = "근로기준법 제2조 제1항 제6호";

/// Calculates the average daily wage from the three months before termination.
///
/// Every component is truncated to whole won.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when a month has no working days,
/// more than [`MAX_DAYS_PER_MONTH`] of them, or a negative amount, and
/// [`EngineError::CalculationError`] when the amounts overflow.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::calculate_average_wage;
/// use labor_engine::models::{AverageWageInput, MonthlyPayRecord};
/// use rust_decimal::Decimal;
///
/// let month = |days| MonthlyPayRecord {
///     base_salary: Decimal::from(3_000_000),
///     allowances: vec![],
///     working_days: Some(days),
/// };
/// let input = AverageWageInput {
///     months: [month(31), month(30), month(31)],
///     annual_fixed_bonus: None,
///     annual_leave_allowance: None,
/// };
///
/// let result = calculate_average_wage(&input).unwrap();
/// assert_eq!(result.total_days, 92);
/// // 9,000,000 / 92 = 97,826.08...
/// assert_eq!(result.basic_daily_wage, Decimal::from(97_826));
/// ```
pub fn calculate_average_wage(input: &AverageWageInput) -> EngineResult<AverageWageResult> {
    let mut total_pay = Decimal::ZERO;
    let mut total_days: u32 = 0;
    let mut month_pays = Vec::with_capacity(input.months.len());

    for (i, month) in input.months.iter().enumerate() {
        let days = match month.working_days {
            Some(days) if (1..=MAX_DAYS_PER_MONTH).contains(&days) => days,
            _ => {
                return Err(EngineError::invalid_input(
                    format!("months[{}].working_days", i),
                    format!("must be between 1 and {}", MAX_DAYS_PER_MONTH),
                ));
            }
        };
        if month.base_salary < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                format!("months[{}].base_salary", i),
                "must not be negative",
            ));
        }
        if month.allowances.iter().any(|a| *a < Decimal::ZERO) {
            return Err(EngineError::invalid_input(
                format!("months[{}].allowances", i),
                "must not be negative",
            ));
        }

        let month_pay = month
            .total_pay()
            .ok_or_else(|| EngineError::CalculationError {
                message: format!("months[{}] pay total out of range", i),
            })?;
        total_pay = checked_add(total_pay, month_pay)?;
        total_days += days;
        month_pays.push(month_pay);
    }

    let annual_fixed_bonus = input.annual_fixed_bonus.unwrap_or(Decimal::ZERO);
    let annual_leave_allowance = input.annual_leave_allowance.unwrap_or(Decimal::ZERO);
    if annual_fixed_bonus < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "annual_fixed_bonus",
            "must not be negative",
        ));
    }
    if annual_leave_allowance < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "annual_leave_allowance",
            "must not be negative",
        ));
    }

    let basic_daily_wage = floor_won(checked_div(total_pay, Decimal::from(total_days))?);
    let year_days = Decimal::from(DAYS_PER_YEAR);
    let daily_fixed_bonus = floor_won(checked_div(annual_fixed_bonus, year_days)?);
    let daily_leave_allowance = floor_won(checked_div(annual_leave_allowance, year_days)?);
    let final_daily_wage = checked_add(
        checked_add(basic_daily_wage, daily_fixed_bonus)?,
        daily_leave_allowance,
    )?;
    let monthly_average_wage = checked_mul(final_daily_wage, Decimal::from(30))?;

    let mut trail = AuditTrail::new();
    trail.record(
        "three_month_pay",
        "Three-Month Pay",
        CLAUSE_AVERAGE_WAGE,
        serde_json::json!({
            "months": input.months.iter().zip(&month_pays).map(|(m, pay)| serde_json::json!({
                "total_pay": pay.to_string(),
                "working_days": m.working_days
            })).collect::<Vec<_>>()
        }),
        serde_json::json!({
            "total_pay": total_pay.to_string(),
            "total_days": total_days,
            "basic_daily_wage": basic_daily_wage.to_string()
        }),
        format!(
            "{}원 ÷ {}일 = {}원",
            format_won(total_pay),
            total_days,
            format_won(basic_daily_wage)
        ),
    );
    trail.record(
        "annual_amortization",
        "Bonus and Leave Allowance Amortization",
        CLAUSE_AVERAGE_WAGE,
        serde_json::json!({
            "annual_fixed_bonus": annual_fixed_bonus.to_string(),
            "annual_leave_allowance": annual_leave_allowance.to_string()
        }),
        serde_json::json!({
            "daily_fixed_bonus": daily_fixed_bonus.to_string(),
            "daily_leave_allowance": daily_leave_allowance.to_string(),
            "final_daily_wage": final_daily_wage.to_string()
        }),
        format!(
            "Annual amounts ÷ 365: bonus {}원, leave allowance {}원 per day",
            format_won(daily_fixed_bonus),
            format_won(daily_leave_allowance)
        ),
    );

    debug!(
        total_days,
        final_daily_wage = %final_daily_wage,
        "Average wage calculated"
    );

    Ok(AverageWageResult {
        total_pay,
        total_days,
        basic_daily_wage,
        daily_fixed_bonus,
        daily_leave_allowance,
        final_daily_wage,
        monthly_average_wage,
        audit_steps: trail.into_steps(),
    })
}

/// The three contiguous calendar periods ending the day before termination.
///
/// Periods are returned oldest first. Boundaries fall on the termination
/// day-of-month, clamped to the month's end.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::average_wage_periods;
/// use chrono::NaiveDate;
///
/// let periods = average_wage_periods(NaiveDate::from_ymd_opt(2024, 4, 15).unwrap()).unwrap();
/// assert_eq!(periods[0].start.to_string(), "2024-01-15");
/// assert_eq!(periods[2].end.to_string(), "2024-04-14");
/// assert_eq!(periods.iter().map(|p| p.days).sum::<u32>(), 91);
/// ```
pub fn average_wage_periods(termination_date: NaiveDate) -> EngineResult<Vec<WagePeriod>> {
    let boundary = |months_back: u32| {
        termination_date
            .checked_sub_months(Months::new(months_back))
            .ok_or_else(|| EngineError::InvalidDate {
                field: "termination_date".to_string(),
                value: termination_date.to_string(),
            })
    };

    let mut periods = Vec::with_capacity(AVERAGE_WAGE_MONTHS as usize);
    for months_back in (1..=AVERAGE_WAGE_MONTHS).rev() {
        let start = boundary(months_back)?;
        let next = boundary(months_back - 1)?;
        let end = next.pred_opt().ok_or_else(|| EngineError::InvalidDate {
            field: "termination_date".to_string(),
            value: termination_date.to_string(),
        })?;
        let days = u32::try_from(inclusive_service_days(start, end)).map_err(|_| {
            EngineError::CalculationError {
                message: format!("period {} to {} has no valid day count", start, end),
            }
        })?;
        periods.push(WagePeriod { start, end, days });
    }

    Ok(periods)
}
