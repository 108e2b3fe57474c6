//! Minimum wage compliance check.
//!
//! Monthly pay is reduced to the amount that counts toward the statutory
//! minimum, divided by monthly hours, and compared with the hourly minimum
//! for the requested year.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::config::MinimumWageTable;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrail, MinimumWageInput, MinimumWageResult};

use super::won::{checked_add, checked_div, checked_mul, checked_sum, floor_won, format_won};

/// Average weeks per month used to convert weekly hours to monthly hours.
pub const WEEKS_PER_MONTH: Decimal = Decimal::from_parts(4345, 0, 0, false, 3);

/// Meal and transport subsidies up to `monthly pay / 25` count toward the minimum.
pub const MEAL_TRANSPORT_LIMIT_DIVISOR: u32 = 25;

/// Hours in a week.
pub const MAX_WEEKLY_HOURS: u32 = 168;

/// Statutory weekly working hours.
pub const STANDARD_WEEKLY_HOURS: u32 = 40;

/// Overtime must be paid at least this multiple of the base hourly rate.
pub const OVERTIME_PREMIUM: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

const CLAUSE_INCLUSION: &str = "최저임금법 제6조 제4항";
const CLAUSE_MINIMUM: &str = "최저임금법 제6조 제1항";

/// Checks monthly pay against the statutory hourly minimum for `input.year`.
///
/// A violation is `includable_pay < minimum_hourly_wage * total_hours`,
/// compared exactly; a wage at the minimum is not a violation. The reported
/// hourly wage and shortfall are rounded to two decimals only after the
/// comparison.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when base pay or weekly hours are
/// not positive or any amount is negative,
/// [`EngineError::MinimumWageNotFound`] when the table has no rate for the
/// year, and [`EngineError::CalculationError`] when an amount leaves the
/// `Decimal` range.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::check_minimum_wage;
/// use labor_engine::config::MinimumWageTable;
/// use labor_engine::models::{MinimumWageInput, PayComponents, WorkingHours};
/// use rust_decimal::Decimal;
///
/// let table = MinimumWageTable::from_rates([(2024, Decimal::from(9860))]);
/// let input = MinimumWageInput {
///     pay: PayComponents { base_pay: Decimal::from(1_713_668), ..Default::default() },
///     hours: WorkingHours { weekly_hours: Decimal::from(40), ..Default::default() },
///     year: 2024,
/// };
///
/// let result = check_minimum_wage(&input, &table).unwrap();
/// assert_eq!(result.effective_hourly_wage, Decimal::from(9860));
/// assert!(!result.is_violation);
/// ```
pub fn check_minimum_wage(
    input: &MinimumWageInput,
    table: &MinimumWageTable,
) -> EngineResult<MinimumWageResult> {
    validate(input)?;
    let minimum_hourly_wage = table.hourly_wage(input.year)?;

    let pay = &input.pay;
    let hours = &input.hours;
    let mut trail = AuditTrail::new();

    let monthly_regular_hours = checked_mul(hours.weekly_hours, WEEKS_PER_MONTH)?;
    let total_hours = checked_sum([
        monthly_regular_hours,
        hours.overtime_hours,
        hours.night_hours,
        hours.holiday_hours,
    ])?;

    let total_pay = pay.total().ok_or_else(|| EngineError::CalculationError {
        message: "pay total out of range".to_string(),
    })?;
    let limit = floor_won(checked_div(
        checked_add(pay.base_pay, pay.fixed_allowances)?,
        Decimal::from(MEAL_TRANSPORT_LIMIT_DIVISOR),
    )?);
    let excluded_meal = (pay.meal_allowance - limit).max(Decimal::ZERO);
    let excluded_transport = (pay.transport_allowance - limit).max(Decimal::ZERO);
    let excluded_bonus = pay.bonus;
    let includable_pay = total_pay - excluded_meal - excluded_transport - excluded_bonus;
    trail.record(
        "includable_pay",
        "Includable Pay",
        CLAUSE_INCLUSION,
        serde_json::json!({
            "total_pay": total_pay.to_string(),
            "meal_transport_limit": limit.to_string()
        }),
        serde_json::json!({
            "excluded_meal": excluded_meal.to_string(),
            "excluded_transport": excluded_transport.to_string(),
            "excluded_bonus": excluded_bonus.to_string(),
            "includable_pay": includable_pay.to_string()
        }),
        format!(
            "{}원 - 식대 초과 {}원 - 교통비 초과 {}원 - 상여금 {}원 = {}원",
            format_won(total_pay),
            format_won(excluded_meal),
            format_won(excluded_transport),
            format_won(excluded_bonus),
            format_won(includable_pay)
        ),
    );

    let exact_hourly_wage = checked_div(includable_pay, total_hours)?;
    let required_pay = checked_mul(minimum_hourly_wage, total_hours)?;
    let is_violation = includable_pay < required_pay;

    let effective_hourly_wage = round_hourly(exact_hourly_wage);
    let (shortfall, monthly_shortfall) = if is_violation {
        (
            round_hourly(minimum_hourly_wage - exact_hourly_wage),
            floor_won(required_pay - includable_pay),
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };
    trail.record(
        "minimum_wage_comparison",
        "Minimum Wage Comparison",
        CLAUSE_MINIMUM,
        serde_json::json!({
            "includable_pay": includable_pay.to_string(),
            "total_hours": total_hours.to_string(),
            "minimum_hourly_wage": minimum_hourly_wage.to_string()
        }),
        serde_json::json!({
            "required_pay": required_pay.to_string(),
            "effective_hourly_wage": effective_hourly_wage.to_string(),
            "is_violation": is_violation,
            "shortfall": shortfall.to_string()
        }),
        format!(
            "{}원 ÷ {}시간 = {}원 ({}년 최저임금 {}원)",
            format_won(includable_pay),
            total_hours.normalize(),
            format_won(effective_hourly_wage),
            input.year,
            format_won(minimum_hourly_wage)
        ),
    );

    let recommendations = recommendations(
        input,
        is_violation,
        monthly_shortfall,
        monthly_regular_hours,
        excluded_meal + excluded_transport,
    )?;

    debug!(
        year = input.year,
        effective_hourly_wage = %effective_hourly_wage,
        is_violation,
        "Minimum wage checked"
    );

    Ok(MinimumWageResult {
        year: input.year,
        minimum_hourly_wage,
        total_pay,
        excluded_meal,
        excluded_transport,
        excluded_bonus,
        includable_pay,
        monthly_regular_hours,
        total_hours,
        effective_hourly_wage,
        is_violation,
        shortfall,
        monthly_shortfall,
        recommendations,
        audit_steps: trail.into_steps(),
    })
}

fn round_hourly(amount: Decimal) -> Decimal {
    amount
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

fn validate(input: &MinimumWageInput) -> EngineResult<()> {
    if input.pay.base_pay <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "pay.base_pay",
            "must be greater than zero",
        ));
    }
    for (name, amount) in input.pay.items() {
        if amount < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                format!("pay.{}", name),
                "must not be negative",
            ));
        }
    }

    let hours = &input.hours;
    if hours.weekly_hours <= Decimal::ZERO || hours.weekly_hours > Decimal::from(MAX_WEEKLY_HOURS) {
        return Err(EngineError::invalid_input(
            "hours.weekly_hours",
            format!("must be greater than zero and at most {}", MAX_WEEKLY_HOURS),
        ));
    }
    let extra = [
        ("overtime_hours", hours.overtime_hours),
        ("night_hours", hours.night_hours),
        ("holiday_hours", hours.holiday_hours),
    ];
    for (name, value) in extra {
        if value < Decimal::ZERO {
            return Err(EngineError::invalid_input(
                format!("hours.{}", name),
                "must not be negative",
            ));
        }
    }
    Ok(())
}

fn recommendations(
    input: &MinimumWageInput,
    is_violation: bool,
    monthly_shortfall: Decimal,
    monthly_regular_hours: Decimal,
    excluded_subsidies: Decimal,
) -> EngineResult<Vec<String>> {
    let pay = &input.pay;
    let hours = &input.hours;
    let mut out = Vec::new();

    if is_violation {
        out.push(format!(
            "최저임금 미달입니다. 월 {}원 이상 인상이 필요합니다.",
            format_won(monthly_shortfall)
        ));
    } else {
        out.push("최저임금 기준을 충족합니다.".to_string());
    }

    if hours.weekly_hours > Decimal::from(STANDARD_WEEKLY_HOURS) {
        out.push(format!(
            "주 소정근로시간이 {}시간을 초과합니다. 초과분은 연장근로로 처리해야 합니다.",
            STANDARD_WEEKLY_HOURS
        ));
    }

    if hours.overtime_hours > Decimal::ZERO {
        let base_hourly = checked_div(pay.base_pay, monthly_regular_hours)?;
        let required = floor_won(checked_mul(
            checked_mul(hours.overtime_hours, base_hourly)?,
            OVERTIME_PREMIUM,
        )?);
        if pay.overtime_pay < required {
            out.push(format!(
                "연장근로수당이 통상시급의 {}배 기준({}원)에 미달합니다.",
                OVERTIME_PREMIUM,
                format_won(required)
            ));
        }
    }

    if pay.bonus > Decimal::ZERO {
        out.push(format!(
            "상여금 {}원은 최저임금 산입범위에서 제외되었습니다.",
            format_won(pay.bonus)
        ));
    }

    if excluded_subsidies > Decimal::ZERO {
        out.push(format!(
            "식대·교통비 중 {}원이 산입 한도를 초과해 제외되었습니다.",
            format_won(excluded_subsidies)
        ));
    }

    Ok(out)
}
