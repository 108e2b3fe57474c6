//! Annual leave entitlement.
//!
//! Computes paid annual leave under article 60 of the Labor Standards Act
//! twice: once from the employee's own hire anniversary and once from the
//! company's fiscal-year start, and shows how the two diverge year by year.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrail, FiscalYearStart, LeaveCalculationInput, LeaveCalculationResult, LeaveEntitlement,
    YearlyLeaveRecord,
};

use super::service_period::{
    anniversary_in_year, completed_months, completed_years, inclusive_service_days, year_end,
};

/// Basic days granted after one completed year.
pub const BASIC_ANNUAL_LEAVE_DAYS: u32 = 15;

/// Ceiling on seniority days added to the basic 15.
pub const MAX_ADDITIONAL_LEAVE_DAYS: u32 = 10;

/// Ceiling on monthly-accrued days in a partial fiscal year.
pub const MAX_PRORATED_FISCAL_DAYS: u32 = 12;

const CLAUSE_BASIC: &str = "근로기준법 제60조 제1항";
const CLAUSE_MONTHLY: &str = "근로기준법 제60조 제2항";
const CLAUSE_ADDITIONAL: &str = "근로기준법 제60조 제4항";

/// How the fiscal-year rule was applied at one evaluation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FiscalEvaluation {
    fiscal_start: NaiveDate,
    years_at_start: i64,
    mid_year: bool,
    entitlement: LeaveEntitlement,
}

/// Entitlement under the hire-date rule for `service_days` of service.
///
/// One completed year or more grants 15 days plus one extra day for every
/// two years beyond the first, from the third year on, capped at 10 extra
/// days. Before the first year, one day per completed month.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::hire_date_entitlement;
///
/// // 2021-01-01 through 2024-01-02, counting the hire day
/// let leave = hire_date_entitlement(1097);
/// assert_eq!(leave.basic, 15);
/// assert_eq!(leave.additional, 1);
/// assert_eq!(leave.total, 16);
/// ```
pub fn hire_date_entitlement(service_days: i64) -> LeaveEntitlement {
    let years = completed_years(service_days);
    if years >= 1 {
        LeaveEntitlement::new(BASIC_ANNUAL_LEAVE_DAYS, additional_days(years))
    } else {
        let months = completed_months(service_days).max(0);
        LeaveEntitlement::new(months as u32, 0)
    }
}

/// Seniority days for `years` completed years.
fn additional_days(years: i64) -> u32 {
    if years < 3 {
        return 0;
    }
    let extra = ((years - 1) / 2) as u32;
    extra.min(MAX_ADDITIONAL_LEAVE_DAYS)
}

/// Applies the fiscal-year rule as of `as_of`.
///
/// An employee hired after the current fiscal start accrues one day per
/// completed month worked in that fiscal year, capped at 12. Anyone hired on
/// or before it gets the hire-date entitlement evaluated at the fiscal start.
fn fiscal_year_entitlement(
    hire_date: NaiveDate,
    as_of: NaiveDate,
    fiscal_year_start: FiscalYearStart,
) -> EngineResult<FiscalEvaluation> {
    let mut fiscal_start = fiscal_year_start.in_year(as_of.year())?;
    if fiscal_start > as_of {
        fiscal_start = fiscal_year_start.in_year(as_of.year() - 1)?;
    }

    if hire_date > fiscal_start {
        // Hired within this fiscal year, so every month since hire falls inside it.
        let months = completed_months(inclusive_service_days(hire_date, as_of)).max(0) as u32;
        return Ok(FiscalEvaluation {
            fiscal_start,
            years_at_start: 0,
            mid_year: true,
            entitlement: LeaveEntitlement::new(months.min(MAX_PRORATED_FISCAL_DAYS), 0),
        });
    }

    let days_at_start = inclusive_service_days(hire_date, fiscal_start);
    Ok(FiscalEvaluation {
        fiscal_start,
        years_at_start: completed_years(days_at_start),
        mid_year: false,
        entitlement: hire_date_entitlement(days_at_start),
    })
}

/// "N개월차" during the first year of service, "N년차" afterwards.
fn service_description(service_days: i64) -> String {
    let years = completed_years(service_days);
    if years < 1 {
        format!("{}개월차", completed_months(service_days).max(0) + 1)
    } else {
        format!("{}년차", years + 1)
    }
}

/// Calculates annual leave under both the hire-date and fiscal-year rules.
///
/// Service days count the hire day itself. Years and months of service use
/// the averaged 365.25 and 30.4375 day divisors, which drift slightly from
/// calendar anniversaries over long tenures.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when the reference date precedes
/// the hire date.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::calculate_annual_leave;
/// use labor_engine::models::LeaveCalculationInput;
///
/// let input = LeaveCalculationInput::parse("2023-01-01", "2024-01-01", "01-01").unwrap();
/// let result = calculate_annual_leave(&input).unwrap();
///
/// assert_eq!(result.hire_based.total, 15);
/// assert_eq!(result.fiscal_based.total, 15);
/// assert_eq!(result.difference, 0);
/// assert_eq!(result.yearly_history.len(), 2);
/// ```
pub fn calculate_annual_leave(input: &LeaveCalculationInput) -> EngineResult<LeaveCalculationResult> {
    let hire_date = input.hire_date;
    let reference_date = input.reference_date;

    if hire_date > reference_date {
        return Err(EngineError::invalid_input(
            "reference_date",
            format!(
                "reference date {} precedes hire date {}",
                reference_date, hire_date
            ),
        ));
    }

    let mut trail = AuditTrail::new();

    let service_days = inclusive_service_days(hire_date, reference_date);
    let service_years = completed_years(service_days);
    let service_months = completed_months(service_days);

    trail.record(
        "service_period",
        "Service Period",
        CLAUSE_BASIC,
        serde_json::json!({
            "hire_date": hire_date,
            "reference_date": reference_date
        }),
        serde_json::json!({
            "service_days": service_days,
            "service_years": service_years,
            "service_months": service_months
        }),
        format!(
            "{} days including the hire day = {} years (÷365.25), {} months (÷30.4375)",
            service_days, service_years, service_months
        ),
    );

    let hire_based = hire_date_entitlement(service_days);
    let hire_reasoning = if service_years >= 1 {
        format!(
            "{} completed years: {} basic + {} additional = {} days",
            service_years, hire_based.basic, hire_based.additional, hire_based.total
        )
    } else {
        format!(
            "Less than one year: 1 day per completed month = {} days",
            hire_based.basic
        )
    };
    trail.record(
        "hire_date_rule",
        "Hire-Date Leave Entitlement",
        if service_years >= 1 {
            CLAUSE_ADDITIONAL
        } else {
            CLAUSE_MONTHLY
        },
        serde_json::json!({ "service_days": service_days }),
        serde_json::json!({
            "basic": hire_based.basic,
            "additional": hire_based.additional,
            "total": hire_based.total
        }),
        hire_reasoning,
    );

    let fiscal = fiscal_year_entitlement(hire_date, reference_date, input.fiscal_year_start)?;
    let fiscal_reasoning = if fiscal.mid_year {
        format!(
            "Hired after the fiscal year started {}: 1 day per completed month capped at {} = {} days",
            fiscal.fiscal_start, MAX_PRORATED_FISCAL_DAYS, fiscal.entitlement.basic
        )
    } else if fiscal.years_at_start < 1 {
        format!(
            "Fiscal year started {} before one year of service: 1 day per completed month by then = {} days",
            fiscal.fiscal_start, fiscal.entitlement.basic
        )
    } else {
        format!(
            "Fiscal year started {} with {} completed years: {} basic + {} additional = {} days",
            fiscal.fiscal_start,
            fiscal.years_at_start,
            fiscal.entitlement.basic,
            fiscal.entitlement.additional,
            fiscal.entitlement.total
        )
    };
    trail.record(
        "fiscal_year_rule",
        "Fiscal-Year Leave Entitlement",
        CLAUSE_BASIC,
        serde_json::json!({
            "fiscal_year_start": input.fiscal_year_start,
            "fiscal_start_date": fiscal.fiscal_start
        }),
        serde_json::json!({
            "years_at_fiscal_start": fiscal.years_at_start,
            "prorated": fiscal.mid_year,
            "basic": fiscal.entitlement.basic,
            "additional": fiscal.entitlement.additional,
            "total": fiscal.entitlement.total
        }),
        fiscal_reasoning,
    );

    let yearly_history = yearly_history(hire_date, reference_date, input.fiscal_year_start)?;
    let difference = i64::from(hire_based.total) - i64::from(fiscal.entitlement.total);

    debug!(
        service_days,
        hire_total = hire_based.total,
        fiscal_total = fiscal.entitlement.total,
        "Annual leave calculated"
    );

    Ok(LeaveCalculationResult {
        service_days,
        service_years,
        service_months,
        hire_based,
        fiscal_based: fiscal.entitlement,
        difference,
        yearly_history,
        audit_steps: trail.into_steps(),
    })
}

/// One record per calendar year from the hire year to the reference year.
fn yearly_history(
    hire_date: NaiveDate,
    reference_date: NaiveDate,
    fiscal_year_start: FiscalYearStart,
) -> EngineResult<Vec<YearlyLeaveRecord>> {
    let mut records = Vec::new();

    for year in hire_date.year()..=reference_date.year() {
        let as_of = match year_end(year) {
            Some(end) if end < reference_date => end,
            _ => reference_date,
        };

        let service_days = inclusive_service_days(hire_date, as_of);
        let hire_based = hire_date_entitlement(service_days);
        let fiscal = fiscal_year_entitlement(hire_date, as_of, fiscal_year_start)?;

        records.push(YearlyLeaveRecord {
            year,
            as_of,
            hire_based,
            fiscal_based: fiscal.entitlement,
            difference: i64::from(hire_based.total) - i64::from(fiscal.entitlement.total),
            description: service_description(service_days),
            hire_accrual_date: anniversary_in_year(hire_date, year).to_string(),
            fiscal_accrual_date: fiscal_year_start.in_year(year)?.to_string(),
        });
    }

    Ok(records)
}
