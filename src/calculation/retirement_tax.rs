//! Retirement income tax calculation.
//!
//! Severance is taxed separately from ordinary income. A deduction for years
//! of service is taken first, the remainder is spread evenly across the
//! service years, the progressive brackets are applied to that annual slice,
//! and the resulting tax is multiplied back by the years of service.

use rust_decimal::Decimal;
use tracing::debug;

use crate::config::TaxRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrail, RetirementTaxInput, RetirementTaxResult};

use super::won::{checked_add, checked_div, checked_mul, checked_sub, floor_won, format_won};

/// Age from which an advisory note about pension-based tax relief is added.
pub const PENSION_ADVISORY_AGE: u32 = 55;

const CLAUSE_DEDUCTION: &str = "소득세법 제48조";
const CLAUSE_RATE: &str = "소득세법 제55조";
const CLAUSE_LOCAL: &str = "지방세법 제103조의13";

/// Deduction for `years` of service under the configured tiers.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::service_deduction;
/// use labor_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/kr_labor").unwrap();
/// let deduction = service_deduction(12, loader.tax_rules()).unwrap();
/// // 40,000,000 + 2 × 7,000,000
/// assert_eq!(deduction, Decimal::from(54_000_000));
/// ```
pub fn service_deduction(years: u32, rules: &TaxRules) -> EngineResult<Decimal> {
    let tier = rules.deduction_tier(years)?;
    let years_in_tier = years.saturating_sub(tier.over_years);
    checked_add(
        tier.base,
        checked_mul(Decimal::from(years_in_tier), tier.per_year)?,
    )
}

/// Calculates retirement income tax on a severance amount.
///
/// Every intermediate amount is truncated to whole won, so
/// `net_amount + total_tax == severance_amount` holds exactly.
///
/// Age only adds an advisory note; it never changes the tax.
///
/// # Errors
///
/// Returns [`EngineError::InvalidInput`] when the severance amount is
/// negative or the years of service are below 1, and
/// [`EngineError::CalculationError`] when an amount leaves the `Decimal` range.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::calculate_retirement_tax;
/// use labor_engine::config::ConfigLoader;
/// use labor_engine::models::RetirementTaxInput;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/kr_labor").unwrap();
/// let input = RetirementTaxInput {
///     severance_amount: Decimal::from(50_000_000),
///     years_of_service: 10,
///     age: None,
/// };
///
/// let result = calculate_retirement_tax(&input, loader.tax_rules()).unwrap();
/// assert_eq!(result.service_deduction, Decimal::from(40_000_000));
/// assert_eq!(result.converted_income, Decimal::from(1_000_000));
/// assert_eq!(result.net_amount + result.total_tax, input.severance_amount);
/// ```
pub fn calculate_retirement_tax(
    input: &RetirementTaxInput,
    rules: &TaxRules,
) -> EngineResult<RetirementTaxResult> {
    let severance_amount = input.severance_amount;
    let years = input.years_of_service;

    if severance_amount < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "severance_amount",
            "must not be negative",
        ));
    }
    if years < 1 {
        return Err(EngineError::invalid_input(
            "years_of_service",
            "must be at least 1",
        ));
    }

    let mut trail = AuditTrail::new();
    let years_dec = Decimal::from(years);

    let deduction = service_deduction(years, rules)?;
    trail.record(
        "service_deduction",
        "Service Deduction",
        CLAUSE_DEDUCTION,
        serde_json::json!({ "years_of_service": years }),
        serde_json::json!({ "service_deduction": deduction.to_string() }),
        format!("{}년 근속 공제 {}원", years, format_won(deduction)),
    );

    let taxable_income = checked_sub(severance_amount, deduction)?.max(Decimal::ZERO);
    let converted_income = floor_won(checked_div(taxable_income, years_dec)?);
    trail.record(
        "income_averaging",
        "Income Averaging",
        CLAUSE_RATE,
        serde_json::json!({
            "severance_amount": severance_amount.to_string(),
            "service_deduction": deduction.to_string()
        }),
        serde_json::json!({
            "taxable_income": taxable_income.to_string(),
            "converted_income": converted_income.to_string()
        }),
        format!(
            "({}원 - {}원) ÷ {}년 = {}원",
            format_won(severance_amount),
            format_won(deduction),
            years,
            format_won(converted_income)
        ),
    );

    let bracket = rules.bracket_for(converted_income)?;
    let tax_on_converted = floor_won(bracket.tax_on(converted_income).ok_or_else(|| {
        EngineError::CalculationError {
            message: format!("bracket tax on {} out of range", converted_income),
        }
    })?);
    let tax_rate = checked_mul(bracket.rate, Decimal::ONE_HUNDRED)?.normalize();
    let calculated_tax = checked_mul(tax_on_converted, years_dec)?;
    trail.record(
        "progressive_rate",
        "Progressive Rate",
        CLAUSE_RATE,
        serde_json::json!({
            "converted_income": converted_income.to_string(),
            "bracket_lower": bracket.lower.to_string(),
            "bracket_base": bracket.base.to_string()
        }),
        serde_json::json!({
            "tax_rate": tax_rate.to_string(),
            "tax_on_converted": tax_on_converted.to_string(),
            "calculated_tax": calculated_tax.to_string()
        }),
        format!(
            "{}원 + ({}원 - {}원) × {}% = {}원, × {}년 = {}원",
            format_won(bracket.base),
            format_won(converted_income),
            format_won(bracket.lower),
            tax_rate,
            format_won(tax_on_converted),
            years,
            format_won(calculated_tax)
        ),
    );

    let retirement_tax = floor_won(checked_mul(
        calculated_tax,
        checked_sub(Decimal::ONE, rules.reduction_rate)?,
    )?);
    let local_tax = floor_won(checked_mul(retirement_tax, rules.local_tax_rate)?);
    let total_tax = checked_add(retirement_tax, local_tax)?;
    let net_amount = checked_sub(severance_amount, total_tax)?;
    trail.record(
        "reduction_and_local_tax",
        "Statutory Reduction and Local Tax",
        CLAUSE_LOCAL,
        serde_json::json!({
            "calculated_tax": calculated_tax.to_string(),
            "reduction_rate": rules.reduction_rate.to_string(),
            "local_tax_rate": rules.local_tax_rate.to_string()
        }),
        serde_json::json!({
            "retirement_tax": retirement_tax.to_string(),
            "local_tax": local_tax.to_string(),
            "total_tax": total_tax.to_string()
        }),
        format!(
            "퇴직소득세 {}원 + 지방소득세 {}원 = {}원",
            format_won(retirement_tax),
            format_won(local_tax),
            format_won(total_tax)
        ),
    );

    let effective_rate = if severance_amount > Decimal::ZERO {
        let rate =
            checked_mul(checked_div(total_tax, severance_amount)?, Decimal::ONE_HUNDRED)?.round_dp(2);
        format!("{:.2}", rate)
    } else {
        "0.00".to_string()
    };

    let mut notes = Vec::new();
    if taxable_income.is_zero() {
        notes.push("근속연수공제 후 과세표준이 없어 세액이 발생하지 않습니다.".to_string());
    }
    if input.age.is_some_and(|age| age >= PENSION_ADVISORY_AGE) {
        notes.push(format!(
            "만 {}세 이상 퇴직자는 IRP로 이전해 연금으로 수령하면 퇴직소득세 감면을 받을 수 있습니다. 이 계산에는 반영되지 않았습니다.",
            PENSION_ADVISORY_AGE
        ));
    }

    debug!(
        years,
        converted_income = %converted_income,
        total_tax = %total_tax,
        "Retirement tax calculated"
    );

    Ok(RetirementTaxResult {
        severance_amount,
        years_of_service: years,
        service_deduction: deduction,
        taxable_income,
        converted_income,
        tax_rate,
        tax_on_converted,
        calculated_tax,
        retirement_tax,
        local_tax,
        total_tax,
        net_amount,
        effective_rate,
        notes,
        audit_steps: trail.into_steps(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn rules() -> TaxRules {
        ConfigLoader::load("./config/kr_labor")
            .expect("Failed to load config")
            .tax_rules()
            .clone()
    }

    fn input(amount: &str, years: u32) -> RetirementTaxInput {
        RetirementTaxInput {
            severance_amount: dec(amount),
            years_of_service: years,
            age: None,
        }
    }

    #[test]
    fn test_service_deduction_tiers() {
        let rules = rules();
        assert_eq!(service_deduction(1, &rules).unwrap(), dec("3000000"));
        assert_eq!(service_deduction(5, &rules).unwrap(), dec("15000000"));
        assert_eq!(service_deduction(6, &rules).unwrap(), dec("20000000"));
        assert_eq!(service_deduction(10, &rules).unwrap(), dec("40000000"));
        assert_eq!(service_deduction(20, &rules).unwrap(), dec("110000000"));
        assert_eq!(service_deduction(25, &rules).unwrap(), dec("160000000"));
    }

    #[test]
    fn test_bracket_boundary_uses_lower_rate() {
        // 5 years: deduction 15,000,000; taxable 14,000,000 * 5 = 70,000,000
        let result = calculate_retirement_tax(&input("85000000", 5), &rules()).unwrap();

        assert_eq!(result.converted_income, dec("14000000"));
        assert_eq!(result.tax_rate, dec("6"));
        assert_eq!(result.tax_on_converted, dec("840000"));
        assert_eq!(result.calculated_tax, dec("4200000"));
        assert_eq!(result.retirement_tax, dec("3360000"));
        assert_eq!(result.local_tax, dec("336000"));
        assert_eq!(result.total_tax, dec("3696000"));
        assert_eq!(result.net_amount, dec("81304000"));
        assert_eq!(result.effective_rate, "4.35");
    }

    #[test]
    fn test_second_bracket() {
        // 10 years: deduction 40,000,000; taxable 200,000,000; converted 20,000,000
        let result = calculate_retirement_tax(&input("240000000", 10), &rules()).unwrap();

        assert_eq!(result.converted_income, dec("20000000"));
        assert_eq!(result.tax_rate, dec("15"));
        // 840,000 + 6,000,000 * 0.15
        assert_eq!(result.tax_on_converted, dec("1740000"));
        assert_eq!(result.calculated_tax, dec("17400000"));
        assert_eq!(result.retirement_tax, dec("13920000"));
        assert_eq!(result.local_tax, dec("1392000"));
        assert_eq!(result.total_tax, dec("15312000"));
    }

    #[test]
    fn test_converted_income_is_floored() {
        // taxable 10,000,000 over 3 years
        let result = calculate_retirement_tax(&input("19000000", 3), &rules()).unwrap();

        assert_eq!(result.taxable_income, dec("10000000"));
        assert_eq!(result.converted_income, dec("3333333"));
        // floor(3,333,333 * 0.06) = 199,999
        assert_eq!(result.tax_on_converted, dec("199999"));
    }

    #[test]
    fn test_deduction_exceeding_severance_yields_zero_tax() {
        let result = calculate_retirement_tax(&input("10000000", 5), &rules()).unwrap();

        assert_eq!(result.taxable_income, Decimal::ZERO);
        assert_eq!(result.total_tax, Decimal::ZERO);
        assert_eq!(result.net_amount, dec("10000000"));
        assert_eq!(result.effective_rate, "0.00");
        assert_eq!(result.notes.len(), 1);
    }

    #[test]
    fn test_zero_severance_is_allowed() {
        let result = calculate_retirement_tax(&input("0", 1), &rules()).unwrap();
        assert_eq!(result.total_tax, Decimal::ZERO);
        assert_eq!(result.effective_rate, "0.00");
    }

    #[test]
    fn test_age_is_advisory_only() {
        let rules = rules();
        let young = calculate_retirement_tax(&input("300000000", 25), &rules).unwrap();
        let mut older_input = input("300000000", 25);
        older_input.age = Some(58);
        let older = calculate_retirement_tax(&older_input, &rules).unwrap();

        assert_eq!(young.total_tax, older.total_tax);
        assert_eq!(young.net_amount, older.net_amount);
        assert!(young.notes.is_empty());
        assert_eq!(older.notes.len(), 1);
        assert!(older.notes[0].contains("55"));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let rules = rules();

        match calculate_retirement_tax(&input("-1", 3), &rules) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "severance_amount"),
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
        match calculate_retirement_tax(&input("1000000", 0), &rules) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "years_of_service"),
            other => panic!("Expected InvalidInput error, got {:?}", other),
        }
    }

    #[test]
    fn test_largest_severance_stays_in_range() {
        let rules = rules();
        for years in [1, 40, u32::MAX] {
            let input = RetirementTaxInput {
                severance_amount: Decimal::MAX,
                years_of_service: years,
                age: None,
            };
            let result = calculate_retirement_tax(&input, &rules).unwrap();
            assert_eq!(result.net_amount + result.total_tax, Decimal::MAX);
        }
    }

    #[test]
    fn test_out_of_range_bracket_tax_is_a_calculation_error() {
        let mut rules = rules();
        for bracket in &mut rules.brackets {
            bracket.base = Decimal::MAX;
        }

        match calculate_retirement_tax(&input("500000000", 10), &rules) {
            Err(EngineError::CalculationError { message }) => {
                assert!(message.contains("out of range"))
            }
            other => panic!("Expected CalculationError, got {:?}", other),
        }
    }

    #[test]
    fn test_audit_trail_covers_each_stage() {
        let result = calculate_retirement_tax(&input("120000000", 8), &rules()).unwrap();
        let ids: Vec<&str> = result.audit_steps.iter().map(|s| s.rule_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "service_deduction",
                "income_averaging",
                "progressive_rate",
                "reduction_and_local_tax"
            ]
        );
    }

    proptest! {
        #[test]
        fn prop_net_plus_tax_equals_severance(amount in 0_i64..5_000_000_000_i64, years in 1_u32..45) {
            let input = RetirementTaxInput {
                severance_amount: Decimal::from(amount),
                years_of_service: years,
                age: None,
            };
            let result = calculate_retirement_tax(&input, &rules()).unwrap();

            prop_assert_eq!(result.net_amount + result.total_tax, input.severance_amount);
            prop_assert_eq!(result.total_tax, result.retirement_tax + result.local_tax);
            prop_assert!(result.total_tax >= Decimal::ZERO);
            prop_assert!(result.total_tax <= input.severance_amount);
        }

        #[test]
        fn prop_calculation_is_idempotent(amount in 0_i64..2_000_000_000_i64, years in 1_u32..40) {
            let input = RetirementTaxInput {
                severance_amount: Decimal::from(amount),
                years_of_service: years,
                age: Some(60),
            };
            let rules = rules();
            prop_assert_eq!(
                calculate_retirement_tax(&input, &rules).unwrap(),
                calculate_retirement_tax(&input, &rules).unwrap()
            );
        }
    }
}
