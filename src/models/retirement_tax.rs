//! Retirement income tax models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditStep;

/// Input to the retirement income tax calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementTaxInput {
    /// Total severance received, in KRW. Must not be negative.
    pub severance_amount: Decimal,
    /// Whole years of service, at least 1.
    pub years_of_service: u32,
    /// Age at retirement. Informational only.
    #[serde(default)]
    pub age: Option<u32>,
}

/// Result of the retirement income tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementTaxResult {
    /// The severance the tax was computed on.
    pub severance_amount: Decimal,
    /// Years of service used for the deduction and averaging.
    pub years_of_service: u32,
    /// Deduction for years of service.
    pub service_deduction: Decimal,
    /// `max(0, severance - deduction)`.
    pub taxable_income: Decimal,
    /// `floor(taxable_income / years_of_service)`.
    pub converted_income: Decimal,
    /// Marginal rate of the bracket applied, in percent.
    pub tax_rate: Decimal,
    /// Tax on the converted income.
    pub tax_on_converted: Decimal,
    /// `tax_on_converted * years_of_service`.
    pub calculated_tax: Decimal,
    /// Calculated tax after the statutory reduction.
    pub retirement_tax: Decimal,
    /// Local income surtax on the retirement tax.
    pub local_tax: Decimal,
    /// `retirement_tax + local_tax`.
    pub total_tax: Decimal,
    /// `severance_amount - total_tax`.
    pub net_amount: Decimal,
    /// `total_tax / severance_amount * 100`, two decimals.
    pub effective_rate: String,
    /// Advisory notes.
    pub notes: Vec<String>,
    /// Rule decisions made during the calculation.
    pub audit_steps: Vec<AuditStep>,
}
