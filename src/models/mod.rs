//! Core data models for the labor calculation engine.
//!
//! This module contains the input and result records of every calculator.
//! All records are plain serializable data.

mod audit;
mod leave;
mod minimum_wage;
mod retirement_tax;
mod severance;

pub use audit::{AuditStep, AuditTrail};
pub use leave::{
    FiscalYearStart, LeaveCalculationInput, LeaveCalculationResult, LeaveEntitlement,
    YearlyLeaveRecord, parse_date,
};
pub use minimum_wage::{MinimumWageInput, MinimumWageResult, PayComponents, WorkingHours};
pub use retirement_tax::{RetirementTaxInput, RetirementTaxResult};
pub use severance::{
    AverageWageInput, AverageWageResult, MonthlyPayRecord, PlanType, SeveranceInput,
    SeverancePlan, SeveranceResult, WagePeriod,
};
