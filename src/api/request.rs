//! Request types for the labor engine API.
//!
//! Most endpoints accept the calculator input records directly. The types
//! here cover the endpoints whose bodies carry defaults resolved at request
//! time ("today", the current year) or extra switches.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    FiscalYearStart, LeaveCalculationInput, MinimumWageInput, PayComponents, SeveranceInput,
    WorkingHours, parse_date,
};
use crate::store::CalculationType;

/// Request body for `POST /annual-leave`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Hire date, `YYYY-MM-DD`.
    pub hire_date: String,
    /// Evaluation date, `YYYY-MM-DD`. Defaults to today.
    #[serde(default)]
    pub reference_date: Option<String>,
    /// Leave-year start, `MM-DD`. Defaults to `01-01`.
    #[serde(default)]
    pub fiscal_year_start: Option<String>,
}

impl LeaveRequest {
    /// Resolves defaults and parses the dates.
    pub fn into_input(self, today: NaiveDate) -> EngineResult<LeaveCalculationInput> {
        let reference_date = match self.reference_date.as_deref() {
            Some(value) => parse_date("reference_date", value)?,
            None => today,
        };
        let fiscal_year_start = match self.fiscal_year_start.as_deref() {
            Some(value) => value.parse()?,
            None => FiscalYearStart::default(),
        };
        Ok(LeaveCalculationInput {
            hire_date: parse_date("hire_date", &self.hire_date)?,
            reference_date,
            fiscal_year_start,
        })
    }
}

/// Request body for `POST /severance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveranceRequest {
    /// Employment dates and plan.
    #[serde(flatten)]
    pub input: SeveranceInput,
    /// Also compute retirement income tax on the total amount.
    #[serde(default)]
    pub include_tax: bool,
}

/// Request body for `POST /minimum-wage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumWageRequest {
    /// Monthly pay.
    pub pay: PayComponents,
    /// Hours worked.
    pub hours: WorkingHours,
    /// Year to check against. Defaults to the current year.
    #[serde(default)]
    pub year: Option<i32>,
}

impl MinimumWageRequest {
    /// Resolves the year default.
    pub fn into_input(self, current_year: i32) -> MinimumWageInput {
        MinimumWageInput {
            pay: self.pay,
            hours: self.hours,
            year: self.year.unwrap_or(current_year),
        }
    }
}

/// Query string for `GET /users/:user_id/calculations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListCalculationsQuery {
    /// Only return records of this type.
    #[serde(rename = "type", default)]
    pub calculation_type: Option<CalculationType>,
}
