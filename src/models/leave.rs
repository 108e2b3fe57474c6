//! Annual leave models.
//!
//! Inputs and results for the annual leave calculator, which compares the
//! statutory hire-date rule with a company fiscal-year rule.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::AuditStep;

/// A recurring month-day on which the company's leave year starts.
///
/// Written as `"MM-DD"`. February 29 is rejected because it does not recur
/// every year.
///
/// # Example
///
/// ```
/// use labor_engine::models::FiscalYearStart;
///
/// let start: FiscalYearStart = "03-01".parse().unwrap();
/// assert_eq!(start.month(), 3);
/// assert_eq!(start.to_string(), "03-01");
/// assert!("02-30".parse::<FiscalYearStart>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FiscalYearStart {
    month: u32,
    day: u32,
}

impl FiscalYearStart {
    /// January 1st, the usual calendar-year start.
    pub const JANUARY_FIRST: FiscalYearStart = FiscalYearStart { month: 1, day: 1 };

    /// Creates a fiscal year start, validating the month-day pair.
    pub fn new(month: u32, day: u32) -> EngineResult<Self> {
        // 2023 is not a leap year, so Feb 29 fails here.
        if NaiveDate::from_ymd_opt(2023, month, day).is_none() {
            return Err(EngineError::InvalidDate {
                field: "fiscal_year_start".to_string(),
                value: format!("{:02}-{:02}", month, day),
            });
        }
        Ok(Self { month, day })
    }

    /// The month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// The day of month.
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Returns this month-day in the given calendar year.
    pub fn in_year(&self, year: i32) -> EngineResult<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).ok_or_else(|| {
            EngineError::CalculationError {
                message: format!("fiscal year start {} is out of range in {}", self, year),
            }
        })
    }
}

impl Default for FiscalYearStart {
    fn default() -> Self {
        Self::JANUARY_FIRST
    }
}

impl fmt::Display for FiscalYearStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for FiscalYearStart {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidDate {
            field: "fiscal_year_start".to_string(),
            value: s.to_string(),
        };
        let (month, day) = s.trim().split_once('-').ok_or_else(invalid)?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        let day = day.parse::<u32>().map_err(|_| invalid())?;
        Self::new(month, day).map_err(|_| invalid())
    }
}

impl TryFrom<String> for FiscalYearStart {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FiscalYearStart> for String {
    fn from(value: FiscalYearStart) -> Self {
        value.to_string()
    }
}

/// Input to the annual leave calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveCalculationInput {
    /// The employee's first day of work.
    pub hire_date: NaiveDate,
    /// The date entitlement is evaluated at. Must not precede `hire_date`.
    pub reference_date: NaiveDate,
    /// The company's recurring leave-year start.
    #[serde(default)]
    pub fiscal_year_start: FiscalYearStart,
}

impl LeaveCalculationInput {
    /// Builds an input from `YYYY-MM-DD` dates and an `MM-DD` fiscal start.
    ///
    /// # Example
    ///
    /// ```
    /// use labor_engine::models::LeaveCalculationInput;
    ///
    /// let input = LeaveCalculationInput::parse("2023-01-01", "2024-01-01", "01-01").unwrap();
    /// assert_eq!(input.hire_date.to_string(), "2023-01-01");
    ///
    /// assert!(LeaveCalculationInput::parse("2023-13-01", "2024-01-01", "01-01").is_err());
    /// ```
    pub fn parse(hire_date: &str, reference_date: &str, fiscal_year_start: &str) -> EngineResult<Self> {
        Ok(Self {
            hire_date: parse_date("hire_date", hire_date)?,
            reference_date: parse_date("reference_date", reference_date)?,
            fiscal_year_start: fiscal_year_start.parse()?,
        })
    }
}

/// Parses a `YYYY-MM-DD` date, naming the field on failure.
pub fn parse_date(field: &str, value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| EngineError::InvalidDate {
        field: field.to_string(),
        value: value.to_string(),
    })
}

/// Leave days granted under one rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveEntitlement {
    /// Basic days (15 after one year, or one per completed month before that).
    pub basic: u32,
    /// Seniority days added every two years from the third year, at most 10.
    pub additional: u32,
    /// `basic + additional`.
    pub total: u32,
}

impl LeaveEntitlement {
    /// Creates an entitlement and fills in the total.
    pub fn new(basic: u32, additional: u32) -> Self {
        Self {
            basic,
            additional,
            total: basic + additional,
        }
    }
}

/// Entitlement under both rules as of the end of one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearlyLeaveRecord {
    /// The calendar year.
    pub year: i32,
    /// The evaluation date: December 31st, or the reference date in the last year.
    pub as_of: NaiveDate,
    /// Entitlement under the hire-date rule.
    pub hire_based: LeaveEntitlement,
    /// Entitlement under the fiscal-year rule.
    pub fiscal_based: LeaveEntitlement,
    /// `hire_based.total - fiscal_based.total`.
    pub difference: i64,
    /// "N개월차" during the first year, "N년차" afterwards.
    pub description: String,
    /// The hire anniversary falling in this year.
    pub hire_accrual_date: String,
    /// The fiscal year start falling in this year.
    pub fiscal_accrual_date: String,
}

/// Result of the annual leave calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveCalculationResult {
    /// Days of service, counting the hire day.
    pub service_days: i64,
    /// Completed years (`service_days / 365.25`).
    pub service_years: i64,
    /// Completed months (`service_days / 30.4375`).
    pub service_months: i64,
    /// Entitlement under the hire-date rule.
    pub hire_based: LeaveEntitlement,
    /// Entitlement under the fiscal-year rule.
    pub fiscal_based: LeaveEntitlement,
    /// `hire_based.total - fiscal_based.total`.
    pub difference: i64,
    /// One record per calendar year from hire year to reference year.
    pub yearly_history: Vec<YearlyLeaveRecord>,
    /// Rule decisions made during the calculation.
    pub audit_steps: Vec<AuditStep>,
}
