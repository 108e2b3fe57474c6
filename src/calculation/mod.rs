//! Calculation logic for the labor engine.
//!
//! Each calculator is a pure function from an input record to a result
//! record carrying its own audit steps: annual leave under the hire-date and
//! fiscal-year rules, severance under DB, DC and hybrid plans, the
//! three-month average wage, retirement income tax, and minimum wage
//! compliance.

mod annual_leave;
mod average_wage;
mod minimum_wage;
mod retirement_tax;
mod service_period;
mod severance;
mod won;

pub use annual_leave::{
    BASIC_ANNUAL_LEAVE_DAYS, MAX_ADDITIONAL_LEAVE_DAYS, MAX_PRORATED_FISCAL_DAYS,
    calculate_annual_leave, hire_date_entitlement,
};
pub use average_wage::{
    AVERAGE_WAGE_MONTHS, DAYS_PER_YEAR, MAX_DAYS_PER_MONTH, average_wage_periods,
    calculate_average_wage,
};
pub use minimum_wage::{
    MAX_WEEKLY_HOURS, MEAL_TRANSPORT_LIMIT_DIVISOR, OVERTIME_PREMIUM, STANDARD_WEEKLY_HOURS,
    WEEKS_PER_MONTH, check_minimum_wage,
};
pub use retirement_tax::{PENSION_ADVISORY_AGE, calculate_retirement_tax, service_deduction};
pub use service_period::{
    calendar_months_between, completed_months, completed_years, inclusive_service_days,
};
pub use severance::{
    CONTINUOUS_SERVICE_INTERVAL_YEARS, DAYS_PER_SEVERANCE_MONTH, DAYS_PER_SEVERANCE_YEAR,
    calculate_severance,
};
pub use won::{floor_won, format_won};
