//! Service period counting.
//!
//! Day, month and year counts shared by the leave and severance calculators.
//! Leave entitlement uses the averaged divisors 365.25 days per year and
//! 30.4375 days per month; severance uses 365-day years and calendar months.

use chrono::{Datelike, NaiveDate};

/// Days of service from `start` to `end`, counting both ends.
///
/// The hire day is a day of service, so `start == end` yields 1.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::inclusive_service_days;
/// use chrono::NaiveDate;
///
/// let hire = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let reference = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(inclusive_service_days(hire, reference), 366);
/// assert_eq!(inclusive_service_days(hire, hire), 1);
/// ```
pub fn inclusive_service_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Completed years of service, `floor(days / 365.25)`.
///
/// Computed as `floor(days * 4 / 1461)` so no rounding is involved.
pub fn completed_years(days: i64) -> i64 {
    (days * 4).div_euclid(1461)
}

/// Completed months of service, `floor(days / 30.4375)`.
///
/// Computed as `floor(days * 16 / 487)`.
pub fn completed_months(days: i64) -> i64 {
    (days * 16).div_euclid(487)
}

/// Completed calendar months between two dates.
///
/// A month counts once the day-of-month of `start` is reached again.
pub fn calendar_months_between(start: NaiveDate, end: NaiveDate) -> i64 {
    let mut months = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0)
}

/// The anniversary of `date` in `year`. February 29 falls back to February 28.
pub fn anniversary_in_year(date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

/// December 31st of `year`.
pub fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}
