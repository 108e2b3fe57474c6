//! KRW amount helpers.
//!
//! The `checked_*` functions turn `Decimal` overflow into
//! [`EngineError::CalculationError`] so oversized inputs fail the request
//! instead of panicking.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

fn overflow(lhs: Decimal, op: &str, rhs: Decimal) -> EngineError {
    EngineError::CalculationError {
        message: format!("amount out of range: {} {} {}", lhs, op, rhs),
    }
}

/// `lhs + rhs`, or an error when the sum is out of range.
pub(crate) fn checked_add(lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| overflow(lhs, "+", rhs))
}

/// `lhs - rhs`, or an error when the difference is out of range.
pub(crate) fn checked_sub(lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_sub(rhs).ok_or_else(|| overflow(lhs, "-", rhs))
}

/// `lhs * rhs`, or an error when the product is out of range.
pub(crate) fn checked_mul(lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow(lhs, "*", rhs))
}

/// `lhs / rhs`, or an error on overflow or a zero divisor.
pub(crate) fn checked_div(lhs: Decimal, rhs: Decimal) -> EngineResult<Decimal> {
    lhs.checked_div(rhs).ok_or_else(|| overflow(lhs, "/", rhs))
}

/// Sums amounts, or an error when the running total leaves the `Decimal` range.
pub(crate) fn checked_sum<I>(amounts: I) -> EngineResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, checked_add)
}

/// Truncates an amount to whole won.
pub fn floor_won(amount: Decimal) -> Decimal {
    amount.floor()
}

/// Formats an amount with thousands separators, dropping trailing zeros.
///
/// # Example
///
/// ```
/// use labor_engine::calculation::format_won;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_won(Decimal::from(3_000_000)), "3,000,000");
/// assert_eq!(format_won(Decimal::new(98605, 1)), "9,860.5");
/// assert_eq!(format_won(Decimal::from(-1200)), "-1,200");
/// ```
pub fn format_won(amount: Decimal) -> String {
    let normalized = amount.normalize();
    let text = normalized.abs().to_string();
    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if normalized.is_sign_negative() && !normalized.is_zero() {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
