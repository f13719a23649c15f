//! Money calculation utilities using rust_decimal for precision
//!
//! Monetary values are stored and serialized as `f64`, but any arithmetic
//! over them (report totals) goes through `Decimal` internally so repeated
//! float addition cannot drift.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Round a monetary value to 2 decimal places (half-up)
pub fn round_money(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}

/// Sum monetary values with Decimal precision, rounding the result to 2 dp
///
/// Non-finite inputs (NaN, Infinity) are skipped rather than poisoning the sum.
pub fn sum_money<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let total = values
        .into_iter()
        .filter_map(Decimal::from_f64)
        .fold(Decimal::ZERO, |acc, v| acc + v);

    total
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}
