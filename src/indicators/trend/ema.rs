//! EMA (Exponential Moving Average) indicator
//!
//! alpha  = 2 / (period + 1)
//! EMA_0  = x_0
//! EMA_i  = EMA_{i-1} + alpha * (x_i - EMA_{i-1})
//!
//! The output has the same length as the input. There is no warm-up
//! trimming: the first value is seeded from the first input, so every
//! index carries an EMA value.

use crate::indicators::IndicatorError;
use rust_decimal::Decimal;

/// Smoothing factor for a period.
pub fn ema_alpha(period: usize) -> Result<Decimal, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod);
    }
    Ok(Decimal::TWO / Decimal::from(period as u64 + 1))
}

/// Calculate the EMA series for `values`.
///
/// An empty input yields an empty output.
pub fn compute_ema(values: &[Decimal], period: usize) -> Result<Vec<Decimal>, IndicatorError> {
    let alpha = ema_alpha(period)?;

    let mut result = Vec::with_capacity(values.len());
    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return Ok(result);
    };

    let mut prev = first;
    result.push(prev);
    for &value in iter {
        prev += alpha * (value - prev);
        result.push(prev);
    }

    Ok(result)
}

