//! MACD (Moving Average Convergence Divergence) indicator
//!
//! MACD   = EMA(short) - EMA(long), computed at every index of the closes
//! Signal = EMA(window) over the trailing `signal_lookback` MACD points
//!
//! The signal-line period is supplied per call because it follows the
//! decay window of the symbol being evaluated.

use crate::indicators::trend::compute_ema;
use crate::indicators::IndicatorError;
use crate::models::indicators::MacdIndicator;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MacdParams {
    pub short_period: usize,
    pub long_period: usize,
    /// Number of trailing MACD points the signal line is smoothed over.
    pub signal_lookback: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            short_period: 12,
            long_period: 26,
            signal_lookback: 30,
        }
    }
}

impl MacdParams {
    pub fn validate(&self) -> Result<(), IndicatorError> {
        if self.short_period == 0 || self.long_period == 0 || self.signal_lookback == 0 {
            return Err(IndicatorError::InvalidPeriod);
        }
        if self.short_period >= self.long_period {
            return Err(IndicatorError::InvalidPeriods {
                short: self.short_period,
                long: self.long_period,
            });
        }
        Ok(())
    }
}

/// Pointwise `short - long` over the full closes.
pub fn macd_line(closes: &[Decimal], params: &MacdParams) -> Result<Vec<Decimal>, IndicatorError> {
    params.validate()?;
    if closes.len() < params.long_period {
        return Err(IndicatorError::InsufficientHistory {
            required: params.long_period,
            available: closes.len(),
        });
    }

    let long = compute_ema(closes, params.long_period)?;
    let short = compute_ema(closes, params.short_period)?;

    Ok(short.iter().zip(long.iter()).map(|(&s, &l)| s - l).collect())
}

/// Calculate the current MACD value and its signal line.
pub fn calculate_macd(
    closes: &[Decimal],
    params: &MacdParams,
    signal_period: usize,
) -> Result<MacdIndicator, IndicatorError> {
    if signal_period == 0 {
        return Err(IndicatorError::InvalidPeriod);
    }

    let line = macd_line(closes, params)?;
    let start = line.len().saturating_sub(params.signal_lookback);
    let slice = &line[start..];
    if slice.len() < signal_period {
        return Err(IndicatorError::InsufficientHistory {
            required: signal_period,
            available: slice.len(),
        });
    }

    let signal = compute_ema(slice, signal_period)?;

    match (line.last(), signal.last()) {
        (Some(&macd), Some(&signal)) => Ok(MacdIndicator { macd, signal }),
        _ => Err(IndicatorError::InsufficientHistory {
            required: params.long_period,
            available: closes.len(),
        }),
    }
}
