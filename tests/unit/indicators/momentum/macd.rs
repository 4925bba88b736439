//! Unit tests for MACD indicator

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use signalwatch::indicators::momentum::{calculate_macd, macd_line, MacdParams};
use signalwatch::indicators::trend::compute_ema;
use signalwatch::indicators::IndicatorError;

fn ramp(count: usize, base: i64) -> Vec<Decimal> {
    (0..count).map(|i| Decimal::from(base + i as i64)).collect()
}

fn falling(count: usize, base: i64) -> Vec<Decimal> {
    (0..count).map(|i| Decimal::from(base - i as i64)).collect()
}

#[test]
fn test_macd_default_params() {
    let params = MacdParams::default();
    assert_eq!(params.short_period, 12);
    assert_eq!(params.long_period, 26);
    assert_eq!(params.signal_lookback, 30);
    assert!(params.validate().is_ok());
}

#[test]
fn test_macd_rejects_inverted_periods() {
    let params = MacdParams {
        short_period: 26,
        long_period: 12,
        signal_lookback: 30,
    };
    assert_eq!(
        params.validate(),
        Err(IndicatorError::InvalidPeriods { short: 26, long: 12 })
    );
}

#[test]
fn test_macd_insufficient_data() {
    let result = calculate_macd(&ramp(20, 100), &MacdParams::default(), 9);
    assert_eq!(
        result,
        Err(IndicatorError::InsufficientHistory {
            required: 26,
            available: 20
        })
    );
}

#[test]
fn test_macd_zero_signal_period() {
    let result = calculate_macd(&ramp(40, 100), &MacdParams::default(), 0);
    assert_eq!(result, Err(IndicatorError::InvalidPeriod));
}

#[test]
fn test_macd_line_is_short_minus_long() {
    let closes = ramp(40, 100);
    let params = MacdParams::default();
    let line = macd_line(&closes, &params).unwrap();
    let short = compute_ema(&closes, 12).unwrap();
    let long = compute_ema(&closes, 26).unwrap();

    assert_eq!(line.len(), closes.len());
    for i in 0..closes.len() {
        assert_eq!(line[i], short[i] - long[i]);
    }
}

#[test]
fn test_macd_signal_uses_trailing_lookback() {
    let closes = ramp(60, 100);
    let params = MacdParams::default();
    let line = macd_line(&closes, &params).unwrap();
    let expected = *compute_ema(&line[30..], 9).unwrap().last().unwrap();

    let macd = calculate_macd(&closes, &params, 9).unwrap();
    assert_eq!(macd.macd, *line.last().unwrap());
    assert_eq!(macd.signal, expected);
}

#[test]
fn test_macd_uptrend_is_above_signal() {
    let macd = calculate_macd(&ramp(40, 100), &MacdParams::default(), 9).unwrap();
    assert!(macd.macd > Decimal::ZERO);
    assert!(macd.macd > macd.signal);
    assert!(macd.histogram() > Decimal::ZERO);
}

#[test]
fn test_macd_downtrend_is_below_signal() {
    let macd = calculate_macd(&falling(40, 200), &MacdParams::default(), 9).unwrap();
    assert!(macd.macd < Decimal::ZERO);
    assert!(macd.macd < macd.signal);
}

#[test]
fn test_macd_flat_series_is_zero() {
    let closes = vec![dec!(50); 30];
    let macd = calculate_macd(&closes, &MacdParams::default(), 4).unwrap();
    assert_eq!(macd.macd, Decimal::ZERO);
    assert_eq!(macd.signal, Decimal::ZERO);
}

#[test]
fn test_shorter_window_tracks_macd_more_closely() {
    let closes = ramp(40, 100);
    let params = MacdParams::default();
    let slow = calculate_macd(&closes, &params, 9).unwrap();
    let fast = calculate_macd(&closes, &params, 2).unwrap();
    assert!(fast.histogram().abs() < slow.histogram().abs());
}
