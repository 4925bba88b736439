use crate::models::price::Symbol;
use crate::models::signal::{SignalState, Transition};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Last point of the MACD line and its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub macd: Decimal,
    pub signal: Decimal,
}

impl MacdIndicator {
    pub fn histogram(&self) -> Decimal {
        self.macd - self.signal
    }
}

/// MACD values computed by an upstream indicator provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorReading {
    pub macd: MacdIndicator,
    pub at: DateTime<Utc>,
}

/// Result of one evaluation. Produced once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub symbol: Symbol,
    pub macd: Decimal,
    pub macd_signal: Decimal,
    pub observed_at: DateTime<Utc>,
    pub state: SignalState,
    pub transition: Transition,
    /// Signal-line EMA period used; `None` when the values were provider-computed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal_window: Option<u32>,
}
