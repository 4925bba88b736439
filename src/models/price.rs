//! Symbols, price points and live quotes.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Uppercase ticker symbol; the identity key for all per-symbol state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err("symbol must not be empty".to_string());
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(format!("invalid symbol '{}'", trimmed));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Symbol {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Symbol::new(&value)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// One daily close as reported by a historical price source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub at: DateTime<Utc>,
    pub close: Decimal,
}

impl PricePoint {
    pub fn new(at: DateTime<Utc>, close: Decimal) -> Self {
        Self { at, close }
    }
}

/// Ordered closes for one symbol, oldest first, ending with the live quote.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: Symbol,
    closes: Vec<Decimal>,
    pub observed_at: DateTime<Utc>,
}

impl PriceSeries {
    /// Build a series from an ordered history and the quote that terminates it.
    pub fn new(symbol: Symbol, history: Vec<Decimal>, latest: &LatestQuote) -> Self {
        let mut closes = history;
        closes.push(latest.price);
        Self {
            symbol,
            closes,
            observed_at: latest.at,
        }
    }

    pub fn closes(&self) -> &[Decimal] {
        &self.closes
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn latest(&self) -> Option<Decimal> {
        self.closes.last().copied()
    }
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("quote message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid quote price '{0}'")]
    Price(String),

    #[error("invalid quote timestamp '{0}'")]
    Timestamp(String),
}

/// The most recent observed trade price for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestQuote {
    pub price: Decimal,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct QuoteMessage {
    quote: String,
    at: String,
}

impl LatestQuote {
    pub fn new(price: Decimal, at: DateTime<Utc>) -> Self {
        Self { price, at }
    }

    /// Parse an inbound `{"quote": "...", "at": "..."}` message.
    pub fn from_message(payload: &[u8]) -> Result<Self, QuoteError> {
        let message: QuoteMessage = serde_json::from_slice(payload)?;
        let price = Decimal::from_str(message.quote.trim())
            .map_err(|_| QuoteError::Price(message.quote.clone()))?;
        let at = parse_timestamp(&message.at).ok_or_else(|| QuoteError::Timestamp(message.at))?;
        Ok(Self { price, at })
    }
}

/// Accepts RFC 3339 and the `YYYY-MM-DD HH:MM:SS +HHMM` form used by older producers.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::<FixedOffset>::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z"))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
