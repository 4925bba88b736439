//! Key-value cache used for day-keyed memos and per-symbol signal state.

pub mod memory;
pub mod redis;

pub use self::memory::MemoryCache;
pub use self::redis::RedisCache;

use crate::models::{SignalState, Symbol};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("corrupt cache value under '{key}': {reason}")]
    Corrupt { key: String, reason: String },
}

impl From<::redis::RedisError> for CacheError {
    fn from(e: ::redis::RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` only if `key` is unset. Returns whether this call wrote it.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, CacheError>;

    async fn get_state(&self, symbol: &Symbol) -> Result<Option<SignalState>, CacheError>;

    async fn set_state(&self, symbol: &Symbol, state: SignalState) -> Result<(), CacheError>;

    async fn get_decay_marker(&self, symbol: &Symbol)
        -> Result<Option<DateTime<Utc>>, CacheError>;

    async fn set_decay_marker(&self, symbol: &Symbol, at: DateTime<Utc>)
        -> Result<(), CacheError>;
}

/// `ABC_close_2024_03_15`
pub fn daily_closes_key(symbol: &Symbol, day: NaiveDate) -> String {
    format!("{}_close_{}", symbol, day.format("%Y_%m_%d"))
}

/// `XNYS_hours_2024_03_15`
pub fn market_hours_key(market: &str, day: NaiveDate) -> String {
    format!("{}_hours_{}", market, day.format("%Y_%m_%d"))
}

pub fn signal_state_key(symbol: &Symbol) -> String {
    format!("{}_signal_state", symbol)
}

pub fn decay_marker_key(symbol: &Symbol) -> String {
    format!("{}_decay_started_at", symbol)
}

pub(crate) fn parse_state(key: &str, raw: &str) -> Result<SignalState, CacheError> {
    raw.parse().map_err(|reason| CacheError::Corrupt {
        key: key.to_string(),
        reason,
    })
}

pub(crate) fn parse_marker(key: &str, raw: &str) -> Result<DateTime<Utc>, CacheError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| CacheError::Corrupt {
            key: key.to_string(),
            reason: e.to_string(),
        })
}
