//! Upstream data provider interfaces.

use crate::models::{IndicatorReading, LatestQuote, PricePoint, Symbol};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("provider rate limited the request")]
    RateLimited,

    /// The request itself was refused (unknown symbol, bad credentials). Not retried.
    #[error("provider rejected the request: {0}")]
    Rejected(String),

    #[error("provider returned malformed data: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Malformed(e.to_string())
        } else {
            ProviderError::Unavailable(e.to_string())
        }
    }
}

#[async_trait]
pub trait HistoricalPriceSource: Send + Sync {
    /// Full daily close history for a symbol, as reported by the provider.
    async fn fetch_daily_closes(&self, symbol: &Symbol) -> Result<Vec<PricePoint>, ProviderError>;
}

#[async_trait]
pub trait LatestQuoteSource: Send + Sync {
    async fn fetch_latest_quote(&self, symbol: &Symbol) -> Result<LatestQuote, ProviderError>;
}

#[async_trait]
pub trait IndicatorSource: Send + Sync {
    /// Most recent provider-computed MACD reading for a symbol.
    async fn fetch_macd(&self, symbol: &Symbol) -> Result<IndicatorReading, ProviderError>;
}
