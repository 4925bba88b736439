use crate::cache::CacheError;
use crate::indicators::IndicatorError;
use crate::models::IndicatorSnapshot;
use crate::services::events::PublishError;
use crate::services::market_data::ProviderError;
use thiserror::Error;

/// Failure of one symbol's evaluation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Not enough closes to seed the EMA chain. Wait for more data; do not retry.
    #[error("{symbol}: insufficient history (need {required} points, have {available})")]
    InsufficientHistory {
        symbol: String,
        required: usize,
        available: usize,
    },

    #[error("{symbol}: malformed historical data: {detail}")]
    MalformedHistoricalData { symbol: String, detail: String },

    #[error("{symbol}: provider unavailable: {reason}")]
    ProviderUnavailable { symbol: String, reason: String },

    #[error("{symbol}: provider rate limited")]
    ProviderRateLimited { symbol: String },

    #[error("invalid indicator configuration: {0}")]
    InvalidParameters(IndicatorError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Delivery failed after state was already persisted. The snapshot is
    /// what would have been published; the state writes must not be redone.
    #[error("{}: publish failed: {source}", .snapshot.symbol)]
    Publish {
        snapshot: Box<IndicatorSnapshot>,
        #[source]
        source: PublishError,
    },
}

impl EngineError {
    pub fn from_provider(symbol: &str, error: ProviderError) -> Self {
        match error {
            ProviderError::Unavailable(reason) => EngineError::ProviderUnavailable {
                symbol: symbol.to_string(),
                reason,
            },
            ProviderError::Rejected(reason) => EngineError::ProviderUnavailable {
                symbol: symbol.to_string(),
                reason,
            },
            ProviderError::RateLimited => EngineError::ProviderRateLimited {
                symbol: symbol.to_string(),
            },
            ProviderError::Malformed(detail) => EngineError::MalformedHistoricalData {
                symbol: symbol.to_string(),
                detail,
            },
        }
    }

    pub fn from_indicator(symbol: &str, error: IndicatorError) -> Self {
        match error {
            IndicatorError::InsufficientHistory { required, available } => {
                EngineError::InsufficientHistory {
                    symbol: symbol.to_string(),
                    required,
                    available,
                }
            }
            other => EngineError::InvalidParameters(other),
        }
    }

    /// Whether the signal state for this evaluation was already persisted.
    pub fn state_committed(&self) -> bool {
        matches!(self, EngineError::Publish { .. })
    }
}
