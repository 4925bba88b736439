//! BUY/SELL classification and persisted transition tracking.

use crate::cache::Cache;
use crate::error::EngineError;
use crate::models::{MacdIndicator, SignalState, Symbol, Transition};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

/// BUY when MACD is strictly above its signal line; ties are SELL.
pub fn classify(macd: &MacdIndicator) -> SignalState {
    if macd.macd > macd.signal {
        SignalState::Buy
    } else {
        SignalState::Sell
    }
}

/// Read-compare-write over the persisted state. Assumes a single writer per symbol.
pub struct SignalStateTracker {
    cache: Arc<dyn Cache>,
}

impl SignalStateTracker {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Record `state` for `symbol`. A flip also restarts the decay marker at `now`.
    pub async fn track(
        &self,
        symbol: &Symbol,
        state: SignalState,
        now: DateTime<Utc>,
    ) -> Result<Transition, EngineError> {
        match self.cache.get_state(symbol).await? {
            None => {
                self.cache.set_state(symbol, state).await?;
                info!(symbol = %symbol, state = %state, "SignalStateTracker: initial state {} for {}", state, symbol);
                Ok(Transition::Initial)
            }
            Some(previous) if previous != state => {
                // Marker first: if the state write fails, the retry sees the flip again.
                self.cache.set_decay_marker(symbol, now).await?;
                self.cache.set_state(symbol, state).await?;
                info!(
                    symbol = %symbol,
                    from = %previous,
                    to = %state,
                    "SignalStateTracker: {} flipped {} -> {}",
                    symbol,
                    previous,
                    state
                );
                Ok(Transition::Flipped { from: previous })
            }
            Some(_) => Ok(Transition::Unchanged),
        }
    }
}
