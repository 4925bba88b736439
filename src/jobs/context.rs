//! Job context for dependency injection

use crate::config::SignalSource;
use crate::jobs::locks::SymbolLocks;
use crate::services::market_data::LatestQuoteSource;
use crate::services::market_hours::MarketHours;
use crate::signals::SignalEngine;
use std::sync::Arc;

/// Shared by every evaluation worker via Apalis `Data<T>`.
///
/// `market_hours` is `None` when evaluations should run regardless of session.
pub struct JobContext {
    pub engine: Arc<SignalEngine>,
    pub quotes: Arc<dyn LatestQuoteSource>,
    pub market_hours: Option<Arc<MarketHours>>,
    pub signal_source: SignalSource,
    pub locks: SymbolLocks,
}

impl JobContext {
    pub fn new(
        engine: Arc<SignalEngine>,
        quotes: Arc<dyn LatestQuoteSource>,
        market_hours: Option<Arc<MarketHours>>,
        signal_source: SignalSource,
    ) -> Self {
        Self {
            engine,
            quotes,
            market_hours,
            signal_source,
            locks: SymbolLocks::new(),
        }
    }
}
