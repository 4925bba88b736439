//! Per-symbol evaluation: price series -> MACD -> state tracking -> publication.

use crate::cache::Cache;
use crate::error::EngineError;
use crate::indicators::momentum::{calculate_macd, MacdParams};
use crate::models::{IndicatorSnapshot, LatestQuote, MacdIndicator, Symbol};
use crate::services::events::EventSink;
use crate::services::market_data::{HistoricalPriceSource, IndicatorSource};
use crate::signals::decay::{DecayPolicy, DecayWindowCalculator};
use crate::signals::publisher::SignalPublisher;
use crate::signals::series::PriceSeriesAssembler;
use crate::signals::state::{classify, SignalStateTracker};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct SignalEngine {
    cache: Arc<dyn Cache>,
    assembler: PriceSeriesAssembler,
    decay: DecayWindowCalculator,
    tracker: SignalStateTracker,
    publisher: SignalPublisher,
    indicators: Option<Arc<dyn IndicatorSource>>,
    params: MacdParams,
}

impl SignalEngine {
    pub fn new(
        cache: Arc<dyn Cache>,
        history: Arc<dyn HistoricalPriceSource>,
        sink: Arc<dyn EventSink>,
        timezone: Tz,
    ) -> Self {
        Self {
            cache: cache.clone(),
            assembler: PriceSeriesAssembler::new(history, cache.clone(), timezone),
            decay: DecayWindowCalculator::new(cache.clone(), DecayPolicy::default()),
            tracker: SignalStateTracker::new(cache.clone()),
            publisher: SignalPublisher::new(sink),
            indicators: None,
            params: MacdParams::default(),
        }
    }

    pub fn with_params(mut self, params: MacdParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_decay_policy(mut self, policy: DecayPolicy) -> Self {
        self.decay = DecayWindowCalculator::new(self.cache.clone(), policy);
        self
    }

    /// Enable [`SignalEngine::evaluate_reported`].
    pub fn with_indicator_source(mut self, source: Arc<dyn IndicatorSource>) -> Self {
        self.indicators = Some(source);
        self
    }

    pub fn params(&self) -> &MacdParams {
        &self.params
    }

    pub async fn evaluate(
        &self,
        symbol: &Symbol,
        quote: &LatestQuote,
    ) -> Result<IndicatorSnapshot, EngineError> {
        self.evaluate_at(symbol, quote, Utc::now()).await
    }

    /// Compute MACD locally from cached history plus `quote`, as of `now`.
    pub async fn evaluate_at(
        &self,
        symbol: &Symbol,
        quote: &LatestQuote,
        now: DateTime<Utc>,
    ) -> Result<IndicatorSnapshot, EngineError> {
        self.params
            .validate()
            .map_err(EngineError::InvalidParameters)?;

        let series = self.assembler.assemble(symbol, quote, now).await?;
        let window = self.decay.window(symbol, now).await?;

        debug!(
            symbol = %symbol,
            points = series.len(),
            window = window,
            "SignalEngine: computing MACD for {} over {} points (signal window {})",
            symbol,
            series.len(),
            window
        );

        let macd = calculate_macd(series.closes(), &self.params, window as usize)
            .map_err(|e| EngineError::from_indicator(symbol.as_str(), e))?;

        self.commit(symbol, macd, series.observed_at, Some(window), now)
            .await
    }

    pub async fn evaluate_reported(&self, symbol: &Symbol) -> Result<IndicatorSnapshot, EngineError> {
        self.evaluate_reported_at(symbol, Utc::now()).await
    }

    /// Use the indicator provider's MACD instead of computing it.
    pub async fn evaluate_reported_at(
        &self,
        symbol: &Symbol,
        now: DateTime<Utc>,
    ) -> Result<IndicatorSnapshot, EngineError> {
        let source = self
            .indicators
            .as_ref()
            .ok_or_else(|| EngineError::ProviderUnavailable {
                symbol: symbol.to_string(),
                reason: "no indicator source configured".to_string(),
            })?;

        let reading = source
            .fetch_macd(symbol)
            .await
            .map_err(|e| EngineError::from_provider(symbol.as_str(), e))?;

        self.commit(symbol, reading.macd, reading.at, None, now).await
    }

    async fn commit(
        &self,
        symbol: &Symbol,
        macd: MacdIndicator,
        observed_at: DateTime<Utc>,
        signal_window: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<IndicatorSnapshot, EngineError> {
        let state = classify(&macd);
        let transition = self.tracker.track(symbol, state, now).await?;

        let snapshot = IndicatorSnapshot {
            symbol: symbol.clone(),
            macd: macd.macd,
            macd_signal: macd.signal,
            observed_at,
            state,
            transition,
            signal_window,
        };

        if let Err(source) = self.publisher.publish(&snapshot).await {
            warn!(
                symbol = %symbol,
                error = %source,
                "SignalEngine: state for {} persisted but publish failed",
                symbol
            );
            return Err(EngineError::Publish {
                snapshot: Box::new(snapshot),
                source,
            });
        }

        Ok(snapshot)
    }
}
