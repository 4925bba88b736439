//! Price series assembly backed by a day-keyed close memo.

use crate::cache::{daily_closes_key, Cache};
use crate::error::EngineError;
use crate::models::{LatestQuote, PricePoint, PriceSeries, Symbol};
use crate::services::market_data::HistoricalPriceSource;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

pub struct PriceSeriesAssembler {
    source: Arc<dyn HistoricalPriceSource>,
    cache: Arc<dyn Cache>,
    timezone: Tz,
}

impl PriceSeriesAssembler {
    pub fn new(source: Arc<dyn HistoricalPriceSource>, cache: Arc<dyn Cache>, timezone: Tz) -> Self {
        Self {
            source,
            cache,
            timezone,
        }
    }

    /// Historical closes for the exchange day of `now`, followed by `quote`.
    pub async fn assemble(
        &self,
        symbol: &Symbol,
        quote: &LatestQuote,
        now: DateTime<Utc>,
    ) -> Result<PriceSeries, EngineError> {
        let day = now.with_timezone(&self.timezone).date_naive();
        let key = daily_closes_key(symbol, day);

        let history = match self.cache.get(&key).await? {
            Some(raw) if !raw.is_empty() => {
                debug!(symbol = %symbol, key = %key, "PriceSeriesAssembler: using cached closes");
                parse_closes(symbol, &raw)?
            }
            _ => self.fetch_and_memoize(symbol, &key, quote.at).await?,
        };

        Ok(PriceSeries::new(symbol.clone(), history, quote))
    }

    async fn fetch_and_memoize(
        &self,
        symbol: &Symbol,
        key: &str,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Decimal>, EngineError> {
        let points = self
            .source
            .fetch_daily_closes(symbol)
            .await
            .map_err(|e| EngineError::from_provider(symbol.as_str(), e))?;

        let closes: Vec<Decimal> = prepare_history(points, cutoff, &self.timezone)
            .into_iter()
            .map(|p| p.close)
            .collect();

        // An empty payload is not memoized so a later tick can still fill the day.
        if !closes.is_empty() {
            let written = self.cache.set_if_absent(key, &join_closes(&closes)).await?;
            debug!(
                symbol = %symbol,
                key = %key,
                count = closes.len(),
                written = written,
                "PriceSeriesAssembler: fetched {} closes for {}",
                closes.len(),
                symbol
            );
        }

        Ok(closes)
    }
}

/// Keep points from exchange days strictly before `cutoff`'s, oldest first, one per
/// exchange day (latest report wins). The live quote is the only point for its own day,
/// so a partial bar for today never enters the series.
pub fn prepare_history(mut points: Vec<PricePoint>, cutoff: DateTime<Utc>, timezone: &Tz) -> Vec<PricePoint> {
    let cutoff_day = cutoff.with_timezone(timezone).date_naive();
    points.retain(|p| p.at.with_timezone(timezone).date_naive() < cutoff_day);
    points.sort_by_key(|p| p.at);

    let mut result: Vec<PricePoint> = Vec::with_capacity(points.len());
    for point in points {
        let day = point.at.with_timezone(timezone).date_naive();
        match result.last_mut() {
            Some(last) if last.at.with_timezone(timezone).date_naive() == day => *last = point,
            _ => result.push(point),
        }
    }
    result
}

pub fn join_closes(closes: &[Decimal]) -> String {
    closes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-joined close list. Empty fragments are skipped.
pub fn parse_closes(symbol: &Symbol, raw: &str) -> Result<Vec<Decimal>, EngineError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Decimal::from_str(s).map_err(|e| EngineError::MalformedHistoricalData {
                symbol: symbol.to_string(),
                detail: format!("close '{}': {}", s, e),
            })
        })
        .collect()
}
