//! Extended-hours session gate, memoized once per exchange day.

use crate::cache::{market_hours_key, Cache};
use crate::error::EngineError;
use crate::services::market_data::ProviderError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

pub const PRIMARY_MARKET: &str = "XNYS";

#[async_trait]
pub trait MarketHoursSource: Send + Sync {
    /// Raw session document for one market and day.
    async fn fetch_market_hours(&self, market: &str, day: NaiveDate) -> Result<String, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct SessionHours {
    extended_opens_at: Option<DateTime<Utc>>,
    extended_closes_at: Option<DateTime<Utc>>,
}

pub struct MarketHours {
    source: Arc<dyn MarketHoursSource>,
    cache: Arc<dyn Cache>,
    timezone: Tz,
    market: String,
}

impl MarketHours {
    pub fn new(source: Arc<dyn MarketHoursSource>, cache: Arc<dyn Cache>, timezone: Tz) -> Self {
        Self {
            source,
            cache,
            timezone,
            market: PRIMARY_MARKET.to_string(),
        }
    }

    /// True strictly between the extended-hours open and close of `now`'s exchange day.
    /// A day without extended hours (weekend, holiday) is closed.
    pub async fn is_extended_open(&self, now: DateTime<Utc>) -> Result<bool, EngineError> {
        let day = now.with_timezone(&self.timezone).date_naive();
        let key = market_hours_key(&self.market, day);

        let hours = match self.cache.get(&key).await? {
            Some(body) if !body.is_empty() => self.parse(day, &body)?,
            _ => {
                let body = self
                    .source
                    .fetch_market_hours(&self.market, day)
                    .await
                    .map_err(|e| EngineError::from_provider(&self.market, e))?;
                // Only a readable document is memoized; a bad one is refetched next tick.
                let hours = self.parse(day, &body)?;
                self.cache.set_if_absent(&key, &body).await?;
                hours
            }
        };

        let open = match (hours.extended_opens_at, hours.extended_closes_at) {
            (Some(opens), Some(closes)) => now > opens && now < closes,
            _ => false,
        };

        debug!(market = %self.market, day = %day, open = open, "MarketHours: extended session open = {}", open);
        Ok(open)
    }

    fn parse(&self, day: NaiveDate, body: &str) -> Result<SessionHours, EngineError> {
        serde_json::from_str(body).map_err(|e| EngineError::MalformedHistoricalData {
            symbol: self.market.clone(),
            detail: format!("market hours for {}: {}", day, e),
        })
    }
}
