//! REST client for quotes, daily historicals and exchange session hours.

use crate::models::{parse_timestamp, LatestQuote, PricePoint, Symbol};
use crate::services::market_data::{HistoricalPriceSource, LatestQuoteSource, ProviderError};
use crate::services::market_hours::MarketHoursSource;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct HistoricalsResponse {
    #[serde(default)]
    historicals: Vec<Historical>,
}

#[derive(Debug, Deserialize)]
struct Historical {
    begins_at: DateTime<Utc>,
    close_price: String,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    last_trade_price: String,
    updated_at: String,
}

pub struct RobinhoodClient {
    base_url: String,
    http: reqwest::Client,
    max_retries: usize,
}

impl RobinhoodClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        max_retries: usize,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, http, max_retries))
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client, max_retries: usize) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
            max_retries,
        }
    }

    /// GET with bounded retries on transport failures and 5xx. Rate limiting and
    /// other 4xx responses are returned immediately.
    async fn get(&self, url: String) -> Result<String, ProviderError> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_times(self.max_retries);

        (|| get_body(self.http.clone(), url.clone()))
            .retry(backoff)
            .when(|e| matches!(e, ProviderError::Unavailable(_)))
            .notify(|e, delay| {
                warn!(url = %url, error = %e, delay_ms = delay.as_millis() as u64, "RobinhoodClient: retrying request");
            })
            .await
    }
}

async fn get_body(http: reqwest::Client, url: String) -> Result<String, ProviderError> {
    let response = http
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if status.is_client_error() {
        return Err(ProviderError::Rejected(format!("{} returned {}", url, status)));
    }
    if !status.is_success() {
        return Err(ProviderError::Unavailable(format!("{} returned {}", url, status)));
    }

    Ok(response.text().await?)
}

fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| ProviderError::Malformed(format!("{} '{}': {}", field, raw, e)))
}

#[async_trait]
impl HistoricalPriceSource for RobinhoodClient {
    async fn fetch_daily_closes(&self, symbol: &Symbol) -> Result<Vec<PricePoint>, ProviderError> {
        let url = format!("{}/quotes/historicals/{}/?interval=day", self.base_url, symbol);
        let body = self.get(url).await?;

        let response: HistoricalsResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let points = response
            .historicals
            .into_iter()
            .map(|h| Ok(PricePoint::new(h.begins_at, parse_decimal("close_price", &h.close_price)?)))
            .collect::<Result<Vec<_>, ProviderError>>()?;

        debug!(symbol = %symbol, count = points.len(), "RobinhoodClient: fetched {} daily closes for {}", points.len(), symbol);
        Ok(points)
    }
}

#[async_trait]
impl LatestQuoteSource for RobinhoodClient {
    async fn fetch_latest_quote(&self, symbol: &Symbol) -> Result<LatestQuote, ProviderError> {
        let url = format!("{}/quotes/{}/", self.base_url, symbol);
        let body = self.get(url).await?;

        let response: QuoteResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let price = parse_decimal("last_trade_price", &response.last_trade_price)?;
        let at = parse_timestamp(&response.updated_at).ok_or_else(|| {
            ProviderError::Malformed(format!("updated_at '{}'", response.updated_at))
        })?;

        Ok(LatestQuote::new(price, at))
    }
}

#[async_trait]
impl MarketHoursSource for RobinhoodClient {
    async fn fetch_market_hours(&self, market: &str, day: NaiveDate) -> Result<String, ProviderError> {
        let url = format!("{}/markets/{}/hours/{}/", self.base_url, market, day.format("%Y-%m-%d"));
        self.get(url).await
    }
}
