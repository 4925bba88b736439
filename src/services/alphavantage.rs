//! Alpha Vantage technical-indicator client (provider-computed daily MACD).

use crate::models::{IndicatorReading, MacdIndicator, Symbol};
use crate::services::market_data::{IndicatorSource, ProviderError};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct MacdResponse {
    #[serde(rename = "Technical Analysis: MACD")]
    analysis: Option<BTreeMap<String, MacdEntry>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MacdEntry {
    #[serde(rename = "MACD")]
    macd: String,
    #[serde(rename = "MACD_Signal")]
    macd_signal: String,
}

pub struct AlphaVantageClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl AlphaVantageClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, api_key, http))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            http,
        }
    }
}

/// Latest entry dated `today`, falling back to `today - 1`.
fn select_entry(analysis: &BTreeMap<String, MacdEntry>, today: NaiveDate) -> Option<&MacdEntry> {
    let yesterday = today - ChronoDuration::days(1);
    [today, yesterday].iter().find_map(|day| {
        let prefix = day.format("%Y-%m-%d").to_string();
        analysis
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .last()
            .map(|(_, entry)| entry)
    })
}

fn parse_value(field: &str, raw: &str) -> Result<Decimal, ProviderError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| ProviderError::Malformed(format!("{} '{}': {}", field, raw, e)))
}

#[async_trait]
impl IndicatorSource for AlphaVantageClient {
    async fn fetch_macd(&self, symbol: &Symbol) -> Result<IndicatorReading, ProviderError> {
        let response = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "MACD"),
                ("symbol", symbol.as_str()),
                ("interval", "daily"),
                ("series_type", "close"),
                ("apikey", self.api_key.as_str()),
            ])
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if status.is_client_error() {
            return Err(ProviderError::Rejected(format!("incorrect status code: {}", status)));
        }
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!("incorrect status code: {}", status)));
        }

        let body: MacdResponse = response.json().await?;
        if body.note.is_some() || body.information.is_some() {
            return Err(ProviderError::RateLimited);
        }
        if let Some(message) = body.error_message {
            return Err(ProviderError::Unavailable(message));
        }

        let analysis = body
            .analysis
            .ok_or_else(|| ProviderError::Malformed("missing 'Technical Analysis: MACD'".to_string()))?;

        let now = Utc::now();
        let entry = select_entry(&analysis, now.date_naive()).ok_or_else(|| {
            ProviderError::Unavailable(format!("no MACD reading for {} today or yesterday", symbol))
        })?;

        let macd = MacdIndicator {
            macd: parse_value("MACD", &entry.macd)?,
            signal: parse_value("MACD_Signal", &entry.macd_signal)?,
        };

        debug!(symbol = %symbol, macd = %macd.macd, signal = %macd.signal, "AlphaVantageClient: fetched MACD for {}", symbol);
        Ok(IndicatorReading { macd, at: now })
    }
}
