//! Shared fakes and fixtures for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use signalwatch::cache::MemoryCache;
use signalwatch::models::{IndicatorReading, LatestQuote, PricePoint, Symbol};
use signalwatch::services::{
    HistoricalPriceSource, IndicatorSource, LatestQuoteSource, MarketHoursSource, MemorySink,
    ProviderError,
};
use signalwatch::signals::SignalEngine;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// 2024-03-15 11:00 in New York.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 15, 0, 0).unwrap()
}

pub fn symbol(raw: &str) -> Symbol {
    Symbol::new(raw).unwrap()
}

/// One close per day ending the day before `end`, oldest first.
pub fn daily_points(closes: &[i64], end: DateTime<Utc>) -> Vec<PricePoint> {
    let n = closes.len() as i64;
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(end - Duration::days(n - i as i64), Decimal::from(c)))
        .collect()
}

/// Closes 10, 11, ..., 40 dated on the 31 days before `t0`.
pub fn ramp_history() -> Vec<PricePoint> {
    daily_points(&(10..=40).collect::<Vec<_>>(), t0())
}

pub fn quote(price: i64, at: DateTime<Utc>) -> LatestQuote {
    LatestQuote::new(Decimal::from(price), at)
}

pub struct FakeHistory {
    points: Mutex<Vec<PricePoint>>,
    failure: Mutex<Option<fn() -> ProviderError>>,
    calls: AtomicUsize,
}

impl FakeHistory {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self {
            points: Mutex::new(points),
            failure: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: fn() -> ProviderError) -> Self {
        let fake = Self::new(Vec::new());
        *fake.failure.lock().unwrap() = Some(error);
        fake
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HistoricalPriceSource for FakeHistory {
    async fn fetch_daily_closes(&self, _symbol: &Symbol) -> Result<Vec<PricePoint>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = *self.failure.lock().unwrap() {
            return Err(error());
        }
        Ok(self.points.lock().unwrap().clone())
    }
}

pub struct FakeQuotes {
    quote: LatestQuote,
    calls: AtomicUsize,
}

impl FakeQuotes {
    pub fn new(quote: LatestQuote) -> Self {
        Self {
            quote,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LatestQuoteSource for FakeQuotes {
    async fn fetch_latest_quote(&self, _symbol: &Symbol) -> Result<LatestQuote, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.quote)
    }
}

pub struct FakeIndicators {
    pub reading: IndicatorReading,
}

#[async_trait]
impl IndicatorSource for FakeIndicators {
    async fn fetch_macd(&self, _symbol: &Symbol) -> Result<IndicatorReading, ProviderError> {
        Ok(self.reading)
    }
}

pub struct FakeHours {
    body: String,
    calls: AtomicUsize,
}

impl FakeHours {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketHoursSource for FakeHours {
    async fn fetch_market_hours(&self, _market: &str, _day: NaiveDate) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

/// Session document with the extended session 07:00-20:00 New York time on 2024-03-15.
pub fn open_session_body() -> String {
    serde_json::json!({
        "date": "2024-03-15",
        "is_open": true,
        "extended_opens_at": "2024-03-15T11:00:00Z",
        "extended_closes_at": "2024-03-16T00:00:00Z"
    })
    .to_string()
}

pub fn holiday_session_body() -> String {
    serde_json::json!({
        "date": "2024-03-15",
        "is_open": false,
        "extended_opens_at": null,
        "extended_closes_at": null
    })
    .to_string()
}

pub struct TestEngine {
    pub cache: Arc<MemoryCache>,
    pub sink: Arc<MemorySink>,
    pub history: Arc<FakeHistory>,
    pub engine: SignalEngine,
}

impl TestEngine {
    pub fn new(history: FakeHistory) -> Self {
        let cache = Arc::new(MemoryCache::new());
        let sink = Arc::new(MemorySink::new());
        let history = Arc::new(history);
        let engine = SignalEngine::new(
            cache.clone(),
            history.clone(),
            sink.clone(),
            chrono_tz::America::New_York,
        );
        Self {
            cache,
            sink,
            history,
            engine,
        }
    }
}
