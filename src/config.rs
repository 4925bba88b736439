//! Environment-driven configuration for the worker and its collaborators.

use crate::core::scheduler::interval_to_cron;
use crate::models::Symbol;
use chrono_tz::Tz;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";
pub const DEFAULT_EXCHANGE_TIMEZONE: &str = "America/New_York";
pub const DEFAULT_QUOTES_API_URL: &str = "https://api.robinhood.com";
pub const DEFAULT_ALPHAVANTAGE_API_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_SIGNAL_STREAM: &str = "equity_signals";
pub const DEFAULT_MEMO_TTL_SECONDS: u64 = 3 * 86_400;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where MACD values come from for each evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    /// Computed by the engine from historical closes plus the live quote.
    Local,
    /// Reported by the upstream indicator provider.
    Remote,
}

impl std::str::FromStr for SignalSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(SignalSource::Local),
            "remote" => Ok(SignalSource::Remote),
            other => Err(format!("unknown signal source '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: String,
    pub redis_url: String,
    pub watchlist: Vec<Symbol>,
    pub eval_interval_seconds: u64,
    pub worker_concurrency: usize,
    pub exchange_timezone: Tz,
    pub signal_source: SignalSource,
    pub require_market_open: bool,
    pub signal_stream: String,
    pub quotes_api_url: String,
    pub alphavantage_api_url: String,
    pub alphavantage_api_key: Option<String>,
    pub provider_timeout: Duration,
    pub provider_max_retries: usize,
    /// Expiry of the day-keyed close and session memos.
    pub memo_ttl_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let watchlist = parse_watchlist(
            &env::var("EQUITY_WATCHLIST").map_err(|_| ConfigError::Missing("EQUITY_WATCHLIST"))?,
        )?;

        let eval_interval_seconds = parse_var("EVAL_INTERVAL_SECONDS", 300u64)?;
        interval_to_cron(eval_interval_seconds).map_err(|reason| ConfigError::Invalid {
            name: "EVAL_INTERVAL_SECONDS",
            reason,
        })?;

        let worker_concurrency = parse_var("WORKER_CONCURRENCY", watchlist.len().max(1))?;

        let exchange_timezone = parse_timezone(
            &env::var("EXCHANGE_TIMEZONE").unwrap_or_else(|_| DEFAULT_EXCHANGE_TIMEZONE.to_string()),
        )?;

        let signal_source = env::var("SIGNAL_SOURCE")
            .ok()
            .map(|s| s.parse::<SignalSource>())
            .transpose()
            .map_err(|reason| ConfigError::Invalid {
                name: "SIGNAL_SOURCE",
                reason,
            })?
            .unwrap_or(SignalSource::Local);

        let alphavantage_api_key = env::var("ALPHAVANTAGE_API_KEY").ok().filter(|k| !k.is_empty());
        if signal_source == SignalSource::Remote && alphavantage_api_key.is_none() {
            return Err(ConfigError::Missing("ALPHAVANTAGE_API_KEY"));
        }

        Ok(Self {
            environment: get_environment(),
            redis_url: get_redis_url(),
            watchlist,
            eval_interval_seconds,
            worker_concurrency,
            exchange_timezone,
            signal_source,
            require_market_open: parse_var("REQUIRE_MARKET_OPEN", true)?,
            signal_stream: env::var("SIGNAL_STREAM")
                .unwrap_or_else(|_| DEFAULT_SIGNAL_STREAM.to_string()),
            quotes_api_url: env::var("QUOTES_API_URL")
                .unwrap_or_else(|_| DEFAULT_QUOTES_API_URL.to_string()),
            alphavantage_api_url: env::var("ALPHAVANTAGE_API_URL")
                .unwrap_or_else(|_| DEFAULT_ALPHAVANTAGE_API_URL.to_string()),
            alphavantage_api_key,
            provider_timeout: Duration::from_secs(parse_var("PROVIDER_TIMEOUT_SECONDS", 10u64)?),
            provider_max_retries: parse_var("PROVIDER_MAX_RETRIES", 3usize)?,
            memo_ttl_seconds: parse_var("MEMO_TTL_SECONDS", DEFAULT_MEMO_TTL_SECONDS)?,
        })
    }
}

/// Deployment environment name (`production`, `sandbox`, ...).
pub fn get_environment() -> String {
    env::var("ENVIRONMENT")
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_redis_url() -> String {
    env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string())
}

/// Split a comma-separated watchlist into symbols, dropping blanks and duplicates.
pub fn parse_watchlist(raw: &str) -> Result<Vec<Symbol>, ConfigError> {
    let mut symbols = Vec::new();
    for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
        let symbol = Symbol::new(part).map_err(|reason| ConfigError::Invalid {
            name: "EQUITY_WATCHLIST",
            reason,
        })?;
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        return Err(ConfigError::Invalid {
            name: "EQUITY_WATCHLIST",
            reason: "no symbols configured".to_string(),
        });
    }
    Ok(symbols)
}

pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| ConfigError::Invalid {
            name: "EXCHANGE_TIMEZONE",
            reason: e.to_string(),
        })
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        }
        _ => Ok(default),
    }
}
