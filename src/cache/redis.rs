//! Redis-backed cache shared by every worker instance.

use super::{decay_marker_key, parse_marker, parse_state, signal_state_key, Cache, CacheError};
use crate::config::{self, DEFAULT_MEMO_TTL_SECONDS};
use crate::models::{SignalState, Symbol};
use ::redis::aio::ConnectionManager;
use ::redis::AsyncCommands;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    memo_ttl_seconds: u64,
}

impl RedisCache {
    /// Connect using `REDIS_URL`.
    pub async fn new() -> Result<Self, CacheError> {
        Self::connect(&config::get_redis_url()).await
    }

    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = ::redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        debug!(url = %url, "RedisCache: connected");
        Ok(Self {
            conn,
            memo_ttl_seconds: DEFAULT_MEMO_TTL_SECONDS,
        })
    }

    /// Expiry applied to keys written through [`Cache::set_if_absent`].
    pub fn with_memo_ttl(mut self, seconds: u64) -> Self {
        self.memo_ttl_seconds = seconds.max(1);
        self
    }

    pub fn memo_ttl_seconds(&self) -> u64 {
        self.memo_ttl_seconds
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn.clone();
        Ok(conn.get(key).await?)
    }

    /// `SET key value NX EX ttl`; the reply is `OK` when written and nil otherwise.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();
        let reply: Option<String> = ::redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("EX")
            .arg(self.memo_ttl_seconds)
            .query_async(&mut conn)
            .await?;
        Ok(reply.is_some())
    }

    async fn get_state(&self, symbol: &Symbol) -> Result<Option<SignalState>, CacheError> {
        let key = signal_state_key(symbol);
        match self.get(&key).await? {
            Some(raw) => parse_state(&key, &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn set_state(&self, symbol: &Symbol, state: SignalState) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(signal_state_key(symbol), state.as_str()).await?;
        Ok(())
    }

    async fn get_decay_marker(
        &self,
        symbol: &Symbol,
    ) -> Result<Option<DateTime<Utc>>, CacheError> {
        let key = decay_marker_key(symbol);
        match self.get(&key).await? {
            Some(raw) => parse_marker(&key, &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn set_decay_marker(
        &self,
        symbol: &Symbol,
        at: DateTime<Utc>,
    ) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let _: () = conn
            .set(
                decay_marker_key(symbol),
                at.to_rfc3339_opts(SecondsFormat::Millis, true),
            )
            .await?;
        Ok(())
    }
}
