//! Process-local cache for single-instance runs and tests.

use super::{decay_marker_key, parse_marker, parse_state, signal_state_key, Cache, CacheError};
use crate::models::{SignalState, Symbol};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a key unconditionally.
    pub async fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, CacheError> {
        let mut entries = self.entries.write().await;
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(true)
    }

    async fn get_state(&self, symbol: &Symbol) -> Result<Option<SignalState>, CacheError> {
        let key = signal_state_key(symbol);
        match self.get(&key).await? {
            Some(raw) => parse_state(&key, &raw).map(Some),
            None => Ok(None),
        }
    }

    async fn set_state(&self, symbol: &Symbol, state: SignalState) -> Result<(), CacheError> {
        self.set(&signal_state_key(symbol), state.as_str()).await;
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
        self.set(
            &decay_marker_key(symbol),
            &at.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
        .await;
        Ok(())
    }
}
