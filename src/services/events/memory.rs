use super::{EventSink, PublishError};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEvent {
    pub key: String,
    pub payload: Vec<u8>,
}

/// Collects events in memory. Can be switched into a failing mode.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: RwLock<Vec<PublishedEvent>>,
    failing: RwLock<bool>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn events(&self) -> Vec<PublishedEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn publish(&self, key: &str, payload: &[u8]) -> Result<(), PublishError> {
        if *self.failing.read().await {
            return Err(PublishError::Unavailable("memory sink set to fail".to_string()));
        }
        self.events.write().await.push(PublishedEvent {
            key: key.to_string(),
            payload: payload.to_vec(),
        });
        Ok(())
    }
}
