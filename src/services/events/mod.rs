//! Outbound event sinks.

pub mod memory;
pub mod redis_stream;

pub use memory::{MemorySink, PublishedEvent};
pub use redis_stream::RedisStreamSink;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("event sink unavailable: {0}")]
    Unavailable(String),

    #[error("event rejected: {0}")]
    Rejected(String),
}

#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver `payload` routed by `key`.
    async fn publish(&self, key: &str, payload: &[u8]) -> Result<(), PublishError>;
}
