//! Publishes signal events to a Redis stream (`XADD <stream> * key <symbol> payload <json>`).

use super::{EventSink, PublishError};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::debug;

#[derive(Clone)]
pub struct RedisStreamSink {
    conn: ConnectionManager,
    stream: String,
}

impl RedisStreamSink {
    pub async fn connect(url: &str, stream: impl Into<String>) -> Result<Self, PublishError> {
        let client = redis::Client::open(url).map_err(|e| PublishError::Unavailable(e.to_string()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;
        Ok(Self {
            conn,
            stream: stream.into(),
        })
    }
}

#[async_trait]
impl EventSink for RedisStreamSink {
    async fn publish(&self, key: &str, payload: &[u8]) -> Result<(), PublishError> {
        let mut conn = self.conn.clone();
        let id: String = conn
            .xadd(&self.stream, "*", &[("key", key.as_bytes()), ("payload", payload)])
            .await
            .map_err(|e| PublishError::Unavailable(e.to_string()))?;

        debug!(stream = %self.stream, key = %key, id = %id, "RedisStreamSink: appended event");
        Ok(())
    }
}
