//! Outbound signal message formatting and delivery.

use crate::models::IndicatorSnapshot;
use crate::services::events::{EventSink, PublishError};
use chrono::SecondsFormat;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Wire format consumed downstream. Every field is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalMessage {
    pub macd: String,
    pub macd_signal: String,
    pub at: String,
}

impl SignalMessage {
    pub fn from_snapshot(snapshot: &IndicatorSnapshot) -> Self {
        Self {
            macd: format_2dp(snapshot.macd),
            macd_signal: format_2dp(snapshot.macd_signal),
            at: snapshot
                .observed_at
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Round half away from zero to exactly two fractional digits: 1.005 -> "1.01", 1 -> "1.00".
pub fn format_2dp(value: Decimal) -> String {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded.rescale(2);
    rounded.to_string()
}

pub struct SignalPublisher {
    sink: Arc<dyn EventSink>,
}

impl SignalPublisher {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self { sink }
    }

    pub async fn publish(&self, snapshot: &IndicatorSnapshot) -> Result<SignalMessage, PublishError> {
        let message = SignalMessage::from_snapshot(snapshot);
        let payload =
            serde_json::to_vec(&message).map_err(|e| PublishError::Rejected(e.to_string()))?;

        self.sink.publish(snapshot.symbol.as_str(), &payload).await?;

        info!(
            symbol = %snapshot.symbol,
            macd = %message.macd,
            macd_signal = %message.macd_signal,
            state = %snapshot.state,
            "SignalPublisher: {} -> {}",
            snapshot.symbol,
            String::from_utf8_lossy(&payload)
        );
        Ok(message)
    }
}
