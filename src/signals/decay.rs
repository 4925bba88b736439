//! Signal-line window that narrows after a state flip and stays narrow.
//!
//! window = max_window - round(elapsed_days * 5/7), clamped to [min_window, max_window]
//!
//! Rounding is half away from zero on the decayed amount.

use crate::cache::Cache;
use crate::error::EngineError;
use crate::models::Symbol;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecayPolicy {
    pub max_window: u32,
    pub min_window: u32,
    /// Window shrink per elapsed day, as `numerator / denominator`.
    pub rate_numerator: u32,
    pub rate_denominator: u32,
}

impl Default for DecayPolicy {
    fn default() -> Self {
        Self {
            max_window: 9,
            min_window: 2,
            rate_numerator: 5,
            rate_denominator: 7,
        }
    }
}

impl DecayPolicy {
    /// Fractional days between `marker` and `now`; negative spans count as zero.
    pub fn elapsed_days(marker: DateTime<Utc>, now: DateTime<Utc>) -> Decimal {
        let millis = (now - marker).num_milliseconds().max(0);
        Decimal::from(millis) / Decimal::from(MILLIS_PER_DAY)
    }

    pub fn window_for_elapsed(&self, elapsed_days: Decimal) -> u32 {
        let elapsed = elapsed_days.max(Decimal::ZERO);
        let decayed = (elapsed * Decimal::from(self.rate_numerator)
            / Decimal::from(self.rate_denominator.max(1)))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        let max = Decimal::from(self.max_window);
        let min = Decimal::from(self.min_window.min(self.max_window));
        (max - decayed)
            .max(min)
            .min(max)
            .to_u32()
            .unwrap_or(self.min_window)
    }

    /// A missing marker means the window was just reset.
    pub fn window_for(&self, marker: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
        let elapsed = marker
            .map(|m| Self::elapsed_days(m, now))
            .unwrap_or(Decimal::ZERO);
        self.window_for_elapsed(elapsed)
    }
}

pub struct DecayWindowCalculator {
    cache: Arc<dyn Cache>,
    policy: DecayPolicy,
}

impl DecayWindowCalculator {
    pub fn new(cache: Arc<dyn Cache>, policy: DecayPolicy) -> Self {
        Self { cache, policy }
    }

    pub fn policy(&self) -> &DecayPolicy {
        &self.policy
    }

    pub async fn window(&self, symbol: &Symbol, now: DateTime<Utc>) -> Result<u32, EngineError> {
        let marker = self.cache.get_decay_marker(symbol).await?;
        Ok(self.policy.window_for(marker, now))
    }
}
