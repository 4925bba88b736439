//! Job handlers for symbol evaluation

use crate::config::SignalSource;
use crate::error::EngineError;
use crate::jobs::context::JobContext;
use crate::jobs::types::EvaluateSymbolJob;
use crate::models::{IndicatorSnapshot, Symbol};
use apalis::prelude::*;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationOutcome {
    Published(IndicatorSnapshot),
    /// Outside the extended trading session; nothing was evaluated.
    MarketClosed,
    /// Not enough closes yet. Nothing was written.
    AwaitingHistory { required: usize, available: usize },
}

/// Evaluate one symbol under its per-symbol lease.
pub async fn evaluate_symbol(
    ctx: &JobContext,
    symbol: &Symbol,
    now: DateTime<Utc>,
) -> Result<EvaluationOutcome, EngineError> {
    let _lease = ctx.locks.acquire(symbol).await;

    if let Some(ref hours) = ctx.market_hours {
        if !hours.is_extended_open(now).await? {
            debug!(symbol = %symbol, "EvaluateSymbolJob: market closed, skipping {}", symbol);
            return Ok(EvaluationOutcome::MarketClosed);
        }
    }

    let result = match ctx.signal_source {
        SignalSource::Local => {
            let quote = ctx
                .quotes
                .fetch_latest_quote(symbol)
                .await
                .map_err(|e| EngineError::from_provider(symbol.as_str(), e))?;
            ctx.engine.evaluate_at(symbol, &quote, now).await
        }
        SignalSource::Remote => ctx.engine.evaluate_reported_at(symbol, now).await,
    };

    match result {
        Ok(snapshot) => Ok(EvaluationOutcome::Published(snapshot)),
        Err(EngineError::InsufficientHistory {
            required,
            available,
            ..
        }) => {
            debug!(
                symbol = %symbol,
                required = required,
                available = available,
                "EvaluateSymbolJob: not enough history for {} ({} < {})",
                symbol,
                available,
                required
            );
            Ok(EvaluationOutcome::AwaitingHistory {
                required,
                available,
            })
        }
        Err(e) => Err(e),
    }
}

/// Apalis entry point for [`EvaluateSymbolJob`].
pub async fn handle_evaluate_symbol(
    job: EvaluateSymbolJob,
    ctx: Data<Arc<JobContext>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let start = Instant::now();
    let symbol = &job.symbol;

    match evaluate_symbol(&ctx, symbol, Utc::now()).await {
        Ok(EvaluationOutcome::Published(snapshot)) => {
            info!(
                symbol = %symbol,
                state = %snapshot.state,
                transition = ?snapshot.transition,
                window = ?snapshot.signal_window,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "EvaluateSymbolJob: {} is {}",
                symbol,
                snapshot.state
            );
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(e) => {
            error!(
                symbol = %symbol,
                error = %e,
                state_committed = e.state_committed(),
                "EvaluateSymbolJob: evaluation failed for {}",
                symbol
            );
            Err(Box::new(e))
        }
    }
}
