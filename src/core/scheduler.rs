//! Cron-based scheduler for enqueuing symbol evaluation jobs

use crate::jobs::types::EvaluateSymbolJob;
use crate::models::Symbol;
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Cron expression (with seconds field) that fires every `interval_seconds`.
///
/// Cron steps restart at each minute, hour or day boundary, so only intervals
/// that divide that boundary evenly tick at a constant rate. Anything else is
/// rejected: seconds must divide 60, minutes must divide 60, hours must divide 24.
pub fn interval_to_cron(interval_seconds: u64) -> Result<String, String> {
    match interval_seconds {
        0 => Err("interval must be > 0".to_string()),
        s if s < 60 && 60 % s == 0 => Ok(format!("*/{} * * * * *", s)),
        s if s < 3600 && s % 60 == 0 && 60 % (s / 60) == 0 => {
            Ok(format!("0 */{} * * * *", s / 60))
        }
        86_400 => Ok("0 0 0 * * *".to_string()),
        s if s < 86_400 && s % 3600 == 0 && 24 % (s / 3600) == 0 => {
            Ok(format!("0 0 */{} * * *", s / 3600))
        }
        s => Err(format!(
            "interval {}s does not divide a minute, hour or day evenly",
            s
        )),
    }
}

/// Periodically enqueues one [`EvaluateSymbolJob`] per watched symbol
pub struct JobScheduler {
    storage: Arc<RedisStorage<EvaluateSymbolJob>>,
    symbols: Vec<Symbol>,
    schedule: Schedule,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl JobScheduler {
    pub fn new(
        storage: Arc<RedisStorage<EvaluateSymbolJob>>,
        symbols: Vec<Symbol>,
        interval_seconds: u64,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let cron_expr = interval_to_cron(interval_seconds)?;
        let schedule = Schedule::from_str(&cron_expr)
            .map_err(|e| format!("Invalid cron expression '{}': {}", cron_expr, e))?;

        info!(
            interval = interval_seconds,
            cron = %cron_expr,
            symbols = ?symbols,
            "JobScheduler: created with interval {}s (cron: {})",
            interval_seconds,
            cron_expr
        );

        Ok(Self {
            storage,
            symbols,
            schedule,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Enqueue a job for every symbol right now.
    pub async fn enqueue_all(&self) -> usize {
        enqueue_symbols(&self.storage, &self.symbols).await
    }

    /// Start the cron loop in the background
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let storage = self.storage.clone();
        let symbols = self.symbols.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("JobScheduler: started, waiting for cron schedule...");

            loop {
                match schedule.upcoming(chrono::Utc).next() {
                    Some(next_tick) => {
                        let now = chrono::Utc::now();
                        if next_tick > now {
                            let duration = (next_tick - now).to_std().unwrap_or_default();
                            tokio::time::sleep(duration).await;
                        }
                    }
                    None => {
                        tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                        continue;
                    }
                }

                let enqueued = enqueue_symbols(&storage, &symbols).await;
                info!(
                    enqueued = enqueued,
                    symbol_count = symbols.len(),
                    "JobScheduler: cron tick, enqueued {} of {} symbols",
                    enqueued,
                    symbols.len()
                );
            }
        });

        *self.handle.write().await = Some(handle);
        info!("JobScheduler: started successfully");
        Ok(())
    }

    pub async fn stop(&self) {
        if let Some(h) = self.handle.write().await.take() {
            h.abort();
            info!("JobScheduler: stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}

async fn enqueue_symbols(storage: &Arc<RedisStorage<EvaluateSymbolJob>>, symbols: &[Symbol]) -> usize {
    let mut enqueued = 0;
    for symbol in symbols {
        let mut storage = (**storage).clone();
        match storage.push(EvaluateSymbolJob::new(symbol.clone())).await {
            Ok(_) => {
                enqueued += 1;
                debug!(symbol = %symbol, "JobScheduler: enqueued EvaluateSymbolJob for {}", symbol);
            }
            Err(e) => {
                error!(
                    symbol = %symbol,
                    error = %e,
                    "JobScheduler: failed to enqueue EvaluateSymbolJob for {}",
                    symbol
                );
            }
        }
    }
    enqueued
}
