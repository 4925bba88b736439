//! Apalis worker setup for symbol evaluation jobs

use crate::jobs::context::JobContext;
use crate::jobs::handlers;
use crate::jobs::types::EvaluateSymbolJob;
use crate::models::Symbol;
use apalis::prelude::*;
use apalis_redis::RedisStorage;
use std::sync::Arc;
use tracing::info;

/// Configuration for the job runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub evaluation_interval_seconds: u64,
    pub symbols: Vec<Symbol>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_seconds: 300,
            symbols: Vec::new(),
        }
    }
}

/// Runs evaluation workers against the Redis job queue
pub struct SignalRuntime {
    job_context: Arc<JobContext>,
    storage: Arc<RedisStorage<EvaluateSymbolJob>>,
    concurrency: usize,
}

impl SignalRuntime {
    /// Concurrency defaults to one worker per watched symbol.
    pub fn new(
        config: &RuntimeConfig,
        job_context: Arc<JobContext>,
        storage: Arc<RedisStorage<EvaluateSymbolJob>>,
    ) -> Self {
        Self {
            job_context,
            storage,
            concurrency: config.symbols.len().max(1),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Start `concurrency` workers on the shared queue and return their handles.
    ///
    /// Two jobs for the same symbol never evaluate at once; the job context's
    /// symbol locks serialize them.
    pub async fn start_workers(
        &self,
    ) -> Result<Vec<tokio::task::JoinHandle<()>>, Box<dyn std::error::Error + Send + Sync>> {
        let mut handles = Vec::with_capacity(self.concurrency);

        info!(
            concurrency = self.concurrency,
            "SignalRuntime: starting {} evaluation workers",
            self.concurrency
        );

        for index in 0..self.concurrency {
            let storage = (*self.storage).clone();
            let job_context = self.job_context.clone();
            let name = format!("evaluate-symbol-worker-{}", index);
            let handle = tokio::spawn(async move {
                let worker = WorkerBuilder::new(&name)
                    .data(job_context)
                    .backend(storage)
                    .build_fn(handlers::handle_evaluate_symbol);

                worker.run().await;
            });
            handles.push(handle);
        }

        info!("SignalRuntime: all workers started");
        Ok(handles)
    }
}
