//! Signalwatch Worker
//!
//! Schedules and processes symbol evaluation jobs from the Redis queue.

use apalis_redis::RedisStorage;
use dotenvy::dotenv;
use signalwatch::cache::{Cache, RedisCache};
use signalwatch::config::{Config, SignalSource};
use signalwatch::core::runtime::{RuntimeConfig, SignalRuntime};
use signalwatch::core::scheduler::JobScheduler;
use signalwatch::jobs::context::JobContext;
use signalwatch::jobs::types::EvaluateSymbolJob;
use signalwatch::logging;
use signalwatch::services::{
    AlphaVantageClient, EventSink, MarketHours, RedisStreamSink, RobinhoodClient,
};
use signalwatch::signals::SignalEngine;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    info!("Starting Signalwatch Worker");
    info!(environment = %config.environment, "Environment");
    info!(
        symbols = ?config.watchlist,
        interval = config.eval_interval_seconds,
        source = ?config.signal_source,
        timezone = %config.exchange_timezone,
        "Watching {} symbols every {} seconds",
        config.watchlist.len(),
        config.eval_interval_seconds
    );

    info!("Initializing Redis connection...");
    let cache: Arc<dyn Cache> = match RedisCache::connect(&config.redis_url).await {
        Ok(c) => {
            info!(memo_ttl_seconds = config.memo_ttl_seconds, "Redis connected");
            Arc::new(c.with_memo_ttl(config.memo_ttl_seconds))
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to Redis");
            return Err(format!("Redis connection required for worker: {}", e).into());
        }
    };

    let sink: Arc<dyn EventSink> =
        Arc::new(RedisStreamSink::connect(&config.redis_url, config.signal_stream.clone()).await?);

    let quotes = Arc::new(RobinhoodClient::new(
        config.quotes_api_url.clone(),
        config.provider_timeout,
        config.provider_max_retries,
    )?);

    let mut engine = SignalEngine::new(cache.clone(), quotes.clone(), sink, config.exchange_timezone);
    if config.signal_source == SignalSource::Remote {
        if let Some(ref key) = config.alphavantage_api_key {
            engine = engine.with_indicator_source(Arc::new(AlphaVantageClient::new(
                config.alphavantage_api_url.clone(),
                key.clone(),
                config.provider_timeout,
            )?));
        }
    }

    let market_hours = if config.require_market_open {
        Some(Arc::new(MarketHours::new(
            quotes.clone(),
            cache.clone(),
            config.exchange_timezone,
        )))
    } else {
        warn!("REQUIRE_MARKET_OPEN=false: evaluating outside trading sessions");
        None
    };

    let job_context = Arc::new(JobContext::new(
        Arc::new(engine),
        quotes,
        market_hours,
        config.signal_source,
    ));

    info!("Initializing Apalis Redis storage...");
    let conn = apalis_redis::connect(config.redis_url.clone()).await?;
    let storage: Arc<RedisStorage<EvaluateSymbolJob>> = Arc::new(RedisStorage::new(conn));

    let runtime_config = RuntimeConfig {
        evaluation_interval_seconds: config.eval_interval_seconds,
        symbols: config.watchlist.clone(),
    };

    let runtime = SignalRuntime::new(&runtime_config, job_context, storage.clone())
        .with_concurrency(config.worker_concurrency);
    let worker_handles = runtime
        .start_workers()
        .await
        .map_err(|e| format!("Failed to start workers: {}", e))?;

    let scheduler = JobScheduler::new(
        storage,
        runtime_config.symbols.clone(),
        runtime_config.evaluation_interval_seconds,
    )?;
    // Evaluate immediately instead of waiting for the first tick.
    scheduler.enqueue_all().await;
    scheduler.start().await?;

    info!("Worker started, waiting for shutdown signal...");
    signal::ctrl_c().await?;

    info!("Shutting down worker...");
    scheduler.stop().await;
    for handle in worker_handles {
        handle.abort();
    }
    info!("Worker stopped");

    Ok(())
}
