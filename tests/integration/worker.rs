//! Job-level outcomes for a single symbol evaluation.

use crate::test_utils::{
    daily_points, holiday_session_body, open_session_body, quote, ramp_history, symbol, t0,
    FakeHistory, FakeHours, FakeIndicators, FakeQuotes, TestEngine,
};
use rust_decimal_macros::dec;
use signalwatch::cache::{Cache, MemoryCache};
use signalwatch::config::SignalSource;
use signalwatch::jobs::{evaluate_symbol, EvaluationOutcome, JobContext};
use signalwatch::models::{IndicatorReading, MacdIndicator, SignalState};
use signalwatch::services::MarketHours;
use std::sync::Arc;

fn hours(body: String, cache: Arc<MemoryCache>) -> Arc<MarketHours> {
    Arc::new(MarketHours::new(
        Arc::new(FakeHours::new(body)),
        cache,
        chrono_tz::America::New_York,
    ))
}

#[tokio::test]
async fn publishes_when_session_is_open() {
    let t = TestEngine::new(FakeHistory::new(ramp_history()));
    let quotes = Arc::new(FakeQuotes::new(quote(41, t0())));
    let gate = hours(open_session_body(), t.cache.clone());
    let ctx = JobContext::new(
        Arc::new(t.engine),
        quotes.clone(),
        Some(gate),
        SignalSource::Local,
    );

    let outcome = evaluate_symbol(&ctx, &symbol("ABC"), t0()).await.unwrap();

    match outcome {
        EvaluationOutcome::Published(snapshot) => assert_eq!(snapshot.state, SignalState::Buy),
        other => panic!("expected a published snapshot, got {other:?}"),
    }
    assert_eq!(quotes.calls(), 1);
    assert_eq!(t.sink.events().await.len(), 1);
}

#[tokio::test]
async fn skips_when_market_closed() {
    let t = TestEngine::new(FakeHistory::new(ramp_history()));
    let quotes = Arc::new(FakeQuotes::new(quote(41, t0())));
    let gate = hours(holiday_session_body(), t.cache.clone());
    let ctx = JobContext::new(
        Arc::new(t.engine),
        quotes.clone(),
        Some(gate),
        SignalSource::Local,
    );

    let outcome = evaluate_symbol(&ctx, &symbol("ABC"), t0()).await.unwrap();

    assert_eq!(outcome, EvaluationOutcome::MarketClosed);
    assert_eq!(quotes.calls(), 0);
    assert_eq!(t.history.calls(), 0);
    assert!(t.sink.events().await.is_empty());
}

#[tokio::test]
async fn short_history_waits_instead_of_failing() {
    let closes: Vec<i64> = (1..=10).collect();
    let t = TestEngine::new(FakeHistory::new(daily_points(&closes, t0())));
    let ctx = JobContext::new(
        Arc::new(t.engine),
        Arc::new(FakeQuotes::new(quote(11, t0()))),
        None,
        SignalSource::Local,
    );

    let outcome = evaluate_symbol(&ctx, &symbol("ABC"), t0()).await.unwrap();

    assert_eq!(
        outcome,
        EvaluationOutcome::AwaitingHistory {
            required: 26,
            available: 11
        }
    );
    assert_eq!(t.cache.get_state(&symbol("ABC")).await.unwrap(), None);
}

#[tokio::test]
async fn remote_source_uses_reported_macd() {
    let t = TestEngine::new(FakeHistory::new(Vec::new()));
    let reading = IndicatorReading {
        macd: MacdIndicator {
            macd: dec!(2.1),
            signal: dec!(1.9),
        },
        at: t0(),
    };
    let engine = t
        .engine
        .with_indicator_source(Arc::new(FakeIndicators { reading }));
    let quotes = Arc::new(FakeQuotes::new(quote(41, t0())));
    let ctx = JobContext::new(Arc::new(engine), quotes.clone(), None, SignalSource::Remote);

    let outcome = evaluate_symbol(&ctx, &symbol("IBM"), t0()).await.unwrap();

    match outcome {
        EvaluationOutcome::Published(snapshot) => {
            assert_eq!(snapshot.state, SignalState::Buy);
            assert_eq!(snapshot.signal_window, None);
        }
        other => panic!("expected a published snapshot, got {other:?}"),
    }
    assert_eq!(quotes.calls(), 0);
    assert_eq!(t.history.calls(), 0);
}

#[tokio::test]
async fn concurrent_jobs_for_one_symbol_do_not_double_flip() {
    let t = TestEngine::new(FakeHistory::new(ramp_history()));
    t.cache
        .set_state(&symbol("ABC"), SignalState::Sell)
        .await
        .unwrap();
    let ctx = Arc::new(JobContext::new(
        Arc::new(t.engine),
        Arc::new(FakeQuotes::new(quote(41, t0()))),
        None,
        SignalSource::Local,
    ));

    let a = tokio::spawn({
        let ctx = ctx.clone();
        async move { evaluate_symbol(&ctx, &symbol("ABC"), t0()).await }
    });
    let b = tokio::spawn({
        let ctx = ctx.clone();
        async move { evaluate_symbol(&ctx, &symbol("ABC"), t0()).await }
    });

    let outcomes = [a.await.unwrap().unwrap(), b.await.unwrap().unwrap()];
    let flips = outcomes
        .iter()
        .filter(|o| matches!(o, EvaluationOutcome::Published(s) if s.transition.is_flip()))
        .count();
    assert_eq!(flips, 1);
}
