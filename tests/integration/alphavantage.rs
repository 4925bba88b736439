//! Provider-computed MACD client against a mock server.

use crate::test_utils::symbol;
use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use serde_json::json;
use signalwatch::services::{AlphaVantageClient, IndicatorSource, ProviderError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> AlphaVantageClient {
    AlphaVantageClient::with_client(server.uri(), "demo", reqwest::Client::new())
}

async fn mount(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/query"))
        .and(query_param("function", "MACD"))
        .and(query_param("symbol", "IBM"))
        .and(query_param("interval", "daily"))
        .and(query_param("series_type", "close"))
        .and(query_param("apikey", "demo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn picks_todays_reading() {
    let server = MockServer::start().await;
    let today = Utc::now().date_naive();
    let yesterday = today - Duration::days(1);
    mount(
        &server,
        json!({
            "Meta Data": {"1: Symbol": "IBM"},
            "Technical Analysis: MACD": {
                today.format("%Y-%m-%d").to_string(): {
                    "MACD": "1.2345", "MACD_Hist": "0.1000", "MACD_Signal": "1.1345"
                },
                yesterday.format("%Y-%m-%d").to_string(): {
                    "MACD": "0.5000", "MACD_Hist": "-0.1000", "MACD_Signal": "0.6000"
                }
            }
        }),
    )
    .await;

    let reading = client(&server).fetch_macd(&symbol("IBM")).await.unwrap();

    assert_eq!(reading.macd.macd, dec!(1.2345));
    assert_eq!(reading.macd.signal, dec!(1.1345));
}

#[tokio::test]
async fn falls_back_to_yesterday() {
    let server = MockServer::start().await;
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    let older = yesterday - Duration::days(3);
    mount(
        &server,
        json!({
            "Technical Analysis: MACD": {
                yesterday.format("%Y-%m-%d").to_string(): {"MACD": "-0.5", "MACD_Signal": "-0.4"},
                older.format("%Y-%m-%d").to_string(): {"MACD": "9", "MACD_Signal": "9"}
            }
        }),
    )
    .await;

    let reading = client(&server).fetch_macd(&symbol("IBM")).await.unwrap();

    assert_eq!(reading.macd.macd, dec!(-0.5));
    assert_eq!(reading.macd.signal, dec!(-0.4));
}

#[tokio::test]
async fn stale_readings_are_unavailable() {
    let server = MockServer::start().await;
    let old = Utc::now().date_naive() - Duration::days(5);
    mount(
        &server,
        json!({
            "Technical Analysis: MACD": {
                old.format("%Y-%m-%d").to_string(): {"MACD": "1", "MACD_Signal": "1"}
            }
        }),
    )
    .await;

    let err = client(&server).fetch_macd(&symbol("IBM")).await.unwrap_err();

    assert!(matches!(err, ProviderError::Unavailable(_)));
}

#[tokio::test]
async fn throttle_note_is_rate_limited() {
    let server = MockServer::start().await;
    mount(
        &server,
        json!({"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}),
    )
    .await;

    let err = client(&server).fetch_macd(&symbol("IBM")).await.unwrap_err();

    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn error_message_is_unavailable() {
    let server = MockServer::start().await;
    mount(&server, json!({"Error Message": "Invalid API call."})).await;

    let err = client(&server).fetch_macd(&symbol("IBM")).await.unwrap_err();

    assert!(matches!(err, ProviderError::Unavailable(_)));
}
