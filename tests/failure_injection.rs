//! Failure injection tests: provider errors, slow and unreachable providers,
//! hostile request bodies.

use pi_relay_sdk::RelayClient;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

#[tokio::test]
async fn test_provider_rejection_is_502_with_diagnostics() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/payments/XYZ/complete"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "already completed"})),
        )
        .expect(1)
        .mount(&provider)
        .await;

    let relay = common::start_relay(common::relay_config(&provider.uri())).await;
    let resp = RelayClient::new(&relay.url()).complete("XYZ", "T1").await.unwrap();

    assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
    assert_eq!(resp.body["error"], "Pi API complete failed");
    assert_eq!(resp.body["statusCode"], 400);
    assert_eq!(resp.body["response"], json!({"error": "already completed"}));
}

#[tokio::test]
async fn test_provider_raw_text_error() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream maintenance"))
        .mount(&provider)
        .await;

    let relay = common::start_relay(common::relay_config(&provider.uri())).await;
    let resp = RelayClient::new(&relay.url()).cancel("P").await.unwrap();

    assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        resp.body,
        json!({
            "error": "Pi API cancel failed",
            "message": "upstream maintenance",
            "statusCode": 503,
            "response": "upstream maintenance"
        })
    );
}

#[tokio::test]
async fn test_unreachable_provider_is_502() {
    let relay = common::start_relay(common::relay_config("http://127.0.0.1:1/v2")).await;
    let resp = RelayClient::new(&relay.url()).approve("P").await.unwrap();

    assert_eq!(resp.status, StatusCode::BAD_GATEWAY);
    assert_eq!(resp.body["error"], "Pi API approve failed");
    assert_eq!(resp.body["statusCode"], Value::Null);
    assert_eq!(resp.body["response"], Value::Null);
    assert!(resp.body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn test_hung_provider_is_504() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&provider)
        .await;

    let mut config = common::relay_config(&provider.uri());
    config.timeouts.upstream_secs = 1;
    let relay = common::start_relay(config).await;

    let resp = RelayClient::new(&relay.url()).approve("P").await.unwrap();
    assert_eq!(resp.status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(resp.body["error"], "Pi API approve failed");
    assert_eq!(resp.body["message"], "upstream request timed out after 1s");
}

#[tokio::test]
async fn test_oversized_body_is_400() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let relay = common::start_relay(common::relay_config(&provider.uri())).await;
    let body = format!(r#"{{"paymentId":"P","pad":"{}"}}"#, "x".repeat(1_000_000));
    let resp = RelayClient::new(&relay.url())
        .post_raw("/payment/approve", body)
        .await
        .unwrap();

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body, json!({"error": "Request body too large"}));
}

#[tokio::test]
async fn test_relay_survives_bad_requests() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "approved"})))
        .mount(&provider)
        .await;

    let relay = common::start_relay(common::relay_config(&provider.uri())).await;
    let client = RelayClient::new(&relay.url());

    for junk in ["{", "[", "\u{0}", "null", "42"] {
        let resp = client.post_raw("/payment/approve", junk).await.unwrap();
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "body {junk:?}");
    }

    let resp = client.approve("still-alive").await.unwrap();
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_shutdown_stops_accepting() {
    let relay = common::start_relay(common::relay_config("http://127.0.0.1:1/v2")).await;
    let addr = relay.addr;
    drop(relay);

    let mut refused = false;
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(addr).await.is_err() {
            refused = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(refused, "relay should stop listening after shutdown");
}
