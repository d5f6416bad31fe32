//! Basic HTTP behavior of the host: routes and the request id header.

use crate::helpers::*;
use reqwest::StatusCode;
use uuid::Uuid;

/// Health probe answers JSON
#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let resp = server.get("/health").await;

    assert_status(&resp, StatusCode::OK);
    assert_eq!(header(&resp, "content-type"), "application/json");
    assert_eq!(resp.text().await.unwrap(), r#"{"status":"ok"}"#);
}

/// Metrics endpoint exposes the pipeline counters
#[tokio::test]
async fn test_metrics_endpoint() {
    let server = TestServer::start().await;
    let resp = server.get("/metrics").await;

    assert_status(&resp, StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("# TYPE request_log_events_emitted_total counter"));
    assert!(body.contains("request_log_events_blacklisted_total"));
}

/// Default route echoes the request
#[tokio::test]
async fn test_echo() {
    let server = TestServer::start().await;
    let resp = server.post("/orders?x=1", "hello").await;

    assert_status(&resp, StatusCode::OK);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["method"], "POST");
    assert_eq!(json["path"], "/orders");
    assert_eq!(json["query"], "x=1");
    assert_eq!(json["bytes"], 5);
}

/// A valid incoming request id is echoed back
#[tokio::test]
async fn test_request_id_echoed() {
    let server = TestServer::start().await;
    let id = "3fa85f64-5717-4562-b3fc-2c963f66afa6";
    let resp = server.get_with_headers("/", &[("OT-RequestId", id)]).await;

    assert_eq!(header(&resp, "ot-requestid"), id);
}

/// A malformed incoming request id is replaced, and the request still succeeds
#[tokio::test]
async fn test_request_id_replaced() {
    let server = TestServer::start().await;
    let resp = server
        .get_with_headers("/", &[("OT-RequestId", "not-a-uuid")])
        .await;

    assert_status(&resp, StatusCode::OK);
    let sent = header(&resp, "ot-requestid");
    assert_ne!(sent, "not-a-uuid");
    assert!(Uuid::parse_str(sent).is_ok());
}

/// Every response gets a distinct id
#[tokio::test]
async fn test_request_ids_unique() {
    let server = TestServer::start().await;
    let a = server.get("/").await;
    let b = server.get("/").await;

    assert_ne!(header(&a, "ot-requestid"), header(&b, "ot-requestid"));
}
