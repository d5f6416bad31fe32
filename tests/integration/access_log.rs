//! Access log events produced for real HTTP exchanges.

use crate::helpers::*;
use reqwest::StatusCode;
use request_log::request_log::{Blacklist, HttpLogFields};
use uuid::Uuid;

const REQUEST_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// A logged request carries the echoed correlation id end to end
#[tokio::test]
async fn test_logged_request() {
    let server = TestServer::start().await;
    let resp = server
        .get_with_headers("/orders/42?x=1", &[("OT-RequestId", REQUEST_ID)])
        .await;
    assert_status(&resp, StatusCode::OK);
    let size = resp.bytes().await.unwrap().len() as u64;

    let event = server.single_event();
    assert_eq!(event.log_name(), "request");
    assert_eq!(event.service_type(), Some("integration-test"));
    assert_eq!(event.method(), "GET");
    assert_eq!(event.url(), "/orders/42?x=1");
    assert_eq!(event.url_querystring(), Some("x=1"));
    assert_eq!(event.status(), 200);
    assert!(event.incoming());
    assert_eq!(event.response_size(), Some(size));
    assert_eq!(event.request_id(), Some(Uuid::parse_str(REQUEST_ID).unwrap()));
    assert_ne!(event.event_id(), event.request_id().unwrap());

    let expected_prefix = format!("GET /orders/42?x=1 : 200, {} bytes in ", size);
    assert!(event.message().starts_with(&expected_prefix), "{}", event.message());
    assert!(event.message().ends_with(" ms"));

    // Correlation id was in the diagnostic context while the sink ran
    assert_eq!(server.sink.contexts(), vec![Some(REQUEST_ID.to_string())]);
}

/// Generated ids show up both on the response and in the event
#[tokio::test]
async fn test_generated_request_id() {
    let server = TestServer::start().await;
    let resp = server.get("/orders").await;
    let sent = Uuid::parse_str(header(&resp, "OT-RequestId")).unwrap();

    let event = server.single_event();
    assert_eq!(event.request_id(), Some(sent));
    assert_eq!(event.correlation_id(), sent);
}

/// Blacklisted paths are served but never logged
#[tokio::test]
async fn test_blacklisted_paths() {
    let server = TestServer::start().await;

    assert_status(&server.get("/health").await, StatusCode::OK);
    assert_status(&server.get("/HEALTH").await, StatusCode::OK);
    assert_status(&server.get("/static/app.js").await, StatusCode::OK);
    assert_status(&server.get("/metrics").await, StatusCode::OK);

    assert_eq!(server.sink.len(), 0);
    assert_eq!(server.metrics.events_blacklisted_total.get(), 4);

    server.get("/healthz").await;
    assert_eq!(server.sink.len(), 1);
}

/// Empty blacklist logs everything, including the probes
#[tokio::test]
async fn test_empty_blacklist() {
    let server = TestServer::start_with(Blacklist::empty()).await;
    server.get("/health").await;
    server.get("/metrics").await;
    assert_eq!(server.sink.len(), 2);
}

/// Passthrough headers land verbatim; missing ones stay absent
#[tokio::test]
async fn test_header_passthrough() {
    let server = TestServer::start().await;
    server
        .get_with_headers(
            "/checkout",
            &[
                ("User-Agent", "integration/1.0"),
                ("Accept-Language", "en-US"),
                ("Referer", "https://example.com/cart"),
                ("OT-UserId", "user-7"),
                ("OT-SessionId", "sess-9"),
                ("OT-ReferringService", "cart-service"),
                ("X-Forwarded-For", "10.0.0.1, 10.0.0.2"),
                ("X-Forwarded-Proto", "https"),
            ],
        )
        .await;

    let event = server.single_event();
    assert_eq!(event.user_agent(), Some("integration/1.0"));
    assert_eq!(event.accept_language(), Some("en-US"));
    assert_eq!(event.referer(), Some("https://example.com/cart"));
    assert_eq!(event.user_id(), Some("user-7"));
    assert_eq!(event.session_id(), Some("sess-9"));
    assert_eq!(event.referring_service(), Some("cart-service"));
    assert_eq!(event.header_x_forwarded_for(), Some("10.0.0.1, 10.0.0.2"));
    assert_eq!(event.header_x_forwarded_proto(), Some("https"));
    assert_eq!(event.remote_address(), Some("127.0.0.1"));
    assert!(event.header_host().is_some());

    assert_eq!(event.domain(), None);
    assert_eq!(event.anonymous_id(), None);
    assert_eq!(event.header_x_forwarded_port(), None);
    assert_eq!(event.url_querystring(), None);
}

/// Request body size comes from Content-Length
#[tokio::test]
async fn test_body_size() {
    let server = TestServer::start().await;
    server.post("/orders", "{\"item\":42}").await;
    server.get("/orders").await;

    let events = server.sink.events();
    assert_eq!(events[0].method(), "POST");
    assert_eq!(events[0].body_size(), Some(11));
    assert_eq!(events[1].body_size(), None);
}

/// Serialized events use the camelCase payload shape
#[tokio::test]
async fn test_serialized_event() {
    let server = TestServer::start().await;
    server.get("/orders?page=2").await;

    let json = serde_json::to_value(server.single_event()).unwrap();
    assert_eq!(json["logName"], "request");
    assert_eq!(json["url"], "/orders?page=2");
    assert_eq!(json["urlQuerystring"], "page=2");
    assert_eq!(json["incoming"], true);
    assert!(json["timestamp"].as_str().unwrap().ends_with('Z'));
    assert!(json["durationMicros"].is_u64());
    assert!(json.get("userId").is_none());
}

/// Metrics reflect emitted events
#[tokio::test]
async fn test_metrics_count_events() {
    let server = TestServer::start().await;
    for _ in 0..3 {
        server.get("/orders").await;
    }
    assert_eq!(server.metrics.events_emitted_total.get(), 3);

    let body = server.get("/metrics").await.text().await.unwrap();
    assert!(body.contains("request_log_events_emitted_total 3"), "{}", body);
}
