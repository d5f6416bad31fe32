//! Test helpers and utilities

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use request_log::config::ServiceInfo;
use request_log::middleware::{MiddlewareChain, RequestIdMiddleware, RequestLogMiddleware};
use request_log::observability::Metrics;
use request_log::request_log::{mdc, Blacklist, EmissionSink, RequestLog, RequestLogEvent};
use request_log::server::{AppState, Server};

/// Sink keeping every event with the correlation id visible at emit time.
#[derive(Default)]
pub struct RecordingSink {
    seen: Mutex<Vec<(RequestLogEvent, Option<String>)>>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn events(&self) -> Vec<RequestLogEvent> {
        self.seen.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
    }

    pub fn contexts(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

impl EmissionSink for RecordingSink {
    fn emit(&self, event: RequestLogEvent) {
        let ctx = mdc::get(mdc::REQUEST_ID_KEY);
        self.seen.lock().unwrap().push((event, ctx));
    }
}

/// In-process server bound to an ephemeral port.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub sink: Arc<RecordingSink>,
    pub metrics: Arc<Metrics>,
}

#[allow(dead_code)]
impl TestServer {
    /// Start with `/static/` as prefix and `/health`, `/metrics` as
    /// exact blacklist entries.
    pub async fn start() -> Self {
        Self::start_with(Blacklist::new(["/static/"], ["/health", "/metrics"])).await
    }

    pub async fn start_with(blacklist: Blacklist) -> Self {
        let sink = Arc::new(RecordingSink::default());
        let metrics = Arc::new(Metrics::new().expect("Failed to create metrics"));

        let log = RequestLog::builder()
            .blacklist(blacklist)
            .service(ServiceInfo::new("integration-test"))
            .shared_sink(sink.clone())
            .metrics(Arc::clone(&metrics))
            .build();

        let chain = MiddlewareChain::new()
            .with(RequestIdMiddleware)
            .with(RequestLogMiddleware::new(Arc::new(log)));
        let state = AppState::new(chain).with_metrics(Arc::clone(&metrics));

        let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
        let server = Server::bind(addr, state).await.expect("Failed to bind");
        let local = server.local_addr().expect("No local address");
        tokio::spawn(server.run());

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{}", local),
            client,
            sink,
            metrics,
        }
    }

    /// Make a GET request to the server
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .expect("GET request failed")
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> Response {
        let mut req = self.client.get(format!("{}{}", self.base_url, path));
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        req.send().await.expect("GET request failed")
    }

    /// Make a POST request with a raw body
    pub async fn post(&self, path: &str, body: &'static str) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .body(body)
            .send()
            .await
            .expect("POST request failed")
    }

    /// The only event recorded so far
    pub fn single_event(&self) -> RequestLogEvent {
        let events = self.sink.events();
        assert_eq!(events.len(), 1, "expected exactly one event, got {}", events.len());
        events.into_iter().next().unwrap()
    }
}

/// Assert that response has expected status
pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(
        response.status(),
        expected,
        "Expected status {}, got {}",
        expected,
        response.status()
    );
}

/// Header value as a string, panicking when absent
pub fn header<'a>(response: &'a Response, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .unwrap_or_else(|| panic!("Header '{}' not found", name))
        .to_str()
        .unwrap()
}
