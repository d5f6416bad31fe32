//! Minimal HTTP/1.1 host that runs every exchange through the
//! middleware chain.
//!
//! Routes:
//! - `GET /health` - liveness probe
//! - `GET /metrics` - Prometheus text exposition
//! - anything else - echoes method, path, query and body size as JSON

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming as IncomingBody;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, StatusCode};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::core::{Context, Request, Response};
use crate::middleware::MiddlewareChain;
use crate::observability::Metrics;

/// Shared by every connection.
pub struct AppState {
    chain: MiddlewareChain,
    metrics: Option<Arc<Metrics>>,
}

impl AppState {
    pub fn new(chain: MiddlewareChain) -> Self {
        Self {
            chain,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }
}

/// A bound, not yet running, server.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    pub async fn bind(addr: SocketAddr, state: AppState) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until the process ends.
    pub async fn run(self) {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Serve until `shutdown` resolves, then wait for open connections
    /// to finish their in-flight requests.
    pub async fn run_until(self, shutdown: impl Future<Output = ()>) {
        let graceful = GracefulShutdown::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    let (stream, remote_addr) = match accepted {
                        Ok(conn) => conn,
                        Err(e) => {
                            warn!(error = %e, "Accept failed");
                            continue;
                        }
                    };
                    let _ = stream.set_nodelay(true);

                    let state = Arc::clone(&self.state);
                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(req, remote_addr, state).await }
                    });

                    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
                    let conn = graceful.watch(conn);
                    tokio::spawn(async move {
                        if let Err(e) = conn.await {
                            debug!(error = %e, "Connection error");
                        }
                    });
                }
                _ = &mut shutdown => break,
            }
        }

        drop(self.listener);
        info!("Draining open connections");
        graceful.shutdown().await;
    }
}

async fn handle_request(
    req: hyper::Request<IncomingBody>,
    remote_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<hyper::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let snapshot = Request::new(parts.method, parts.uri, parts.headers)
        .with_version(parts.version)
        .with_remote_addr(remote_addr);

    let mut ctx = Context::new();
    state.chain.process_request(&snapshot, &mut ctx);

    let response = match body.collect().await {
        Ok(collected) => route(&snapshot, &collected.to_bytes(), &state),
        Err(e) => {
            debug!(error = %e, "Failed to read request body");
            Response::builder()
                .status(StatusCode::BAD_REQUEST)
                .body("Failed to read request body")
                .build()
        }
    };

    let response = state.chain.process_response(response, &ctx);
    Ok(http::Response::<Bytes>::from(response).map(Full::new))
}

fn route(req: &Request, body: &Bytes, state: &AppState) -> Response {
    match (req.method(), req.path()) {
        (&Method::GET, "/health") => Response::builder()
            .header("Content-Type", "application/json")
            .body(r#"{"status":"ok"}"#)
            .build(),
        (&Method::GET, "/metrics") => match state.metrics {
            Some(ref metrics) => Response::builder()
                .header("Content-Type", "text/plain; version=0.0.4")
                .body(metrics.export())
                .build(),
            None => Response::empty(StatusCode::NOT_FOUND),
        },
        _ => {
            let echo = serde_json::json!({
                "method": req.method().as_str(),
                "path": req.path(),
                "query": req.query(),
                "bytes": body.len(),
            });
            Response::builder()
                .header("Content-Type", "application/json")
                .body(echo.to_string())
                .build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;

    fn state() -> AppState {
        AppState::new(MiddlewareChain::new())
    }

    fn get(path: &str) -> Request {
        Request::new(Method::GET, path.parse().unwrap(), HeaderMap::new())
    }

    #[test]
    fn test_health() {
        let res = route(&get("/health"), &Bytes::new(), &state());
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body().as_ref(), br#"{"status":"ok"}"#);
    }

    #[test]
    fn test_metrics_requires_registry() {
        let res = route(&get("/metrics"), &Bytes::new(), &state());
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let metrics = Arc::new(Metrics::new().unwrap());
        let res = route(&get("/metrics"), &Bytes::new(), &state().with_metrics(metrics));
        assert_eq!(res.status(), StatusCode::OK);
        assert!(String::from_utf8_lossy(res.body()).contains("request_log_events_emitted_total"));
    }

    #[test]
    fn test_echo() {
        let req = Request::new(Method::POST, "/orders?x=1".parse().unwrap(), HeaderMap::new());
        let res = route(&req, &Bytes::from_static(b"12345"), &state());

        let json: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["path"], "/orders");
        assert_eq!(json["query"], "x=1");
        assert_eq!(json["bytes"], 5);
        assert_eq!(res.content_count(), res.body().len() as i64);
    }
}
