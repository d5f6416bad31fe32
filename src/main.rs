use std::sync::Arc;

use tracing::info;

use request_log::config::{Config, SinkKind};
use request_log::middleware::{MiddlewareChain, RequestIdMiddleware, RequestLogMiddleware};
use request_log::observability::Metrics;
use request_log::request_log::{
    drain_into, ChannelSink, EmissionSink, JsonLineSink, RequestLog, TracingSink,
};
use request_log::server::{AppState, Server};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_env()?;
    request_log::logging::init(&config.logging)?;

    info!(version = request_log::PKG_VERSION, "Starting request_log server...");
    config.log_summary();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(config))
}

async fn async_main(config: Config) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let metrics = Arc::new(Metrics::new()?);
    let mut chain = MiddlewareChain::new().with(RequestIdMiddleware);

    if config.request_log.enabled {
        let sink: Arc<dyn EmissionSink> = match config.request_log.sink {
            SinkKind::Tracing => Arc::new(TracingSink),
            SinkKind::Stdout => Arc::new(JsonLineSink::stdout()),
            SinkKind::Channel => {
                let (sink, rx) = ChannelSink::new(config.request_log.channel_capacity());
                tokio::spawn(drain_into(rx, JsonLineSink::stdout()));
                Arc::new(sink.with_metrics(Arc::clone(&metrics)))
            }
        };

        let log = RequestLog::builder()
            .blacklist(config.request_log.blacklist())
            .service(config.service.clone())
            .shared_sink(sink)
            .metrics(Arc::clone(&metrics))
            .build();
        chain = chain.with(RequestLogMiddleware::new(Arc::new(log)));
    }

    info!("Middleware: {}", chain.names().join(", "));

    let state = AppState::new(chain).with_metrics(metrics);
    let server = Server::bind(config.server.listen_addr, state).await?;
    info!(addr = %server.local_addr()?, "Listening");

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutting down...");
        })
        .await;

    Ok(())
}
