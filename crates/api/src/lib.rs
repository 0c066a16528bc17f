//! Kafka Alert Adapter
//!
//! HTTP ingestion for Alertmanager and Grafana webhooks, plus the process
//! wiring (configuration, logging, metrics, shutdown) around the drain
//! scheduler and broker publisher.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    routing::{get, post},
    Router,
};
use intake_queue::IntakeQueues;
use metrics_exporter_prometheus::PrometheusBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
pub mod logging;
pub mod routes;
pub mod settings;
pub mod shutdown;

pub use error::IngestError;
pub use logging::init_logging;
pub use settings::{AdapterConfig, Cli, ConfigError};

/// Application state shared across handlers
pub struct AppState {
    /// Producer side of both intake queues
    pub queues: IntakeQueues,
    /// Largest webhook body accepted, in bytes
    pub max_body_bytes: usize,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(queues: IntakeQueues) -> Self {
        Self {
            queues,
            max_body_bytes: routes::ingest::MAX_BODY_BYTES,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }

    /// Override the body size limit
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/alertmanager", post(routes::ingest::alertmanager))
        .route("/v1/grafana", post(routes::ingest::grafana))
        .route("/v1/health", get(routes::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve Prometheus metrics on a dedicated port
pub fn install_metrics_exporter(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install metrics exporter: {}", e))?;
    info!("Serving metrics on {}", addr);
    Ok(())
}
