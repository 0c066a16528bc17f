//! Kafka Alert Adapter - Main Entry Point

use std::sync::Arc;

use anyhow::Context;
use api::{
    create_router, init_logging, install_metrics_exporter, shutdown, AdapterConfig, AppState, Cli,
};
use broker_publisher::KafkaPublisher;
use clap::Parser;
use drain_scheduler::DrainScheduler;
use intake_queue::intake_queues;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AdapterConfig::load(&cli).context("params error")?;
    let _log_guard = init_logging(config.log_level, config.log_file.as_deref())?;

    info!("=== Kafka Adapter v{} ===", env!("CARGO_PKG_VERSION"));

    if let Some(port) = config.metrics_port {
        install_metrics_exporter(port)?;
    }

    let kafka_config = config.kafka_config();
    let publisher = tokio::task::spawn_blocking(move || KafkaPublisher::connect(&kafka_config))
        .await
        .context("kafka producer task failed")?
        .map_err(|e| {
            error!("create kafka produce error {}", e);
            e
        })
        .context("create kafka producer")?;
    let publisher = Arc::new(publisher);

    let (queues, receivers) = intake_queues(config.queue_capacity, config.overflow);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut scheduler =
        DrainScheduler::new(receivers, Arc::clone(&publisher), config.scheduler_config());
    let scheduler_handle = tokio::spawn(async move { scheduler.run(shutdown_rx).await });

    let state = AppState::new(queues).with_max_body_bytes(config.max_body_bytes);
    let app = create_router(Arc::new(state));
    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("bind port {}", config.port))?;
    info!("Create http server on {}", listener.local_addr()?);

    tokio::select! {
        result = async { axum::serve(listener, app).await } => {
            if let Err(e) = result {
                error!("HTTP server failed: {}", e);
            }
        }
        signal = shutdown::wait_for_signal() => match signal {
            Ok(name) => warn!("Got signal [{}] to exit.", name),
            Err(e) => error!("Signal handler failed: {}", e),
        },
    }

    // In-flight requests and the current cycle are not waited for.
    let _ = shutdown_tx.send(true);
    publisher.close();
    scheduler_handle.abort();

    info!("Kafka adapter stopped");
    Ok(())
}
