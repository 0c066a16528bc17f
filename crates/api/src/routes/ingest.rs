//! Webhook Ingestion Routes
//!
//! Each endpoint buffers the whole body, decodes it into its own envelope
//! shape and enqueues it. The 202 only means "queued"; delivery to the
//! broker happens later and is never reported back to the sender.

use std::sync::Arc;

use alert_schema::{AlertMessage, GrafanaAlertMessage, SourceKind};
use axum::body::{to_bytes, Body};
use axum::extract::State;
use axum::http::StatusCode;
use metrics::counter;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::IngestError;
use crate::AppState;

/// Default upper bound on a buffered webhook body
pub const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// `POST /v1/alertmanager`
pub async fn alertmanager(
    State(state): State<Arc<AppState>>,
    body: Body,
) -> Result<StatusCode, IngestError> {
    let kind = SourceKind::Alertmanager;
    let message: AlertMessage = decode(kind, body, state.max_body_bytes).await?;
    debug!("Decoded {} envelope with {} alerts", kind, message.alerts.len());

    state
        .queues
        .alertmanager
        .enqueue(message)
        .await
        .map_err(|error| IngestError::Queue { kind, error })?;

    counter!("adapter_envelopes_enqueued_total", "source" => kind.as_str()).increment(1);
    Ok(StatusCode::ACCEPTED)
}

/// `POST /v1/grafana`
pub async fn grafana(
    State(state): State<Arc<AppState>>,
    body: Body,
) -> Result<StatusCode, IngestError> {
    let kind = SourceKind::Grafana;
    let message: GrafanaAlertMessage = decode(kind, body, state.max_body_bytes).await?;
    debug!(
        "Decoded {} envelope '{}' with {} matches",
        kind,
        message.title,
        message.eval_matches.len()
    );

    state
        .queues
        .grafana
        .enqueue(message)
        .await
        .map_err(|error| IngestError::Queue { kind, error })?;

    counter!("adapter_envelopes_enqueued_total", "source" => kind.as_str()).increment(1);
    Ok(StatusCode::ACCEPTED)
}

async fn decode<T: DeserializeOwned>(
    kind: SourceKind,
    body: Body,
    limit: usize,
) -> Result<T, IngestError> {
    let bytes = to_bytes(body, limit)
        .await
        .map_err(|e| IngestError::Read {
            kind,
            message: e.to_string(),
        })?;
    debug!("Received {} data {}", kind, String::from_utf8_lossy(&bytes));

    serde_json::from_slice(&bytes).map_err(|error| IngestError::Decode { kind, error })
}
