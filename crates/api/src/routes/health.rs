//! Health Route

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use intake_queue::QueueSender;
use serde::Serialize;

use crate::AppState;

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub queues: QueueStatus,
}

/// Depth of both intake queues
#[derive(Debug, Serialize)]
pub struct QueueStatus {
    pub alertmanager: QueueDepth,
    pub grafana: QueueDepth,
}

/// Current and maximum entries of one queue
#[derive(Debug, Serialize)]
pub struct QueueDepth {
    pub depth: usize,
    pub capacity: usize,
}

impl<T> From<&QueueSender<T>> for QueueDepth {
    fn from(queue: &QueueSender<T>) -> Self {
        Self {
            depth: queue.len(),
            capacity: queue.capacity(),
        }
    }
}

/// `GET /v1/health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        queues: QueueStatus {
            alertmanager: QueueDepth::from(&state.queues.alertmanager),
            grafana: QueueDepth::from(&state.queues.grafana),
        },
    })
}
