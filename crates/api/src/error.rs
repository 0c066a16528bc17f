//! Ingestion Error Types

use alert_schema::SourceKind;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use intake_queue::QueueError;
use metrics::counter;
use thiserror::Error;
use tracing::error;

/// Failures while accepting a webhook; nothing is enqueued when one occurs
#[derive(Debug, Error)]
pub enum IngestError {
    /// The request body could not be read in full
    #[error("can not read {kind} http post data with error {message}")]
    Read { kind: SourceKind, message: String },

    /// The body was not a valid envelope for this endpoint
    #[error("can not unmarshal {kind} http post data with error {error}")]
    Decode {
        kind: SourceKind,
        error: serde_json::Error,
    },

    /// The intake queue refused the envelope
    #[error("can not enqueue {kind} alert: {error}")]
    Queue { kind: SourceKind, error: QueueError },
}

impl IngestError {
    /// HTTP status reported to the webhook sender
    pub fn status(&self) -> StatusCode {
        match self {
            IngestError::Read { .. } | IngestError::Decode { .. } => StatusCode::BAD_REQUEST,
            IngestError::Queue { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn reason(&self) -> &'static str {
        match self {
            IngestError::Read { .. } => "read",
            IngestError::Decode { .. } => "decode",
            IngestError::Queue { .. } => "queue",
        }
    }

    fn kind(&self) -> SourceKind {
        match self {
            IngestError::Read { kind, .. }
            | IngestError::Decode { kind, .. }
            | IngestError::Queue { kind, .. } => *kind,
        }
    }

    /// Raw diagnostic text returned as the response body
    pub fn body(&self) -> String {
        match self {
            IngestError::Read { message, .. } => message.clone(),
            IngestError::Decode { error, .. } => error.to_string(),
            IngestError::Queue { error, .. } => error.to_string(),
        }
    }
}

impl IntoResponse for IngestError {
    fn into_response(self) -> Response {
        error!("{}", self);
        counter!(
            "adapter_ingest_rejected_total",
            "source" => self.kind().as_str(),
            "reason" => self.reason()
        )
        .increment(1);
        (self.status(), self.body()).into_response()
    }
}
