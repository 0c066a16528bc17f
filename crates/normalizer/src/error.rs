//! Normalization Error Types

use alert_schema::SourceKind;
use thiserror::Error;

/// Errors raised while turning an envelope into broker payloads
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// A record could not be serialized to JSON
    #[error("can not encode {kind} record: {error}")]
    Encode {
        kind: SourceKind,
        error: serde_json::Error,
    },
}

impl NormalizeError {
    /// Source the failing record was derived from
    pub fn kind(&self) -> SourceKind {
        match self {
            NormalizeError::Encode { kind, .. } => *kind,
        }
    }
}
