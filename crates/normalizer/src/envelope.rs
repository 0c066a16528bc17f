//! Envelope dispatch and record encoding

use alert_schema::{AlertMessage, GrafanaAlertMessage, SourceKind};
use serde::Serialize;
use tracing::debug;

use crate::{normalize_alert_message, normalize_grafana_message, NormalizeError};

/// A decoded webhook payload from either producer
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Alertmanager(AlertMessage),
    Grafana(GrafanaAlertMessage),
}

impl Envelope {
    /// Producer this envelope came from
    pub fn source(&self) -> SourceKind {
        match self {
            Envelope::Alertmanager(_) => SourceKind::Alertmanager,
            Envelope::Grafana(_) => SourceKind::Grafana,
        }
    }

    /// Normalize and encode every record derived from this envelope.
    ///
    /// Alertmanager envelopes fan out into one payload per alert; Grafana
    /// envelopes always yield exactly one. Each payload is encoded
    /// independently, so a failure only affects its own record.
    pub fn encode(&self) -> Vec<Result<Vec<u8>, NormalizeError>> {
        let kind = self.source();
        let payloads: Vec<_> = match self {
            Envelope::Alertmanager(message) => normalize_alert_message(message)
                .iter()
                .map(|record| encode_record(kind, record))
                .collect(),
            Envelope::Grafana(message) => {
                vec![encode_record(kind, &normalize_grafana_message(message))]
            }
        };
        debug!("{} envelope produced {} payloads", kind, payloads.len());
        payloads
    }
}

impl From<AlertMessage> for Envelope {
    fn from(message: AlertMessage) -> Self {
        Envelope::Alertmanager(message)
    }
}

impl From<GrafanaAlertMessage> for Envelope {
    fn from(message: GrafanaAlertMessage) -> Self {
        Envelope::Grafana(message)
    }
}

/// Serialize a single record to its JSON wire form
pub fn encode_record<T: Serialize>(
    kind: SourceKind,
    record: &T,
) -> Result<Vec<u8>, NormalizeError> {
    serde_json::to_vec(record).map_err(|error| NormalizeError::Encode { kind, error })
}
