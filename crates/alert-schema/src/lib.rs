//! Alert Schemas
//!
//! Wire types for the two webhook producers the adapter accepts, and the
//! normalized records it publishes to the broker.

mod alertmanager;
mod de;
mod grafana;
mod record;

pub use alertmanager::{Alert, AlertMessage};
pub use grafana::{EvalMatch, GrafanaAlertMessage};
pub use record::{AlertRecord, GrafanaRecord, MatchEntry};

use std::collections::HashMap;
use std::fmt;

/// String key/value pairs carried by labels, annotations and tags
pub type Labels = HashMap<String, String>;

/// Look up a key, yielding an empty string when it is absent
pub fn label_value<'a>(labels: &'a Labels, key: &str) -> &'a str {
    labels.get(key).map(String::as_str).unwrap_or("")
}

/// Which webhook producer an envelope came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Alertmanager-style webhook (`/v1/alertmanager`)
    Alertmanager,
    /// Grafana-style webhook (`/v1/grafana`)
    Grafana,
}

impl SourceKind {
    /// Stable lowercase name used in logs and metric labels
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Alertmanager => "alertmanager",
            SourceKind::Grafana => "grafana",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
