//! Envelope Normalization
//!
//! Pure mapping from source-specific webhook envelopes to the records
//! published on the broker, plus the JSON encoding step that precedes
//! publishing.

mod alertmanager;
mod envelope;
mod error;
mod grafana;

pub use alertmanager::{format_time, normalize_alert_message, TIME_FORMAT, ZERO_TIME};
pub use envelope::{encode_record, Envelope};
pub use error::NormalizeError;
pub use grafana::{format_value, normalize_grafana_message};
