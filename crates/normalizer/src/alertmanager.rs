//! Alertmanager → AlertRecord mapping

use alert_schema::{label_value, Alert, AlertMessage, AlertRecord};
use chrono::{DateTime, FixedOffset};

/// Layout of the `time` field on published records
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Rendering of an alert that arrived without a start time
pub const ZERO_TIME: &str = "0001-01-01 00:00:00";

/// Produce one record per alert, preserving alert order
pub fn normalize_alert_message(message: &AlertMessage) -> Vec<AlertRecord> {
    message.alerts.iter().map(normalize_alert).collect()
}

fn normalize_alert(alert: &Alert) -> AlertRecord {
    AlertRecord {
        title: label_value(&alert.labels, "alertname").to_string(),
        source: label_value(&alert.labels, "env").to_string(),
        node: label_value(&alert.labels, "instance").to_string(),
        expr: label_value(&alert.labels, "expr").to_string(),
        description: label_value(&alert.annotations, "description").to_string(),
        url: alert.generator_url.clone(),
        level: label_value(&alert.labels, "level").to_string(),
        note: label_value(&alert.annotations, "summary").to_string(),
        value: label_value(&alert.annotations, "value").to_string(),
        time: format_time(alert.starts_at.as_ref()),
    }
}

/// Format a start time in the offset it was sent with
pub fn format_time(starts_at: Option<&DateTime<FixedOffset>>) -> String {
    match starts_at {
        Some(ts) => ts.format(TIME_FORMAT).to_string(),
        None => ZERO_TIME.to_string(),
    }
}
