//! Grafana → GrafanaRecord mapping

use alert_schema::{label_value, GrafanaAlertMessage, GrafanaRecord, MatchEntry};

/// Fractional digits used when rendering match values
const VALUE_PRECISION: usize = 9;

/// Collapse a Grafana notification into a single record
pub fn normalize_grafana_message(message: &GrafanaAlertMessage) -> GrafanaRecord {
    let matches = message
        .eval_matches
        .iter()
        .map(|m| MatchEntry {
            instance: label_value(&m.tags, "instance").to_string(),
            value: format_value(m.value),
        })
        .collect();

    GrafanaRecord {
        title: message.title.clone(),
        matches,
        message: message.message.clone(),
        url: message.rule_url.clone(),
        image_url: message.image_url.clone(),
        status: message.state.clone(),
        note: String::new(),
    }
}

/// Render a value as a fixed-point decimal with nine fractional digits
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{:.*}", VALUE_PRECISION, value)
    }
}
