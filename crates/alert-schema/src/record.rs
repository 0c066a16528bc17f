//! Delivery Records
//!
//! The normalized shapes published to the broker. Field order here is the
//! order consumers see in the JSON payload.

use serde::{Deserialize, Serialize};

/// Broker record derived from one Alertmanager alert
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub title: String,
    pub source: String,
    pub node: String,
    pub expr: String,
    pub description: String,
    pub url: String,
    pub level: String,
    pub note: String,
    pub value: String,
    /// Start time as `YYYY-MM-DD HH:MM:SS`
    pub time: String,
}

/// Broker record derived from one Grafana notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrafanaRecord {
    pub title: String,
    #[serde(rename = "match")]
    pub matches: Vec<MatchEntry>,
    pub message: String,
    pub url: String,
    pub image_url: String,
    pub status: String,
    pub note: String,
}

/// Instance and formatted value of a single evaluated match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub instance: String,
    // Downstream consumers read the value from the "string" key.
    #[serde(rename = "string")]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_record_field_order() {
        let record = AlertRecord {
            title: "HighCPU".to_string(),
            time: "2023-01-01 00:00:00".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"title":"HighCPU","source":"","node":"","expr":"","description":"","url":"","level":"","note":"","value":"","time":"2023-01-01 00:00:00"}"#
        );
    }

    #[test]
    fn test_grafana_record_keys() {
        let record = GrafanaRecord {
            title: "disk".to_string(),
            matches: vec![MatchEntry {
                instance: "db1".to_string(),
                value: "1.000000000".to_string(),
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["match"][0]["instance"], "db1");
        assert_eq!(json["match"][0]["string"], "1.000000000");
        assert_eq!(json["image_url"], "");
        assert_eq!(json["note"], "");
    }
}
