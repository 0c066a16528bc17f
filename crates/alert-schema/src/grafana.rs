//! Grafana Alert Webhook Schema

use serde::{Deserialize, Serialize};

use crate::de::{null_as_default, nullable_labels, string_or_number};
use crate::Labels;

/// Webhook payload posted by Grafana's legacy alerting
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrafanaAlertMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Grafana sends this as a number; older senders used a string
    #[serde(default, deserialize_with = "string_or_number")]
    pub rule_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rule_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub eval_matches: Vec<EvalMatch>,
}

/// One series that matched the alert condition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalMatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metric: String,
    #[serde(default, deserialize_with = "nullable_labels")]
    pub tags: Labels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_grafana_payload() {
        let body = r#"{
            "title": "[Alerting] Disk usage",
            "ruleId": 7,
            "ruleName": "Disk usage",
            "state": "alerting",
            "ruleUrl": "http://grafana/d/abc",
            "imageUrl": "http://grafana/render/abc.png",
            "message": "disk almost full",
            "evalMatches": [
                {"value": 91.5, "metric": "disk_used", "tags": {"instance": "db1"}},
                {"value": 88, "metric": "disk_used", "tags": null}
            ]
        }"#;

        let msg: GrafanaAlertMessage = serde_json::from_str(body).unwrap();
        assert_eq!(msg.rule_id, "7");
        assert_eq!(msg.state, "alerting");
        assert_eq!(msg.eval_matches.len(), 2);
        assert_eq!(msg.eval_matches[0].value, 91.5);
        assert!(msg.eval_matches[1].tags.is_empty());
    }

    #[test]
    fn test_rule_id_as_string() {
        let msg: GrafanaAlertMessage = serde_json::from_str(r#"{"ruleId": "r-12"}"#).unwrap();
        assert_eq!(msg.rule_id, "r-12");
        assert!(msg.eval_matches.is_empty());
    }

    #[test]
    fn test_null_tag_value_is_empty() {
        let body = r#"{"evalMatches": [{"value": 1, "tags": {"instance": null}}]}"#;
        let msg: GrafanaAlertMessage = serde_json::from_str(body).unwrap();
        assert_eq!(msg.eval_matches[0].tags["instance"], "");
    }

    #[test]
    fn test_rule_id_rejects_objects() {
        assert!(serde_json::from_str::<GrafanaAlertMessage>(r#"{"ruleId": {}}"#).is_err());
    }
}
