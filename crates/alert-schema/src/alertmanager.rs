//! Alertmanager Webhook Schema

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::de::{null_as_default, nullable_labels};
use crate::Labels;

/// Webhook payload posted by Alertmanager
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertMessage {
    #[serde(default, deserialize_with = "null_as_default")]
    pub receiver: String,
    /// `firing` or `resolved` for the group as a whole
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alerts: Vec<Alert>,
    #[serde(default, deserialize_with = "nullable_labels")]
    pub group_labels: Labels,
    #[serde(default, deserialize_with = "nullable_labels")]
    pub common_labels: Labels,
    #[serde(default, deserialize_with = "nullable_labels")]
    pub common_annotations: Labels,
    #[serde(rename = "externalURL", default, deserialize_with = "null_as_default")]
    pub external_url: String,
}

/// A single alert within an Alertmanager notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "nullable_labels")]
    pub labels: Labels,
    #[serde(default, deserialize_with = "nullable_labels")]
    pub annotations: Labels,
    /// Start of the alert, in the offset the sender used
    #[serde(default)]
    pub starts_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<FixedOffset>>,
    #[serde(rename = "generatorURL", default, deserialize_with = "null_as_default")]
    pub generator_url: String,
}
