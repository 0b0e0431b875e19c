use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertType {
    MaxActivationsExceeded,
    SuspiciousActivity,
    MultipleLocations,
    RapidActivation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PiracyAlert {
    pub id: String,
    pub license_id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub description: String,
    pub severity: AlertSeverity,
    pub timestamp: i64,
    /// One-way flag; resolved alerts are never reopened.
    pub resolved: bool,
}
