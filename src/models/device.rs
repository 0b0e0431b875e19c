use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub license_id: String,
    /// Hardware fingerprint, unique per license.
    pub hwid: String,
    pub device_name: String,
    pub activated_at: i64,
    /// Refreshed whenever a known hwid re-activates.
    pub last_seen: i64,
    pub ip_address: String,
    pub trusted: bool,
}
