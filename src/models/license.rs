use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LicenseStatus {
    Active,
    Suspended,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub id: String,
    /// Formatted key: `XXXXX-XXXXX-XXXXX-XXXXX` from `[A-Z0-9]`.
    pub key: String,
    pub name: String,
    pub max_activations: u32,
    /// Always equals the number of devices bound to this license.
    pub activations: u32,
    pub status: LicenseStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    pub user_id: String,
}

/// Classification returned by license verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LicenseValidity {
    Valid,
    Expired,
    Invalid,
}

impl LicenseValidity {
    pub fn is_valid(&self) -> bool {
        matches!(self, LicenseValidity::Valid)
    }
}
