//! Prefixed ID generation for LicenseLock entities.
//!
//! All IDs use an `ll_` brand prefix so entity IDs are distinguishable from
//! license keys, API keys, and session tokens at a glance.
//!
//! Format: `ll_{entity}_{uuid_simple}` (32 hex chars, no hyphens)

use uuid::Uuid;

/// All known entity prefixes for validation.
const ALL_PREFIXES: &[&str] = &[
    "ll_usr_", "ll_lic_", "ll_dev_", "ll_alr_", "ll_aud_", "ll_key_",
];

/// Validate that a string is a valid LicenseLock prefixed ID.
///
/// This is a cheap check to reject garbage before hitting the store.
/// Validates format: `ll_{entity}_{32_hex_chars}`
pub fn is_valid_prefixed_id(s: &str) -> bool {
    let Some(prefix) = ALL_PREFIXES.iter().find(|p| s.starts_with(*p)) else {
        return false;
    };

    let hex_part = &s[prefix.len()..];

    hex_part.len() == 32 && hex_part.chars().all(|c| c.is_ascii_hexdigit())
}

/// Entity types that have prefixed IDs in LicenseLock.
#[derive(Debug, Clone, Copy)]
pub enum EntityType {
    User,
    License,
    Device,
    Alert,
    AuditLog,
    ApiKey,
}

impl EntityType {
    /// Returns the prefix for this entity type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::User => "ll_usr",
            Self::License => "ll_lic",
            Self::Device => "ll_dev",
            Self::Alert => "ll_alr",
            Self::AuditLog => "ll_aud",
            Self::ApiKey => "ll_key",
        }
    }

    /// Generates a new prefixed ID for this entity type.
    pub fn gen_id(&self) -> String {
        format!("{}_{}", self.prefix(), Uuid::new_v4().as_simple())
    }
}
