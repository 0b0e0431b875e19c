use serde::{Deserialize, Serialize};

/// Per-email 2FA enrollment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwoFactorRecord {
    pub secret: String,
    /// Single-use fallback codes; consumed on successful verification.
    pub backup_codes: Vec<String>,
    pub enabled: bool,
    pub verified: bool,
}

/// Material returned from 2FA enrollment, for display and QR rendering by
/// the caller.
#[derive(Debug, Clone, Serialize)]
pub struct TwoFactorSetup {
    pub secret: String,
    pub otpauth_url: String,
    pub backup_codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TwoFactorStatus {
    pub enabled: bool,
    pub verified: bool,
}
