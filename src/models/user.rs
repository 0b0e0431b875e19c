use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: i64,
}

/// User record as persisted in the users collection, keyed by email.
///
/// The password is stored in plaintext and the license key is never checked
/// against the registry; both are preserved mock behaviors, not oversights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    #[serde(flatten)]
    pub user: User,
    pub password: String,
    pub license_key: String,
}

/// Opaque session token with an absolute expiry, 7 days past issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: i64,
}

/// Single-use password reset token, keyed by email. A second reset request
/// overwrites the previous token, invalidating it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetToken {
    pub token: String,
    pub expires_at: i64,
}
