//! Registration, login, the single active session, and password reset.
//!
//! Credentials are compared as exact plaintext strings against the stored
//! user record; this is preserved mock behavior. The idle-timeout check is
//! driven by an external periodic caller which writes the activity heartbeat
//! via [`AuthService::touch_activity`].

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::id::EntityType;
use crate::keygen;
use crate::models::{AuthToken, ResetToken, StoredUser, User};
use crate::store::{Store, keys};
use crate::util;

/// Absolute session lifetime: 7 days past login.
pub const SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Idle timeout: 30 minutes since the last activity heartbeat.
pub const IDLE_TIMEOUT_SECS: i64 = 30 * 60;

/// Password reset tokens live for one hour.
pub const RESET_TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Clone)]
pub struct AuthService {
    store: Store,
}

impl AuthService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create an account. The license key is only gated on its shape (the
    /// 23-character formatted length); it is never checked against issued
    /// licenses.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        license_key: &str,
    ) -> Result<User> {
        if license_key.len() != keygen::LICENSE_KEY_LEN {
            return Err(AppError::BadRequest("Invalid license key".into()));
        }

        let user = User {
            id: EntityType::User.gen_id(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: util::now(),
        };
        let record = StoredUser {
            user: user.clone(),
            password: password.to_string(),
            license_key: license_key.to_string(),
        };

        self.store
            .update(keys::USERS, |users: &mut HashMap<String, StoredUser>| {
                if users.contains_key(email) {
                    return Err(AppError::Conflict("Email already registered".into()));
                }
                users.insert(email.to_string(), record);
                Ok(())
            })??;

        Ok(user)
    }

    /// Exact-match credential check; a success issues a 7-day token and
    /// records the session.
    pub fn login(&self, email: &str, password: &str) -> Result<User> {
        let users: HashMap<String, StoredUser> = self.store.read(keys::USERS)?;
        let Some(record) = users.get(email).filter(|r| r.password == password) else {
            return Err(AppError::InvalidCredentials);
        };

        let token = AuthToken {
            token: Uuid::new_v4().to_string(),
            expires_at: util::now() + SESSION_TTL_SECS,
        };

        self.store.put(keys::SESSION_USER, &record.user)?;
        self.store.put(keys::SESSION_TOKEN, &token)?;

        Ok(record.user.clone())
    }

    pub fn logout(&self) -> Result<()> {
        self.store.remove(keys::SESSION_USER)?;
        self.store.remove(keys::SESSION_TOKEN)
    }

    /// The session's user, or `None` when logged out. A token past its
    /// absolute expiry forces a logout.
    pub fn current_user(&self) -> Result<Option<User>> {
        let user: Option<User> = self.store.get(keys::SESSION_USER)?;
        let token: Option<AuthToken> = self.store.get(keys::SESSION_TOKEN)?;

        let (Some(user), Some(token)) = (user, token) else {
            return Ok(None);
        };

        if util::now() > token.expires_at {
            self.logout()?;
            return Ok(None);
        }

        Ok(Some(user))
    }

    pub fn is_authenticated(&self) -> Result<bool> {
        Ok(self.current_user()?.is_some())
    }

    /// Issue a reset token for an email. Always succeeds outwardly so
    /// callers cannot probe which addresses exist; a repeat request
    /// overwrites (and thereby invalidates) the earlier token.
    pub fn request_reset(&self, email: &str) -> Result<()> {
        let users: HashMap<String, StoredUser> = self.store.read(keys::USERS)?;
        if !users.contains_key(email) {
            return Ok(());
        }

        let token = ResetToken {
            token: Uuid::new_v4().to_string(),
            expires_at: util::now() + RESET_TOKEN_TTL_SECS,
        };

        self.store
            .update(keys::RESET_TOKENS, |tokens: &mut HashMap<String, ResetToken>| {
                tokens.insert(email.to_string(), token);
            })?;

        tracing::debug!(email, "issued password reset token");
        Ok(())
    }

    /// Consume a reset token and overwrite the stored password.
    pub fn reset_password(&self, email: &str, token: &str, new_password: &str) -> Result<()> {
        let tokens: HashMap<String, ResetToken> = self.store.read(keys::RESET_TOKENS)?;
        let Some(reset) = tokens.get(email).filter(|t| t.token == token) else {
            return Err(AppError::TokenInvalid);
        };
        if util::now() > reset.expires_at {
            return Err(AppError::TokenExpired);
        }

        self.store
            .update(keys::USERS, |users: &mut HashMap<String, StoredUser>| {
                let Some(record) = users.get_mut(email) else {
                    return Err(AppError::NotFound("User not found".into()));
                };
                record.password = new_password.to_string();
                Ok(())
            })??;

        self.store
            .update(keys::RESET_TOKENS, |tokens: &mut HashMap<String, ResetToken>| {
                tokens.remove(email);
            })
    }

    /// Record an activity heartbeat for the idle-timeout check.
    pub fn touch_activity(&self) -> Result<()> {
        self.store.put(keys::SESSION_ACTIVITY, &util::now())
    }

    /// Whether the idle window has elapsed since the last heartbeat. False
    /// when no heartbeat was ever recorded.
    pub fn idle_timed_out(&self) -> Result<bool> {
        let last: Option<i64> = self.store.get(keys::SESSION_ACTIVITY)?;
        Ok(last.is_some_and(|ts| util::now() - ts > IDLE_TIMEOUT_SECS))
    }
}

#[derive(Debug, Clone)]
pub struct PasswordStrength {
    /// 0 (weakest) to 4 (strongest).
    pub score: u8,
    pub feedback: Vec<String>,
    pub is_valid: bool,
}

/// Score a candidate password: length, mixed case, digits, punctuation.
/// Valid means at least 8 characters and a score of 3 or better.
pub fn password_strength(password: &str) -> PasswordStrength {
    const SPECIAL: &str = "!@#$%^&*(),.?\":{}|<>";

    let mut feedback = Vec::new();
    let mut score: u8 = 0;

    if password.len() >= 8 {
        score += 1;
    } else {
        feedback.push("Password must be at least 8 characters".to_string());
    }

    if password.len() >= 12 {
        score += 1;
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        score += 1;
    } else {
        feedback.push("Include both uppercase and lowercase letters".to_string());
    }

    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    } else {
        feedback.push("Include at least one number".to_string());
    }

    if password.chars().any(|c| SPECIAL.contains(c)) {
        score += 1;
    } else {
        feedback.push("Include at least one special character".to_string());
    }

    PasswordStrength {
        is_valid: score >= 3 && password.len() >= 8,
        score: score.min(4),
        feedback,
    }
}
