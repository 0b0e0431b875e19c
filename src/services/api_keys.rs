//! API key issuance, listing, revocation, and verification.

use crate::error::{AppError, Result};
use crate::id::EntityType;
use crate::keygen;
use crate::models::{ApiKey, ApiKeyStatus};
use crate::store::{Store, keys};
use crate::util;

const SECONDS_PER_DAY: i64 = 86400;

#[derive(Clone)]
pub struct ApiKeyService {
    store: Store,
}

impl ApiKeyService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        user_id: &str,
        name: &str,
        permissions: Vec<String>,
        expires_in_days: Option<i64>,
    ) -> Result<ApiKey> {
        let now = util::now();
        let api_key = ApiKey {
            id: EntityType::ApiKey.gen_id(),
            name: name.to_string(),
            key: keygen::generate_api_key(),
            user_id: user_id.to_string(),
            created_at: now,
            last_used: None,
            expires_at: expires_in_days.map(|days| now + days * SECONDS_PER_DAY),
            permissions,
            status: ApiKeyStatus::Active,
        };

        self.store.update(keys::API_KEYS, |all: &mut Vec<ApiKey>| {
            all.push(api_key.clone());
        })?;

        Ok(api_key)
    }

    pub fn list(&self, user_id: &str) -> Result<Vec<ApiKey>> {
        let all: Vec<ApiKey> = self.store.read(keys::API_KEYS)?;
        Ok(all.into_iter().filter(|k| k.user_id == user_id).collect())
    }

    /// Flip a key to revoked. The transition is one-way; there is no
    /// un-revoke.
    pub fn revoke(&self, key_id: &str) -> Result<()> {
        let found = self.store.update(keys::API_KEYS, |all: &mut Vec<ApiKey>| {
            let key = all.iter_mut().find(|k| k.id == key_id)?;
            key.status = ApiKeyStatus::Revoked;
            Some(())
        })?;

        found.ok_or_else(|| AppError::NotFound("API key not found".into()))
    }

    pub fn delete(&self, key_id: &str) -> Result<()> {
        let found = self.store.update(keys::API_KEYS, |all: &mut Vec<ApiKey>| {
            let pos = all.iter().position(|k| k.id == key_id)?;
            all.remove(pos);
            Some(())
        })?;

        found.ok_or_else(|| AppError::NotFound("API key not found".into()))
    }

    /// Look up a key by its full value, check revocation and expiry, and
    /// refresh its last-used timestamp.
    pub fn verify(&self, key: &str) -> Result<ApiKey> {
        let now = util::now();
        self.store.update(keys::API_KEYS, |all: &mut Vec<ApiKey>| {
            let Some(api_key) = all.iter_mut().find(|k| k.key == key) else {
                return Err(AppError::TokenInvalid);
            };

            if api_key.status == ApiKeyStatus::Revoked {
                return Err(AppError::InvalidState("API key has been revoked".into()));
            }

            if api_key.expires_at.is_some_and(|exp| exp < now) {
                return Err(AppError::TokenExpired);
            }

            api_key.last_used = Some(now);
            Ok(api_key.clone())
        })?
    }
}
