//! Two-factor enrollment and verification, keyed by email.
//!
//! Verification is mock-grade on purpose: any six-digit string passes the
//! TOTP check. Backup codes are real in shape only; each is single-use.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::keygen;
use crate::models::{TwoFactorRecord, TwoFactorSetup, TwoFactorStatus};
use crate::store::{Store, keys};

const ISSUER: &str = "LicenseLock";

#[derive(Clone)]
pub struct TwoFactorService {
    store: Store,
}

impl TwoFactorService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Enroll an email: generate a secret and backup codes, store them
    /// unverified, and hand back the material the caller renders as a QR.
    /// Re-running setup replaces any existing enrollment.
    pub fn setup(&self, email: &str) -> Result<TwoFactorSetup> {
        let secret = keygen::generate_totp_secret();
        let backup_codes = keygen::generate_backup_codes();
        let otpauth_url = format!(
            "otpauth://totp/{}:{}?secret={}&issuer={}",
            ISSUER, email, secret, ISSUER
        );

        let record = TwoFactorRecord {
            secret: secret.clone(),
            backup_codes: backup_codes.clone(),
            enabled: false,
            verified: false,
        };

        self.store.update(
            keys::TWO_FACTOR,
            |records: &mut HashMap<String, TwoFactorRecord>| {
                records.insert(email.to_string(), record);
            },
        )?;

        Ok(TwoFactorSetup {
            secret,
            otpauth_url,
            backup_codes,
        })
    }

    /// Accept either an unused backup code (consumed on success) or any
    /// six-digit string standing in for a TOTP code. Success marks the
    /// enrollment enabled and verified.
    pub fn verify(&self, email: &str, token: &str) -> Result<()> {
        self.store.update(
            keys::TWO_FACTOR,
            |records: &mut HashMap<String, TwoFactorRecord>| {
                let Some(record) = records.get_mut(email) else {
                    return Err(AppError::NotFound("2FA not set up".into()));
                };

                if let Some(pos) = record.backup_codes.iter().position(|c| c == token) {
                    record.backup_codes.remove(pos);
                } else if !is_totp_shaped(token) {
                    return Err(AppError::InvalidCredentials);
                }

                record.enabled = true;
                record.verified = true;
                Ok(())
            },
        )?
    }

    /// Drop the enrollment entirely. Disabling an email that was never
    /// enrolled is a no-op.
    pub fn disable(&self, email: &str) -> Result<()> {
        self.store.update(
            keys::TWO_FACTOR,
            |records: &mut HashMap<String, TwoFactorRecord>| {
                records.remove(email);
            },
        )
    }

    pub fn status(&self, email: &str) -> Result<TwoFactorStatus> {
        let records: HashMap<String, TwoFactorRecord> = self.store.read(keys::TWO_FACTOR)?;
        Ok(records
            .get(email)
            .map(|r| TwoFactorStatus {
                enabled: r.enabled,
                verified: r.verified,
            })
            .unwrap_or(TwoFactorStatus {
                enabled: false,
                verified: false,
            }))
    }

    /// Remaining (unconsumed) backup codes; empty when not enrolled.
    pub fn backup_codes(&self, email: &str) -> Result<Vec<String>> {
        let records: HashMap<String, TwoFactorRecord> = self.store.read(keys::TWO_FACTOR)?;
        Ok(records
            .get(email)
            .map(|r| r.backup_codes.clone())
            .unwrap_or_default())
    }
}

fn is_totp_shaped(token: &str) -> bool {
    token.len() == 6 && token.chars().all(|c| c.is_ascii_digit())
}
