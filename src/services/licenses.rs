//! License lifecycle: creation, verification, renewal, status changes,
//! deletion with device cascade.

use crate::error::{AppError, Result};
use crate::id::EntityType;
use crate::keygen;
use crate::models::{AuditSeverity, Device, License, LicenseStatus, LicenseValidity};
use crate::store::{Store, keys};
use crate::util;

use super::audit::AuditLog;

#[derive(Clone)]
pub struct LicenseService {
    store: Store,
    audit: AuditLog,
}

impl LicenseService {
    pub fn new(store: Store, audit: AuditLog) -> Self {
        Self { store, audit }
    }

    /// Issue a new license with a freshly generated key, active status, and
    /// zero activations.
    pub fn create(
        &self,
        user_id: &str,
        name: &str,
        max_activations: u32,
        expires_at: Option<i64>,
    ) -> Result<License> {
        if max_activations == 0 {
            return Err(AppError::BadRequest(
                "max_activations must be at least 1".into(),
            ));
        }

        let license = License {
            id: EntityType::License.gen_id(),
            key: keygen::generate_license_key(),
            name: name.to_string(),
            max_activations,
            activations: 0,
            status: LicenseStatus::Active,
            created_at: util::now(),
            expires_at,
            user_id: user_id.to_string(),
        };

        self.store.update(keys::LICENSES, |licenses: &mut Vec<License>| {
            licenses.push(license.clone());
        })?;

        if let Err(e) = self.audit.log(
            user_id,
            "CREATE",
            "license",
            Some(&license.id),
            Some(&format!("Created license: {}", name)),
            AuditSeverity::Info,
        ) {
            tracing::warn!("Failed to write license creation audit log: {}", e);
        }

        Ok(license)
    }

    /// Classify a license key.
    ///
    /// Invalid when no license carries the key; expired when the license is
    /// marked expired or its expiry has passed; valid only when active.
    pub fn verify(&self, key: &str) -> Result<LicenseValidity> {
        let licenses: Vec<License> = self.store.read(keys::LICENSES)?;
        let Some(license) = licenses.iter().find(|l| l.key == key) else {
            return Ok(LicenseValidity::Invalid);
        };

        if license.status == LicenseStatus::Expired
            || license.expires_at.is_some_and(|exp| exp < util::now())
        {
            return Ok(LicenseValidity::Expired);
        }

        if license.status != LicenseStatus::Active {
            return Ok(LicenseValidity::Invalid);
        }

        Ok(LicenseValidity::Valid)
    }

    /// Extend a license by `months` calendar months from the later of its
    /// current expiry or now, and force it back to active.
    pub fn renew(&self, license_id: &str, months: u32) -> Result<License> {
        let now = util::now();
        let renewed = self
            .store
            .update(keys::LICENSES, |licenses: &mut Vec<License>| {
                let license = licenses.iter_mut().find(|l| l.id == license_id)?;
                let base = license.expires_at.unwrap_or(now).max(now);
                license.expires_at = Some(util::add_months(base, months));
                license.status = LicenseStatus::Active;
                Some(license.clone())
            })?;

        renewed.ok_or_else(|| AppError::NotFound("License not found".into()))
    }

    /// Overwrite the status directly (active <-> suspended toggles).
    pub fn update_status(&self, license_id: &str, status: LicenseStatus) -> Result<License> {
        let updated = self
            .store
            .update(keys::LICENSES, |licenses: &mut Vec<License>| {
                let license = licenses.iter_mut().find(|l| l.id == license_id)?;
                license.status = status;
                Some(license.clone())
            })?;

        let license = updated.ok_or_else(|| AppError::NotFound("License not found".into()))?;

        if let Err(e) = self.audit.log(
            &license.user_id,
            "UPDATE",
            "license",
            Some(license_id),
            Some(&format!("Changed status to: {}", status.as_ref())),
            AuditSeverity::Info,
        ) {
            tracing::warn!("Failed to write license status audit log: {}", e);
        }

        Ok(license)
    }

    /// Delete a license and every device bound to it. Devices of other
    /// licenses are untouched.
    pub fn delete(&self, license_id: &str) -> Result<()> {
        let removed = self
            .store
            .update(keys::LICENSES, |licenses: &mut Vec<License>| {
                let pos = licenses.iter().position(|l| l.id == license_id)?;
                Some(licenses.remove(pos))
            })?;

        let license = removed.ok_or_else(|| AppError::NotFound("License not found".into()))?;

        if let Err(e) = self.audit.log(
            &license.user_id,
            "DELETE",
            "license",
            Some(license_id),
            Some(&format!("Deleted license: {}", license.name)),
            AuditSeverity::Warning,
        ) {
            tracing::warn!("Failed to write license deletion audit log: {}", e);
        }

        self.store.update(keys::DEVICES, |devices: &mut Vec<Device>| {
            devices.retain(|d| d.license_id != license_id);
        })
    }

    /// All licenses owned by a user.
    pub fn list(&self, user_id: &str) -> Result<Vec<License>> {
        let licenses: Vec<License> = self.store.read(keys::LICENSES)?;
        Ok(licenses.into_iter().filter(|l| l.user_id == user_id).collect())
    }

    pub fn get(&self, license_id: &str) -> Result<Option<License>> {
        let licenses: Vec<License> = self.store.read(keys::LICENSES)?;
        Ok(licenses.into_iter().find(|l| l.id == license_id))
    }
}
