//! Device activation lifecycle and piracy anomaly sweeps.

use std::collections::HashSet;

use crate::error::{AppError, Result};
use crate::id::EntityType;
use crate::keygen;
use crate::models::{AlertSeverity, AlertType, Device, License, LicenseStatus, PiracyAlert};
use crate::store::{Store, keys};
use crate::util;

use super::alerts::AlertService;

/// Window for the rapid-activation heuristic.
pub const RAPID_ACTIVATION_WINDOW_SECS: i64 = 60;

/// More than this many activations inside the window raises an alert.
pub const RAPID_ACTIVATION_THRESHOLD: usize = 3;

/// Distinct IP addresses beyond `factor * max_activations` raise an alert.
pub const LOCATION_SPREAD_FACTOR: u32 = 2;

#[derive(Clone)]
pub struct DeviceService {
    store: Store,
    alerts: AlertService,
}

enum ActivationStep {
    Refreshed(Device),
    LimitExceeded,
    Created(Device, u32),
}

impl DeviceService {
    pub fn new(store: Store, alerts: AlertService) -> Self {
        Self { store, alerts }
    }

    /// Bind a device to a license.
    ///
    /// Re-activating a known hwid refreshes `last_seen` and leaves the
    /// activation count alone. A new hwid at the activation cap fails with
    /// `LimitExceeded` and raises exactly one high-severity alert.
    pub fn activate(&self, license_id: &str, hwid: &str, device_name: &str) -> Result<Device> {
        let license = self
            .get_license(license_id)?
            .ok_or_else(|| AppError::NotFound("License not found".into()))?;

        if license.status != LicenseStatus::Active {
            return Err(AppError::InvalidState("License is not active".into()));
        }

        let now = util::now();
        let step = self.store.update(keys::DEVICES, |devices: &mut Vec<Device>| {
            if let Some(known) = devices
                .iter_mut()
                .find(|d| d.license_id == license_id && d.hwid == hwid)
            {
                known.last_seen = now;
                return ActivationStep::Refreshed(known.clone());
            }

            let count = devices.iter().filter(|d| d.license_id == license_id).count() as u32;
            if count >= license.max_activations {
                return ActivationStep::LimitExceeded;
            }

            let device = Device {
                id: EntityType::Device.gen_id(),
                license_id: license_id.to_string(),
                hwid: hwid.to_string(),
                device_name: device_name.to_string(),
                activated_at: now,
                last_seen: now,
                ip_address: keygen::mock_ip_address(),
                trusted: false,
            };
            devices.push(device.clone());
            ActivationStep::Created(device, count + 1)
        })?;

        match step {
            ActivationStep::Refreshed(device) => Ok(device),
            ActivationStep::LimitExceeded => {
                self.alerts.create(
                    license_id,
                    AlertType::MaxActivationsExceeded,
                    &format!(
                        "Attempted activation beyond limit ({} max)",
                        license.max_activations
                    ),
                    AlertSeverity::High,
                )?;
                Err(AppError::LimitExceeded(format!(
                    "License allows at most {} activations",
                    license.max_activations
                )))
            }
            ActivationStep::Created(device, count) => {
                self.write_activation_count(license_id, count)?;
                Ok(device)
            }
        }
    }

    /// Remove a device and recompute the owning license's activation count
    /// from the devices that remain.
    pub fn deactivate(&self, device_id: &str) -> Result<()> {
        let removed = self.store.update(keys::DEVICES, |devices: &mut Vec<Device>| {
            let pos = devices.iter().position(|d| d.id == device_id)?;
            let device = devices.remove(pos);
            let remaining = devices
                .iter()
                .filter(|d| d.license_id == device.license_id)
                .count() as u32;
            Some((device, remaining))
        })?;

        let Some((device, remaining)) = removed else {
            return Err(AppError::NotFound("Device not found".into()));
        };

        self.write_activation_count(&device.license_id, remaining)
    }

    /// Flip the user-managed trusted flag.
    pub fn toggle_trust(&self, device_id: &str) -> Result<Device> {
        let updated = self.store.update(keys::DEVICES, |devices: &mut Vec<Device>| {
            let device = devices.iter_mut().find(|d| d.id == device_id)?;
            device.trusted = !device.trusted;
            Some(device.clone())
        })?;

        updated.ok_or_else(|| AppError::NotFound("Device not found".into()))
    }

    pub fn list_for_license(&self, license_id: &str) -> Result<Vec<Device>> {
        let devices: Vec<Device> = self.store.read(keys::DEVICES)?;
        Ok(devices
            .into_iter()
            .filter(|d| d.license_id == license_id)
            .collect())
    }

    /// All devices across every license a user owns.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<Device>> {
        let licenses: Vec<License> = self.store.read(keys::LICENSES)?;
        let owned: HashSet<&str> = licenses
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| l.id.as_str())
            .collect();

        let devices: Vec<Device> = self.store.read(keys::DEVICES)?;
        Ok(devices
            .into_iter()
            .filter(|d| owned.contains(d.license_id.as_str()))
            .collect())
    }

    /// Sweep one license for piracy signals, excluding the probing device
    /// from the concurrency check. Returns the alerts raised; repeated
    /// sweeps over an unchanged state raise repeated alerts.
    pub fn detect_anomalies(
        &self,
        license_id: &str,
        excluding_device_id: &str,
        ip_address: &str,
    ) -> Result<Vec<PiracyAlert>> {
        let license = self
            .get_license(license_id)?
            .ok_or_else(|| AppError::NotFound("License not found".into()))?;
        let devices = self.list_for_license(license_id)?;

        let mut raised = Vec::new();
        let now = util::now();

        let others = devices
            .iter()
            .filter(|d| d.id != excluding_device_id)
            .count() as u32;
        if others >= license.max_activations {
            raised.push(self.alerts.create(
                license_id,
                AlertType::MaxActivationsExceeded,
                "Multiple concurrent logins detected",
                AlertSeverity::High,
            )?);
        }

        let recent = devices
            .iter()
            .filter(|d| d.activated_at > now - RAPID_ACTIVATION_WINDOW_SECS)
            .count();
        if recent > RAPID_ACTIVATION_THRESHOLD {
            raised.push(self.alerts.create(
                license_id,
                AlertType::RapidActivation,
                "Rapid activation attempts detected",
                AlertSeverity::Medium,
            )?);
        }

        let distinct_ips: HashSet<&str> =
            devices.iter().map(|d| d.ip_address.as_str()).collect();
        if distinct_ips.len() as u32 > LOCATION_SPREAD_FACTOR * license.max_activations {
            raised.push(self.alerts.create(
                license_id,
                AlertType::MultipleLocations,
                &format!("License used in multiple locations (latest {})", ip_address),
                AlertSeverity::Medium,
            )?);
        }

        Ok(raised)
    }

    fn get_license(&self, license_id: &str) -> Result<Option<License>> {
        let licenses: Vec<License> = self.store.read(keys::LICENSES)?;
        Ok(licenses.into_iter().find(|l| l.id == license_id))
    }

    fn write_activation_count(&self, license_id: &str, count: u32) -> Result<()> {
        self.store.update(keys::LICENSES, |licenses: &mut Vec<License>| {
            if let Some(license) = licenses.iter_mut().find(|l| l.id == license_id) {
                license.activations = count;
            }
        })
    }
}
