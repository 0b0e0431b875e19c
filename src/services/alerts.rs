//! Piracy alert records: creation, resolution, per-user listing.
//!
//! Alerts are never deduplicated or auto-expired; every trigger of a
//! condition appends a fresh record.

use std::collections::HashSet;

use crate::error::Result;
use crate::id::EntityType;
use crate::models::{AlertSeverity, AlertType, License, PiracyAlert};
use crate::store::{Store, keys};
use crate::util;

#[derive(Clone)]
pub struct AlertService {
    store: Store,
}

impl AlertService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn create(
        &self,
        license_id: &str,
        alert_type: AlertType,
        description: &str,
        severity: AlertSeverity,
    ) -> Result<PiracyAlert> {
        let alert = PiracyAlert {
            id: EntityType::Alert.gen_id(),
            license_id: license_id.to_string(),
            alert_type,
            description: description.to_string(),
            severity,
            timestamp: util::now(),
            resolved: false,
        };

        self.store.update(keys::ALERTS, |alerts: &mut Vec<PiracyAlert>| {
            alerts.push(alert.clone());
        })?;

        Ok(alert)
    }

    /// Mark an alert resolved. Resolving an already-resolved or unknown
    /// alert is a no-op; the flag never transitions back.
    pub fn resolve(&self, alert_id: &str) -> Result<()> {
        self.store.update(keys::ALERTS, |alerts: &mut Vec<PiracyAlert>| {
            if let Some(alert) = alerts.iter_mut().find(|a| a.id == alert_id) {
                alert.resolved = true;
            }
        })
    }

    /// All alerts against licenses owned by a user.
    pub fn list(&self, user_id: &str) -> Result<Vec<PiracyAlert>> {
        let licenses: Vec<License> = self.store.read(keys::LICENSES)?;
        let owned: HashSet<&str> = licenses
            .iter()
            .filter(|l| l.user_id == user_id)
            .map(|l| l.id.as_str())
            .collect();

        let alerts: Vec<PiracyAlert> = self.store.read(keys::ALERTS)?;
        Ok(alerts
            .into_iter()
            .filter(|a| owned.contains(a.license_id.as_str()))
            .collect())
    }
}
