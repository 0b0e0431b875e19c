//! Dashboard usage statistics aggregated across a user's collections.

use std::collections::HashSet;

use serde::Serialize;

use crate::error::Result;
use crate::models::{Device, License, PiracyAlert};
use crate::store::{Store, keys};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UsageStats {
    /// Sum of activation counts across the user's licenses.
    pub total_activations: u32,
    /// Devices currently bound to any of the user's licenses.
    pub active_devices: usize,
    /// Unresolved alerts against the user's licenses.
    pub alerts_count: usize,
}

pub fn usage_stats(store: &Store, user_id: &str) -> Result<UsageStats> {
    let licenses: Vec<License> = store.read(keys::LICENSES)?;
    let owned: Vec<&License> = licenses.iter().filter(|l| l.user_id == user_id).collect();
    let owned_ids: HashSet<&str> = owned.iter().map(|l| l.id.as_str()).collect();

    let devices: Vec<Device> = store.read(keys::DEVICES)?;
    let alerts: Vec<PiracyAlert> = store.read(keys::ALERTS)?;

    Ok(UsageStats {
        total_activations: owned.iter().map(|l| l.activations).sum(),
        active_devices: devices
            .iter()
            .filter(|d| owned_ids.contains(d.license_id.as_str()))
            .count(),
        alerts_count: alerts
            .iter()
            .filter(|a| !a.resolved && owned_ids.contains(a.license_id.as_str()))
            .count(),
    })
}
