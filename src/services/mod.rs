//! Service layer: one service per subsystem, each handed a [`Store`] clone.
//!
//! Services read and rewrite whole collections through the store accessor.
//! One logical operation may touch several collections in sequence (license
//! delete cascades to devices); each step is individually consistent but
//! there is no cross-collection transaction.

mod alerts;
mod api_keys;
mod audit;
mod auth;
mod devices;
mod licenses;
mod stats;
mod two_factor;

pub use alerts::AlertService;
pub use api_keys::ApiKeyService;
pub use audit::{AuditLog, MAX_AUDIT_ENTRIES};
pub use auth::{
    AuthService, IDLE_TIMEOUT_SECS, PasswordStrength, RESET_TOKEN_TTL_SECS, SESSION_TTL_SECS,
    password_strength,
};
pub use devices::{
    DeviceService, LOCATION_SPREAD_FACTOR, RAPID_ACTIVATION_THRESHOLD,
    RAPID_ACTIVATION_WINDOW_SECS,
};
pub use licenses::LicenseService;
pub use stats::{UsageStats, usage_stats};
pub use two_factor::TwoFactorService;

use crate::error::Result;
use crate::store::Store;

/// All services wired over one store.
#[derive(Clone)]
pub struct Services {
    pub audit: AuditLog,
    pub licenses: LicenseService,
    pub devices: DeviceService,
    pub alerts: AlertService,
    pub auth: AuthService,
    pub api_keys: ApiKeyService,
    pub two_factor: TwoFactorService,
    store: Store,
}

impl Services {
    pub fn new(store: Store, audit_log_enabled: bool) -> Self {
        let audit = AuditLog::new(store.clone(), audit_log_enabled);
        let alerts = AlertService::new(store.clone());
        Self {
            licenses: LicenseService::new(store.clone(), audit.clone()),
            devices: DeviceService::new(store.clone(), alerts.clone()),
            alerts,
            auth: AuthService::new(store.clone()),
            api_keys: ApiKeyService::new(store.clone()),
            two_factor: TwoFactorService::new(store.clone()),
            audit,
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn usage_stats(&self, user_id: &str) -> Result<UsageStats> {
        stats::usage_stats(&self.store, user_id)
    }
}
