//! Persistent store accessor.
//!
//! Every entity collection is one serialized JSON blob under a fixed key.
//! All mutation is whole-collection read-modify-write; [`Store::update`]
//! serializes those cycles per key so concurrent writers cannot lose each
//! other's updates.
//! There is deliberately no transaction boundary across collections: a
//! cascade (license delete, activation-count maintenance) is a sequence of
//! independently consistent per-collection updates.

mod memory;
mod sqlite;

pub use memory::MemoryBackend;
pub use sqlite::{DbPool, SqliteBackend, create_pool, init_store};

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::util;

/// Fixed storage keys, one per entity collection.
pub mod keys {
    pub const LICENSES: &str = "licenselock_licenses";
    pub const DEVICES: &str = "licenselock_devices";
    pub const ALERTS: &str = "licenselock_alerts";
    pub const AUDIT_LOG: &str = "licenselock_audit_log";
    pub const USERS: &str = "licenselock_users_db";
    pub const RESET_TOKENS: &str = "licenselock_reset_tokens";
    pub const API_KEYS: &str = "licenselock_api_keys";
    pub const TWO_FACTOR: &str = "licenselock_2fa";
    pub const SESSION_USER: &str = "licenselock_user";
    pub const SESSION_TOKEN: &str = "licenselock_token";
    pub const SESSION_ACTIVITY: &str = "licenselock_session_timeout";
    pub const BACKUP: &str = "licenselock_backup";
}

/// Raw blob storage underneath the store: string values under string keys.
pub trait Backend: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Snapshot of the license/device/alert collections, stored under its own key.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Backup {
    pub licenses: Option<String>,
    pub devices: Option<String>,
    pub alerts: Option<String>,
    pub timestamp: i64,
}

/// Store accessor handed to every service.
///
/// Cheaply cloneable; clones share the backend and the per-collection locks.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn Backend>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl Store {
    pub fn new(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// An in-memory store, for tests and ephemeral runs.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = self
            .locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Read a whole collection, returning its default (empty) value when the
    /// key has never been written.
    pub fn read<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.backend.get(key)? {
            Some(blob) => Ok(serde_json::from_str(&blob)?),
            None => Ok(T::default()),
        }
    }

    /// Read-modify-write a whole collection under its per-key lock.
    ///
    /// The closure's return value is passed through; the collection is
    /// written back whether or not the closure mutated it.
    pub fn update<T, R>(&self, key: &str, f: impl FnOnce(&mut T) -> R) -> Result<R>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let lock = self.lock_for(key);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut value: T = match self.backend.get(key)? {
            Some(blob) => serde_json::from_str(&blob)?,
            None => T::default(),
        };
        let result = f(&mut value);
        self.backend.set(key, &serde_json::to_string(&value)?)?;
        Ok(result)
    }

    /// Read a single value, `None` when the key is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.backend.get(key)? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    /// Write a single value, replacing whatever was there.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.backend.set(key, &serde_json::to_string(value)?)
    }

    /// Delete a key outright.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(key)
    }

    /// Snapshot the license, device, and alert collections under the backup
    /// key, overwriting any previous snapshot.
    pub fn backup(&self) -> Result<()> {
        let backup = Backup {
            licenses: self.backend.get(keys::LICENSES)?,
            devices: self.backend.get(keys::DEVICES)?,
            alerts: self.backend.get(keys::ALERTS)?,
            timestamp: util::now(),
        };
        self.put(keys::BACKUP, &backup)
    }

    /// Restore the most recent snapshot. Collections absent from the
    /// snapshot are left untouched.
    pub fn restore(&self) -> Result<()> {
        let backup: Backup = self
            .get(keys::BACKUP)?
            .ok_or_else(|| AppError::NotFound("No backup found".into()))?;

        for (key, blob) in [
            (keys::LICENSES, backup.licenses),
            (keys::DEVICES, backup.devices),
            (keys::ALERTS, backup.alerts),
        ] {
            if let Some(blob) = blob {
                let lock = self.lock_for(key);
                let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
                self.backend.set(key, &blob)?;
            }
        }
        Ok(())
    }
}
