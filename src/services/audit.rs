//! Append-only, size-bounded audit log.
//!
//! Entries are prepended so the collection is always most-recent-first, then
//! truncated to the retention bound. From the application's perspective the
//! log is immutable; only eviction and the explicit per-user clear remove
//! entries.

use crate::error::Result;
use crate::id::EntityType;
use crate::models::{AuditLogEntry, AuditSeverity};
use crate::store::{Store, keys};
use crate::util;

/// Retention bound: logging the 1001st entry evicts the oldest.
pub const MAX_AUDIT_ENTRIES: usize = 1000;

const CSV_HEADER: &str = "Timestamp,Action,Resource,Resource ID,Details,Severity,IP Address";

/// Placeholder address recorded on every entry; there is no real caller
/// address in this mock.
const MOCK_IP: &str = "127.0.0.1";

#[derive(Clone)]
pub struct AuditLog {
    store: Store,
    enabled: bool,
}

impl AuditLog {
    pub fn new(store: Store, enabled: bool) -> Self {
        Self { store, enabled }
    }

    /// Record one entry. A disabled log silently drops writes; reads still
    /// work against whatever was recorded before.
    pub fn log(
        &self,
        user_id: &str,
        action: &str,
        resource: &str,
        resource_id: Option<&str>,
        details: Option<&str>,
        severity: AuditSeverity,
    ) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = AuditLogEntry {
            id: EntityType::AuditLog.gen_id(),
            user_id: user_id.to_string(),
            action: action.to_string(),
            resource: resource.to_string(),
            resource_id: resource_id.map(String::from),
            details: details.map(String::from),
            ip_address: Some(MOCK_IP.to_string()),
            timestamp: util::now(),
            severity,
        };

        self.store
            .update(keys::AUDIT_LOG, |logs: &mut Vec<AuditLogEntry>| {
                logs.insert(0, entry);
                logs.truncate(MAX_AUDIT_ENTRIES);
            })
    }

    /// A user's entries, most recent first.
    pub fn get_logs(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<AuditLogEntry>> {
        let logs: Vec<AuditLogEntry> = self.store.read(keys::AUDIT_LOG)?;
        let mut user_logs: Vec<AuditLogEntry> =
            logs.into_iter().filter(|l| l.user_id == user_id).collect();
        if let Some(limit) = limit {
            user_logs.truncate(limit);
        }
        Ok(user_logs)
    }

    /// A user's entries for one resource type, optionally narrowed to a
    /// single resource ID.
    pub fn get_logs_by_resource(
        &self,
        user_id: &str,
        resource: &str,
        resource_id: Option<&str>,
    ) -> Result<Vec<AuditLogEntry>> {
        let logs: Vec<AuditLogEntry> = self.store.read(keys::AUDIT_LOG)?;
        Ok(logs
            .into_iter()
            .filter(|l| {
                l.user_id == user_id
                    && l.resource == resource
                    && resource_id.is_none_or(|id| l.resource_id.as_deref() == Some(id))
            })
            .collect())
    }

    /// Drop all of one user's entries; other users' history is untouched.
    pub fn clear(&self, user_id: &str) -> Result<()> {
        self.store
            .update(keys::AUDIT_LOG, |logs: &mut Vec<AuditLogEntry>| {
                logs.retain(|l| l.user_id != user_id);
            })
    }

    /// Export a user's entries as CSV text.
    pub fn export(&self, user_id: &str) -> Result<String> {
        let logs = self.get_logs(user_id, None)?;
        let mut lines = Vec::with_capacity(logs.len() + 1);
        lines.push(CSV_HEADER.to_string());
        for log in logs {
            lines.push(
                [
                    util::format_timestamp(log.timestamp),
                    util::csv_field(&log.action),
                    util::csv_field(&log.resource),
                    util::csv_field(log.resource_id.as_deref().unwrap_or_default()),
                    util::csv_field(log.details.as_deref().unwrap_or_default()),
                    log.severity.as_ref().to_string(),
                    util::csv_field(log.ip_address.as_deref().unwrap_or_default()),
                ]
                .join(","),
            );
        }
        Ok(lines.join("\n"))
    }
}
