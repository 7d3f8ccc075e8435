// ==========================================
// NaviGate Alert Engine - Threshold Configuration
// ==========================================
// Thresholds are deployment parameters, not business constants.
// Stored in config_kv (scope_id='global'); compiled-in defaults apply
// when a key is absent or unparseable.
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

// Defaults match the production intent of the reference deployment.
pub const DEFAULT_CUSTOMS_DWELL_DAYS: i64 = 7;
pub const DEFAULT_STAGNANT_DAYS: i64 = 5;
pub const DEFAULT_APPROVAL_SLA_DAYS: i64 = 3;
pub const DEFAULT_SCAN_INTERVAL_MINUTES: i64 = 240;

/// Tunable thresholds for the rule evaluator and scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Rule 4: max time at customs since the last tracking event.
    pub customs_dwell: chrono::Duration,
    /// Rule 6: max time in transit without new activity.
    pub stagnant: chrono::Duration,
    /// Rule 9: max time a document may sit pending approval.
    pub approval_sla: chrono::Duration,
    /// Scheduler cadence between scans.
    pub scan_interval: chrono::Duration,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            customs_dwell: chrono::Duration::days(DEFAULT_CUSTOMS_DWELL_DAYS),
            stagnant: chrono::Duration::days(DEFAULT_STAGNANT_DAYS),
            approval_sla: chrono::Duration::days(DEFAULT_APPROVAL_SLA_DAYS),
            scan_interval: chrono::Duration::minutes(DEFAULT_SCAN_INTERVAL_MINUTES),
        }
    }
}

impl AlertThresholds {
    /// JSON snapshot for the scan logs.
    pub fn snapshot_json(&self) -> String {
        serde_json::json!({
            "customs_dwell_days": self.customs_dwell.num_days(),
            "stagnant_days": self.stagnant.num_days(),
            "approval_sla_days": self.approval_sla.num_days(),
            "scan_interval_minutes": self.scan_interval.num_minutes(),
        })
        .to_string()
    }
}

// ==========================================
// AlertConfigManager
// ==========================================
pub struct AlertConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl AlertConfigManager {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Read a global-scope config value; None if absent.
    fn get_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Read an integer config value; None when absent or unparseable.
    fn get_config_i64(&self, key: &str) -> RepositoryResult<Option<i64>> {
        Ok(self
            .get_config_value(key)?
            .and_then(|s| s.trim().parse::<i64>().ok()))
    }

    /// Upsert a global-scope config value.
    pub fn set_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
        "#,
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// Load the thresholds, falling back to defaults per key.
    pub fn load_thresholds(&self) -> RepositoryResult<AlertThresholds> {
        let customs_dwell_days = self
            .get_config_i64("customs_dwell_days")?
            .unwrap_or(DEFAULT_CUSTOMS_DWELL_DAYS);
        let stagnant_days = self
            .get_config_i64("stagnant_days")?
            .unwrap_or(DEFAULT_STAGNANT_DAYS);
        let approval_sla_days = self
            .get_config_i64("approval_sla_days")?
            .unwrap_or(DEFAULT_APPROVAL_SLA_DAYS);
        let scan_interval_minutes = self
            .get_config_i64("scan_interval_minutes")?
            .unwrap_or(DEFAULT_SCAN_INTERVAL_MINUTES);

        Ok(AlertThresholds {
            customs_dwell: chrono::Duration::days(customs_dwell_days),
            stagnant: chrono::Duration::days(stagnant_days),
            approval_sla: chrono::Duration::days(approval_sla_days),
            scan_interval: chrono::Duration::minutes(scan_interval_minutes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> AlertConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        AlertConfigManager::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_load_thresholds_defaults() {
        let manager = setup();
        let thresholds = manager.load_thresholds().unwrap();
        assert_eq!(thresholds, AlertThresholds::default());
        assert_eq!(thresholds.customs_dwell.num_days(), 7);
        assert_eq!(thresholds.scan_interval.num_minutes(), 240);
    }

    #[test]
    fn test_load_thresholds_with_overrides() {
        let manager = setup();
        manager.set_config_value("customs_dwell_days", "10").unwrap();
        manager.set_config_value("approval_sla_days", "1").unwrap();

        let thresholds = manager.load_thresholds().unwrap();
        assert_eq!(thresholds.customs_dwell.num_days(), 10);
        assert_eq!(thresholds.approval_sla.num_days(), 1);
        // Untouched keys keep defaults.
        assert_eq!(thresholds.stagnant.num_days(), 5);
    }

    #[test]
    fn test_unparseable_value_falls_back_to_default() {
        let manager = setup();
        manager
            .set_config_value("stagnant_days", "not-a-number")
            .unwrap();
        let thresholds = manager.load_thresholds().unwrap();
        assert_eq!(thresholds.stagnant.num_days(), 5);
    }
}
