// ==========================================
// NaviGate Alert Engine - Alert Repository
// ==========================================
// The alert store. The evaluator uses unresolved_exists + insert_batch;
// resolve/delete and the notification queries serve the UI layer.
// insert_batch is transactional: a pass's alerts land together or not
// at all, and a failed pass is retried on the next scan.
// ==========================================

use crate::domain::Alert;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc_or_now;
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct AlertRepository {
    conn: Arc<Mutex<Connection>>,
}

impl AlertRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// De-duplication check: is there an unresolved alert of this
    /// category for this shipment? Exact match on the category label;
    /// resolved alerts never block.
    pub fn unresolved_exists(&self, shipment_id: i64, alert_type: &str) -> RepositoryResult<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            r#"
            SELECT COUNT(*) FROM ai_alert
            WHERE shipment_id = ?1 AND alert_type = ?2 AND is_resolved = 0
        "#,
            params![shipment_id, alert_type],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Insert a pass's surviving alerts as one transaction.
    ///
    /// Returns the number inserted. On any failure the transaction
    /// rolls back and the whole batch is lost, to be regenerated by
    /// the next scan.
    pub fn insert_batch(&self, alerts: &[Alert]) -> RepositoryResult<usize> {
        if alerts.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        for alert in alerts {
            tx.execute(
                r#"
                INSERT INTO ai_alert (
                    shipment_id, alert_type, description, severity,
                    is_resolved, created_at_utc
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
                params![
                    alert.shipment_id,
                    alert.alert_type,
                    alert.description,
                    alert.severity,
                    if alert.is_resolved { 1 } else { 0 },
                    alert.created_at_utc.to_rfc3339(),
                ],
            )?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        Ok(alerts.len())
    }

    /// Mark an alert resolved (UI action). A later scan may then raise
    /// the same category again.
    pub fn resolve(&self, alert_id: i64) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE ai_alert SET is_resolved = 1 WHERE alert_id = ?1",
            params![alert_id],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Alert".to_string(),
                id: alert_id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete an alert (admin action, never done by the engine).
    pub fn delete(&self, alert_id: i64) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            "DELETE FROM ai_alert WHERE alert_id = ?1",
            params![alert_id],
        )?;
        if deleted == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Alert".to_string(),
                id: alert_id.to_string(),
            });
        }
        Ok(())
    }

    /// Total unresolved alerts (notification badge count).
    pub fn count_unresolved(&self) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM ai_alert WHERE is_resolved = 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Most recent unresolved alerts (notification dropdown).
    pub fn recent_unresolved(&self, limit: i64) -> RepositoryResult<Vec<Alert>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT alert_id, shipment_id, alert_type, description,
                   severity, is_resolved, created_at_utc
            FROM ai_alert
            WHERE is_resolved = 0
            ORDER BY created_at_utc DESC, alert_id DESC
            LIMIT ?1
        "#,
        )?;
        let alerts = stmt
            .query_map(params![limit], map_alert_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(alerts)
    }

    /// All alerts for one shipment, unresolved first, newest first.
    pub fn list_for_shipment(&self, shipment_id: i64) -> RepositoryResult<Vec<Alert>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT alert_id, shipment_id, alert_type, description,
                   severity, is_resolved, created_at_utc
            FROM ai_alert
            WHERE shipment_id = ?1
            ORDER BY is_resolved ASC, created_at_utc DESC, alert_id DESC
        "#,
        )?;
        let alerts = stmt
            .query_map(params![shipment_id], map_alert_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(alerts)
    }
}

fn map_alert_row(row: &rusqlite::Row) -> rusqlite::Result<Alert> {
    let alert_id: i64 = row.get(0)?;
    let resolved: i64 = row.get(5)?;
    let created_raw: String = row.get(6)?;
    Ok(Alert {
        alert_id,
        shipment_id: row.get(1)?,
        alert_type: row.get(2)?,
        description: row.get(3)?,
        severity: row.get(4)?,
        is_resolved: resolved != 0,
        created_at_utc: parse_utc_or_now(&created_raw, "ai_alert", alert_id, "created_at_utc"),
    })
}
