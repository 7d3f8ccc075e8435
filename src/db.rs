// ==========================================
// NaviGate Alert Engine - SQLite Connection Setup
// ==========================================
// Goals:
// - every Connection::open goes through the same PRAGMA configuration
//   (foreign keys on, shared busy_timeout)
// - schema creation is idempotent so tests and the daemon share it
// ==========================================

use rusqlite::Connection;
use std::time::Duration;

/// Default busy_timeout (milliseconds).
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Apply the unified PRAGMAs.
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Open a SQLite connection with the unified configuration.
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Create the tables the alert engine reads and writes.
///
/// Shipment/document/tracking tables are owned by the wider system;
/// they are created here too so a fresh database (and every test) is
/// self-sufficient.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS shipment (
            shipment_id INTEGER PRIMARY KEY AUTOINCREMENT,
            firm_id INTEGER NOT NULL,
            reference_number TEXT NOT NULL UNIQUE,
            status TEXT NOT NULL DEFAULT 'DRAFT',
            carrier_id INTEGER,
            departure_port_id INTEGER NOT NULL DEFAULT 0,
            arrival_port_id INTEGER NOT NULL DEFAULT 0,
            estimated_departure_utc TEXT NOT NULL,
            estimated_arrival_utc TEXT NOT NULL,
            freight_cost REAL,
            incoterms TEXT,
            created_at_utc TEXT NOT NULL DEFAULT (datetime('now')),
            created_by_user_id TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS document (
            document_id INTEGER PRIMARY KEY AUTOINCREMENT,
            shipment_id INTEGER NOT NULL REFERENCES shipment(shipment_id) ON DELETE CASCADE,
            document_type TEXT NOT NULL,
            file_name TEXT NOT NULL,
            upload_date_utc TEXT NOT NULL DEFAULT (datetime('now')),
            verification_status TEXT NOT NULL DEFAULT 'Pending',
            verification_notes TEXT,
            uploaded_by_user_id TEXT NOT NULL DEFAULT ''
        );

        CREATE INDEX IF NOT EXISTS idx_document_shipment
          ON document(shipment_id);

        CREATE TABLE IF NOT EXISTS shipment_tracking (
            tracking_id INTEGER PRIMARY KEY AUTOINCREMENT,
            shipment_id INTEGER NOT NULL REFERENCES shipment(shipment_id) ON DELETE CASCADE,
            location TEXT,
            status_description TEXT NOT NULL,
            event_date_utc TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tracking_shipment_event
          ON shipment_tracking(shipment_id, event_date_utc);

        CREATE TABLE IF NOT EXISTS ai_alert (
            alert_id INTEGER PRIMARY KEY AUTOINCREMENT,
            shipment_id INTEGER NOT NULL REFERENCES shipment(shipment_id) ON DELETE CASCADE,
            alert_type TEXT NOT NULL,
            description TEXT NOT NULL,
            severity TEXT NOT NULL,
            is_resolved INTEGER NOT NULL DEFAULT 0,
            created_at_utc TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_alert_dedup
          ON ai_alert(shipment_id, alert_type, is_resolved);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    Ok(())
}
