// ==========================================
// NaviGate Alert Engine - Shipment Repository
// ==========================================
// Read side of the evaluation pass: active shipments with their
// documents and tracking events eagerly attached. Three queries per
// pass, stitched in memory, so rules never touch the database.
// ==========================================

use crate::domain::types::{DocumentType, ShipmentStatus};
use crate::domain::{Document, Shipment, ShipmentTracking};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::parse_utc_or_now;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct ShipmentRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShipmentRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// Shipments with status not in {Completed, Cancelled}, documents
    /// and tracking events included. Ordered by shipment id so scans
    /// are reproducible.
    pub fn list_active(&self) -> RepositoryResult<Vec<Shipment>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                shipment_id,
                firm_id,
                reference_number,
                status,
                carrier_id,
                departure_port_id,
                arrival_port_id,
                estimated_departure_utc,
                estimated_arrival_utc,
                freight_cost,
                incoterms,
                created_at_utc,
                created_by_user_id
            FROM shipment
            WHERE status NOT IN ('COMPLETED', 'CANCELLED')
            ORDER BY shipment_id
        "#,
        )?;

        let mut shipments: Vec<Shipment> = stmt
            .query_map([], |row| {
                let shipment_id: i64 = row.get(0)?;
                let status: String = row.get(3)?;
                let departure_raw: String = row.get(7)?;
                let arrival_raw: String = row.get(8)?;
                let created_raw: String = row.get(11)?;
                Ok(Shipment {
                    shipment_id,
                    firm_id: row.get(1)?,
                    reference_number: row.get(2)?,
                    status: ShipmentStatus::from_db_str(&status),
                    carrier_id: row.get(4)?,
                    departure_port_id: row.get(5)?,
                    arrival_port_id: row.get(6)?,
                    estimated_departure_utc: parse_utc_or_now(
                        &departure_raw,
                        "shipment",
                        shipment_id,
                        "estimated_departure_utc",
                    ),
                    estimated_arrival_utc: parse_utc_or_now(
                        &arrival_raw,
                        "shipment",
                        shipment_id,
                        "estimated_arrival_utc",
                    ),
                    freight_cost: row.get(9)?,
                    incoterms: row.get(10)?,
                    created_at_utc: parse_utc_or_now(
                        &created_raw,
                        "shipment",
                        shipment_id,
                        "created_at_utc",
                    ),
                    created_by_user_id: row.get(12)?,
                    documents: Vec::new(),
                    trackings: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        // Index for stitching children onto their shipments.
        let index: HashMap<i64, usize> = shipments
            .iter()
            .enumerate()
            .map(|(i, s)| (s.shipment_id, i))
            .collect();

        let mut stmt = conn.prepare(
            r#"
            SELECT
                d.document_id,
                d.shipment_id,
                d.document_type,
                d.file_name,
                d.upload_date_utc,
                d.verification_status,
                d.verification_notes,
                d.uploaded_by_user_id
            FROM document d
            JOIN shipment s ON s.shipment_id = d.shipment_id
            WHERE s.status NOT IN ('COMPLETED', 'CANCELLED')
            ORDER BY d.document_id
        "#,
        )?;

        let documents: Vec<Document> = stmt
            .query_map([], |row| {
                let document_id: i64 = row.get(0)?;
                let doc_type: String = row.get(2)?;
                let upload_raw: String = row.get(4)?;
                Ok(Document {
                    document_id,
                    shipment_id: row.get(1)?,
                    document_type: DocumentType::from_db_str(&doc_type),
                    file_name: row.get(3)?,
                    upload_date_utc: parse_utc_or_now(
                        &upload_raw,
                        "document",
                        document_id,
                        "upload_date_utc",
                    ),
                    verification_status: row.get(5)?,
                    verification_notes: row.get(6)?,
                    uploaded_by_user_id: row.get(7)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for doc in documents {
            if let Some(&i) = index.get(&doc.shipment_id) {
                shipments[i].documents.push(doc);
            }
        }

        let mut stmt = conn.prepare(
            r#"
            SELECT
                t.tracking_id,
                t.shipment_id,
                t.location,
                t.status_description,
                t.event_date_utc
            FROM shipment_tracking t
            JOIN shipment s ON s.shipment_id = t.shipment_id
            WHERE s.status NOT IN ('COMPLETED', 'CANCELLED')
            ORDER BY t.event_date_utc
        "#,
        )?;

        let trackings: Vec<ShipmentTracking> = stmt
            .query_map([], |row| {
                let tracking_id: i64 = row.get(0)?;
                let event_raw: String = row.get(4)?;
                Ok(ShipmentTracking {
                    tracking_id,
                    shipment_id: row.get(1)?,
                    location: row.get(2)?,
                    status_description: row.get(3)?,
                    event_date_utc: parse_utc_or_now(
                        &event_raw,
                        "shipment_tracking",
                        tracking_id,
                        "event_date_utc",
                    ),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        for tracking in trackings {
            if let Some(&i) = index.get(&tracking.shipment_id) {
                shipments[i].trackings.push(tracking);
            }
        }

        Ok(shipments)
    }

    /// Insert a shipment (children ignored). Returns the new id.
    pub fn insert_shipment(&self, shipment: &Shipment) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO shipment (
                firm_id, reference_number, status, carrier_id,
                departure_port_id, arrival_port_id,
                estimated_departure_utc, estimated_arrival_utc,
                freight_cost, incoterms, created_at_utc, created_by_user_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
            params![
                shipment.firm_id,
                shipment.reference_number,
                shipment.status.to_db_str(),
                shipment.carrier_id,
                shipment.departure_port_id,
                shipment.arrival_port_id,
                shipment.estimated_departure_utc.to_rfc3339(),
                shipment.estimated_arrival_utc.to_rfc3339(),
                shipment.freight_cost,
                shipment.incoterms,
                shipment.created_at_utc.to_rfc3339(),
                shipment.created_by_user_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_document(&self, document: &Document) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO document (
                shipment_id, document_type, file_name, upload_date_utc,
                verification_status, verification_notes, uploaded_by_user_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
            params![
                document.shipment_id,
                document.document_type.to_db_str(),
                document.file_name,
                document.upload_date_utc.to_rfc3339(),
                document.verification_status,
                document.verification_notes,
                document.uploaded_by_user_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn insert_tracking(&self, tracking: &ShipmentTracking) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO shipment_tracking (
                shipment_id, location, status_description, event_date_utc
            ) VALUES (?1, ?2, ?3, ?4)
        "#,
            params![
                tracking.shipment_id,
                tracking.location,
                tracking.status_description,
                tracking.event_date_utc.to_rfc3339(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Update a shipment's status (used by operational flows and tests).
    pub fn set_status(&self, shipment_id: i64, status: ShipmentStatus) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE shipment SET status = ?1 WHERE shipment_id = ?2",
            params![status.to_db_str(), shipment_id],
        )?;
        if updated == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Shipment".to_string(),
                id: shipment_id.to_string(),
            });
        }
        Ok(())
    }
}
