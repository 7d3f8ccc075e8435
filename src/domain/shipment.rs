// ==========================================
// NaviGate Alert Engine - Shipment Entities
// ==========================================
// The snapshot the evaluator works on: a shipment with its documents
// and tracking events eagerly attached. Read-only for this engine.
// ==========================================

use crate::domain::types::{DocumentType, ShipmentStatus, VerificationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Shipment
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shipment {
    pub shipment_id: i64,
    pub firm_id: i64,
    /// Unique human-facing reference, e.g. "NG-2025-0042".
    pub reference_number: String,
    pub status: ShipmentStatus,
    pub carrier_id: Option<i64>,
    /// Port references; 0 means the reference was never filled in.
    pub departure_port_id: i64,
    pub arrival_port_id: i64,
    pub estimated_departure_utc: DateTime<Utc>,
    pub estimated_arrival_utc: DateTime<Utc>,
    /// Freight cost; None or <= 0 counts as missing financials.
    pub freight_cost: Option<f64>,
    pub incoterms: Option<String>,
    pub created_at_utc: DateTime<Utc>,
    pub created_by_user_id: String,

    // Eagerly loaded children
    pub documents: Vec<Document>,
    pub trackings: Vec<ShipmentTracking>,
}

impl Shipment {
    /// Latest tracking event by event time, if any exist.
    pub fn latest_tracking(&self) -> Option<&ShipmentTracking> {
        self.trackings.iter().max_by_key(|t| t.event_date_utc)
    }

    pub fn has_document_type(&self, document_type: DocumentType) -> bool {
        self.documents.iter().any(|d| d.document_type == document_type)
    }
}

// ==========================================
// Document
// ==========================================
// Created on upload; only the verification status mutates afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub document_id: i64,
    pub shipment_id: i64,
    pub document_type: DocumentType,
    pub file_name: String,
    pub upload_date_utc: DateTime<Utc>,
    /// Raw stored value; legacy rows may carry Turkish spellings.
    pub verification_status: String,
    pub verification_notes: Option<String>,
    pub uploaded_by_user_id: String,
}

impl Document {
    /// Normalized verification status, None for unrecognized values.
    pub fn verification(&self) -> Option<VerificationStatus> {
        VerificationStatus::from_db_str(&self.verification_status)
    }
}

// ==========================================
// Shipment Tracking Event
// ==========================================
// Immutable timestamped position/status event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentTracking {
    pub tracking_id: i64,
    pub shipment_id: i64,
    pub location: Option<String>,
    pub status_description: String,
    pub event_date_utc: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tracking(id: i64, ts: DateTime<Utc>) -> ShipmentTracking {
        ShipmentTracking {
            tracking_id: id,
            shipment_id: 1,
            location: Some("Izmir".to_string()),
            status_description: "Departed".to_string(),
            event_date_utc: ts,
        }
    }

    #[test]
    fn test_latest_tracking_picks_max_event_time() {
        let t1 = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2025, 6, 3, 8, 0, 0).unwrap();
        let t3 = Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap();

        let shipment = Shipment {
            shipment_id: 1,
            firm_id: 1,
            reference_number: "NG-1".to_string(),
            status: crate::domain::types::ShipmentStatus::InTransit,
            carrier_id: None,
            departure_port_id: 1,
            arrival_port_id: 2,
            estimated_departure_utc: t1,
            estimated_arrival_utc: t2,
            freight_cost: None,
            incoterms: None,
            created_at_utc: t1,
            created_by_user_id: "u1".to_string(),
            documents: vec![],
            trackings: vec![tracking(1, t1), tracking(2, t2), tracking(3, t3)],
        };

        assert_eq!(shipment.latest_tracking().unwrap().tracking_id, 2);
    }

    #[test]
    fn test_latest_tracking_none_when_empty() {
        let t1 = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap();
        let shipment = Shipment {
            shipment_id: 1,
            firm_id: 1,
            reference_number: "NG-1".to_string(),
            status: crate::domain::types::ShipmentStatus::Draft,
            carrier_id: None,
            departure_port_id: 1,
            arrival_port_id: 2,
            estimated_departure_utc: t1,
            estimated_arrival_utc: t1,
            freight_cost: None,
            incoterms: None,
            created_at_utc: t1,
            created_by_user_id: "u1".to_string(),
            documents: vec![],
            trackings: vec![],
        };
        assert!(shipment.latest_tracking().is_none());
    }
}
