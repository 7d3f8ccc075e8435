// ==========================================
// NaviGate Alert Engine - Evaluation Pass
// ==========================================
// One pass: load the active shipments, run the rule table over each in
// shipment-id order, route candidates through the de-duplication gate,
// then commit the survivors as a single transactional batch. "now" is
// captured once by the caller and shared by every rule in the pass.
// ==========================================

use crate::config::AlertThresholds;
use crate::domain::{Alert, AlertCandidate};
use crate::engine::rules::evaluate_shipment;
use crate::repository::{AlertRepository, RepositoryResult, ShipmentRepository};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Outcome of one evaluation pass, for logging and tests.
#[derive(Debug, Clone)]
pub struct PassSummary {
    pub scan_id: Uuid,
    pub shipments_scanned: usize,
    /// Rule findings before de-duplication.
    pub candidates: usize,
    /// Alerts actually committed.
    pub alerts_created: usize,
}

// ==========================================
// De-duplication gate
// ==========================================
// Two-level check. The persisted level blocks a whole category for a
// shipment while any unresolved alert of that category exists; resolved
// alerts never block. The staged level keys on (shipment, type,
// qualifier) so one pass can still raise several distinct findings of
// one category (two missing document types, two rejected documents)
// without double-inserting the same finding.
pub struct DedupGate<'a> {
    alerts: &'a AlertRepository,
    staged: HashSet<(i64, &'static str, Option<String>)>,
}

impl<'a> DedupGate<'a> {
    pub fn new(alerts: &'a AlertRepository) -> Self {
        Self {
            alerts,
            staged: HashSet::new(),
        }
    }

    /// Decide whether this candidate becomes an alert. Staging happens
    /// here, so the check-and-stage is atomic within the pass.
    pub fn should_create(&mut self, candidate: &AlertCandidate) -> RepositoryResult<bool> {
        let label = candidate.alert_type.label();
        let key = (
            candidate.shipment_id,
            label,
            candidate.qualifier.clone(),
        );
        if self.staged.contains(&key) {
            return Ok(false);
        }
        if self
            .alerts
            .unresolved_exists(candidate.shipment_id, label)?
        {
            return Ok(false);
        }
        self.staged.insert(key);
        Ok(true)
    }
}

// ==========================================
// AlertEvaluator
// ==========================================
pub struct AlertEvaluator {
    shipments: Arc<ShipmentRepository>,
    alerts: Arc<AlertRepository>,
    thresholds: AlertThresholds,
}

impl AlertEvaluator {
    pub fn new(
        shipments: Arc<ShipmentRepository>,
        alerts: Arc<AlertRepository>,
        thresholds: AlertThresholds,
    ) -> Self {
        Self {
            shipments,
            alerts,
            thresholds,
        }
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// One full scan. Synchronous; the scheduler runs it on a blocking
    /// thread. Any error aborts the pass with nothing committed, to be
    /// retried on the next cycle.
    pub fn run_pass(&self, now: DateTime<Utc>) -> RepositoryResult<PassSummary> {
        let scan_id = Uuid::new_v4();
        info!(%scan_id, "alert scan started");

        let shipments = self.shipments.list_active()?;
        let mut gate = DedupGate::new(&self.alerts);
        let mut surviving: Vec<Alert> = Vec::new();
        let mut candidate_count = 0usize;

        for shipment in &shipments {
            for candidate in evaluate_shipment(shipment, now, &self.thresholds) {
                candidate_count += 1;
                if gate.should_create(&candidate)? {
                    warn!(
                        shipment_id = candidate.shipment_id,
                        alert_type = candidate.alert_type.label(),
                        severity = candidate.severity.label(),
                        "alert created: {}",
                        candidate.message
                    );
                    surviving.push(Alert::from_candidate(candidate, now));
                }
            }
        }

        let alerts_created = self.alerts.insert_batch(&surviving)?;

        let summary = PassSummary {
            scan_id,
            shipments_scanned: shipments.len(),
            candidates: candidate_count,
            alerts_created,
        };
        info!(
            %scan_id,
            shipments = summary.shipments_scanned,
            candidates = summary.candidates,
            created = summary.alerts_created,
            "alert scan finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AlertType, DocumentType, Severity, ShipmentStatus};
    use crate::domain::{Document, Shipment};
    use chrono::{Duration, TimeZone};
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn setup() -> (Arc<ShipmentRepository>, Arc<AlertRepository>, AlertEvaluator) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let shipments = Arc::new(ShipmentRepository::new(conn.clone()));
        let alerts = Arc::new(AlertRepository::new(conn));
        let evaluator = AlertEvaluator::new(
            shipments.clone(),
            alerts.clone(),
            AlertThresholds::default(),
        );
        (shipments, alerts, evaluator)
    }

    fn seed_shipment(repo: &ShipmentRepository, status: ShipmentStatus) -> i64 {
        repo.insert_shipment(&Shipment {
            shipment_id: 0,
            firm_id: 1,
            reference_number: "NG-1".to_string(),
            status,
            carrier_id: None,
            departure_port_id: 1,
            arrival_port_id: 2,
            estimated_departure_utc: now() - Duration::days(2),
            estimated_arrival_utc: now() + Duration::days(8),
            freight_cost: Some(1000.0),
            incoterms: None,
            created_at_utc: now() - Duration::days(3),
            created_by_user_id: "u1".to_string(),
            documents: vec![],
            trackings: vec![],
        })
        .unwrap()
    }

    fn seed_document(repo: &ShipmentRepository, shipment_id: i64, doc_type: DocumentType) {
        repo.insert_document(&Document {
            document_id: 0,
            shipment_id,
            document_type: doc_type,
            file_name: "f.pdf".to_string(),
            upload_date_utc: now() - Duration::days(1),
            verification_status: "Approved".to_string(),
            verification_notes: None,
            uploaded_by_user_id: "u1".to_string(),
        })
        .unwrap();
    }

    #[test]
    fn test_pass_creates_one_alert_per_missing_document_type() {
        let (shipments, alerts, evaluator) = setup();
        let id = seed_shipment(&shipments, ShipmentStatus::InTransit);
        seed_document(&shipments, id, DocumentType::BillOfLading);
        seed_document(&shipments, id, DocumentType::InsurancePolicy);

        let summary = evaluator.run_pass(now()).unwrap();
        // Missing Invoice + PackingList, plus the stagnant fallback does
        // not apply (departure two days ago, threshold five).
        assert_eq!(summary.alerts_created, 2);

        let stored = alerts.list_for_shipment(id).unwrap();
        assert!(stored
            .iter()
            .all(|a| a.alert_type == AlertType::MissingDocument.label()));
        assert!(stored
            .iter()
            .all(|a| a.severity == Severity::Important.label()));
    }

    #[test]
    fn test_second_pass_is_idempotent() {
        let (shipments, _alerts, evaluator) = setup();
        let id = seed_shipment(&shipments, ShipmentStatus::InTransit);
        seed_document(&shipments, id, DocumentType::BillOfLading);

        let first = evaluator.run_pass(now()).unwrap();
        assert!(first.alerts_created > 0);

        let second = evaluator.run_pass(now()).unwrap();
        assert_eq!(second.alerts_created, 0);
        // Candidates still found; the gate suppressed them.
        assert_eq!(second.candidates, first.candidates);
    }

    #[test]
    fn test_resolved_alert_is_recreated() {
        let (shipments, alerts, evaluator) = setup();
        // One deterministic alert: same-port error on a draft shipment
        // whose dates are otherwise unobjectionable.
        let id = shipments
            .insert_shipment(&Shipment {
                shipment_id: 0,
                firm_id: 1,
                reference_number: "NG-2".to_string(),
                status: ShipmentStatus::Draft,
                carrier_id: None,
                departure_port_id: 7,
                arrival_port_id: 7,
                estimated_departure_utc: now() + Duration::days(2),
                estimated_arrival_utc: now() + Duration::days(8),
                freight_cost: Some(1000.0),
                incoterms: None,
                created_at_utc: now(),
                created_by_user_id: "u1".to_string(),
                documents: vec![],
                trackings: vec![],
            })
            .unwrap();

        evaluator.run_pass(now()).unwrap();
        assert_eq!(alerts.count_unresolved().unwrap(), 1);

        let stored = alerts.list_for_shipment(id).unwrap();
        alerts.resolve(stored[0].alert_id).unwrap();

        // Condition unchanged, so a new unresolved alert appears.
        let summary = evaluator.run_pass(now()).unwrap();
        assert_eq!(summary.alerts_created, 1);
        assert_eq!(alerts.count_unresolved().unwrap(), 1);
        assert_eq!(alerts.list_for_shipment(id).unwrap().len(), 2);
    }

    #[test]
    fn test_gate_two_level_key() {
        let (shipments, alerts, _evaluator) = setup();
        let id = seed_shipment(&shipments, ShipmentStatus::InTransit);

        let candidate = |qualifier: Option<&str>| AlertCandidate {
            shipment_id: id,
            alert_type: AlertType::MissingDocument,
            severity: Severity::Important,
            message: "m".to_string(),
            qualifier: qualifier.map(str::to_string),
        };

        let mut gate = DedupGate::new(&alerts);
        // Distinct qualifiers coexist within a pass.
        assert!(gate.should_create(&candidate(Some("INVOICE"))).unwrap());
        assert!(gate.should_create(&candidate(Some("PACKING_LIST"))).unwrap());
        // Same qualifier staged twice: blocked.
        assert!(!gate.should_create(&candidate(Some("INVOICE"))).unwrap());

        // Once any unresolved alert of the category is persisted, the
        // whole category is suppressed, qualifier or not.
        alerts
            .insert_batch(&[Alert::from_candidate(candidate(Some("INVOICE")), now())])
            .unwrap();
        let mut fresh = DedupGate::new(&alerts);
        assert!(!fresh.should_create(&candidate(Some("PACKING_LIST"))).unwrap());
    }
}
