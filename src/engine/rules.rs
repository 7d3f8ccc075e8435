// ==========================================
// NaviGate Alert Engine - Rule Table
// ==========================================
// The ten shipment rules as a flat table of tagged records. Each check
// is a pure function of (shipment, now, thresholds); no rule touches
// the database or reads the clock. A rule may return several findings
// (one per missing document type, one per qualifying document), each
// carrying a qualifier so same-category findings stay distinct within
// one pass.
//
// Alert descriptions keep the Turkish texts the operations UI shows;
// day counts come from the configured thresholds, not literals.
// ==========================================

use crate::config::AlertThresholds;
use crate::domain::types::{
    AlertType, Severity, ShipmentStatus, VerificationStatus, REQUIRED_DOCUMENT_TYPES,
};
use crate::domain::{AlertCandidate, Shipment};
use chrono::{DateTime, Utc};

/// One rule hit: the alert description plus an optional de-dup
/// qualifier for rules that can fire several times per shipment.
#[derive(Debug, Clone)]
pub struct RuleFinding {
    pub message: String,
    pub qualifier: Option<String>,
}

impl RuleFinding {
    fn plain(message: String) -> Self {
        Self {
            message,
            qualifier: None,
        }
    }

    fn qualified(message: String, qualifier: String) -> Self {
        Self {
            message,
            qualifier: Some(qualifier),
        }
    }
}

type RuleCheck = fn(&Shipment, DateTime<Utc>, &AlertThresholds) -> Vec<RuleFinding>;

pub struct AlertRule {
    pub id: u8,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub check: RuleCheck,
}

/// The rule table, in the order the legacy generator ran its checks.
/// Rules are independent predicates; the order only fixes the candidate
/// sequence within a pass.
pub const ALERT_RULES: [AlertRule; 10] = [
    AlertRule {
        id: 1,
        alert_type: AlertType::DelayWarning,
        severity: Severity::Warning,
        check: check_arrival_overdue,
    },
    AlertRule {
        id: 2,
        alert_type: AlertType::IllogicalDates,
        severity: Severity::Error,
        check: check_illogical_dates,
    },
    AlertRule {
        id: 3,
        alert_type: AlertType::MissingDocument,
        severity: Severity::Important,
        check: check_missing_documents,
    },
    AlertRule {
        id: 4,
        alert_type: AlertType::CustomsOverstay,
        severity: Severity::Critical,
        check: check_customs_overstay,
    },
    AlertRule {
        id: 5,
        alert_type: AlertType::DispatchDelay,
        severity: Severity::Warning,
        check: check_dispatch_overdue,
    },
    AlertRule {
        id: 6,
        alert_type: AlertType::StagnantShipment,
        severity: Severity::Important,
        check: check_stagnant,
    },
    AlertRule {
        id: 7,
        alert_type: AlertType::MissingFinancials,
        severity: Severity::Warning,
        check: check_missing_financials,
    },
    AlertRule {
        id: 8,
        alert_type: AlertType::SamePortError,
        severity: Severity::Error,
        check: check_same_port,
    },
    AlertRule {
        id: 9,
        alert_type: AlertType::DocumentApprovalOverdue,
        severity: Severity::Warning,
        check: check_approval_overdue,
    },
    AlertRule {
        id: 10,
        alert_type: AlertType::DocumentRejected,
        severity: Severity::Important,
        check: check_document_rejected,
    },
];

/// Run the whole table against one shipment.
pub fn evaluate_shipment(
    shipment: &Shipment,
    now: DateTime<Utc>,
    thresholds: &AlertThresholds,
) -> Vec<AlertCandidate> {
    let mut candidates = Vec::new();
    for rule in &ALERT_RULES {
        for finding in (rule.check)(shipment, now, thresholds) {
            candidates.push(AlertCandidate {
                shipment_id: shipment.shipment_id,
                alert_type: rule.alert_type,
                severity: rule.severity,
                message: finding.message,
                qualifier: finding.qualifier,
            });
        }
    }
    candidates
}

fn fmt_day(ts: DateTime<Utc>) -> String {
    ts.format("%d.%m.%Y").to_string()
}

// Rule 1: estimated arrival already behind us.
fn check_arrival_overdue(
    shipment: &Shipment,
    now: DateTime<Utc>,
    _thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    if shipment.estimated_arrival_utc < now {
        vec![RuleFinding::plain(format!(
            "'{}' numaralı sevkiyatın {} olan tahmini varış tarihi geçti.",
            shipment.reference_number,
            fmt_day(shipment.estimated_arrival_utc)
        ))]
    } else {
        Vec::new()
    }
}

// Rule 2: arrival before departure.
fn check_illogical_dates(
    shipment: &Shipment,
    _now: DateTime<Utc>,
    _thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    if shipment.estimated_arrival_utc < shipment.estimated_departure_utc {
        vec![RuleFinding::plain(format!(
            "'{}' numaralı sevkiyatın varış tarihi ({}), kalkış tarihinden ({}) önce olamaz.",
            shipment.reference_number,
            fmt_day(shipment.estimated_arrival_utc),
            fmt_day(shipment.estimated_departure_utc)
        ))]
    } else {
        Vec::new()
    }
}

// Rule 3: required document types absent while the shipment is moving.
// One finding per missing type, qualified by the type identifier.
fn check_missing_documents(
    shipment: &Shipment,
    _now: DateTime<Utc>,
    _thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    if !matches!(
        shipment.status,
        ShipmentStatus::InTransit | ShipmentStatus::AtCustoms
    ) {
        return Vec::new();
    }
    REQUIRED_DOCUMENT_TYPES
        .iter()
        .filter(|&&required| !shipment.has_document_type(required))
        .map(|&missing| {
            RuleFinding::qualified(
                format!(
                    "'{}' numaralı sevkiyat yolda ancak '{}' sisteme henüz yüklenmemiş.",
                    shipment.reference_number,
                    missing.display_name()
                ),
                missing.to_db_str().to_string(),
            )
        })
        .collect()
}

// Rule 4: sitting at customs with no tracking movement past the dwell
// threshold. Needs at least one tracking event.
fn check_customs_overstay(
    shipment: &Shipment,
    now: DateTime<Utc>,
    thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    if shipment.status != ShipmentStatus::AtCustoms {
        return Vec::new();
    }
    let Some(last) = shipment.latest_tracking() else {
        return Vec::new();
    };
    if now - last.event_date_utc > thresholds.customs_dwell {
        vec![RuleFinding::plain(format!(
            "'{}' numaralı sevkiyat {} günden uzun süredir gümrükte bekliyor. Son hareket tarihi: {}",
            shipment.reference_number,
            thresholds.customs_dwell.num_days(),
            fmt_day(last.event_date_utc)
        ))]
    } else {
        Vec::new()
    }
}

// Rule 5: departure date passed but the shipment never left.
fn check_dispatch_overdue(
    shipment: &Shipment,
    now: DateTime<Utc>,
    _thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    if matches!(
        shipment.status,
        ShipmentStatus::Draft | ShipmentStatus::ReadyForDispatch
    ) && shipment.estimated_departure_utc < now
    {
        vec![RuleFinding::plain(format!(
            "'{}' sevkiyatının {} olan tahmini kalkış tarihi geçti ancak durumu hala yola çıkmadı.",
            shipment.reference_number,
            fmt_day(shipment.estimated_departure_utc)
        ))]
    } else {
        Vec::new()
    }
}

// Rule 6: in transit with no new activity. Falls back to the estimated
// departure when the shipment has no tracking events at all.
fn check_stagnant(
    shipment: &Shipment,
    now: DateTime<Utc>,
    thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    if shipment.status != ShipmentStatus::InTransit {
        return Vec::new();
    }
    let last_activity = shipment
        .latest_tracking()
        .map(|t| t.event_date_utc)
        .unwrap_or(shipment.estimated_departure_utc);
    if now - last_activity > thresholds.stagnant {
        vec![RuleFinding::plain(format!(
            "'{}' numaralı sevkiyattan {} günden uzun süredir yeni bir hareket bilgisi alınamadı.",
            shipment.reference_number,
            thresholds.stagnant.num_days()
        ))]
    } else {
        Vec::new()
    }
}

// Rule 7: nearing completion without a freight cost on file.
fn check_missing_financials(
    shipment: &Shipment,
    _now: DateTime<Utc>,
    _thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    if !matches!(
        shipment.status,
        ShipmentStatus::AtCustoms | ShipmentStatus::Completed
    ) {
        return Vec::new();
    }
    let missing = match shipment.freight_cost {
        None => true,
        Some(cost) => cost <= 0.0,
    };
    if missing {
        vec![RuleFinding::plain(format!(
            "'{}' sevkiyatı tamamlanma aşamasında ancak navlun ücreti henüz girilmemiş.",
            shipment.reference_number
        ))]
    } else {
        Vec::new()
    }
}

// Rule 8: departure and arrival port are the same reference. A zero
// port id means the reference was never filled in, which is not this
// rule's problem.
fn check_same_port(
    shipment: &Shipment,
    _now: DateTime<Utc>,
    _thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    if shipment.departure_port_id != 0
        && shipment.departure_port_id == shipment.arrival_port_id
    {
        vec![RuleFinding::plain(format!(
            "'{}' sevkiyatının kalkış ve varış limanı aynı olamaz.",
            shipment.reference_number
        ))]
    } else {
        Vec::new()
    }
}

// Rule 9: document pending approval past the SLA. One finding per
// document, qualified by document id. Unrecognized statuses are
// skipped entirely.
fn check_approval_overdue(
    shipment: &Shipment,
    now: DateTime<Utc>,
    thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    shipment
        .documents
        .iter()
        .filter(|d| d.verification() == Some(VerificationStatus::Pending))
        .filter(|d| now - d.upload_date_utc > thresholds.approval_sla)
        .map(|d| {
            RuleFinding::qualified(
                format!(
                    "'{}' sevkiyatına ait '{}' adlı döküman {} günden uzun süredir onay bekliyor.",
                    shipment.reference_number,
                    d.file_name,
                    thresholds.approval_sla.num_days()
                ),
                d.document_id.to_string(),
            )
        })
        .collect()
}

// Rule 10: document rejected by the reviewer. One finding per document.
fn check_document_rejected(
    shipment: &Shipment,
    _now: DateTime<Utc>,
    _thresholds: &AlertThresholds,
) -> Vec<RuleFinding> {
    shipment
        .documents
        .iter()
        .filter(|d| d.verification() == Some(VerificationStatus::Rejected))
        .map(|d| {
            RuleFinding::qualified(
                format!(
                    "'{}' sevkiyatı için yüklediğiniz '{}' adlı döküman reddedildi. Lütfen notları kontrol edip yenisini yükleyin.",
                    shipment.reference_number, d.file_name
                ),
                d.document_id.to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::DocumentType;
    use crate::domain::{Document, ShipmentTracking};
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn shipment(status: ShipmentStatus) -> Shipment {
        // Defaults chosen so no rule fires: arrival in the future,
        // departure before arrival, distinct ports, cost on file.
        Shipment {
            shipment_id: 1,
            firm_id: 1,
            reference_number: "NG-2025-0042".to_string(),
            status,
            carrier_id: Some(3),
            departure_port_id: 1,
            arrival_port_id: 2,
            estimated_departure_utc: now() - Duration::days(2),
            estimated_arrival_utc: now() + Duration::days(8),
            freight_cost: Some(1500.0),
            incoterms: Some("FOB".to_string()),
            created_at_utc: now() - Duration::days(3),
            created_by_user_id: "u1".to_string(),
            documents: all_required_documents(),
            trackings: vec![tracking(1, now() - Duration::days(1))],
        }
    }

    fn tracking(id: i64, ts: DateTime<Utc>) -> ShipmentTracking {
        ShipmentTracking {
            tracking_id: id,
            shipment_id: 1,
            location: Some("Mersin".to_string()),
            status_description: "Underway".to_string(),
            event_date_utc: ts,
        }
    }

    fn document(id: i64, doc_type: DocumentType, status: &str, uploaded: DateTime<Utc>) -> Document {
        Document {
            document_id: id,
            shipment_id: 1,
            document_type: doc_type,
            file_name: format!("doc-{id}.pdf"),
            upload_date_utc: uploaded,
            verification_status: status.to_string(),
            verification_notes: None,
            uploaded_by_user_id: "u1".to_string(),
        }
    }

    fn all_required_documents() -> Vec<Document> {
        REQUIRED_DOCUMENT_TYPES
            .iter()
            .enumerate()
            .map(|(i, &t)| document(i as i64 + 1, t, "Approved", now() - Duration::days(1)))
            .collect()
    }

    fn types_of(candidates: &[AlertCandidate]) -> Vec<AlertType> {
        candidates.iter().map(|c| c.alert_type).collect()
    }

    #[test]
    fn test_quiet_shipment_produces_no_candidates() {
        let candidates = evaluate_shipment(&shipment(ShipmentStatus::InTransit), now(), &AlertThresholds::default());
        assert!(candidates.is_empty(), "unexpected: {candidates:?}");
    }

    #[test]
    fn test_rule1_arrival_overdue() {
        let mut s = shipment(ShipmentStatus::InTransit);
        s.estimated_arrival_utc = now() - Duration::hours(1);
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert_eq!(types_of(&candidates), vec![AlertType::DelayWarning]);
        assert_eq!(candidates[0].severity, Severity::Warning);
        assert!(candidates[0].message.contains("NG-2025-0042"));
    }

    #[test]
    fn test_rule2_illogical_dates_fires_regardless_of_status() {
        for status in [ShipmentStatus::Draft, ShipmentStatus::AtCustoms] {
            let mut s = shipment(status);
            s.estimated_departure_utc = now() + Duration::days(5);
            s.estimated_arrival_utc = now() + Duration::days(3);
            let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
            assert!(types_of(&candidates).contains(&AlertType::IllogicalDates));
            let c = candidates
                .iter()
                .find(|c| c.alert_type == AlertType::IllogicalDates)
                .unwrap();
            assert_eq!(c.severity, Severity::Error);
        }
    }

    #[test]
    fn test_rule3_one_finding_per_missing_type() {
        let mut s = shipment(ShipmentStatus::InTransit);
        s.documents
            .retain(|d| !matches!(d.document_type, DocumentType::Invoice | DocumentType::PackingList));
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        let missing: Vec<_> = candidates
            .iter()
            .filter(|c| c.alert_type == AlertType::MissingDocument)
            .collect();
        assert_eq!(missing.len(), 2);
        let qualifiers: Vec<_> = missing.iter().filter_map(|c| c.qualifier.as_deref()).collect();
        assert!(qualifiers.contains(&"INVOICE"));
        assert!(qualifiers.contains(&"PACKING_LIST"));
        // Turkish display names in the descriptions.
        assert!(missing.iter().any(|c| c.message.contains("Fatura")));
        assert!(missing.iter().any(|c| c.message.contains("Çeki Listesi")));
    }

    #[test]
    fn test_rule3_ignores_draft_shipments() {
        let mut s = shipment(ShipmentStatus::Draft);
        s.documents.clear();
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(!types_of(&candidates).contains(&AlertType::MissingDocument));
    }

    #[test]
    fn test_rule4_customs_overstay_past_threshold() {
        let mut s = shipment(ShipmentStatus::AtCustoms);
        s.trackings = vec![tracking(1, now() - Duration::days(8))];
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        let c = candidates
            .iter()
            .find(|c| c.alert_type == AlertType::CustomsOverstay)
            .unwrap();
        assert_eq!(c.severity, Severity::Critical);
        assert!(c.message.contains("7 günden"));
    }

    #[test]
    fn test_rule4_needs_a_tracking_event() {
        let mut s = shipment(ShipmentStatus::AtCustoms);
        s.trackings.clear();
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(!types_of(&candidates).contains(&AlertType::CustomsOverstay));
    }

    #[test]
    fn test_rule5_dispatch_overdue_only_before_departure_statuses() {
        let mut s = shipment(ShipmentStatus::ReadyForDispatch);
        s.estimated_departure_utc = now() - Duration::days(1);
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(types_of(&candidates).contains(&AlertType::DispatchDelay));

        let mut s = shipment(ShipmentStatus::InTransit);
        s.estimated_departure_utc = now() - Duration::days(1);
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(!types_of(&candidates).contains(&AlertType::DispatchDelay));
    }

    #[test]
    fn test_rule6_stagnant_uses_latest_tracking() {
        let mut s = shipment(ShipmentStatus::InTransit);
        s.trackings = vec![
            tracking(1, now() - Duration::days(20)),
            tracking(2, now() - Duration::days(6)),
        ];
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(types_of(&candidates).contains(&AlertType::StagnantShipment));

        // Fresh movement clears it.
        s.trackings.push(tracking(3, now() - Duration::days(1)));
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(!types_of(&candidates).contains(&AlertType::StagnantShipment));
    }

    #[test]
    fn test_rule6_falls_back_to_departure_without_tracking() {
        let mut s = shipment(ShipmentStatus::InTransit);
        s.trackings.clear();
        s.estimated_departure_utc = now() - Duration::days(6);
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(types_of(&candidates).contains(&AlertType::StagnantShipment));
    }

    #[test]
    fn test_rule7_missing_financials() {
        let mut s = shipment(ShipmentStatus::AtCustoms);
        s.freight_cost = None;
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(types_of(&candidates).contains(&AlertType::MissingFinancials));

        s.freight_cost = Some(0.0);
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(types_of(&candidates).contains(&AlertType::MissingFinancials));

        s.freight_cost = Some(900.0);
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(!types_of(&candidates).contains(&AlertType::MissingFinancials));
    }

    #[test]
    fn test_rule8_same_port_guards_zero_reference() {
        let mut s = shipment(ShipmentStatus::Draft);
        s.departure_port_id = 7;
        s.arrival_port_id = 7;
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        let c = candidates
            .iter()
            .find(|c| c.alert_type == AlertType::SamePortError)
            .unwrap();
        assert_eq!(c.severity, Severity::Error);

        // Both unfilled: not a same-port error.
        s.departure_port_id = 0;
        s.arrival_port_id = 0;
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(!types_of(&candidates).contains(&AlertType::SamePortError));
    }

    #[test]
    fn test_rule9_approval_sla_boundary() {
        let mut s = shipment(ShipmentStatus::InTransit);
        s.documents = vec![
            document(10, DocumentType::Invoice, "Pending", now() - Duration::days(4)),
            document(11, DocumentType::BillOfLading, "Pending", now() - Duration::days(2)),
            document(12, DocumentType::PackingList, "Approved", now() - Duration::days(10)),
            document(13, DocumentType::InsurancePolicy, "Approved", now() - Duration::days(10)),
        ];
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        let overdue: Vec<_> = candidates
            .iter()
            .filter(|c| c.alert_type == AlertType::DocumentApprovalOverdue)
            .collect();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].qualifier.as_deref(), Some("10"));
    }

    #[test]
    fn test_rule9_accepts_legacy_turkish_status() {
        let mut s = shipment(ShipmentStatus::InTransit);
        s.documents = all_required_documents();
        s.documents[0].verification_status = "Onay Bekliyor".to_string();
        s.documents[0].upload_date_utc = now() - Duration::days(5);
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(types_of(&candidates).contains(&AlertType::DocumentApprovalOverdue));
    }

    #[test]
    fn test_rule10_rejected_document_per_document() {
        let mut s = shipment(ShipmentStatus::InTransit);
        s.documents[0].verification_status = "Rejected".to_string();
        s.documents[1].verification_status = "Reddedildi".to_string();
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        let rejected: Vec<_> = candidates
            .iter()
            .filter(|c| c.alert_type == AlertType::DocumentRejected)
            .collect();
        assert_eq!(rejected.len(), 2);
        assert_ne!(rejected[0].qualifier, rejected[1].qualifier);
    }

    #[test]
    fn test_unknown_verification_status_triggers_neither_document_rule() {
        let mut s = shipment(ShipmentStatus::InTransit);
        s.documents[0].verification_status = "Taslak".to_string();
        s.documents[0].upload_date_utc = now() - Duration::days(30);
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        assert!(!types_of(&candidates).contains(&AlertType::DocumentApprovalOverdue));
        assert!(!types_of(&candidates).contains(&AlertType::DocumentRejected));
    }

    #[test]
    fn test_thresholds_are_parameters_not_constants() {
        let mut thresholds = AlertThresholds::default();
        thresholds.approval_sla = Duration::days(1);
        let mut s = shipment(ShipmentStatus::InTransit);
        s.documents[0].verification_status = "Pending".to_string();
        s.documents[0].upload_date_utc = now() - Duration::days(2);
        let candidates = evaluate_shipment(&s, now(), &thresholds);
        let c = candidates
            .iter()
            .find(|c| c.alert_type == AlertType::DocumentApprovalOverdue)
            .unwrap();
        assert!(c.message.contains("1 günden"));
    }

    #[test]
    fn test_multiple_rules_fire_simultaneously() {
        let mut s = shipment(ShipmentStatus::AtCustoms);
        s.estimated_arrival_utc = now() - Duration::days(1);
        s.freight_cost = None;
        s.trackings = vec![tracking(1, now() - Duration::days(9))];
        let candidates = evaluate_shipment(&s, now(), &AlertThresholds::default());
        let types = types_of(&candidates);
        assert!(types.contains(&AlertType::DelayWarning));
        assert!(types.contains(&AlertType::CustomsOverstay));
        assert!(types.contains(&AlertType::MissingFinancials));
    }
}
