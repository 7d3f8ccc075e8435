// ==========================================
// NaviGate Alert Engine - Alert Entities
// ==========================================
// Alerts are derived records: created only by the evaluator, resolved
// or deleted only by UI actions outside this engine.
// ==========================================

use crate::domain::types::{AlertType, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Alert (persisted)
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    /// Database id; 0 until inserted.
    pub alert_id: i64,
    pub shipment_id: i64,
    /// Wire-visible category label, see AlertType::label().
    pub alert_type: String,
    pub description: String,
    /// Wire-visible severity label, see Severity::label().
    pub severity: String,
    pub is_resolved: bool,
    pub created_at_utc: DateTime<Utc>,
}

impl Alert {
    pub fn from_candidate(candidate: AlertCandidate, created_at: DateTime<Utc>) -> Self {
        Self {
            alert_id: 0,
            shipment_id: candidate.shipment_id,
            alert_type: candidate.alert_type.label().to_string(),
            description: candidate.message,
            severity: candidate.severity.label().to_string(),
            is_resolved: false,
            created_at_utc: created_at,
        }
    }
}

// ==========================================
// Alert Candidate (evaluator-internal)
// ==========================================
// Output of one rule finding, before the de-duplication gate. The
// qualifier keeps same-category findings distinct within one pass
// (missing document type, or document id for per-document rules).
#[derive(Debug, Clone)]
pub struct AlertCandidate {
    pub shipment_id: i64,
    pub alert_type: AlertType,
    pub severity: Severity,
    pub message: String,
    pub qualifier: Option<String>,
}
