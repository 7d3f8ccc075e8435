// ==========================================
// NaviGate Alert Engine - Domain Type Definitions
// ==========================================
// Closed enumerations for the values the legacy system kept as
// free-form strings. Alert categories and severities keep their
// original wire-visible labels; everything else stores
// SCREAMING_SNAKE_CASE identifiers.
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// Shipment Status
// ==========================================
// "Active" = neither Completed nor Cancelled. Transitions are not
// validated here; the engine only reads the current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    Draft,
    ReadyForDispatch,
    InTransit,
    AtCustoms,
    Completed,
    Cancelled,
}

impl ShipmentStatus {
    /// A shipment still in motion from the alert engine's point of view.
    pub fn is_active(&self) -> bool {
        !matches!(self, ShipmentStatus::Completed | ShipmentStatus::Cancelled)
    }

    pub fn from_db_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "DRAFT" => ShipmentStatus::Draft,
            "READY_FOR_DISPATCH" => ShipmentStatus::ReadyForDispatch,
            "IN_TRANSIT" => ShipmentStatus::InTransit,
            "AT_CUSTOMS" => ShipmentStatus::AtCustoms,
            "COMPLETED" => ShipmentStatus::Completed,
            "CANCELLED" => ShipmentStatus::Cancelled,
            _ => ShipmentStatus::Draft,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            ShipmentStatus::Draft => "DRAFT",
            ShipmentStatus::ReadyForDispatch => "READY_FOR_DISPATCH",
            ShipmentStatus::InTransit => "IN_TRANSIT",
            ShipmentStatus::AtCustoms => "AT_CUSTOMS",
            ShipmentStatus::Completed => "COMPLETED",
            ShipmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ShipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Document Type
// ==========================================
// The first four types are mandatory once a shipment is in transit or
// at customs (missing-document rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Invoice,
    BillOfLading,
    PackingList,
    InsurancePolicy,
    Other,
}

/// Document types that must be on file once a shipment leaves the yard.
pub const REQUIRED_DOCUMENT_TYPES: [DocumentType; 4] = [
    DocumentType::BillOfLading,
    DocumentType::Invoice,
    DocumentType::PackingList,
    DocumentType::InsurancePolicy,
];

impl DocumentType {
    pub fn from_db_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "INVOICE" => DocumentType::Invoice,
            "BILL_OF_LADING" => DocumentType::BillOfLading,
            "PACKING_LIST" => DocumentType::PackingList,
            "INSURANCE_POLICY" => DocumentType::InsurancePolicy,
            _ => DocumentType::Other,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "INVOICE",
            DocumentType::BillOfLading => "BILL_OF_LADING",
            DocumentType::PackingList => "PACKING_LIST",
            DocumentType::InsurancePolicy => "INSURANCE_POLICY",
            DocumentType::Other => "OTHER",
        }
    }

    /// User-facing name as shown by the operations UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Fatura",
            DocumentType::BillOfLading => "Konşimento",
            DocumentType::PackingList => "Çeki Listesi",
            DocumentType::InsurancePolicy => "Sigorta Poliçesi",
            DocumentType::Other => "Diğer",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Document Verification Status
// ==========================================
// Canonical form is the English identifier. Legacy rows carry Turkish
// spellings ("Onay Bekliyor", "Reddedildi"); parsing normalizes them.
// Unrecognized values parse to None and trigger no document rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim() {
            "Pending" | "Onay Bekliyor" => Some(VerificationStatus::Pending),
            "Approved" | "Onaylandı" => Some(VerificationStatus::Approved),
            "Rejected" | "Reddedildi" => Some(VerificationStatus::Rejected),
            _ => None,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            VerificationStatus::Pending => "Pending",
            VerificationStatus::Approved => "Approved",
            VerificationStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// Alert Type
// ==========================================
// One category per rule. label() is the wire-visible category string
// the legacy system persisted and the UI still filters on; the
// de-duplication gate matches on it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    DelayWarning,
    IllogicalDates,
    MissingDocument,
    CustomsOverstay,
    DispatchDelay,
    StagnantShipment,
    MissingFinancials,
    SamePortError,
    DocumentApprovalOverdue,
    DocumentRejected,
}

impl AlertType {
    pub fn label(&self) -> &'static str {
        match self {
            AlertType::DelayWarning => "Gecikme Uyarısı",
            AlertType::IllogicalDates => "Mantıksız Tarih",
            AlertType::MissingDocument => "Eksik Döküman",
            AlertType::CustomsOverstay => "Gümrükte Fazla Bekleme",
            AlertType::DispatchDelay => "Kalkış Gecikmesi",
            AlertType::StagnantShipment => "Hareketsiz Sevkiyat",
            AlertType::MissingFinancials => "Eksik Finansal Bilgi",
            AlertType::SamePortError => "Aynı Liman Hatası",
            AlertType::DocumentApprovalOverdue => "Gecikmiş Döküman Onayı",
            AlertType::DocumentRejected => "Reddedilmiş Döküman",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Gecikme Uyarısı" => Some(AlertType::DelayWarning),
            "Mantıksız Tarih" => Some(AlertType::IllogicalDates),
            "Eksik Döküman" => Some(AlertType::MissingDocument),
            "Gümrükte Fazla Bekleme" => Some(AlertType::CustomsOverstay),
            "Kalkış Gecikmesi" => Some(AlertType::DispatchDelay),
            "Hareketsiz Sevkiyat" => Some(AlertType::StagnantShipment),
            "Eksik Finansal Bilgi" => Some(AlertType::MissingFinancials),
            "Aynı Liman Hatası" => Some(AlertType::SamePortError),
            "Gecikmiş Döküman Onayı" => Some(AlertType::DocumentApprovalOverdue),
            "Reddedilmiş Döküman" => Some(AlertType::DocumentRejected),
            _ => None,
        }
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// Alert Severity
// ==========================================
// Order: Warning < Error < Important < Critical (legacy ranking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Warning,
    Error,
    Important,
    Critical,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "Uyarı",
            Severity::Error => "Hata",
            Severity::Important => "Önemli",
            Severity::Critical => "Kritik",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Uyarı" => Some(Severity::Warning),
            "Hata" => Some(Severity::Error),
            "Önemli" => Some(Severity::Important),
            "Kritik" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
