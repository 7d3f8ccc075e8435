// ==========================================
// NaviGate Alert Engine - Domain Layer
// ==========================================

pub mod alert;
pub mod shipment;
pub mod types;

pub use alert::{Alert, AlertCandidate};
pub use shipment::{Document, Shipment, ShipmentTracking};
pub use types::{
    AlertType, DocumentType, Severity, ShipmentStatus, VerificationStatus,
    REQUIRED_DOCUMENT_TYPES,
};
