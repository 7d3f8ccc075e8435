// ==========================================
// NaviGate Alert Engine - Core Library
// ==========================================
// Rule-based alert generation for a freight-forwarding management
// system: a scheduler scans active shipments on a fixed cadence, a
// flat rule table derives operational warnings, and a de-duplication
// gate keeps at most one unresolved alert per (shipment, category).
// Stack: Tokio + Rust + SQLite.
// ==========================================

// ==========================================
// Module declarations
// ==========================================

// Domain layer - entities and types
pub mod domain;

// Repository layer - data access
pub mod repository;

// Engine layer - rules, evaluation pass, scheduler
pub mod engine;

// Configuration layer - tunable thresholds
pub mod config;

// Database infrastructure (connection init / unified PRAGMAs)
pub mod db;

// Logging
pub mod logging;

// ==========================================
// Re-exports
// ==========================================

// Domain types
pub use domain::types::{AlertType, DocumentType, Severity, ShipmentStatus, VerificationStatus};

// Domain entities
pub use domain::{Alert, AlertCandidate, Document, Shipment, ShipmentTracking};

// Engine
pub use engine::{AlertEvaluator, AlertScheduler, Clock, FixedClock, PassSummary, SystemClock};

// Configuration
pub use config::{AlertConfigManager, AlertThresholds};

// Repositories
pub use repository::{AlertRepository, RepositoryError, RepositoryResult, ShipmentRepository};

// ==========================================
// Constants
// ==========================================

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const APP_NAME: &str = "NaviGate Alert Engine";
