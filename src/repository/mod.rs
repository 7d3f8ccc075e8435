// ==========================================
// NaviGate Alert Engine - Repository Layer
// ==========================================

pub mod alert_repo;
pub mod error;
pub mod shipment_repo;

pub use alert_repo::AlertRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use shipment_repo::ShipmentRepository;

use chrono::{DateTime, NaiveDateTime, Utc};

/// Best-effort parse of a stored UTC timestamp.
///
/// Accepts RFC 3339 plus the space-separated forms SQLite's own
/// datetime() emits. Naive values are taken as UTC.
pub(crate) fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    None
}

/// Parse a stored timestamp, substituting the current time when the
/// value is unreadable. The substitution is logged with the owning row
/// so a corrupt record shows up in the scan logs instead of silently
/// shifting rule outcomes.
pub(crate) fn parse_utc_or_now(
    raw: &str,
    table: &'static str,
    row_id: i64,
    column: &'static str,
) -> DateTime<Utc> {
    match parse_utc(raw) {
        Some(dt) => dt,
        None => {
            tracing::warn!(
                table,
                row_id,
                column,
                raw,
                "unparseable stored timestamp, substituting current time"
            );
            Utc::now()
        }
    }
}
