// ==========================================
// NaviGate Alert Engine - Clock Source
// ==========================================
// "now" is captured once per pass and passed through the rules, so
// tests can pin time without touching the rules themselves.
// ==========================================

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock, used by the daemon.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Pinned clock for tests.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
