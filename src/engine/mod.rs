// ==========================================
// NaviGate Alert Engine - Engine Layer
// ==========================================

pub mod clock;
pub mod evaluator;
pub mod rules;
pub mod scheduler;

pub use clock::{Clock, FixedClock, SystemClock};
pub use evaluator::{AlertEvaluator, DedupGate, PassSummary};
pub use rules::{evaluate_shipment, AlertRule, RuleFinding, ALERT_RULES};
pub use scheduler::AlertScheduler;
