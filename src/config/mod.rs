// ==========================================
// NaviGate Alert Engine - Configuration Layer
// ==========================================

pub mod alert_config;

pub use alert_config::{AlertConfigManager, AlertThresholds};
