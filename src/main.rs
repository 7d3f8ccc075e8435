// ==========================================
// NaviGate Alert Engine - Daemon Entry Point
// ==========================================
// Opens the SQLite database, loads the thresholds, and drives the
// scheduler until Ctrl-C. The engine is an internal periodic job; the
// web application reads the alerts it writes.
// ==========================================

use navigate_alerts::engine::{AlertEvaluator, AlertScheduler, SystemClock};
use navigate_alerts::{logging, AlertConfigManager, AlertRepository, ShipmentRepository};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{error, info};

/// Database location: env override first, then the user data dir,
/// falling back to the working directory.
fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("NAVIGATE_ALERTS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./navigate.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("navigate-alerts");
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("navigate.db");
    }
    path.to_string_lossy().to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    info!("==================================================");
    info!("{}", navigate_alerts::APP_NAME);
    info!("version: {}", navigate_alerts::VERSION);
    info!("==================================================");

    let db_path = get_default_db_path();
    info!("using database: {}", db_path);

    let conn = navigate_alerts::db::open_sqlite_connection(&db_path)?;
    navigate_alerts::db::init_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    let config = AlertConfigManager::new(conn.clone());
    let thresholds = config.load_thresholds()?;
    info!("thresholds: {}", thresholds.snapshot_json());

    let scan_interval = thresholds
        .scan_interval
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(
            navigate_alerts::config::alert_config::DEFAULT_SCAN_INTERVAL_MINUTES as u64 * 60,
        ));

    let evaluator = Arc::new(AlertEvaluator::new(
        Arc::new(ShipmentRepository::new(conn.clone())),
        Arc::new(AlertRepository::new(conn)),
        thresholds,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = AlertScheduler::new(
        evaluator,
        Arc::new(SystemClock),
        scan_interval,
        shutdown_rx,
    );
    let scheduler_task = tokio::spawn(scheduler.run());

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    if shutdown_tx.send(true).is_err() {
        error!("scheduler already gone");
    }

    scheduler_task.await?;
    info!("daemon exited");
    Ok(())
}
