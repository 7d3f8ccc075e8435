// ==========================================
// NaviGate Alert Engine - Scheduler Loop
// ==========================================
// A long-lived tokio task: run one pass, sleep, repeat, until shutdown.
// The pass runs on a blocking thread and its join handle is always
// awaited, never raced, so an in-flight pass finishes before exit.
// Only the sleep is cancellable. Nothing propagates out of run():
// pass errors and join panics are logged and the loop continues.
// ==========================================

use crate::engine::clock::Clock;
use crate::engine::evaluator::AlertEvaluator;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info};

pub struct AlertScheduler {
    evaluator: Arc<AlertEvaluator>,
    clock: Arc<dyn Clock>,
    interval: Duration,
    shutdown: watch::Receiver<bool>,
}

impl AlertScheduler {
    pub fn new(
        evaluator: Arc<AlertEvaluator>,
        clock: Arc<dyn Clock>,
        interval: Duration,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            evaluator,
            clock,
            interval,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        info!(interval_secs = self.interval.as_secs(), "alert scheduler started");

        loop {
            if *self.shutdown.borrow() {
                break;
            }

            let evaluator = self.evaluator.clone();
            let now = self.clock.now_utc();
            let pass = tokio::task::spawn_blocking(move || evaluator.run_pass(now));
            match pass.await {
                Ok(Ok(summary)) => {
                    info!(
                        scan_id = %summary.scan_id,
                        created = summary.alerts_created,
                        "scan pass completed"
                    );
                }
                Ok(Err(e)) => {
                    // Retried on the next cycle.
                    error!("scan pass failed: {e}");
                }
                Err(e) => {
                    error!("scan pass panicked: {e}");
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                res = self.shutdown.changed() => {
                    // A dropped sender means nobody can ever request a
                    // stop; treat the closed channel as one so the loop
                    // cannot spin through the sleep arm.
                    if res.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("alert scheduler stopped");
    }
}
