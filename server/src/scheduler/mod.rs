//! Background sweeps: expired-vote resolution and hourly scoring.
//!
//! Both sweeps are no-ops when nothing is due, so the cadences only trade
//! latency for store load. A failed tick is logged and the loop carries on.

use std::{sync::Arc, time::Duration};

use tokio::time::{interval, MissedTickBehavior};

use crate::game::Engine;

/// One expiry tick.
pub async fn expiry_tick(engine: &Engine) {
    match engine.process_expired_votes().await {
        Ok(sweep) if !sweep.resolved.is_empty() || !sweep.failed.is_empty() => {
            log::info!(
                "expired votes: {} resolved, {} failed",
                sweep.resolved.len(),
                sweep.failed.len()
            );
        }
        Ok(_) => {}
        Err(e) => log::error!("expired-vote sweep failed: {e}"),
    }
}

/// One scoring tick.
pub async fn scoring_tick(engine: &Engine) {
    match engine.apply_hourly_points().await {
        Ok(report) if !report.gains.is_empty() => {
            log::info!(
                "hourly points applied to {} players ({} region bonuses)",
                report.gains.len(),
                report.bonuses.len()
            );
        }
        Ok(_) => {}
        Err(e) => log::error!("hourly scoring sweep failed: {e}"),
    }
}

pub async fn run(engine: Arc<Engine>, expiry_every: Duration, scoring_every: Duration) {
    let mut expiry = interval(expiry_every);
    let mut scoring = interval(scoring_every);
    expiry.set_missed_tick_behavior(MissedTickBehavior::Delay);
    scoring.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick of an interval fires immediately; don't pay a full hour at boot.
    scoring.tick().await;

    loop {
        tokio::select! {
            _ = expiry.tick() => expiry_tick(&engine).await,
            _ = scoring.tick() => scoring_tick(&engine).await,
        }
    }
}

/// Spawn the scheduler loop as a Tokio task.
pub fn start(engine: Arc<Engine>, expiry_every: Duration, scoring_every: Duration) {
    tokio::spawn(run(engine, expiry_every, scoring_every));
}
