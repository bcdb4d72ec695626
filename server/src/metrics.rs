//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::game::types::Outcome;

/// HTTP request metrics, served at `/metrics`.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("api")
        .endpoint("/metrics")
        .build()
        .expect("metrics builder")
});

/// Game counters, served at `/api/metrics`.
pub static GAME_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

pub static RESOLUTIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    let c = IntCounterVec::new(
        Opts::new("game_resolutions_total", "Challenges resolved, by outcome"),
        &["outcome"],
    )
    .expect("resolutions counter");
    GAME_REGISTRY
        .register(Box::new(c.clone()))
        .expect("register resolutions counter");
    c
});

pub static SCHEDULER_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    let c = IntCounterVec::new(
        Opts::new("game_scheduler_failures_total", "Failed scheduled work items"),
        &["task"],
    )
    .expect("scheduler failure counter");
    GAME_REGISTRY
        .register(Box::new(c.clone()))
        .expect("register scheduler failure counter");
    c
});

pub static HOURLY_POINTS: Lazy<IntCounter> = Lazy::new(|| {
    let c = IntCounter::new("game_hourly_points_total", "Points credited by hourly sweeps")
        .expect("hourly points counter");
    GAME_REGISTRY
        .register(Box::new(c.clone()))
        .expect("register hourly points counter");
    c
});

pub fn record_resolution(outcome: Outcome) {
    let label = match outcome {
        Outcome::Approved => "approved",
        Outcome::Rejected => "rejected",
    };
    RESOLUTIONS.with_label_values(&[label]).inc();
}

pub fn record_failure(task: &str, n: usize) {
    SCHEDULER_FAILURES
        .with_label_values(&[task])
        .inc_by(n as u64);
}

/// Render the game registry in the Prometheus text format.
pub fn render() -> anyhow::Result<String> {
    // Touch the lazies so every series is registered before the first scrape.
    Lazy::force(&RESOLUTIONS);
    Lazy::force(&SCHEDULER_FAILURES);
    Lazy::force(&HOURLY_POINTS);

    let mut buf = Vec::new();
    TextEncoder::new().encode(&GAME_REGISTRY.gather(), &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
