//! Prometheus metrics for the moderation flow
//!
//! - Submissions received and currently pending
//! - Decisions by outcome
//! - Watermark timing and failures by kind
//! - Transport failures by operation

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_gauge, register_histogram, Counter, CounterVec, Gauge,
    Histogram,
};

/// Photos received from submitters
pub static SUBMISSIONS_TOTAL: Lazy<Counter> = Lazy::new(|| {
    register_counter!("shutter_submissions_total", "Total number of photos submitted for review").unwrap()
});

/// Submissions waiting for a decision
pub static PENDING_SUBMISSIONS: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!("shutter_pending_submissions", "Submissions currently awaiting a decision").unwrap()
});

/// Processed decisions
/// Labels: outcome (posted/posted_unwatermarked/rejected/unknown_token/fetch_failed/post_failed/malformed)
pub static DECISIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "shutter_decisions_total",
        "Total number of moderator decisions by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Watermark failures that fell back to the original
/// Labels: kind (decode/font/encode/task)
pub static WATERMARK_FAILURES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "shutter_watermark_failures_total",
        "Total number of failed watermark attempts by kind",
        &["kind"]
    )
    .unwrap()
});

/// Time spent stamping a photo
pub static WATERMARK_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "shutter_watermark_duration_seconds",
        "Time spent decoding, stamping and re-encoding a photo",
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .unwrap()
});

/// Failed Bot API calls
/// Labels: operation (present/acknowledge/edit/post/fetch)
pub static TRANSPORT_ERRORS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "shutter_transport_errors_total",
        "Total number of failed transport calls by operation",
        &["operation"]
    )
    .unwrap()
});

/// Registers every metric so they show up in /metrics with zero values.
pub fn init_metrics() {
    log::info!("Initializing metrics registry...");

    Lazy::force(&SUBMISSIONS_TOTAL);
    Lazy::force(&PENDING_SUBMISSIONS);
    Lazy::force(&WATERMARK_DURATION_SECONDS);

    for outcome in [
        "posted",
        "posted_unwatermarked",
        "rejected",
        "unknown_token",
        "fetch_failed",
        "post_failed",
        "malformed",
    ] {
        DECISIONS_TOTAL.with_label_values(&[outcome]);
    }
    for kind in ["decode", "font", "encode", "task"] {
        WATERMARK_FAILURES_TOTAL.with_label_values(&[kind]);
    }
    for operation in ["present", "acknowledge", "edit", "post", "fetch"] {
        TRANSPORT_ERRORS_TOTAL.with_label_values(&[operation]);
    }

    log::info!("Metrics registry initialized");
}

/// Counts a failed transport call
pub fn record_transport_error(operation: &str) {
    TRANSPORT_ERRORS_TOTAL.with_label_values(&[operation]).inc();
}
