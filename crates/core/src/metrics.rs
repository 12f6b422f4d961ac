//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Receiver (updates seen, tasks published)
//! - Downloader (task outcomes, uploaded bytes)
//! - User notifications and batch failures

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Receiver Metrics
// =============================================================================

/// Updates handled by the receiver, by kind.
pub static UPDATES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vidrelay_updates_total", "Total chat updates handled"),
        &["kind"], // "video", "rejected", "ignored"
    )
    .unwrap()
});

/// Download tasks published to the downstream queue.
pub static TASKS_PUBLISHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "vidrelay_tasks_published_total",
        "Total download tasks published",
    )
    .unwrap()
});

// =============================================================================
// Downloader Metrics
// =============================================================================

/// Download tasks handled by the downloader, by result.
pub static DOWNLOAD_TASKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vidrelay_download_tasks_total", "Total download tasks handled"),
        &["result"], // "delivered", "skipped", "metadata_unavailable", "download_failed", "error"
    )
    .unwrap()
});

/// Bytes written to object storage.
pub static UPLOADED_BYTES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "vidrelay_uploaded_bytes_total",
        "Total bytes uploaded to object storage",
    )
    .unwrap()
});

// =============================================================================
// Shared Metrics
// =============================================================================

/// Chat notifications sent, by kind.
pub static NOTIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vidrelay_notifications_total", "Total chat notifications sent"),
        &["kind"],
    )
    .unwrap()
});

/// Batches aborted or messages failed, by handler.
pub static BATCH_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "vidrelay_batch_failures_total",
            "Total handler failures (receiver: aborted batches, downloader: failed messages)",
        ),
        &["handler"],
    )
    .unwrap()
});

/// Handler invocation duration in seconds.
pub static HANDLER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "vidrelay_handler_duration_seconds",
            "Duration of handler invocations",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["handler"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Receiver
        Box::new(UPDATES_TOTAL.clone()),
        Box::new(TASKS_PUBLISHED.clone()),
        // Downloader
        Box::new(DOWNLOAD_TASKS_TOTAL.clone()),
        Box::new(UPLOADED_BYTES.clone()),
        // Shared
        Box::new(NOTIFICATIONS_TOTAL.clone()),
        Box::new(BATCH_FAILURES.clone()),
        Box::new(HANDLER_DURATION.clone()),
    ]
}
