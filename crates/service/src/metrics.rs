use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static SIGNUPS_ACCEPTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "waitlist_signups_accepted_total",
        "Signups accepted into the waitlist"
    )
    .expect("register signups_accepted_total")
});

pub static SIGNUPS_DUPLICATE_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "waitlist_signups_duplicate_total",
        "Signups rejected because the email was already registered"
    )
    .expect("register signups_duplicate_total")
});

pub static SIGNUPS_INVALID_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "waitlist_signups_invalid_total",
        "Signups rejected by request validation"
    )
    .expect("register signups_invalid_total")
});

pub static SNAPSHOT_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "waitlist_snapshot_failures_total",
        "Snapshot writes that failed"
    )
    .expect("register snapshot_failures_total")
});

/// Touch every counter so they show up in the exposition before their first increment.
pub fn register_all() {
    Lazy::force(&SIGNUPS_ACCEPTED_TOTAL);
    Lazy::force(&SIGNUPS_DUPLICATE_TOTAL);
    Lazy::force(&SIGNUPS_INVALID_TOTAL);
    Lazy::force(&SNAPSHOT_FAILURES_TOTAL);
}

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
