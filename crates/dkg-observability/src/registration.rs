use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_registration_batch(
    blockchain_id: &str,
    status: &str,
    batch_size: usize,
    duration: Duration,
) {
    counter!(
        "dkg_publisher_registration_total",
        "blockchain_id" => blockchain_id.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "dkg_publisher_registration_duration_seconds",
        "blockchain_id" => blockchain_id.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
    histogram!(
        "dkg_publisher_registration_batch_size",
        "blockchain_id" => blockchain_id.to_string(),
        "status" => status.to_string()
    )
    .record(batch_size as f64);
}

pub fn record_finality_status(blockchain_id: &str, status: &str) {
    counter!(
        "dkg_publisher_finality_total",
        "blockchain_id" => blockchain_id.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
