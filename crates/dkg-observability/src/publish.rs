use std::time::Duration;

use metrics::{counter, histogram};

/// Outcome of one node publish: `completed`, `no_result` or `error`.
pub fn record_publish_operation(blockchain_id: &str, status: &str, duration: Duration) {
    counter!(
        "dkg_publisher_publish_total",
        "blockchain_id" => blockchain_id.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "dkg_publisher_publish_duration_seconds",
        "blockchain_id" => blockchain_id.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}

pub fn record_publish_poll_attempts(attempts: u32) {
    histogram!("dkg_publisher_publish_poll_attempts").record(attempts as f64);
}

pub fn record_signature_filter(blockchain_id: &str, accepted: usize, rejected: usize) {
    counter!(
        "dkg_publisher_signatures_total",
        "blockchain_id" => blockchain_id.to_string(),
        "status" => "accepted"
    )
    .increment(accepted as u64);
    counter!(
        "dkg_publisher_signatures_total",
        "blockchain_id" => blockchain_id.to_string(),
        "status" => "rejected"
    )
    .increment(rejected as u64);
}

pub fn record_dataset_size(bytes: u64) {
    histogram!("dkg_publisher_dataset_size_bytes").record(bytes as f64);
}
