use std::time::Duration;

use metrics::{counter, histogram};

pub fn record_blockchain_rpc_retry(blockchain_id: &str, operation: &str) {
    counter!(
        "dkg_publisher_blockchain_rpc_retries_total",
        "blockchain_id" => blockchain_id.to_string(),
        "operation" => operation.to_string()
    )
    .increment(1);
}

pub fn record_blockchain_tx_stage(
    blockchain_id: &str,
    operation: &str,
    stage: &str,
    status: &str,
    duration: Duration,
) {
    counter!(
        "dkg_publisher_blockchain_tx_stage_total",
        "blockchain_id" => blockchain_id.to_string(),
        "operation" => operation.to_string(),
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "dkg_publisher_blockchain_tx_stage_duration_seconds",
        "blockchain_id" => blockchain_id.to_string(),
        "operation" => operation.to_string(),
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .record(duration.as_secs_f64());
}
