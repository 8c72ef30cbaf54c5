use metrics::{counter, gauge};

pub fn record_queue_depth(stage: &str, depth: usize) {
    gauge!(
        "dkg_publisher_queue_depth",
        "stage" => stage.to_string()
    )
    .set(depth as f64);
}

pub fn record_queue_enqueued(source: &str, count: usize) {
    counter!(
        "dkg_publisher_queue_enqueued_total",
        "source" => source.to_string()
    )
    .increment(count as u64);
}

/// Items removed from a stage without reaching the next one.
pub fn record_queue_dropped(stage: &str, reason: &str, count: usize) {
    counter!(
        "dkg_publisher_queue_dropped_total",
        "stage" => stage.to_string(),
        "reason" => reason.to_string()
    )
    .increment(count as u64);
}
