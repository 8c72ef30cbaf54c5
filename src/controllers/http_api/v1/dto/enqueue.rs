use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnqueueResponse {
    /// Items added by this request.
    pub queued: usize,
    /// Stage A depth right after the append.
    pub stage_a: usize,
    pub accepted_at: DateTime<Utc>,
}

impl EnqueueResponse {
    pub(crate) fn new(queued: usize, stage_a: usize) -> Self {
        Self {
            queued,
            stage_a,
            accepted_at: Utc::now(),
        }
    }
}
