use uuid::Uuid;

use crate::{NodeClientError, OperationResult, PollPolicy, StorageNetwork};

#[derive(Debug)]
pub struct PollOutcome {
    pub result: OperationResult,
    pub attempts: u32,
}

/// Polls a publish operation until it is `COMPLETED` or `FAILED`.
///
/// Sleeps `frequency` before every read, so the whole wait is bounded by
/// [`PollPolicy::budget`]. Running out of attempts is an
/// [`NodeClientError::OperationTimeout`].
pub async fn poll_until_terminal(
    network: &dyn StorageNetwork,
    operation_id: Uuid,
    policy: PollPolicy,
) -> Result<PollOutcome, NodeClientError> {
    for attempt in 1..=policy.max_attempts {
        tokio::time::sleep(policy.frequency).await;

        let result = network.publish_result(operation_id).await?;
        if result.status.is_terminal() {
            tracing::debug!(
                %operation_id,
                attempt,
                status = ?result.status,
                "Publish operation reached a terminal status"
            );
            return Ok(PollOutcome {
                result,
                attempts: attempt,
            });
        }

        tracing::trace!(%operation_id, attempt, "Publish operation still pending");
    }

    Err(NodeClientError::OperationTimeout {
        operation_id,
        attempts: policy.max_attempts,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalityStatus {
    Finalized(u64),
    /// Highest count observed before giving up.
    NotFinalized(u64),
}

/// Polls the node until `required` nodes report the asset as finalized.
/// Lookup errors count as an unsuccessful attempt.
pub async fn poll_finality(
    network: &dyn StorageNetwork,
    ual: &str,
    required: u64,
    policy: PollPolicy,
) -> FinalityStatus {
    let mut highest = 0;

    for attempt in 1..=policy.max_attempts {
        match network.finality(ual).await {
            Ok(count) if count >= required => return FinalityStatus::Finalized(count),
            Ok(count) => highest = highest.max(count),
            Err(e) => tracing::debug!(ual, attempt, error = %e, "Finality lookup failed"),
        }
        if attempt < policy.max_attempts {
            tokio::time::sleep(policy.frequency).await;
        }
    }

    FinalityStatus::NotFinalized(highest)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::{
        collections::VecDeque,
        sync::Mutex,
        time::Duration,
    };

    use async_trait::async_trait;

    use super::*;
    use crate::{OperationStatus, PublishRequest};

    struct Scripted {
        statuses: Mutex<VecDeque<&'static str>>,
        finality: Mutex<VecDeque<u64>>,
        reads: Mutex<u32>,
    }

    impl Scripted {
        fn new(statuses: &[&'static str], finality: &[u64]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                finality: Mutex::new(finality.iter().copied().collect()),
                reads: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl StorageNetwork for Scripted {
        async fn submit_publish(&self, _: &PublishRequest) -> Result<Uuid, NodeClientError> {
            Ok(Uuid::nil())
        }

        async fn publish_result(&self, _: Uuid) -> Result<OperationResult, NodeClientError> {
            *self.reads.lock().unwrap() += 1;
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or("PENDING");
            Ok(serde_json::from_value(serde_json::json!({"status": status})).unwrap())
        }

        async fn finality(&self, _: &str) -> Result<u64, NodeClientError> {
            Ok(self.finality.lock().unwrap().pop_front().unwrap_or(0))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_first_terminal_status() {
        let network = Scripted::new(&["PENDING", "IN_PROGRESS", "COMPLETED"], &[]);
        let started = tokio::time::Instant::now();

        let outcome = poll_until_terminal(
            &network,
            Uuid::nil(),
            PollPolicy::new(10, Duration::from_secs(2)),
        )
        .await
        .unwrap();

        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.result.status, OperationStatus::Completed);
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_after_max_attempts() {
        let network = Scripted::new(&[], &[]);

        let result = poll_until_terminal(
            &network,
            Uuid::nil(),
            PollPolicy::new(5, Duration::from_millis(100)),
        )
        .await;

        assert!(matches!(
            result,
            Err(NodeClientError::OperationTimeout { attempts: 5, .. })
        ));
        assert_eq!(*network.reads.lock().unwrap(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn finality_reports_highest_count_when_not_reached() {
        let network = Scripted::new(&[], &[1, 2, 1]);
        let started = tokio::time::Instant::now();
        let status = poll_finality(&network, "did:dkg:x/0x1/1", 3, PollPolicy::new(3, Duration::from_secs(1))).await;
        assert_eq!(status, FinalityStatus::NotFinalized(2));
        // No sleep after the last attempt.
        assert_eq!(started.elapsed(), Duration::from_secs(2));

        let network = Scripted::new(&[], &[1, 3]);
        let status = poll_finality(&network, "did:dkg:x/0x1/1", 3, PollPolicy::new(5, Duration::from_secs(1))).await;
        assert_eq!(status, FinalityStatus::Finalized(3));
    }
}
