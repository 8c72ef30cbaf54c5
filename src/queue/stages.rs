use std::sync::Arc;

use async_trait::async_trait;
use dkg_dataset::Content;
use dkg_domain::PublishResult;
use dkg_observability::record_queue_dropped;

use super::{
    RegistrationFailurePolicy,
    state::{LEDGER_REGISTRATION_STAGE, NODE_PUBLISH_STAGE, QueueState},
};
use crate::{error::PipelineError, services::RegistrationOutcome};

/// Turns one queued content item into a publish result.
#[async_trait]
pub(crate) trait AssetPublisher: Send + Sync {
    async fn publish_content(
        &self,
        content: Content,
    ) -> Result<Option<PublishResult>, PipelineError>;
}

/// Commits a whole stage B batch to the ledger.
#[async_trait]
pub(crate) trait BatchRegistrar: Send + Sync {
    async fn register_batch(
        &self,
        batch: Vec<Option<PublishResult>>,
    ) -> Result<Option<RegistrationOutcome>, PipelineError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickOutcome {
    Processed(TickSummary),
    /// The previous cycle of this stage was still running.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TickSummary {
    /// Items taken from the stage's list.
    pub items: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Stage A: drains raw content one item at a time and forwards publish results.
pub(crate) struct NodePublishStage {
    state: Arc<QueueState>,
    publisher: Arc<dyn AssetPublisher>,
}

impl NodePublishStage {
    pub(crate) fn new(state: Arc<QueueState>, publisher: Arc<dyn AssetPublisher>) -> Self {
        Self { state, publisher }
    }

    pub(crate) async fn tick(&self) -> TickOutcome {
        let Some(_guard) = self.state.try_start_node_publish() else {
            return TickOutcome::Skipped;
        };

        let mut summary = TickSummary::default();
        while let Some(content) = self.state.next_content().await {
            summary.items += 1;

            match self.publisher.publish_content(content).await {
                Ok(Some(result)) => {
                    summary.succeeded += 1;
                    self.state.push_result(result).await;
                }
                Ok(None) => {
                    record_queue_dropped(NODE_PUBLISH_STAGE, "no_result", 1);
                }
                Err(error) => {
                    summary.failed += 1;
                    record_queue_dropped(NODE_PUBLISH_STAGE, error.kind(), 1);
                    tracing::warn!(
                        error = %error,
                        kind = error.kind(),
                        "Publishing queued content failed; item dropped"
                    );
                }
            }
        }

        TickOutcome::Processed(summary)
    }
}

/// Stage B: registers everything stage A produced since the last cycle.
pub(crate) struct LedgerRegistrationStage {
    state: Arc<QueueState>,
    registrar: Arc<dyn BatchRegistrar>,
    failure_policy: RegistrationFailurePolicy,
}

impl LedgerRegistrationStage {
    pub(crate) fn new(
        state: Arc<QueueState>,
        registrar: Arc<dyn BatchRegistrar>,
        failure_policy: RegistrationFailurePolicy,
    ) -> Self {
        Self {
            state,
            registrar,
            failure_policy,
        }
    }

    pub(crate) async fn tick(&self) -> TickOutcome {
        let Some(_guard) = self.state.try_start_ledger_registration() else {
            return TickOutcome::Skipped;
        };

        let batch = self.state.take_results().await;
        let items = batch.len();

        let mut summary = TickSummary {
            items,
            ..TickSummary::default()
        };
        match self
            .registrar
            .register_batch(batch.into_iter().map(Some).collect())
            .await
        {
            Ok(Some(outcome)) => {
                summary.succeeded = outcome.registered_collections();
                tracing::info!(
                    batch_size = items,
                    registered = summary.succeeded,
                    transactions = outcome.receipts.len(),
                    "Registration batch committed"
                );
            }
            Ok(None) => {}
            Err(error) => {
                // Only results no transaction included may be sent again.
                let (registered, resendable) = match &error {
                    PipelineError::Registration(failure) => (
                        failure.registered_collections(),
                        failure.uncommitted_results().to_vec(),
                    ),
                    _ => (0, Vec::new()),
                };
                summary.succeeded = registered;
                summary.failed = items.saturating_sub(registered);

                let requeued = match self.failure_policy {
                    RegistrationFailurePolicy::Requeue => resendable,
                    RegistrationFailurePolicy::Drop => Vec::new(),
                };
                let dropped = summary.failed.saturating_sub(requeued.len());

                if !requeued.is_empty() {
                    tracing::warn!(
                        batch_size = items,
                        requeued = requeued.len(),
                        error = %error,
                        "Registration batch failed; unsent results requeued for the next cycle"
                    );
                    self.state.restore_results(requeued).await;
                }
                if dropped > 0 {
                    record_queue_dropped(LEDGER_REGISTRATION_STAGE, "registration_failed", dropped);
                    tracing::error!(
                        batch_size = items,
                        dropped,
                        error = %error,
                        "Registration batch failed; results dropped"
                    );
                }
            }
        }

        TickOutcome::Processed(summary)
    }
}
