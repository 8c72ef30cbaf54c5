use std::sync::Arc;

use dkg_blockchain::RegistrationReceipt;
use dkg_domain::BlockchainId;
use dkg_node_client::{FinalityStatus, PollPolicy, StorageNetwork, poll_finality};
use dkg_observability::record_finality_status;
use tokio::{sync::Mutex, task::JoinSet};
use tokio_util::sync::CancellationToken;

/// Advisory finality checks for registered collections.
///
/// Each collection is polled in its own task, so registration never waits on
/// the storage network's confirmation count.
pub(crate) struct FinalityWatcher {
    network: Arc<dyn StorageNetwork>,
    required: u64,
    poll_policy: PollPolicy,
    checks: Mutex<JoinSet<Option<FinalityStatus>>>,
    shutdown: CancellationToken,
}

impl FinalityWatcher {
    /// A `required` of 0 disables the checks.
    pub(crate) fn new(network: Arc<dyn StorageNetwork>, required: u64, poll_policy: PollPolicy) -> Self {
        Self {
            network,
            required,
            poll_policy,
            checks: Mutex::new(JoinSet::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// Starts one check per collection in `receipts` and returns immediately.
    pub(crate) async fn watch(&self, receipts: &[RegistrationReceipt]) {
        if self.required == 0 || self.shutdown.is_cancelled() {
            return;
        }

        let mut checks = self.checks.lock().await;
        while checks.try_join_next().is_some() {}

        for receipt in receipts {
            for collection in &receipt.collections {
                let network = Arc::clone(&self.network);
                let blockchain = receipt.blockchain.clone();
                let ual = collection.ual.clone();
                let required = self.required;
                let poll_policy = self.poll_policy;
                let shutdown = self.shutdown.clone();

                checks.spawn(async move {
                    tokio::select! {
                        _ = shutdown.cancelled() => None,
                        status = poll_finality(network.as_ref(), &ual, required, poll_policy) => {
                            report(&blockchain, &ual, required, status);
                            Some(status)
                        }
                    }
                });
            }
        }
    }

    /// Cancels every check still polling.
    pub(crate) async fn shutdown(&self) {
        self.shutdown.cancel();

        let mut checks = self.checks.lock().await;
        while checks.try_join_next().is_some() {}
        let abandoned = checks.len();
        checks.abort_all();
        while checks.join_next().await.is_some() {}

        if abandoned > 0 {
            tracing::info!(abandoned, "Abandoned pending finality checks");
        }
    }

    #[cfg(test)]
    async fn finished(&self) -> Vec<FinalityStatus> {
        let mut checks = self.checks.lock().await;
        let mut statuses = Vec::new();
        while let Some(joined) = checks.join_next().await {
            if let Ok(Some(status)) = joined {
                statuses.push(status);
            }
        }
        statuses
    }
}

fn report(blockchain: &BlockchainId, ual: &str, required: u64, status: FinalityStatus) {
    match status {
        FinalityStatus::Finalized(confirmations) => {
            record_finality_status(blockchain.as_str(), "finalized");
            tracing::info!(ual, confirmations, "FINALIZED");
        }
        FinalityStatus::NotFinalized(confirmations) => {
            record_finality_status(blockchain.as_str(), "not_finalized");
            tracing::warn!(ual, confirmations, required, "NOT FINALIZED");
        }
    }
}
