use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use dkg_blockchain::{
    BlockchainError, BlockchainManager, CollectionRegistration, RegistrationReceipt,
};
use dkg_domain::{BlockchainId, PublishResult};
use dkg_observability::record_registration_batch;
use thiserror::Error;

use super::FinalityWatcher;

/// Ledger side of registration: one batch transaction per call.
#[async_trait]
pub(crate) trait LedgerRegistrar: Send + Sync {
    async fn register_collections(
        &self,
        blockchain: &BlockchainId,
        registrations: &[CollectionRegistration],
    ) -> Result<RegistrationReceipt, BlockchainError>;
}

#[async_trait]
impl LedgerRegistrar for BlockchainManager {
    async fn register_collections(
        &self,
        blockchain: &BlockchainId,
        registrations: &[CollectionRegistration],
    ) -> Result<RegistrationReceipt, BlockchainError> {
        BlockchainManager::register_collections(self, blockchain, registrations).await
    }
}

#[derive(Error, Debug)]
pub(crate) enum RegistrationError {
    #[error("Registering {batch_size} collection(s) on {blockchain} failed: {source}")]
    Ledger {
        blockchain: BlockchainId,
        batch_size: usize,
        #[source]
        source: BlockchainError,
        /// Collections created by earlier transactions of the same batch.
        registered: usize,
        /// Results no transaction included; safe to submit again.
        uncommitted: Vec<PublishResult>,
    },
}

impl RegistrationError {
    pub(crate) fn registered_collections(&self) -> usize {
        match self {
            Self::Ledger { registered, .. } => *registered,
        }
    }

    pub(crate) fn uncommitted_results(&self) -> &[PublishResult] {
        match self {
            Self::Ledger { uncommitted, .. } => uncommitted,
        }
    }
}

#[derive(Debug)]
pub(crate) struct RegistrationOutcome {
    /// One receipt per blockchain in the batch.
    pub receipts: Vec<RegistrationReceipt>,
}

impl RegistrationOutcome {
    pub(crate) fn registered_collections(&self) -> usize {
        self.receipts.iter().map(|r| r.collections.len()).sum()
    }
}

pub(crate) struct RegistrationService {
    registrar: Arc<dyn LedgerRegistrar>,
    finality: Arc<FinalityWatcher>,
}

impl RegistrationService {
    pub(crate) fn new(registrar: Arc<dyn LedgerRegistrar>, finality: Arc<FinalityWatcher>) -> Self {
        Self {
            registrar,
            finality,
        }
    }

    /// Registers every publish result in the batch.
    ///
    /// `None` entries are soft-failed publishes and are skipped. Returns
    /// `Ok(None)` without touching the ledger when nothing is left. Results
    /// are grouped per blockchain in first-seen order and each group is sent
    /// as one transaction; the first failing group aborts the call. Finality
    /// checks for created collections run in the background.
    pub(crate) async fn register_batch(
        &self,
        results: Vec<Option<PublishResult>>,
    ) -> Result<Option<RegistrationOutcome>, RegistrationError> {
        let groups = group_by_blockchain(results.into_iter().flatten());
        if groups.is_empty() {
            tracing::debug!("No publish results to register");
            return Ok(None);
        }

        let mut receipts = Vec::with_capacity(groups.len());
        let mut pending = groups.into_iter();
        while let Some((blockchain, group)) = pending.next() {
            match self.register_group(&blockchain, &group).await {
                Ok(receipt) => receipts.push(receipt),
                Err(source) => {
                    self.finality.watch(&receipts).await;

                    let batch_size = group.len();
                    let mut uncommitted = if source.may_have_committed() {
                        tracing::error!(
                            blockchain = %blockchain,
                            batch_size,
                            error = %source,
                            "Registration transaction may have been mined; its results will not be resent"
                        );
                        Vec::new()
                    } else {
                        group
                    };
                    uncommitted.extend(pending.by_ref().flat_map(|(_, group)| group));

                    return Err(RegistrationError::Ledger {
                        blockchain,
                        batch_size,
                        source,
                        registered: receipts.iter().map(|r| r.collections.len()).sum(),
                        uncommitted,
                    });
                }
            }
        }

        self.finality.watch(&receipts).await;
        Ok(Some(RegistrationOutcome { receipts }))
    }

    async fn register_group(
        &self,
        blockchain: &BlockchainId,
        group: &[PublishResult],
    ) -> Result<RegistrationReceipt, BlockchainError> {
        let started = Instant::now();
        let registrations: Vec<CollectionRegistration> =
            group.iter().map(CollectionRegistration::from).collect();
        let batch_size = registrations.len();

        match self
            .registrar
            .register_collections(blockchain, &registrations)
            .await
        {
            Ok(receipt) => {
                record_registration_batch(
                    blockchain.as_str(),
                    "success",
                    batch_size,
                    started.elapsed(),
                );
                for collection in &receipt.collections {
                    tracing::info!(
                        blockchain = %blockchain,
                        ual = %collection.ual,
                        publish_operation_id = %collection.publish_operation_id,
                        "Knowledge collection created"
                    );
                }
                Ok(receipt)
            }
            Err(error) => {
                record_registration_batch(
                    blockchain.as_str(),
                    "failed",
                    batch_size,
                    started.elapsed(),
                );
                Err(error)
            }
        }
    }
}

fn group_by_blockchain(
    results: impl Iterator<Item = PublishResult>,
) -> Vec<(BlockchainId, Vec<PublishResult>)> {
    let mut groups: Vec<(BlockchainId, Vec<PublishResult>)> = Vec::new();

    for result in results {
        match groups
            .iter_mut()
            .find(|(blockchain, _)| *blockchain == result.blockchain)
        {
            Some((_, group)) => group.push(result),
            None => groups.push((result.blockchain.clone(), vec![result])),
        }
    }

    groups
}
