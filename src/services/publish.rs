use std::{sync::Arc, time::Instant};

use dkg_blockchain::{B256, BlockchainError, U256};
use dkg_dataset::PreparedDataset;
use dkg_domain::{BlockchainId, NodeSignature, PublishResult, SignatureShare};
use dkg_node_client::{
    NodeClientError, OperationData, PollPolicy, PublishRequest, SignatureData, StorageNetwork,
    poll_until_terminal,
};
use dkg_observability::{
    record_dataset_size, record_publish_operation, record_publish_poll_attempts,
    record_signature_filter,
};
use thiserror::Error;
use uuid::Uuid;

use super::{
    attestation::Attestation,
    pricing::{PricingSource, estimate_token_amount},
};

#[derive(Error, Debug)]
pub(crate) enum PublishError {
    #[error("Storage node request failed: {0}")]
    Transport(#[source] NodeClientError),

    #[error("Publish operation {operation_id} did not finish after {attempts} polls")]
    OperationTimeout { operation_id: Uuid, attempts: u32 },

    #[error("Malformed result for publish operation {operation_id}: {reason}")]
    Protocol { operation_id: Uuid, reason: String },

    #[error("Dataset root {expected} does not match the recomputed root {computed:?}")]
    RootMismatch {
        expected: B256,
        computed: Option<B256>,
    },

    #[error("Failed to read pricing from the ledger: {0}")]
    Blockchain(#[from] BlockchainError),
}

impl From<NodeClientError> for PublishError {
    fn from(error: NodeClientError) -> Self {
        match error {
            NodeClientError::OperationTimeout {
                operation_id,
                attempts,
            } => Self::OperationTimeout {
                operation_id,
                attempts,
            },
            other => Self::Transport(other),
        }
    }
}

/// Submits prepared datasets to a storage node and turns the collected
/// signatures into a registrable [`PublishResult`].
pub(crate) struct PublishService {
    network: Arc<dyn StorageNetwork>,
    attestation: Arc<dyn Attestation>,
    pricing: Arc<dyn PricingSource>,
    hash_function_id: u8,
    poll_policy: PollPolicy,
}

impl PublishService {
    pub(crate) fn new(
        network: Arc<dyn StorageNetwork>,
        attestation: Arc<dyn Attestation>,
        pricing: Arc<dyn PricingSource>,
        hash_function_id: u8,
        poll_policy: PollPolicy,
    ) -> Self {
        Self {
            network,
            attestation,
            pricing,
            hash_function_id,
            poll_policy,
        }
    }

    /// Publishes one dataset.
    ///
    /// `Ok(None)` means the node finished without reaching the replication
    /// minimum; the dataset is not registered.
    #[tracing::instrument(
        name = "publish",
        skip(self, prepared),
        fields(
            blockchain = %prepared.blockchain,
            dataset_root = %prepared.dataset_root,
            operation_id = tracing::field::Empty,
        )
    )]
    pub(crate) async fn publish(
        &self,
        prepared: PreparedDataset,
    ) -> Result<Option<PublishResult>, PublishError> {
        let started = Instant::now();
        let blockchain = prepared.blockchain.clone();

        let result = self.publish_inner(prepared).await;

        let status = match &result {
            Ok(Some(_)) => "success",
            Ok(None) => "no_result",
            Err(PublishError::OperationTimeout { .. }) => "timeout",
            Err(_) => "failed",
        };
        record_publish_operation(blockchain.as_str(), status, started.elapsed());

        result
    }

    async fn publish_inner(
        &self,
        prepared: PreparedDataset,
    ) -> Result<Option<PublishResult>, PublishError> {
        let computed = self.attestation.merkle_root(&prepared.dataset.public);
        if computed != Some(prepared.dataset_root) {
            return Err(PublishError::RootMismatch {
                expected: prepared.dataset_root,
                computed,
            });
        }

        let request = PublishRequest {
            dataset_root: prepared.dataset_root,
            dataset: prepared.dataset,
            blockchain: prepared.blockchain.to_string(),
            hash_function_id: self.hash_function_id,
            minimum_number_of_node_replications: prepared.billing.minimum_replications,
        };
        let operation_id = self.network.submit_publish(&request).await?;
        tracing::Span::current().record("operation_id", tracing::field::display(operation_id));
        record_dataset_size(prepared.dataset_size);
        tracing::info!(
            %operation_id,
            dataset_size = prepared.dataset_size,
            knowledge_assets = prepared.knowledge_assets_amount,
            "Publish operation submitted"
        );

        let outcome =
            poll_until_terminal(self.network.as_ref(), operation_id, self.poll_policy).await?;
        record_publish_poll_attempts(outcome.attempts);

        if !outcome.result.is_usable() {
            tracing::warn!(
                %operation_id,
                status = ?outcome.result.status,
                error_type = outcome.result.data.error_type.as_deref().unwrap_or("unknown"),
                error_message = outcome.result.data.error_message.as_deref().unwrap_or(""),
                "Publish did not reach the minimum number of acknowledgements"
            );
            return Ok(None);
        }

        let OperationData {
            publisher_node_signature,
            signatures,
            ..
        } = outcome.result.data;
        let protocol_error = |reason: String| PublishError::Protocol {
            operation_id,
            reason,
        };

        let publisher_node_signature = publisher_node_signature
            .ok_or_else(|| protocol_error("missing publisherNodeSignature".to_string()))?
            .to_node_signature()
            .map_err(|e| protocol_error(format!("publisherNodeSignature: {e}")))?
            .share();
        let signatures = signatures
            .iter()
            .enumerate()
            .map(|(index, data): (usize, &SignatureData)| {
                data.to_node_signature()
                    .map_err(|e| protocol_error(format!("signatures[{index}]: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let received = signatures.len();
        let accepted = self
            .filter_signatures(&prepared.blockchain, prepared.dataset_root, signatures)
            .await;
        record_signature_filter(
            prepared.blockchain.as_str(),
            accepted.len(),
            received - accepted.len(),
        );

        let token_amount = match prepared.billing.token_amount {
            Some(amount) => amount,
            None => {
                self.estimate_cost(
                    &prepared.blockchain,
                    prepared.billing.epochs,
                    prepared.dataset_size,
                )
                .await?
            }
        };

        tracing::info!(
            %operation_id,
            accepted_signatures = accepted.len(),
            rejected_signatures = received - accepted.len(),
            %token_amount,
            "Publish operation completed"
        );

        Ok(Some(PublishResult {
            operation_id,
            blockchain: prepared.blockchain,
            dataset_root: prepared.dataset_root,
            dataset: request.dataset,
            dataset_size: prepared.dataset_size,
            knowledge_assets_amount: prepared.knowledge_assets_amount,
            epochs: prepared.billing.epochs,
            token_amount,
            immutable: prepared.billing.immutable,
            publisher_node_signature,
            signatures: accepted,
        }))
    }

    /// Keeps signatures whose signer recovers and holds an operational key for
    /// the claimed identity. Order is preserved.
    async fn filter_signatures(
        &self,
        blockchain: &BlockchainId,
        dataset_root: B256,
        signatures: Vec<NodeSignature>,
    ) -> Vec<SignatureShare> {
        let mut accepted = Vec::with_capacity(signatures.len());

        for signature in signatures {
            let identity_id = signature.identity_id;
            let Some(signer) = self.attestation.recover_signer(dataset_root, &signature) else {
                tracing::debug!(identity_id, "Discarding signature: signer recovery failed");
                continue;
            };

            match self
                .attestation
                .verify_operational_wallet(blockchain, identity_id, signer)
                .await
            {
                Ok(true) => accepted.push(signature.share()),
                Ok(false) => tracing::debug!(
                    identity_id,
                    %signer,
                    "Discarding signature: signer is not an operational key"
                ),
                Err(e) => tracing::warn!(
                    identity_id,
                    %signer,
                    error = %e,
                    "Discarding signature: operational key check failed"
                ),
            }
        }

        accepted
    }

    async fn estimate_cost(
        &self,
        blockchain: &BlockchainId,
        epochs: u64,
        dataset_size: u64,
    ) -> Result<U256, PublishError> {
        let snapshot = self.pricing.pricing_snapshot(blockchain).await?;
        Ok(estimate_token_amount(&snapshot, epochs, dataset_size))
    }
}
