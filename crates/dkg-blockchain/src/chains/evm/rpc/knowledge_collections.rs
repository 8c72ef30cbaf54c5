use alloy::{
    primitives::{Address, U256},
    rpc::types::TransactionReceipt,
};

use super::identity::to_identity_id;
use crate::{
    chains::evm::{EvmChain, KnowledgeCollectionBatch, KnowledgeCollectionStorage},
    error::BlockchainError,
    types::{CollectionRegistration, RegisteredCollection, RegistrationReceipt},
};

type KnowledgeCollectionParams = KnowledgeCollectionBatch::KnowledgeCollectionParams;

impl TryFrom<&CollectionRegistration> for KnowledgeCollectionParams {
    type Error = BlockchainError;

    fn try_from(registration: &CollectionRegistration) -> Result<Self, Self::Error> {
        let publisher = &registration.publisher_node_signature;
        let identity_ids = registration
            .signatures
            .iter()
            .map(|share| to_identity_id(share.identity_id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            publishOperationId: registration.publish_operation_id.clone(),
            merkleRoot: registration.merkle_root,
            knowledgeAssetsAmount: U256::from(registration.knowledge_assets_amount),
            byteSize: U256::from(registration.byte_size),
            epochs: U256::from(registration.epochs),
            tokenAmount: registration.token_amount,
            isImmutable: registration.immutable,
            paymaster: Address::ZERO,
            publisherNodeIdentityId: to_identity_id(publisher.identity_id)?,
            publisherNodeR: publisher.r,
            publisherNodeVS: publisher.vs,
            identityIds: identity_ids,
            r: registration.signatures.iter().map(|share| share.r).collect(),
            vs: registration.signatures.iter().map(|share| share.vs).collect(),
        })
    }
}

impl EvmChain {
    /// Raises the operational wallet's token allowance for the batch contract
    /// to at least `required`. Sends nothing when it already suffices.
    pub(crate) async fn ensure_token_allowance(&self, required: U256) -> Result<(), BlockchainError> {
        let owner = self.config().evm_operational_wallet_address();
        let spender = *self.contracts().await.knowledge_collection_batch().address();

        let allowance = self
            .rpc_call("token_allowance", || async {
                self.contracts()
                    .await
                    .token()
                    .allowance(owner, spender)
                    .call()
                    .await
            })
            .await?;
        if allowance >= required {
            return Ok(());
        }

        let increase = required - allowance;
        tracing::info!(
            blockchain = %self.blockchain_id(),
            %allowance,
            %required,
            %increase,
            "Increasing token allowance for batch registration"
        );
        let result = self
            .tx_call("increase_allowance", |contracts| {
                contracts.token().increaseAllowance(spender, increase)
            })
            .await;
        self.handle_contract_call("increase_allowance", result).await?;
        Ok(())
    }

    /// Creates all collections in one `createKnowledgeCollections` transaction
    /// and reads back their ids from the storage events.
    pub(crate) async fn create_knowledge_collections(
        &self,
        registrations: &[CollectionRegistration],
    ) -> Result<RegistrationReceipt, BlockchainError> {
        let paymaster = self.config().paymaster();
        let params = registrations
            .iter()
            .map(|registration| {
                KnowledgeCollectionParams::try_from(registration).map(|mut params| {
                    params.paymaster = paymaster;
                    params
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let result = self
            .tx_call("create_knowledge_collections", |contracts| {
                contracts
                    .knowledge_collection_batch()
                    .createKnowledgeCollections(params.clone())
            })
            .await;
        let receipt = self
            .handle_contract_call("create_knowledge_collections", result)
            .await?;

        let collections = self
            .collections_from_receipt(&receipt, registrations)
            .await
            .map_err(|source| BlockchainError::UnreadableReceipt {
                tx_hash: receipt.transaction_hash.to_string(),
                source: Box::new(source),
            })?;
        Ok(RegistrationReceipt {
            blockchain: self.blockchain_id().clone(),
            transaction_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            collections,
        })
    }

    async fn collections_from_receipt(
        &self,
        receipt: &TransactionReceipt,
        registrations: &[CollectionRegistration],
    ) -> Result<Vec<RegisteredCollection>, BlockchainError> {
        let contracts = self.contracts().await;
        let created: Vec<_> = receipt
            .inner
            .logs()
            .iter()
            .filter(|log| contracts.is_knowledge_collection_storage(&log.address()))
            .filter_map(|log| {
                log.log_decode::<KnowledgeCollectionStorage::KnowledgeCollectionCreated>()
                    .ok()
                    .map(|decoded| (log.address(), decoded.inner.data))
            })
            .collect();
        drop(contracts);

        match_created_events(self.blockchain_id(), created, registrations)
    }
}

/// Pairs events with registrations by publish operation id, in registration order.
fn match_created_events(
    blockchain: &crate::BlockchainId,
    created: Vec<(Address, KnowledgeCollectionStorage::KnowledgeCollectionCreated)>,
    registrations: &[CollectionRegistration],
) -> Result<Vec<RegisteredCollection>, BlockchainError> {
    if created.len() != registrations.len() {
        return Err(BlockchainError::MissingCreatedEvents {
            expected: registrations.len(),
            found: created.len(),
        });
    }

    registrations
        .iter()
        .map(|registration| {
            let (storage, event) = created
                .iter()
                .find(|(_, event)| event.publishOperationId == registration.publish_operation_id)
                .ok_or(BlockchainError::MissingCreatedEvents {
                    expected: registrations.len(),
                    found: created.len(),
                })?;
            let collection_id =
                u128::try_from(event.id).map_err(|_| BlockchainError::ValueOutOfRange {
                    field: "knowledge_collection_id",
                    value: event.id.to_string(),
                })?;
            Ok(RegisteredCollection::new(
                blockchain,
                *storage,
                collection_id,
                registration.publish_operation_id.clone(),
                registration.merkle_root,
                registration.knowledge_assets_amount,
            ))
        })
        .collect()
}
