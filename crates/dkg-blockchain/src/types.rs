use alloy::primitives::{Address, B256, U256};
use dkg_domain::{BlockchainId, PublishResult, SignatureShare, derive_ual};

/// Inputs to the on-chain cost estimate of a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingSnapshot {
    /// `AskStorage.getStakeWeightedAverageAsk()`, in token wei per KiB per epoch.
    pub stake_weighted_average_ask: U256,
    pub time_until_next_epoch: U256,
    pub epoch_length: U256,
}

/// One knowledge collection in a batch registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRegistration {
    pub publish_operation_id: String,
    pub merkle_root: B256,
    pub knowledge_assets_amount: u64,
    pub byte_size: u64,
    pub epochs: u64,
    pub token_amount: U256,
    pub immutable: bool,
    pub publisher_node_signature: SignatureShare,
    pub signatures: Vec<SignatureShare>,
}

impl From<&PublishResult> for CollectionRegistration {
    fn from(result: &PublishResult) -> Self {
        Self {
            publish_operation_id: result.operation_id.to_string(),
            merkle_root: result.dataset_root,
            knowledge_assets_amount: result.knowledge_assets_amount,
            byte_size: result.dataset_size,
            epochs: result.epochs,
            token_amount: result.token_amount,
            immutable: result.immutable,
            publisher_node_signature: result.publisher_node_signature.clone(),
            signatures: result.signatures.clone(),
        }
    }
}

/// A collection created by a batch transaction, with its derived UALs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredCollection {
    pub publish_operation_id: String,
    pub collection_id: u128,
    pub storage_contract: Address,
    pub merkle_root: B256,
    /// `did:dkg:{blockchain}/{storage}/{collection}`.
    pub ual: String,
    /// One UAL per knowledge asset, numbered from 1.
    pub knowledge_asset_uals: Vec<String>,
}

impl RegisteredCollection {
    pub fn new(
        blockchain: &BlockchainId,
        storage_contract: Address,
        collection_id: u128,
        publish_operation_id: String,
        merkle_root: B256,
        knowledge_assets_amount: u64,
    ) -> Self {
        let knowledge_asset_uals = (1..=u128::from(knowledge_assets_amount))
            .map(|asset_id| derive_ual(blockchain, &storage_contract, collection_id, Some(asset_id)))
            .collect();
        Self {
            ual: derive_ual(blockchain, &storage_contract, collection_id, None),
            publish_operation_id,
            collection_id,
            storage_contract,
            merkle_root,
            knowledge_asset_uals,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationReceipt {
    pub blockchain: BlockchainId,
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub collections: Vec<RegisteredCollection>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn derives_collection_and_asset_uals() {
        let storage: Address = "0x8f678eb0e57ee8a109b295710e23076fa3a443fe"
            .parse()
            .unwrap();
        let collection = RegisteredCollection::new(
            &BlockchainId::from("otp:20430"),
            storage,
            42,
            "op".to_string(),
            B256::ZERO,
            2,
        );

        assert_eq!(
            collection.ual,
            "did:dkg:otp:20430/0x8f678eb0e57ee8a109b295710e23076fa3a443fe/42"
        );
        assert_eq!(
            collection.knowledge_asset_uals,
            vec![
                "did:dkg:otp:20430/0x8f678eb0e57ee8a109b295710e23076fa3a443fe/42/1".to_string(),
                "did:dkg:otp:20430/0x8f678eb0e57ee8a109b295710e23076fa3a443fe/42/2".to_string(),
            ]
        );
    }
}
