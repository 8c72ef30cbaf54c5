use std::collections::HashMap;

use alloy::primitives::{Address, U256};
use dkg_domain::BlockchainId;

use crate::{
    BlockchainConfig,
    chains::evm::EvmChain,
    error::BlockchainError,
    types::{CollectionRegistration, PricingSnapshot, RegistrationReceipt},
};

/// Connected EVM chains keyed by blockchain id.
pub struct BlockchainManager {
    blockchains: HashMap<BlockchainId, EvmChain>,
}

impl BlockchainManager {
    pub async fn connect(configs: Vec<BlockchainConfig>) -> Result<Self, BlockchainError> {
        let mut blockchains = HashMap::new();

        for config in configs {
            let blockchain_id = config.blockchain_id().clone();
            if blockchains.contains_key(&blockchain_id) {
                return Err(BlockchainError::DuplicateBlockchainId {
                    blockchain_id: blockchain_id.to_string(),
                });
            }

            let chain = EvmChain::new(config).await.map_err(|source| {
                BlockchainError::BlockchainInitialization {
                    blockchain_id: blockchain_id.to_string(),
                    source: Box::new(source),
                }
            })?;
            blockchains.insert(blockchain_id, chain);
        }

        Ok(Self { blockchains })
    }

    pub fn blockchain_ids(&self) -> Vec<&BlockchainId> {
        self.blockchains.keys().collect()
    }

    fn chain(&self, blockchain: &BlockchainId) -> Result<&EvmChain, BlockchainError> {
        self.blockchains
            .get(blockchain)
            .ok_or_else(|| BlockchainError::BlockchainNotFound {
                blockchain_id: blockchain.to_string(),
            })
    }

    pub fn operational_wallet_address(
        &self,
        blockchain: &BlockchainId,
    ) -> Result<Address, BlockchainError> {
        Ok(self
            .chain(blockchain)?
            .config()
            .evm_operational_wallet_address())
    }

    /// Whether `signer` is an operational key of the node identity `identity_id`.
    pub async fn key_has_operational_purpose(
        &self,
        blockchain: &BlockchainId,
        identity_id: u128,
        signer: Address,
    ) -> Result<bool, BlockchainError> {
        self.chain(blockchain)?
            .key_has_operational_purpose(identity_id, signer)
            .await
    }

    pub async fn pricing_snapshot(
        &self,
        blockchain: &BlockchainId,
    ) -> Result<PricingSnapshot, BlockchainError> {
        self.chain(blockchain)?.pricing_snapshot().await
    }

    /// Registers `registrations` in a single batch transaction, topping up the
    /// token allowance first when it does not cover the batch.
    pub async fn register_collections(
        &self,
        blockchain: &BlockchainId,
        registrations: &[CollectionRegistration],
    ) -> Result<RegistrationReceipt, BlockchainError> {
        let chain = self.chain(blockchain)?;

        let total_token_amount = registrations
            .iter()
            .fold(U256::ZERO, |sum, registration| {
                sum.saturating_add(registration.token_amount)
            });
        chain.ensure_token_allowance(total_token_amount).await?;

        let receipt = chain.create_knowledge_collections(registrations).await?;
        tracing::info!(
            blockchain = %blockchain,
            tx_hash = %receipt.transaction_hash,
            block_number = ?receipt.block_number,
            gas_used = receipt.gas_used,
            collections = receipt.collections.len(),
            "Knowledge collections registered"
        );
        Ok(receipt)
    }
}
