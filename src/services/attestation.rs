use std::sync::Arc;

use async_trait::async_trait;
use dkg_blockchain::{Address, B256, BlockchainError, BlockchainManager};
use dkg_domain::{BlockchainId, NodeSignature, calculate_merkle_root};

/// Cryptographic checks the publish pipeline relies on.
#[async_trait]
pub(crate) trait Attestation: Send + Sync {
    fn merkle_root(&self, triples: &[String]) -> Option<B256>;

    /// Address that produced an EIP-191 signature over the 32 root bytes.
    fn recover_signer(&self, dataset_root: B256, signature: &NodeSignature) -> Option<Address>;

    /// Whether `signer` is an operational key of the node identity.
    async fn verify_operational_wallet(
        &self,
        blockchain: &BlockchainId,
        identity_id: u128,
        signer: Address,
    ) -> Result<bool, BlockchainError>;
}

pub(crate) fn recover_root_signer(dataset_root: B256, signature: &NodeSignature) -> Option<Address> {
    signature
        .to_signature()?
        .recover_address_from_msg(dataset_root.as_slice())
        .ok()
}

/// Recovers signers locally and checks keys against the identity storage contract.
pub(crate) struct LedgerAttestation {
    blockchain_manager: Arc<BlockchainManager>,
}

impl LedgerAttestation {
    pub(crate) fn new(blockchain_manager: Arc<BlockchainManager>) -> Self {
        Self { blockchain_manager }
    }
}

#[async_trait]
impl Attestation for LedgerAttestation {
    fn merkle_root(&self, triples: &[String]) -> Option<B256> {
        calculate_merkle_root(triples)
    }

    fn recover_signer(&self, dataset_root: B256, signature: &NodeSignature) -> Option<Address> {
        recover_root_signer(dataset_root, signature)
    }

    async fn verify_operational_wallet(
        &self,
        blockchain: &BlockchainId,
        identity_id: u128,
        signer: Address,
    ) -> Result<bool, BlockchainError> {
        self.blockchain_manager
            .key_has_operational_purpose(blockchain, identity_id, signer)
            .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use alloy::signers::local::PrivateKeySigner;

    use super::*;
    use crate::services::test_support::sign_root;

    #[test]
    fn recovers_the_signing_key() {
        let signer = PrivateKeySigner::random();
        let root = B256::repeat_byte(0xab);
        let signature = sign_root(&signer, 7, root);

        assert_eq!(recover_root_signer(root, &signature), Some(signer.address()));
        assert_ne!(
            recover_root_signer(B256::repeat_byte(0xcd), &signature),
            Some(signer.address())
        );
    }

    #[test]
    fn invalid_recovery_id_yields_none() {
        let signer = PrivateKeySigner::random();
        let root = B256::repeat_byte(1);
        let signature = NodeSignature {
            v: 9,
            ..sign_root(&signer, 1, root)
        };

        assert_eq!(recover_root_signer(root, &signature), None);
    }
}
