use alloy::primitives::{B256, U256};
use uuid::Uuid;

use crate::{BlockchainId, Dataset, SignatureShare};

/// Billing and replication parameters chosen when a dataset is prepared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingParams {
    pub epochs: u64,
    /// Explicit payment; estimated from the stake-weighted ask when `None`.
    pub token_amount: Option<U256>,
    pub immutable: bool,
    pub minimum_replications: u8,
}

/// Outcome of a successful node publish, consumed once by ledger registration.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub operation_id: Uuid,
    pub blockchain: BlockchainId,
    pub dataset_root: B256,
    pub dataset: Dataset,
    pub dataset_size: u64,
    pub knowledge_assets_amount: u64,
    pub epochs: u64,
    pub token_amount: U256,
    pub immutable: bool,
    pub publisher_node_signature: SignatureShare,
    /// Signatures that passed recovery and operational-wallet checks, in arrival order.
    pub signatures: Vec<SignatureShare>,
}
