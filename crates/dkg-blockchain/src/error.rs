use alloy::{contract::Error as ContractError, signers::local::LocalSignerError};

#[derive(Debug, thiserror::Error)]
pub enum BlockchainError {
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("Invalid private key (length: {key_length})")]
    InvalidPrivateKey {
        key_length: usize,
        #[source]
        source: LocalSignerError,
    },

    #[error("RPC connection failed after trying {attempts} endpoint(s)")]
    RpcConnectionFailed { attempts: usize },

    #[error("Blockchain '{blockchain_id}' not found")]
    BlockchainNotFound { blockchain_id: String },

    #[error("Duplicate blockchain_id '{blockchain_id}' in configuration")]
    DuplicateBlockchainId { blockchain_id: String },

    #[error("Value out of range for {field}: {value}")]
    ValueOutOfRange { field: &'static str, value: String },

    #[error("Transaction {operation} failed: {reason}")]
    TransactionFailed { operation: String, reason: String },

    /// The transaction was sent but its receipt never arrived; it may still be mined.
    #[error("Transaction receipt failed: {reason}")]
    ReceiptFailed { reason: String },

    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: String },

    /// The transaction succeeded but its receipt could not be mapped back to the batch.
    #[error("Transaction {tx_hash} succeeded but its receipt is unusable: {source}")]
    UnreadableReceipt {
        tx_hash: String,
        #[source]
        source: Box<BlockchainError>,
    },

    #[error("Expected {expected} KnowledgeCollectionCreated event(s) in receipt, found {found}")]
    MissingCreatedEvents { expected: usize, found: usize },

    #[error("Contract initialization failed: {reason}")]
    ContractInit { reason: String },

    #[error("Failed to initialize blockchain {blockchain_id}: {source}")]
    BlockchainInitialization {
        blockchain_id: String,
        #[source]
        source: Box<BlockchainError>,
    },
}

impl BlockchainError {
    /// Whether the failed call may have changed ledger state, so resending it
    /// could apply the same write twice.
    pub fn may_have_committed(&self) -> bool {
        matches!(
            self,
            Self::ReceiptFailed { .. } | Self::UnreadableReceipt { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn only_sent_transactions_may_have_committed() {
        let timed_out = BlockchainError::ReceiptFailed {
            reason: "timeout".to_string(),
        };
        let unreadable = BlockchainError::UnreadableReceipt {
            tx_hash: "0x01".to_string(),
            source: Box::new(BlockchainError::MissingCreatedEvents {
                expected: 2,
                found: 1,
            }),
        };
        let reverted = BlockchainError::TransactionReverted {
            tx_hash: "0x02".to_string(),
        };

        assert!(timed_out.may_have_committed());
        assert!(unreadable.may_have_committed());
        assert!(!reverted.may_have_committed());
        assert!(!BlockchainError::RpcConnectionFailed { attempts: 2 }.may_have_committed());
    }
}
