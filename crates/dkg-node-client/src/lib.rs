//! HTTP client for the storage-network node API: publish submission, operation
//! polling and finality lookups.

mod client;
mod config;
mod error;
mod messages;
mod polling;

use async_trait::async_trait;
use uuid::Uuid;

pub use client::NodeClient;
pub use config::{NodeClientConfig, PollPolicy};
pub use error::NodeClientError;
pub use messages::{
    FinalityResponse, IdentityIdValue, OperationData, OperationResult, OperationStatus,
    PublishRequest, PublishResponse, SignatureData,
};
pub use polling::{FinalityStatus, PollOutcome, poll_finality, poll_until_terminal};

/// Operations the pipeline needs from a storage-network node.
#[async_trait]
pub trait StorageNetwork: Send + Sync {
    /// Starts a publish operation and returns its id.
    async fn submit_publish(&self, request: &PublishRequest) -> Result<Uuid, NodeClientError>;

    /// Reads the current state of a publish operation.
    async fn publish_result(&self, operation_id: Uuid) -> Result<OperationResult, NodeClientError>;

    /// Number of nodes that have finalized the given asset.
    async fn finality(&self, ual: &str) -> Result<u64, NodeClientError>;
}
