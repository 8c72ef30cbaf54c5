mod blockchain_id;
mod dataset;
mod merkle;
pub mod ontology;
mod publish;
mod signature;
mod ual;

pub use blockchain_id::BlockchainId;
pub use dataset::Dataset;
pub use merkle::{CHUNK_BYTE_SIZE, calculate_dataset_size, calculate_merkle_root};
pub use publish::{BillingParams, PublishResult};
pub use signature::{NodeSignature, SignatureShare};
pub use ual::{ParsedUal, UalParseError, derive_ual, parse_ual};
