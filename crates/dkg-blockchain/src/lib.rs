//! EVM ledger access for the publisher: operational key checks, pricing reads,
//! and batched knowledge collection registration.

mod chains;
mod config;
mod config_error;
mod error;
mod manager;
mod rpc_executor;
mod types;

pub use alloy::primitives::{Address, B256, U256};
pub use chains::evm::GasConfig;
pub use config::{BlockchainConfig, BlockchainConfigRaw};
pub use config_error::ConfigError;
pub use dkg_domain::BlockchainId;
pub use error::BlockchainError;
pub use manager::BlockchainManager;
pub use types::{CollectionRegistration, PricingSnapshot, RegisteredCollection, RegistrationReceipt};
