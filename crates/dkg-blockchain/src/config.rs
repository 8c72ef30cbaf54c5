use std::time::Duration;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use dkg_domain::BlockchainId;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, chains::evm::GasConfig};

/// Connection and wallet settings for one EVM chain, as read from configuration.
///
/// The operational key may also come from `EVM_OPERATIONAL_WALLET_PRIVATE_KEY`;
/// the application config layer merges it in before [`BlockchainConfigRaw::resolve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockchainConfigRaw {
    /// "chaintype:chainid", e.g. "otp:20430" or "hardhat1:31337".
    pub blockchain_id: BlockchainId,

    pub hub_contract_address: String,

    /// HTTP and WebSocket JSON-RPC endpoints; later entries are failovers.
    #[serde(default)]
    pub rpc_endpoints: Vec<String>,

    /// Signs registration transactions and pays for them.
    pub evm_operational_wallet_private_key: Option<String>,

    /// Checked against the address derived from the private key when set.
    pub evm_operational_wallet_address: Option<String>,

    pub max_rpc_requests_per_second: Option<u32>,

    pub tx_confirmations: u64,

    /// 0 disables the receipt timeout.
    pub tx_receipt_timeout_ms: u64,

    /// Account paying for collections instead of the publisher, if any.
    pub paymaster: Option<String>,
}

impl BlockchainConfigRaw {
    pub fn ensure_operational_wallet_private_key(&self) -> Result<(), ConfigError> {
        if self.evm_operational_wallet_private_key.is_none() {
            return Err(ConfigError::MissingSecret(
                "EVM_OPERATIONAL_WALLET_PRIVATE_KEY env var or evm_operational_wallet_private_key config required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_rpc_endpoints(&self) -> Result<(), ConfigError> {
        if self.rpc_endpoints.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "rpc_endpoints must include at least one endpoint".to_string(),
            ));
        }
        Ok(())
    }

    pub fn ensure_max_rpc_requests_per_second(&self) -> Result<(), ConfigError> {
        if self.max_rpc_requests_per_second == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "max_rpc_requests_per_second must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolve(self) -> Result<BlockchainConfig, ConfigError> {
        self.ensure_rpc_endpoints()?;
        self.ensure_max_rpc_requests_per_second()?;

        if self.blockchain_id.chain_id().is_none() {
            return Err(ConfigError::InvalidConfig(format!(
                "blockchain_id '{}' must look like 'chaintype:chainid'",
                self.blockchain_id
            )));
        }

        let Some(operational_key) = self.evm_operational_wallet_private_key else {
            return Err(ConfigError::MissingSecret(
                "EVM_OPERATIONAL_WALLET_PRIVATE_KEY env var or evm_operational_wallet_private_key config required".to_string(),
            ));
        };
        let derived = derive_evm_address_from_private_key(&operational_key)?;
        if let Some(address) = self.evm_operational_wallet_address.as_deref() {
            let provided = parse_evm_address(address)?;
            if provided != derived {
                return Err(ConfigError::InvalidConfig(format!(
                    "evm_operational_wallet_address does not match derived address: provided={}, derived={}",
                    address, derived
                )));
            }
        }

        let hub_contract_address = parse_evm_address(&self.hub_contract_address)?;
        let paymaster = self
            .paymaster
            .as_deref()
            .map(parse_evm_address)
            .transpose()?;

        Ok(BlockchainConfig {
            blockchain_id: self.blockchain_id,
            hub_contract_address,
            rpc_endpoints: self.rpc_endpoints,
            evm_operational_wallet_private_key: operational_key,
            evm_operational_wallet_address: derived,
            max_rpc_requests_per_second: self.max_rpc_requests_per_second,
            tx_confirmations: self.tx_confirmations,
            tx_receipt_timeout_ms: self.tx_receipt_timeout_ms,
            paymaster,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BlockchainConfig {
    blockchain_id: BlockchainId,
    hub_contract_address: Address,
    rpc_endpoints: Vec<String>,
    evm_operational_wallet_private_key: String,
    evm_operational_wallet_address: Address,
    max_rpc_requests_per_second: Option<u32>,
    tx_confirmations: u64,
    tx_receipt_timeout_ms: u64,
    paymaster: Option<Address>,
}

impl BlockchainConfig {
    pub fn blockchain_id(&self) -> &BlockchainId {
        &self.blockchain_id
    }

    pub fn hub_contract_address(&self) -> Address {
        self.hub_contract_address
    }

    pub fn rpc_endpoints(&self) -> &[String] {
        &self.rpc_endpoints
    }

    pub fn evm_operational_wallet_private_key(&self) -> &str {
        &self.evm_operational_wallet_private_key
    }

    pub fn evm_operational_wallet_address(&self) -> Address {
        self.evm_operational_wallet_address
    }

    pub fn max_rpc_requests_per_second(&self) -> Option<u32> {
        self.max_rpc_requests_per_second
    }

    pub fn tx_confirmations(&self) -> u64 {
        self.tx_confirmations
    }

    pub fn tx_receipt_timeout(&self) -> Option<Duration> {
        if self.tx_receipt_timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.tx_receipt_timeout_ms))
        }
    }

    /// Paymaster passed with each collection; zero address when unset.
    pub fn paymaster(&self) -> Address {
        self.paymaster.unwrap_or(Address::ZERO)
    }

    /// Gas price floor, cap and bump factor for this chain type.
    pub fn gas_config(&self) -> GasConfig {
        match self.blockchain_id.chain_type() {
            t if t.starts_with("hardhat") => GasConfig::hardhat(),
            "otp" => GasConfig::neuroweb(),
            "gnosis" => GasConfig::gnosis(),
            _ => GasConfig::base(),
        }
    }
}

fn parse_evm_address(value: &str) -> Result<Address, ConfigError> {
    value
        .parse::<Address>()
        .map_err(|e| ConfigError::InvalidConfig(format!("invalid EVM address '{}': {}", value, e)))
}

fn derive_evm_address_from_private_key(private_key: &str) -> Result<Address, ConfigError> {
    let signer: PrivateKeySigner = private_key
        .parse()
        .map_err(|e| ConfigError::InvalidConfig(format!("invalid EVM private key: {}", e)))?;
    Ok(signer.address())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    const KEY: &str = "449bf49be49946f2160d288a56e820adc5808806d558f33a2412783a61aad3d7";

    fn sample_raw() -> BlockchainConfigRaw {
        BlockchainConfigRaw {
            blockchain_id: BlockchainId::from("otp:20430"),
            hub_contract_address: "0xe233b5b78853a62b1e11ebe88bf083e25b0a57a6".to_string(),
            rpc_endpoints: vec!["https://lofar-testnet.origin-trail.network".to_string()],
            evm_operational_wallet_private_key: Some(KEY.to_string()),
            evm_operational_wallet_address: None,
            max_rpc_requests_per_second: None,
            tx_confirmations: 1,
            tx_receipt_timeout_ms: 0,
            paymaster: None,
        }
    }

    #[test]
    fn resolves_and_derives_operational_address() {
        let config = sample_raw().resolve().unwrap();
        let expected: PrivateKeySigner = KEY.parse().unwrap();
        assert_eq!(config.evm_operational_wallet_address(), expected.address());
        assert_eq!(config.tx_receipt_timeout(), None);
        assert_eq!(config.paymaster(), Address::ZERO);
    }

    #[test]
    fn rejects_missing_key_and_endpoints() {
        let mut raw = sample_raw();
        raw.evm_operational_wallet_private_key = None;
        assert!(matches!(raw.resolve(), Err(ConfigError::MissingSecret(_))));

        let mut raw = sample_raw();
        raw.rpc_endpoints.clear();
        assert!(matches!(raw.resolve(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_rate_limit_and_mismatched_address() {
        let mut raw = sample_raw();
        raw.max_rpc_requests_per_second = Some(0);
        assert!(matches!(
            raw.resolve(),
            Err(ConfigError::InvalidConfig(ref msg)) if msg.contains("max_rpc_requests_per_second")
        ));

        let mut raw = sample_raw();
        raw.evm_operational_wallet_address =
            Some("0x0000000000000000000000000000000000000001".to_string());
        assert!(matches!(raw.resolve(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_blockchain_id_without_chain_id() {
        let mut raw = sample_raw();
        raw.blockchain_id = BlockchainId::from("otp");
        assert!(matches!(raw.resolve(), Err(ConfigError::InvalidConfig(_))));
    }
}
