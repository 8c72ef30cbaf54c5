use serde::{Deserialize, Serialize};

/// Unique identifier for a blockchain network.
///
/// Format: "chaintype:chainid" (e.g., "hardhat:31337", "gnosis:100", "otp:20430").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct BlockchainId(String);

impl BlockchainId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Chain type prefix, e.g. "otp" for "otp:20430".
    pub fn chain_type(&self) -> &str {
        self.0.split(':').next().unwrap_or_default()
    }

    /// Parse the chain ID from the blockchain ID.
    /// Returns None if the chain ID is missing or not a valid number.
    pub fn chain_id(&self) -> Option<u64> {
        self.0.split(':').nth(1).and_then(|s| s.parse().ok())
    }
}

impl std::fmt::Display for BlockchainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for BlockchainId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for BlockchainId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn splits_chain_type_and_id() {
        let id = BlockchainId::from("otp:20430");
        assert_eq!(id.chain_type(), "otp");
        assert_eq!(id.chain_id(), Some(20430));

        let missing = BlockchainId::from("hardhat");
        assert_eq!(missing.chain_type(), "hardhat");
        assert_eq!(missing.chain_id(), None);
    }
}
