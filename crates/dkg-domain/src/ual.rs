use alloy::primitives::Address;
use thiserror::Error;

use crate::BlockchainId;

#[derive(Debug, Error)]
pub enum UalParseError {
    #[error("Invalid UAL format: {0}")]
    Format(String),
    #[error("Invalid contract address: {0}")]
    Contract(String),
    #[error("Invalid knowledge collection ID: {0}")]
    KnowledgeCollectionId(String),
    #[error("Invalid knowledge asset ID: {0}")]
    KnowledgeAssetId(String),
}

/// Components of a Universal Asset Locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUal {
    pub blockchain: BlockchainId,
    pub contract: Address,
    pub knowledge_collection_id: u128,
    pub knowledge_asset_id: Option<u128>,
}

impl ParsedUal {
    pub fn to_ual_string(&self) -> String {
        derive_ual(
            &self.blockchain,
            &self.contract,
            self.knowledge_collection_id,
            self.knowledge_asset_id,
        )
    }
}

/// Derive a UAL string from its components.
///
/// `did:dkg:{blockchain}/{contract}/{collection}[/{asset}]`, with the blockchain
/// lowercased and the contract in lowercase hex.
pub fn derive_ual(
    blockchain: &BlockchainId,
    contract: &Address,
    knowledge_collection_id: u128,
    knowledge_asset_id: Option<u128>,
) -> String {
    let base_ual = format!(
        "did:dkg:{}/{:?}/{}",
        blockchain.as_str().to_lowercase(),
        contract,
        knowledge_collection_id
    );

    match knowledge_asset_id {
        Some(asset_id) => format!("{}/{}", base_ual, asset_id),
        None => base_ual,
    }
}

pub fn parse_ual(ual: &str) -> Result<ParsedUal, UalParseError> {
    let stripped = ual
        .strip_prefix("did:dkg:")
        .ok_or_else(|| UalParseError::Format(format!("missing did:dkg: prefix in '{ual}'")))?;

    let parts: Vec<&str> = stripped.split('/').collect();
    let (blockchain, contract, collection, asset) = match parts.as_slice() {
        [blockchain, contract, collection] => (*blockchain, *contract, *collection, None),
        [blockchain, contract, collection, asset] => {
            (*blockchain, *contract, *collection, Some(*asset))
        }
        _ => {
            return Err(UalParseError::Format(format!(
                "Expected 3 or 4 parts, got {}",
                parts.len()
            )));
        }
    };

    let contract = contract
        .parse()
        .map_err(|_| UalParseError::Contract(contract.to_string()))?;
    let knowledge_collection_id = collection
        .parse()
        .map_err(|_| UalParseError::KnowledgeCollectionId(collection.to_string()))?;
    let knowledge_asset_id = asset
        .map(|asset| {
            asset
                .parse()
                .map_err(|_| UalParseError::KnowledgeAssetId(asset.to_string()))
        })
        .transpose()?;

    Ok(ParsedUal {
        blockchain: BlockchainId::from(blockchain),
        contract,
        knowledge_collection_id,
        knowledge_asset_id,
    })
}
