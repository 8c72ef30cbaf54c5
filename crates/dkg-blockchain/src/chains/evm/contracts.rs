use alloy::{primitives::Address, sol};

use super::provider::BlockchainProvider;
use crate::{BlockchainConfig, error::BlockchainError};

sol! {
    #[derive(Debug)]
    #[sol(rpc)]
    contract Hub {
        struct RegisteredContract {
            string name;
            address addr;
        }

        error ContractDoesNotExist(string contractName);

        function getContractAddress(string memory contractName) external view returns (address);
        function getAllAssetStorages() external view returns (RegisteredContract[] memory);
    }
}

sol! {
    #[sol(rpc)]
    contract IdentityStorage {
        function keyHasPurpose(uint72 identityId, bytes32 _key, uint256 _purpose) external view returns (bool);
    }
}

sol! {
    #[sol(rpc)]
    contract Chronos {
        function getCurrentEpoch() external view returns (uint256);
        function epochLength() external view returns (uint256);
        function timeUntilNextEpoch() external view returns (uint256);
    }
}

sol! {
    #[sol(rpc)]
    contract AskStorage {
        function getStakeWeightedAverageAsk() external view returns (uint256);
    }
}

sol! {
    #[derive(Debug)]
    #[sol(rpc)]
    contract Token {
        error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed);
        error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);

        function allowance(address owner, address spender) external view returns (uint256);
        function increaseAllowance(address spender, uint256 addedValue) external returns (bool);
    }
}

sol! {
    #[derive(Debug)]
    #[sol(rpc)]
    contract KnowledgeCollectionBatch {
        struct KnowledgeCollectionParams {
            string publishOperationId;
            bytes32 merkleRoot;
            uint256 knowledgeAssetsAmount;
            uint256 byteSize;
            uint256 epochs;
            uint256 tokenAmount;
            bool isImmutable;
            address paymaster;
            uint72 publisherNodeIdentityId;
            bytes32 publisherNodeR;
            bytes32 publisherNodeVS;
            uint72[] identityIds;
            bytes32[] r;
            bytes32[] vs;
        }

        error EmptyBatch();
        error InvalidTokenAmount(uint256 expected, uint256 provided);
        error MinSignaturesRequirementNotMet(uint256 required, uint256 received);
        error InvalidSignature(uint72 identityId, bytes32 messageHash, bytes32 r, bytes32 vs);
        error SignerIsNotNodeOperator(uint72 identityId, address signer);

        function createKnowledgeCollections(KnowledgeCollectionParams[] calldata collections) external returns (uint256[] memory);
    }
}

sol! {
    #[sol(rpc)]
    contract KnowledgeCollectionStorage {
        event KnowledgeCollectionCreated(
            uint256 indexed id,
            string publishOperationId,
            bytes32 merkleRoot,
            uint88 byteSize,
            uint40 startEpoch,
            uint40 endEpoch,
            uint96 tokenAmount,
            bool isImmutable
        );
    }
}

const KNOWLEDGE_COLLECTION_STORAGE: &str = "KnowledgeCollectionStorage";

/// Contract instances resolved through the Hub at startup.
pub(crate) struct Contracts {
    hub: Hub::HubInstance<BlockchainProvider>,
    identity_storage: IdentityStorage::IdentityStorageInstance<BlockchainProvider>,
    chronos: Chronos::ChronosInstance<BlockchainProvider>,
    ask_storage: AskStorage::AskStorageInstance<BlockchainProvider>,
    token: Token::TokenInstance<BlockchainProvider>,
    knowledge_collection_batch:
        KnowledgeCollectionBatch::KnowledgeCollectionBatchInstance<BlockchainProvider>,
    knowledge_collection_storages: Vec<Address>,
}

impl Contracts {
    pub(crate) fn identity_storage(
        &self,
    ) -> &IdentityStorage::IdentityStorageInstance<BlockchainProvider> {
        &self.identity_storage
    }

    pub(crate) fn chronos(&self) -> &Chronos::ChronosInstance<BlockchainProvider> {
        &self.chronos
    }

    pub(crate) fn ask_storage(&self) -> &AskStorage::AskStorageInstance<BlockchainProvider> {
        &self.ask_storage
    }

    pub(crate) fn token(&self) -> &Token::TokenInstance<BlockchainProvider> {
        &self.token
    }

    pub(crate) fn knowledge_collection_batch(
        &self,
    ) -> &KnowledgeCollectionBatch::KnowledgeCollectionBatchInstance<BlockchainProvider> {
        &self.knowledge_collection_batch
    }

    /// Whether `address` is a KnowledgeCollectionStorage registered in the Hub.
    pub(crate) fn is_knowledge_collection_storage(&self, address: &Address) -> bool {
        self.knowledge_collection_storages.contains(address)
    }
}

async fn resolve_address(
    hub: &Hub::HubInstance<BlockchainProvider>,
    name: &str,
) -> Result<Address, BlockchainError> {
    let address = hub
        .getContractAddress(name.to_string())
        .call()
        .await
        .map_err(|e| BlockchainError::ContractInit {
            reason: format!("failed to resolve {name} via Hub: {e}"),
        })?;
    if address.is_zero() {
        return Err(BlockchainError::ContractInit {
            reason: format!("{name} is not registered in Hub"),
        });
    }
    Ok(address)
}

pub(crate) async fn initialize_contracts(
    config: &BlockchainConfig,
    provider: &BlockchainProvider,
) -> Result<Contracts, BlockchainError> {
    let hub = Hub::new(config.hub_contract_address(), provider.clone());

    let knowledge_collection_storages: Vec<Address> = hub
        .getAllAssetStorages()
        .call()
        .await
        .map_err(|e| BlockchainError::ContractInit {
            reason: format!("failed to list asset storages: {e}"),
        })?
        .into_iter()
        .filter(|storage| storage.name == KNOWLEDGE_COLLECTION_STORAGE)
        .map(|storage| storage.addr)
        .collect();

    if knowledge_collection_storages.is_empty() {
        return Err(BlockchainError::ContractInit {
            reason: "no KnowledgeCollectionStorage registered in Hub".to_string(),
        });
    }

    let contracts = Contracts {
        identity_storage: IdentityStorage::new(
            resolve_address(&hub, "IdentityStorage").await?,
            provider.clone(),
        ),
        chronos: Chronos::new(resolve_address(&hub, "Chronos").await?, provider.clone()),
        ask_storage: AskStorage::new(resolve_address(&hub, "AskStorage").await?, provider.clone()),
        token: Token::new(resolve_address(&hub, "Token").await?, provider.clone()),
        knowledge_collection_batch: KnowledgeCollectionBatch::new(
            resolve_address(&hub, "KnowledgeCollectionBatch").await?,
            provider.clone(),
        ),
        knowledge_collection_storages,
        hub,
    };

    tracing::debug!(
        blockchain = %config.blockchain_id(),
        hub = %contracts.hub.address(),
        batch = %contracts.knowledge_collection_batch.address(),
        "Resolved contracts via Hub"
    );

    Ok(contracts)
}
