use alloy::primitives::{Address, U256, aliases::U72, keccak256};

use crate::{chains::evm::EvmChain, error::BlockchainError};

/// `IdentityStorage` key purpose for operational (signing) keys.
const OPERATIONAL_KEY_PURPOSE: u64 = 2;

pub(crate) fn to_identity_id(identity_id: u128) -> Result<U72, BlockchainError> {
    U72::try_from(identity_id).ok().ok_or_else(|| BlockchainError::ValueOutOfRange {
        field: "identity_id",
        value: identity_id.to_string(),
    })
}

impl EvmChain {
    /// True when `signer` is registered as an operational key of `identity_id`.
    pub(crate) async fn key_has_operational_purpose(
        &self,
        identity_id: u128,
        signer: Address,
    ) -> Result<bool, BlockchainError> {
        let identity_id = to_identity_id(identity_id)?;
        let key = keccak256(signer.as_slice());
        let purpose = U256::from(OPERATIONAL_KEY_PURPOSE);

        let has_purpose = self
            .rpc_call("key_has_purpose", || async {
                self.contracts()
                    .await
                    .identity_storage()
                    .keyHasPurpose(identity_id, key, purpose)
                    .call()
                    .await
            })
            .await?;
        Ok(has_purpose)
    }
}
