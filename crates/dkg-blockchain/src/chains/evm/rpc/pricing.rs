use crate::{chains::evm::EvmChain, error::BlockchainError, types::PricingSnapshot};

impl EvmChain {
    pub(crate) async fn pricing_snapshot(&self) -> Result<PricingSnapshot, BlockchainError> {
        let stake_weighted_average_ask = self
            .rpc_call("get_stake_weighted_average_ask", || async {
                self.contracts()
                    .await
                    .ask_storage()
                    .getStakeWeightedAverageAsk()
                    .call()
                    .await
            })
            .await?;
        let time_until_next_epoch = self
            .rpc_call("time_until_next_epoch", || async {
                self.contracts().await.chronos().timeUntilNextEpoch().call().await
            })
            .await?;
        let epoch_length = self
            .rpc_call("epoch_length", || async {
                self.contracts().await.chronos().epochLength().call().await
            })
            .await?;

        tracing::debug!(
            blockchain = %self.blockchain_id(),
            ask = %stake_weighted_average_ask,
            %time_until_next_epoch,
            %epoch_length,
            "Fetched pricing snapshot"
        );

        Ok(PricingSnapshot {
            stake_weighted_average_ask,
            time_until_next_epoch,
            epoch_length,
        })
    }
}
