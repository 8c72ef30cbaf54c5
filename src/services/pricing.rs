use async_trait::async_trait;
use dkg_blockchain::{BlockchainError, BlockchainManager, PricingSnapshot, U256};
use dkg_domain::BlockchainId;

/// Ledger reads behind the publish cost estimate.
#[async_trait]
pub(crate) trait PricingSource: Send + Sync {
    async fn pricing_snapshot(
        &self,
        blockchain: &BlockchainId,
    ) -> Result<PricingSnapshot, BlockchainError>;
}

#[async_trait]
impl PricingSource for BlockchainManager {
    async fn pricing_snapshot(
        &self,
        blockchain: &BlockchainId,
    ) -> Result<PricingSnapshot, BlockchainError> {
        BlockchainManager::pricing_snapshot(self, blockchain).await
    }
}

const WEI_PER_TOKEN: u64 = 1_000_000_000_000_000_000;
const BYTES_PER_KIB: u64 = 1024;

/// Token amount for storing `dataset_size` bytes over `epochs` full epochs plus
/// the remainder of the current one:
/// `ask * (epochs * 1e18 + timeUntilNextEpoch * 1e18 / epochLength) * size / 1024 / 1e18`.
pub(crate) fn estimate_token_amount(
    snapshot: &PricingSnapshot,
    epochs: u64,
    dataset_size: u64,
) -> U256 {
    let scale = U256::from(WEI_PER_TOKEN);
    let current_epoch_fraction = snapshot
        .time_until_next_epoch
        .saturating_mul(scale)
        .checked_div(snapshot.epoch_length)
        .unwrap_or_default();
    let epoch_units = U256::from(epochs)
        .saturating_mul(scale)
        .saturating_add(current_epoch_fraction);

    snapshot
        .stake_weighted_average_ask
        .saturating_mul(epoch_units)
        .saturating_mul(U256::from(dataset_size))
        / U256::from(BYTES_PER_KIB)
        / scale
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn snapshot(ask: u64, until_next: u64, length: u64) -> PricingSnapshot {
        PricingSnapshot {
            stake_weighted_average_ask: U256::from(ask),
            time_until_next_epoch: U256::from(until_next),
            epoch_length: U256::from(length),
        }
    }

    #[test]
    fn whole_epochs_scale_with_kib() {
        // Epoch boundary reached: no partial epoch.
        let amount = estimate_token_amount(&snapshot(1000, 0, 3600), 2, 2048);
        assert_eq!(amount, U256::from(4000));
    }

    #[test]
    fn partial_epoch_is_prorated() {
        // Half an epoch left: 2.5 epochs of 1 KiB at ask 1000.
        let amount = estimate_token_amount(&snapshot(1000, 1800, 3600), 2, 1024);
        assert_eq!(amount, U256::from(2500));
    }

    #[test]
    fn zero_epoch_length_ignores_the_current_epoch() {
        let amount = estimate_token_amount(&snapshot(1000, 1800, 0), 1, 1024);
        assert_eq!(amount, U256::from(1000));
    }

    #[test]
    fn rounds_down_small_datasets() {
        let amount = estimate_token_amount(&snapshot(1, 0, 3600), 1, 32);
        assert_eq!(amount, U256::ZERO);
    }
}
