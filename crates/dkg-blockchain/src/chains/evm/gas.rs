//! Fee quoting and fee bumps for registration transactions.
//!
//! EIP-1559 estimates are preferred; chains or RPCs without them fall back to
//! legacy `gasPrice`. Every quote is clamped to the chain's floor and cap.

use alloy::{primitives::U256, providers::Provider};

use super::EvmChain;

#[derive(Debug, Clone)]
pub struct GasConfig {
    /// Floor for provider-reported prices, in wei.
    pub default_gas_price: U256,
    /// Multiplier applied on each fee bump (1.2 = +20%).
    pub bump_factor: f64,
    /// Cap for legacy `gasPrice` and EIP-1559 `maxFeePerGas`, in wei.
    pub max_gas_price: U256,
}

impl GasConfig {
    pub fn hardhat() -> Self {
        Self {
            default_gas_price: U256::from(20u64),
            bump_factor: 1.2,
            max_gas_price: U256::from(1_000_000_000u64),
        }
    }

    pub fn neuroweb() -> Self {
        Self {
            default_gas_price: U256::from(8u64),
            bump_factor: 1.2,
            max_gas_price: U256::from(1_000_000_000u64),
        }
    }

    pub fn gnosis() -> Self {
        Self {
            default_gas_price: U256::from(1_000_000_000u64),
            bump_factor: 1.2,
            max_gas_price: U256::from(100_000_000_000u64),
        }
    }

    pub fn base() -> Self {
        Self {
            default_gas_price: U256::from(1_000_000_000u64),
            bump_factor: 1.2,
            max_gas_price: U256::from(500_000_000_000u64),
        }
    }

    /// Next fee after a bump, or `None` once the cap would be exceeded.
    fn bump_wei(&self, current: U256) -> Option<U256> {
        let current: u128 = current.try_into().ok()?;
        let bumped = U256::from((current as f64 * self.bump_factor).ceil() as u128);
        (bumped <= self.max_gas_price).then_some(bumped)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeeQuote {
    Legacy {
        gas_price: U256,
    },
    Eip1559 {
        max_fee_per_gas: U256,
        max_priority_fee_per_gas: U256,
    },
}

impl FeeQuote {
    pub(crate) fn bump(&self, gas_config: &GasConfig) -> Option<Self> {
        match self {
            FeeQuote::Legacy { gas_price } => gas_config
                .bump_wei(*gas_price)
                .map(|gas_price| FeeQuote::Legacy { gas_price }),
            FeeQuote::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                let max_fee_per_gas = gas_config.bump_wei(*max_fee_per_gas)?;
                let tip = gas_config.bump_wei(*max_priority_fee_per_gas)?;
                Some(FeeQuote::Eip1559 {
                    max_fee_per_gas,
                    max_priority_fee_per_gas: tip.min(max_fee_per_gas),
                })
            }
        }
    }
}

fn clamp_eip1559(max_fee: U256, max_priority: U256, cap: U256, floor: U256) -> (U256, U256) {
    let max_fee = max_fee.max(floor).min(cap);
    (max_fee, max_priority.min(max_fee))
}

fn clamp_legacy(gas_price: U256, cap: U256, floor: U256) -> U256 {
    gas_price.max(floor).min(cap)
}

impl EvmChain {
    pub(crate) async fn get_fee_quote(&self) -> FeeQuote {
        let floor = self.gas_config.default_gas_price;
        let cap = self.gas_config.max_gas_price;

        match self
            .rpc_call("estimate_eip1559_fees", || async {
                self.provider().await.estimate_eip1559_fees().await
            })
            .await
        {
            Ok(estimate) => {
                let (max_fee_per_gas, max_priority_fee_per_gas) = clamp_eip1559(
                    U256::from(estimate.max_fee_per_gas),
                    U256::from(estimate.max_priority_fee_per_gas),
                    cap,
                    floor,
                );
                return FeeQuote::Eip1559 {
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                };
            }
            Err(e) => {
                tracing::debug!(
                    blockchain = %self.blockchain_id(),
                    error = %e,
                    "EIP-1559 fee estimation failed; falling back to legacy gasPrice"
                );
            }
        }

        let gas_price = match self
            .rpc_call("get_gas_price", || async {
                self.provider().await.get_gas_price().await
            })
            .await
        {
            Ok(price) => U256::from(price),
            Err(e) => {
                tracing::warn!(
                    blockchain = %self.blockchain_id(),
                    error = %e,
                    "Failed to get provider gasPrice; using default"
                );
                floor
            }
        };

        FeeQuote::Legacy {
            gas_price: clamp_legacy(gas_price, cap, floor),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn config(floor: u64, cap: u64) -> GasConfig {
        GasConfig {
            default_gas_price: U256::from(floor),
            bump_factor: 1.2,
            max_gas_price: U256::from(cap),
        }
    }

    #[test]
    fn bump_raises_both_fee_kinds_by_factor() {
        let gas_config = config(1, 200);

        let legacy = FeeQuote::Legacy {
            gas_price: U256::from(100u64),
        };
        assert_eq!(
            legacy.bump(&gas_config),
            Some(FeeQuote::Legacy {
                gas_price: U256::from(120u64)
            })
        );

        let eip = FeeQuote::Eip1559 {
            max_fee_per_gas: U256::from(100u64),
            max_priority_fee_per_gas: U256::from(10u64),
        };
        assert_eq!(
            eip.bump(&gas_config),
            Some(FeeQuote::Eip1559 {
                max_fee_per_gas: U256::from(120u64),
                max_priority_fee_per_gas: U256::from(12u64),
            })
        );
    }

    #[test]
    fn bump_stops_at_cap() {
        let quote = FeeQuote::Legacy {
            gas_price: U256::from(100u64),
        };
        assert_eq!(quote.bump(&config(1, 110)), None);
    }

    #[test]
    fn clamps_respect_floor_and_cap() {
        let floor = U256::from(10u64);
        let cap = U256::from(100u64);

        assert_eq!(clamp_legacy(U256::from(1u64), cap, floor), floor);
        assert_eq!(clamp_legacy(U256::from(50u64), cap, floor), U256::from(50u64));
        assert_eq!(clamp_legacy(U256::from(500u64), cap, floor), cap);

        let (max_fee, tip) = clamp_eip1559(U256::from(1u64), U256::from(999u64), cap, floor);
        assert_eq!(max_fee, floor);
        assert_eq!(tip, floor);
    }

    #[test]
    fn chain_presets_have_floor_below_cap() {
        for preset in [
            GasConfig::hardhat(),
            GasConfig::neuroweb(),
            GasConfig::gnosis(),
            GasConfig::base(),
        ] {
            assert!(preset.default_gas_price < preset.max_gas_price);
        }
    }
}
