use std::time::Instant;

use alloy::{
    contract::{CallBuilder, CallDecoder, Error as ContractError},
    network::Ethereum,
    providers::PendingTransactionBuilder,
    rpc::types::TransactionReceipt,
};
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};

use crate::{
    BlockchainConfig, BlockchainId,
    error::BlockchainError,
    rpc_executor::{
        RetryPolicy, RetryableError, RpcRateLimiter, backoff_delay, should_bump_gas_price,
    },
};

mod contracts;
mod error_decode;
mod gas;
mod provider;
pub(crate) mod rpc;

use contracts::{Contracts, initialize_contracts};
pub(crate) use contracts::{KnowledgeCollectionBatch, KnowledgeCollectionStorage};
use error_decode::decode_contract_error;
use gas::FeeQuote;
pub use gas::GasConfig;
use provider::{BlockchainProvider, initialize_provider};

const GAS_ESTIMATE_MULTIPLIER: f64 = 1.2;

/// One connected EVM chain: provider with failover, Hub-resolved contracts,
/// retrying RPC reads and serialized transaction submission.
pub(crate) struct EvmChain {
    config: BlockchainConfig,
    provider: RwLock<BlockchainProvider>,
    contracts: RwLock<Contracts>,
    gas_config: GasConfig,

    rpc_rate_limiter: RpcRateLimiter,
    tx_mutex: Mutex<()>,
    provider_refresh_mutex: Mutex<()>,
    rpc_retry_policy: RetryPolicy,
    tx_retry_policy: RetryPolicy,
}

impl EvmChain {
    pub(crate) async fn new(config: BlockchainConfig) -> Result<Self, BlockchainError> {
        let provider = initialize_provider(&config).await?;
        let contracts = initialize_contracts(&config, &provider).await?;
        let gas_config = config.gas_config();

        let rpc_rate_limiter = RpcRateLimiter::new(config.max_rpc_requests_per_second());
        if let Some(rps) = config.max_rpc_requests_per_second() {
            tracing::info!(
                blockchain = %config.blockchain_id(),
                rps,
                "RPC rate limiting enabled"
            );
        }

        tracing::info!(
            blockchain = %config.blockchain_id(),
            operational_wallet = %config.evm_operational_wallet_address(),
            default_gas_price = %gas_config.default_gas_price,
            max_gas_price = %gas_config.max_gas_price,
            "Initialized EVM chain"
        );

        Ok(Self {
            provider: RwLock::new(provider),
            contracts: RwLock::new(contracts),
            config,
            gas_config,
            rpc_rate_limiter,
            tx_mutex: Mutex::new(()),
            provider_refresh_mutex: Mutex::new(()),
            rpc_retry_policy: RetryPolicy::rpc_default(),
            tx_retry_policy: RetryPolicy::tx_default(),
        })
    }

    pub(crate) fn blockchain_id(&self) -> &BlockchainId {
        self.config.blockchain_id()
    }

    pub(crate) fn config(&self) -> &BlockchainConfig {
        &self.config
    }

    pub(crate) async fn provider(&self) -> BlockchainProvider {
        self.provider.read().await.clone()
    }

    pub(crate) async fn contracts(&self) -> RwLockReadGuard<'_, Contracts> {
        self.contracts.read().await
    }

    /// Rate-limited RPC read, retried with backoff on transient errors.
    ///
    /// ```ignore
    /// let ask = self.rpc_call("ask", || async { contract.method().call().await }).await?;
    /// ```
    pub(crate) async fn rpc_call<T, E, F, O>(
        &self,
        operation: &'static str,
        mut call: F,
    ) -> Result<T, E>
    where
        E: RetryableError,
        F: FnMut() -> O,
        O: std::future::IntoFuture<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            self.rpc_rate_limiter.acquire().await;
            let err = match call().into_future().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            if attempt >= self.rpc_retry_policy.max_attempts || !err.is_retryable() {
                return Err(err);
            }
            if err.should_refresh_provider() {
                self.refresh_after_backend_error().await;
            }

            let delay = backoff_delay(&self.rpc_retry_policy, attempt, err.backoff_hint());
            tracing::warn!(
                blockchain = %self.blockchain_id(),
                operation,
                attempt,
                max_attempts = self.rpc_retry_policy.max_attempts,
                delay_ms = delay.as_millis(),
                error = %err,
                "RPC call failed; retrying"
            );
            dkg_observability::record_blockchain_rpc_retry(self.blockchain_id().as_str(), operation);
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Submits a transaction built from the current contracts.
    ///
    /// Submissions are serialized per chain to keep nonces ordered. Gas is
    /// estimated once and padded; fee-related rejections bump the fee quote.
    pub(crate) async fn tx_call<D, F>(
        &self,
        operation: &'static str,
        mut build_call: F,
    ) -> Result<PendingTransactionBuilder<Ethereum>, ContractError>
    where
        D: CallDecoder,
        for<'a> F: FnMut(&'a Contracts) -> CallBuilder<&'a BlockchainProvider, D, Ethereum>,
    {
        let _guard = self.tx_mutex.lock().await;

        let mut attempt = 1;
        let mut fee_quote = self.get_fee_quote().await;
        let mut gas_limit: Option<u64> = None;

        loop {
            let contracts = self.contracts().await;
            let mut call = build_call(&contracts).with_cloned_provider();
            drop(contracts);

            call = match &fee_quote {
                FeeQuote::Legacy { gas_price } => call.gas_price(gas_price.to::<u128>()),
                FeeQuote::Eip1559 {
                    max_fee_per_gas,
                    max_priority_fee_per_gas,
                } => call
                    .max_fee_per_gas(max_fee_per_gas.to::<u128>())
                    .max_priority_fee_per_gas(max_priority_fee_per_gas.to::<u128>()),
            };

            let stage_started = Instant::now();
            let (stage, result) = match gas_limit {
                None => {
                    self.rpc_rate_limiter.acquire().await;
                    match call.estimate_gas().await {
                        Ok(estimate) => {
                            gas_limit = Some(apply_gas_estimate_multiplier(estimate));
                            continue;
                        }
                        Err(err) => ("estimate_gas", Err(err)),
                    }
                }
                Some(limit) => {
                    self.rpc_rate_limiter.acquire().await;
                    ("send", call.gas(limit).send().await)
                }
            };

            let err = match result {
                Ok(pending_tx) => {
                    dkg_observability::record_blockchain_tx_stage(
                        self.blockchain_id().as_str(),
                        operation,
                        stage,
                        "ok",
                        stage_started.elapsed(),
                    );
                    return Ok(pending_tx);
                }
                Err(err) => err,
            };
            dkg_observability::record_blockchain_tx_stage(
                self.blockchain_id().as_str(),
                operation,
                stage,
                "error",
                stage_started.elapsed(),
            );

            let bump_needed = stage == "send" && should_bump_gas_price(&err);
            if attempt >= self.tx_retry_policy.max_attempts
                || !(err.is_retryable() || bump_needed)
            {
                return Err(err);
            }
            if err.should_refresh_provider() {
                self.refresh_after_backend_error().await;
            }
            if bump_needed {
                match fee_quote.bump(&self.gas_config) {
                    Some(bumped) => fee_quote = bumped,
                    None => return Err(err),
                }
            }

            let delay = backoff_delay(&self.tx_retry_policy, attempt, err.backoff_hint());
            tracing::warn!(
                blockchain = %self.blockchain_id(),
                operation,
                stage,
                attempt,
                max_attempts = self.tx_retry_policy.max_attempts,
                delay_ms = delay.as_millis(),
                error = %err,
                decoded_error = ?decode_contract_error(&err),
                "Transaction stage failed; retrying"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Awaits the receipt with the configured confirmations and timeout.
    /// A mined but reverted transaction is an error.
    pub(crate) async fn handle_contract_call(
        &self,
        operation: &'static str,
        result: Result<PendingTransactionBuilder<Ethereum>, ContractError>,
    ) -> Result<TransactionReceipt, BlockchainError> {
        let pending_tx = match result {
            Ok(pending_tx) => pending_tx,
            Err(err) => {
                let decoded_error = decode_contract_error(&err);
                tracing::error!(
                    blockchain = %self.blockchain_id(),
                    operation,
                    decoded_error = ?decoded_error,
                    error = %err,
                    "Contract call failed"
                );
                return Err(match decoded_error {
                    Some(reason) => BlockchainError::TransactionFailed {
                        operation: operation.to_string(),
                        reason,
                    },
                    None => BlockchainError::Contract(err),
                });
            }
        };

        let tx_hash = *pending_tx.tx_hash();
        let started = Instant::now();
        let receipt = pending_tx
            .with_required_confirmations(self.config.tx_confirmations())
            .with_timeout(self.config.tx_receipt_timeout())
            .get_receipt()
            .await;

        let receipt = match receipt {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::error!(
                    blockchain = %self.blockchain_id(),
                    operation,
                    %tx_hash,
                    error = %err,
                    "Failed to retrieve transaction receipt"
                );
                dkg_observability::record_blockchain_tx_stage(
                    self.blockchain_id().as_str(),
                    operation,
                    "receipt",
                    "error",
                    started.elapsed(),
                );
                return Err(BlockchainError::ReceiptFailed {
                    reason: err.to_string(),
                });
            }
        };

        let status = if receipt.status() { "ok" } else { "reverted" };
        dkg_observability::record_blockchain_tx_stage(
            self.blockchain_id().as_str(),
            operation,
            "receipt",
            status,
            started.elapsed(),
        );
        if !receipt.status() {
            return Err(BlockchainError::TransactionReverted {
                tx_hash: tx_hash.to_string(),
            });
        }

        Ok(receipt)
    }

    async fn refresh_after_backend_error(&self) {
        if let Err(e) = self.refresh_provider_and_contracts().await {
            tracing::error!(
                blockchain = %self.blockchain_id(),
                error = %e,
                "Failed to refresh provider after backend error"
            );
        }
    }

    async fn refresh_provider_and_contracts(&self) -> Result<(), BlockchainError> {
        let _guard = self.provider_refresh_mutex.lock().await;

        let provider = initialize_provider(&self.config).await?;
        let contracts = initialize_contracts(&self.config, &provider).await?;

        *self.provider.write().await = provider;
        *self.contracts.write().await = contracts;

        tracing::info!(
            blockchain = %self.blockchain_id(),
            "Refreshed provider and contract instances"
        );
        Ok(())
    }
}

fn apply_gas_estimate_multiplier(estimate: u64) -> u64 {
    let scaled = (estimate as f64 * GAS_ESTIMATE_MULTIPLIER).ceil();
    if !scaled.is_finite() {
        return estimate;
    }
    (scaled.min(u64::MAX as f64) as u64).max(estimate)
}
