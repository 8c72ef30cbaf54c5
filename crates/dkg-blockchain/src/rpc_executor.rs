//! Retry, backoff and rate limiting shared by every chain RPC and transaction.

use std::{num::NonZeroU32, time::Duration};

use alloy::{
    contract::Error as ContractError,
    providers::PendingTransactionError,
    transports::{RpcError, TransportErrorKind},
};
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Node error messages that are fixed by resubmitting with a higher fee.
const BUMP_GAS_PATTERNS: [&str; 8] = [
    "replacement transaction underpriced",
    "transaction underpriced",
    "fee too low",
    "max fee per gas less than block base fee",
    "priority fee too low",
    "nonce too low",
    "nonce has already been used",
    "already known",
];

const RATE_LIMIT_PATTERNS: [&str; 3] = ["rate limit", "too many requests", "request limit"];

#[derive(Debug, Clone)]
pub(crate) struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn rpc_default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }

    pub(crate) fn tx_default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(5),
        }
    }
}

pub(crate) trait RetryableError: std::fmt::Display {
    fn is_retryable(&self) -> bool;

    fn backoff_hint(&self) -> Option<Duration> {
        None
    }

    fn should_refresh_provider(&self) -> bool {
        false
    }
}

impl RetryableError for RpcError<TransportErrorKind> {
    fn is_retryable(&self) -> bool {
        is_retryable_rpc_error(self)
    }

    fn backoff_hint(&self) -> Option<Duration> {
        rpc_backoff_hint(self)
    }

    fn should_refresh_provider(&self) -> bool {
        matches!(
            self,
            RpcError::Transport(TransportErrorKind::BackendGone)
                | RpcError::Transport(TransportErrorKind::PubsubUnavailable)
        )
    }
}

impl RetryableError for ContractError {
    fn is_retryable(&self) -> bool {
        if self.as_revert_data().is_some() {
            return false;
        }
        match self {
            ContractError::TransportError(inner) => inner.is_retryable(),
            ContractError::PendingTransactionError(PendingTransactionError::TransportError(
                inner,
            )) => inner.is_retryable(),
            _ => false,
        }
    }

    fn backoff_hint(&self) -> Option<Duration> {
        match self {
            ContractError::TransportError(inner)
            | ContractError::PendingTransactionError(PendingTransactionError::TransportError(
                inner,
            )) => inner.backoff_hint(),
            _ => None,
        }
    }

    fn should_refresh_provider(&self) -> bool {
        match self {
            ContractError::TransportError(inner)
            | ContractError::PendingTransactionError(PendingTransactionError::TransportError(
                inner,
            )) => inner.should_refresh_provider(),
            _ => false,
        }
    }
}

fn is_retryable_rpc_error(err: &RpcError<TransportErrorKind>) -> bool {
    match err {
        RpcError::Transport(kind) => match kind {
            TransportErrorKind::MissingBatchResponse(_) | TransportErrorKind::BackendGone => true,
            TransportErrorKind::HttpError(http) => {
                http.is_rate_limit_err() || http.is_temporarily_unavailable()
            }
            TransportErrorKind::Custom(custom) => mentions_rate_limit(&custom.to_string()),
            _ => false,
        },
        RpcError::ErrorResp(payload) => payload.is_retry_err(),
        RpcError::NullResp => true,
        RpcError::DeserError { text, .. } => mentions_rate_limit(text),
        _ => false,
    }
}

fn mentions_rate_limit(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    RATE_LIMIT_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

/// Reads `rate.backoff_seconds` from a JSON-RPC error payload, as sent by some hosted RPCs.
fn rpc_backoff_hint(err: &RpcError<TransportErrorKind>) -> Option<Duration> {
    let RpcError::ErrorResp(payload) = err else {
        return None;
    };
    let data = payload.try_data_as::<serde_json::Value>()?.ok()?;
    let seconds = data["rate"]["backoff_seconds"].as_f64()?;
    Some(Duration::from_secs(seconds.ceil() as u64))
}

pub(crate) fn should_bump_gas_price(err: &ContractError) -> bool {
    if err.as_revert_data().is_some() {
        return false;
    }

    let message = match err {
        ContractError::TransportError(RpcError::ErrorResp(payload)) => payload.to_string(),
        ContractError::TransportError(RpcError::Transport(TransportErrorKind::HttpError(
            http,
        ))) => http.body.clone(),
        _ => err.to_string(),
    }
    .to_ascii_lowercase();

    BUMP_GAS_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

/// Exponential delay for `attempt` (1-based), capped by the policy. A server hint wins when present.
pub(crate) fn backoff_delay(
    policy: &RetryPolicy,
    attempt: usize,
    hint: Option<Duration>,
) -> Duration {
    if let Some(hint) = hint {
        return hint.min(policy.max_delay);
    }

    let exponent = attempt.saturating_sub(1).min(6) as u32;
    let delay = policy.base_delay.saturating_mul(1u32 << exponent);
    delay.min(policy.max_delay)
}

/// Requests-per-second limiter in front of the RPC endpoints. Unlimited when unset.
pub(crate) struct RpcRateLimiter {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RpcRateLimiter {
    pub(crate) fn new(requests_per_second: Option<u32>) -> Self {
        let limiter = requests_per_second
            .and_then(NonZeroU32::new)
            .map(|rps| RateLimiter::direct(Quota::per_second(rps)));
        Self { limiter }
    }

    pub(crate) async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}
