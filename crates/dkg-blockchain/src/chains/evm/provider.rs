use std::{num::NonZeroUsize, sync::Arc};

use alloy::{
    network::{Ethereum, EthereumWallet},
    providers::{DynProvider, Provider, ProviderBuilder, WsConnect},
    rpc::client::RpcClient,
    signers::local::{LocalSignerError, PrivateKeySigner},
    transports::{
        BoxTransport, IntoBoxTransport,
        http::{Http, reqwest::Url},
        layers::FallbackLayer,
    },
};
use tower::ServiceBuilder;

use crate::{BlockchainConfig, error::BlockchainError};

pub(crate) type BlockchainProvider = Arc<DynProvider<Ethereum>>;

pub(crate) fn signer_from_private_key(
    private_key: &str,
) -> Result<PrivateKeySigner, BlockchainError> {
    private_key
        .parse()
        .map_err(|e: LocalSignerError| BlockchainError::InvalidPrivateKey {
            key_length: private_key.len(),
            source: e,
        })
}

/// Connects to every usable endpoint and wraps them in a failover transport
/// that queries one endpoint at a time.
async fn connect_transports(rpc_endpoints: &[String]) -> (Vec<BoxTransport>, Vec<String>) {
    let mut transports = Vec::new();
    let mut connected = Vec::new();

    for endpoint in rpc_endpoints {
        if endpoint.starts_with("ws://") || endpoint.starts_with("wss://") {
            match RpcClient::connect_pubsub(WsConnect::new(endpoint)).await {
                Ok(client) => {
                    transports.push(client.transport().clone().into_box_transport());
                    connected.push(endpoint.clone());
                }
                Err(e) => {
                    tracing::warn!(%endpoint, error = %e, "Failed to connect to WebSocket RPC");
                }
            }
            continue;
        }

        match endpoint.parse::<Url>() {
            Ok(url) => {
                transports.push(Http::new(url).into_box_transport());
                connected.push(endpoint.clone());
            }
            Err(e) => tracing::warn!(%endpoint, error = %e, "Invalid RPC URL"),
        }
    }

    (transports, connected)
}

pub(crate) async fn initialize_provider(
    config: &BlockchainConfig,
) -> Result<BlockchainProvider, BlockchainError> {
    let wallet = EthereumWallet::from(signer_from_private_key(
        config.evm_operational_wallet_private_key(),
    )?);
    let endpoints = config.rpc_endpoints();

    let (transports, connected) = connect_transports(endpoints).await;
    if transports.is_empty() {
        return Err(BlockchainError::RpcConnectionFailed {
            attempts: endpoints.len(),
        });
    }

    let transport = ServiceBuilder::new()
        .layer(FallbackLayer::default().with_active_transport_count(NonZeroUsize::MIN))
        .service(transports);
    let client = RpcClient::builder().transport(transport, false);
    let provider = ProviderBuilder::new().wallet(wallet).connect_client(client);

    match provider.get_block_number().await {
        Ok(block) => {
            tracing::info!(
                blockchain = %config.blockchain_id(),
                block,
                endpoints = ?connected,
                "Blockchain provider initialized"
            );
            Ok(Arc::new(provider.erased()))
        }
        Err(e) => {
            tracing::error!(
                blockchain = %config.blockchain_id(),
                error = %e,
                "All RPC endpoints failed connectivity check"
            );
            Err(BlockchainError::RpcConnectionFailed {
                attempts: connected.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn rejects_malformed_private_key() {
        let err = signer_from_private_key("0x1234").unwrap_err();
        assert!(matches!(
            err,
            BlockchainError::InvalidPrivateKey { key_length: 6, .. }
        ));
    }

    #[tokio::test]
    async fn skips_unparseable_http_endpoints() {
        let (transports, connected) =
            connect_transports(&["not a url".to_string(), "http://127.0.0.1:8545".to_string()])
                .await;
        assert_eq!(transports.len(), 1);
        assert_eq!(connected, vec!["http://127.0.0.1:8545".to_string()]);
    }
}
