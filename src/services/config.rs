use std::time::Duration;

use dkg_blockchain::U256;
use dkg_dataset::BuildOptions;
use dkg_domain::{BillingParams, BlockchainId};
use dkg_node_client::{NodeClientConfig, PollPolicy};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ConfigError;

/// Storage-network node connection and polling settings.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct NodeConfig {
    /// Node base URL, e.g. "https://v6-pegasus-node-02.origin-trail.network:8900".
    pub endpoint: String,
    pub api_version: String,
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Polls per operation before giving up.
    pub max_number_of_retries: u32,
    pub frequency_ms: u64,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeSettings {
    pub client: NodeClientConfig,
    pub poll: PollPolicy,
}

impl NodeConfig {
    pub(crate) fn resolve(self) -> Result<NodeSettings, ConfigError> {
        let endpoint = Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::InvalidConfig(format!("node.endpoint '{}': {}", self.endpoint, e))
        })?;
        if self.frequency_ms == 0 {
            return Err(ConfigError::InvalidConfig(
                "node.frequency_ms must be greater than 0".to_string(),
            ));
        }
        if self.max_number_of_retries == 0 {
            return Err(ConfigError::InvalidConfig(
                "node.max_number_of_retries must be greater than 0".to_string(),
            ));
        }

        Ok(NodeSettings {
            client: NodeClientConfig {
                endpoint,
                api_version: self.api_version,
                auth_token: self.auth_token.filter(|token| !token.is_empty()),
                request_timeout: Duration::from_millis(self.request_timeout_ms),
            },
            poll: PollPolicy::new(
                self.max_number_of_retries,
                Duration::from_millis(self.frequency_ms),
            ),
        })
    }
}

/// What every published dataset is built and paid with.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct PublishConfig {
    pub blockchain: BlockchainId,
    pub epochs: u64,
    pub minimum_number_of_node_replications: u8,
    /// 0 skips finality polling after registration.
    pub minimum_finalization_confirmations: u64,
    pub immutable: bool,
    /// Fixed payment in token wei (decimal). Estimated per dataset when unset.
    #[serde(default)]
    pub token_amount: Option<String>,
    pub max_dataset_size_bytes: u64,
    pub hash_function_id: u8,
}

#[derive(Debug, Clone)]
pub(crate) struct PublishSettings {
    pub build_options: BuildOptions,
    pub hash_function_id: u8,
    pub minimum_finalization_confirmations: u64,
}

impl PublishConfig {
    pub(crate) fn resolve(self) -> Result<PublishSettings, ConfigError> {
        if self.epochs == 0 {
            return Err(ConfigError::InvalidConfig(
                "publish.epochs must be greater than 0".to_string(),
            ));
        }
        let token_amount = self
            .token_amount
            .as_deref()
            .map(|amount| {
                U256::from_str_radix(amount.trim(), 10).map_err(|e| {
                    ConfigError::InvalidConfig(format!("publish.token_amount '{amount}': {e}"))
                })
            })
            .transpose()?;

        let mut build_options = BuildOptions::new(
            self.blockchain,
            BillingParams {
                epochs: self.epochs,
                token_amount,
                immutable: self.immutable,
                minimum_replications: self.minimum_number_of_node_replications,
            },
        );
        build_options.max_dataset_size_bytes = self.max_dataset_size_bytes;

        Ok(PublishSettings {
            build_options,
            hash_function_id: self.hash_function_id,
            minimum_finalization_confirmations: self.minimum_finalization_confirmations,
        })
    }
}
