use dkg_blockchain::{BlockchainConfig, BlockchainConfigRaw};
use serde::{Deserialize, Serialize};

use crate::{
    config::ConfigError,
    controllers::http_api::HttpApiConfig,
    logger::{LoggerConfig, TelemetryConfig},
    queue::QueueConfig,
    services::{NodeConfig, NodeSettings, PublishConfig, PublishSettings},
};

/// Environment variable holding the operational wallet key. Takes precedence
/// over the key in config files.
pub(crate) const OPERATIONAL_KEY_ENV: &str = "EVM_OPERATIONAL_WALLET_PRIVATE_KEY";

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigRaw {
    pub environment: String,
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub http_api: HttpApiConfig,
    pub node: NodeConfig,
    pub publish: PublishConfig,
    pub queue: QueueConfig,
    pub blockchain: BlockchainConfigRaw,
}

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub logger: LoggerConfig,
    pub telemetry: TelemetryConfig,
    pub http_api: HttpApiConfig,
    pub node: NodeSettings,
    pub publish: PublishSettings,
    pub queue: QueueConfig,
    pub blockchain: BlockchainConfig,
}

impl ConfigRaw {
    pub(crate) fn resolve(self) -> Result<Config, ConfigError> {
        self.resolve_with_key(std::env::var(OPERATIONAL_KEY_ENV).ok())
    }

    fn resolve_with_key(mut self, env_key: Option<String>) -> Result<Config, ConfigError> {
        if let Some(key) = env_key.filter(|key| !key.trim().is_empty()) {
            self.blockchain.evm_operational_wallet_private_key = Some(key);
        }

        if self.publish.blockchain != self.blockchain.blockchain_id {
            return Err(ConfigError::InvalidConfig(format!(
                "publish.blockchain '{}' has no matching [blockchain] section (configured: '{}')",
                self.publish.blockchain, self.blockchain.blockchain_id
            )));
        }

        self.queue.validate()?;

        Ok(Config {
            node: self.node.resolve()?,
            publish: self.publish.resolve()?,
            blockchain: self.blockchain.resolve()?,
            logger: self.logger,
            telemetry: self.telemetry,
            http_api: self.http_api,
            queue: self.queue,
        })
    }
}
