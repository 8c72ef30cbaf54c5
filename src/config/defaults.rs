//! Typed default configurations for each environment.
//!
//! Each environment (development, testnet, mainnet) gets a fully constructed
//! [`ConfigRaw`] via [`config_for`]; `config.toml` and `--config` layer on top.

use dkg_blockchain::BlockchainConfigRaw;
use dkg_dataset::DEFAULT_MAX_DATASET_SIZE_BYTES;

use super::{ConfigError, ConfigRaw};
use crate::{
    controllers::http_api::HttpApiConfig,
    logger::{LogFormat, LoggerConfig, TelemetryConfig, TelemetryMetricsConfig},
    queue::{QueueConfig, RegistrationFailurePolicy},
    services::{NodeConfig, PublishConfig},
};

/// Returns the default [`ConfigRaw`] for the given environment name.
pub(crate) fn config_for(environment: &str) -> Result<ConfigRaw, ConfigError> {
    match environment {
        "development" => Ok(development()),
        "testnet" => Ok(testnet()),
        "mainnet" => Ok(mainnet()),
        _ => Err(ConfigError::UnknownEnvironment(environment.to_string())),
    }
}

// ── Shared defaults (identical across all environments) ─────────

fn http_api() -> HttpApiConfig {
    HttpApiConfig {
        enabled: true,
        port: 9400,
    }
}

fn queue() -> QueueConfig {
    QueueConfig {
        stage_a_interval_ms: 5_000,
        stage_b_interval_ms: 60_000,
        registration_failure_policy: RegistrationFailurePolicy::Drop,
    }
}

// ── Parameterized helpers (shared structure, varying values) ────

fn telemetry(metrics_enabled: bool) -> TelemetryConfig {
    TelemetryConfig {
        metrics: TelemetryMetricsConfig {
            enabled: metrics_enabled,
            bind_address: "127.0.0.1:9464".to_string(),
        },
    }
}

fn node(endpoint: &str) -> NodeConfig {
    NodeConfig {
        endpoint: endpoint.to_string(),
        api_version: "v1".to_string(),
        auth_token: None,
        max_number_of_retries: 300,
        frequency_ms: 2_000,
        request_timeout_ms: 30_000,
    }
}

fn publish(blockchain_id: &str, minimum_finalization_confirmations: u64) -> PublishConfig {
    PublishConfig {
        blockchain: blockchain_id.into(),
        epochs: 2,
        minimum_number_of_node_replications: 1,
        minimum_finalization_confirmations,
        immutable: false,
        token_amount: None,
        max_dataset_size_bytes: DEFAULT_MAX_DATASET_SIZE_BYTES,
        hash_function_id: 1,
    }
}

fn blockchain(
    blockchain_id: &str,
    hub_contract_address: &str,
    rpc_endpoints: &[&str],
    tx_confirmations: u64,
) -> BlockchainConfigRaw {
    BlockchainConfigRaw {
        blockchain_id: blockchain_id.into(),
        hub_contract_address: hub_contract_address.to_string(),
        rpc_endpoints: rpc_endpoints.iter().map(|e| e.to_string()).collect(),
        evm_operational_wallet_private_key: None,
        evm_operational_wallet_address: None,
        max_rpc_requests_per_second: None,
        tx_confirmations,
        tx_receipt_timeout_ms: 300_000,
        paymaster: None,
    }
}

// ── Per-environment constructors ────────────────────────────────

fn development() -> ConfigRaw {
    ConfigRaw {
        environment: "development".to_string(),
        logger: LoggerConfig {
            level: "info,dkg_publisher=debug,dkg_blockchain=debug,dkg_node_client=debug"
                .to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: telemetry(false),
        http_api: http_api(),
        node: node("http://localhost:8900"),
        // Local nodes do not run finalization.
        publish: publish("hardhat1:31337", 0),
        queue: queue(),
        blockchain: blockchain(
            "hardhat1:31337",
            "0x5FbDB2315678afecb367f032d93F642f64180aa3",
            &["http://localhost:8545"],
            1,
        ),
    }
}

fn testnet() -> ConfigRaw {
    ConfigRaw {
        environment: "testnet".to_string(),
        logger: LoggerConfig {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        },
        telemetry: telemetry(true),
        http_api: http_api(),
        node: node("https://v6-pegasus-node-02.origin-trail.network:8900"),
        publish: publish("otp:20430", 3),
        queue: queue(),
        blockchain: blockchain(
            "otp:20430",
            "0xe233b5b78853a62b1e11ebe88bf083e25b0a57a6",
            &[
                "https://lofar-testnet.origin-trail.network",
                "https://lofar-testnet.origintrail.network",
            ],
            1,
        ),
    }
}

fn mainnet() -> ConfigRaw {
    ConfigRaw {
        environment: "mainnet".to_string(),
        logger: LoggerConfig {
            level: "info".to_string(),
            format: LogFormat::Json,
        },
        telemetry: telemetry(true),
        http_api: http_api(),
        node: node("http://localhost:8900"),
        publish: publish("otp:2043", 3),
        queue: queue(),
        blockchain: blockchain(
            "otp:2043",
            "0x0957e25BD33034948abc28204ddA54b6E1142D6F",
            &[
                "https://astrosat-parachain-rpc.origin-trail.network",
                "https://astrosat.origintrail.network/",
                "https://astrosat-2.origintrail.network/",
            ],
            2,
        ),
    }
}
