use std::{path::Path, sync::OnceLock};

use clap::{Arg, Command};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::Deserialize;

use super::{Config, ConfigRaw, defaults};
use crate::config::ConfigError;

static CONFIG_ENV: OnceLock<String> = OnceLock::new();

const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize)]
struct EnvironmentConfig {
    environment: Option<String>,
}

/// Returns the environment selected while loading configuration.
pub(crate) fn current_env() -> String {
    CONFIG_ENV
        .get()
        .cloned()
        .expect("configuration environment not initialized")
}

pub(crate) fn initialize_configuration() -> Config {
    load_configuration().expect("Failed to load configuration")
}

fn load_configuration() -> Result<Config, ConfigError> {
    let matches = Command::new("DKG Publisher")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Sets a custom config file (.toml format)"),
        )
        .get_matches();

    let custom_config_path = matches.get_one::<String>("config").map(String::as_str);
    let environment = resolve_environment(custom_config_path)?;
    let _ = CONFIG_ENV.set(environment.clone());

    load_layered(&environment, custom_config_path)?.resolve()
}

/// Merges typed defaults, `config.toml` and the custom file, lowest priority first.
fn load_layered(
    environment: &str,
    custom_config_path: Option<&str>,
) -> Result<ConfigRaw, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(defaults::config_for(environment)?));

    if Path::new(DEFAULT_CONFIG_PATH).exists() {
        figment = figment.merge(Toml::file(DEFAULT_CONFIG_PATH));
    }

    if let Some(config_path) = custom_config_path {
        figment = figment.merge(Toml::file(config_path));
    }

    let config: ConfigRaw = figment.extract().map_err(Box::new)?;
    if config.environment != environment {
        return Err(ConfigError::UnknownEnvironment(format!(
            "config environment '{}' does not match selected '{}'",
            config.environment, environment
        )));
    }

    Ok(config)
}

fn resolve_environment(custom_config_path: Option<&str>) -> Result<String, ConfigError> {
    let config_path = custom_config_path.unwrap_or(DEFAULT_CONFIG_PATH);

    if !Path::new(config_path).exists() {
        return Err(ConfigError::MissingConfig(config_path.to_string()));
    }

    let environment = read_environment_from(config_path).ok_or_else(|| {
        ConfigError::MissingEnvironment(
            "set environment = \"development|testnet|mainnet\" in your config".to_string(),
        )
    })?;

    if !matches!(environment.as_str(), "development" | "testnet" | "mainnet") {
        return Err(ConfigError::UnknownEnvironment(environment));
    }

    Ok(environment)
}

fn read_environment_from(path: &str) -> Option<String> {
    Figment::from(Toml::file(path))
        .extract::<EnvironmentConfig>()
        .ok()
        .and_then(|config| config.environment)
        .map(|environment| environment.trim().to_lowercase())
}
