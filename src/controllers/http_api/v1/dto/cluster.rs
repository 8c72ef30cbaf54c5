use serde::Deserialize;
use validator::ValidationError;
use validator_derive::Validate;

use crate::intake::ClusterReport;

fn validate_addresses(addresses: &[String]) -> Result<(), ValidationError> {
    let valid = |address: &str| {
        address
            .strip_prefix("0x")
            .is_some_and(|hex| hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()))
    };

    if let Some(bad) = addresses.iter().find(|address| !valid(address.trim())) {
        let mut error = ValidationError::new("address_format");
        error.message = Some(format!("'{bad}' is not a 0x-prefixed 20-byte address").into());
        return Err(error);
    }
    Ok(())
}

/// Validates chain labels such as `ethereum` or `base:8453`.
fn validate_chain(chain: &str) -> Result<(), ValidationError> {
    let valid = !chain.is_empty()
        && chain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == ':' || c == '-' || c == '_');
    if !valid {
        let mut error = ValidationError::new("chain_format");
        error.message = Some("chain may contain only letters, digits, ':', '-' and '_'".into());
        return Err(error);
    }
    Ok(())
}

/// Analyzer output posted as-is, so fields keep their snake_case names.
#[derive(Deserialize, Debug, Validate)]
pub(crate) struct ClusterEnqueueRequest {
    #[serde(default)]
    pub cluster_id: Option<String>,
    #[validate(
        length(min = 1, message = "addresses must contain at least one address"),
        custom(function = "validate_addresses")
    )]
    pub addresses: Vec<String>,
    #[validate(length(min = 1, message = "confidence_level cannot be empty"))]
    pub confidence_level: String,
    #[serde(default)]
    pub reasoning: String,
    #[validate(custom(function = "validate_chain"))]
    #[serde(default)]
    pub chain: Option<String>,
}

impl From<ClusterEnqueueRequest> for ClusterReport {
    fn from(req: ClusterEnqueueRequest) -> Self {
        Self {
            cluster_id: req.cluster_id,
            addresses: req.addresses,
            confidence_level: req.confidence_level,
            reasoning: req.reasoning,
        }
    }
}
