//! JSON bodies exchanged with the node API.

use alloy::primitives::B256;
use dkg_domain::{Dataset, NodeSignature};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishRequest {
    pub dataset_root: B256,
    pub dataset: Dataset,
    pub blockchain: String,
    pub hash_function_id: u8,
    pub minimum_number_of_node_replications: u8,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishResponse {
    pub operation_id: Uuid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OperationStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl<'de> Deserialize<'de> for OperationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("COMPLETED") => Self::Completed,
            Some("FAILED") => Self::Failed,
            _ => Self::Pending,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResult {
    #[serde(default)]
    pub status: OperationStatus,
    #[serde(default)]
    pub data: OperationData,
}

impl OperationResult {
    /// A completed operation, or a failed one that still gathered enough acks.
    pub fn is_usable(&self) -> bool {
        self.status == OperationStatus::Completed || self.data.min_acks_reached == Some(true)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationData {
    pub min_acks_reached: Option<bool>,
    pub publisher_node_signature: Option<SignatureData>,
    #[serde(default)]
    pub signatures: Vec<SignatureData>,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

/// Nodes send identity ids either as JSON numbers or as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IdentityIdValue {
    Number(u64),
    Text(String),
}

impl IdentityIdValue {
    fn parse(&self) -> Option<u128> {
        match self {
            Self::Number(value) => Some(u128::from(*value)),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureData {
    pub identity_id: Option<IdentityIdValue>,
    pub v: Option<u8>,
    pub r: Option<String>,
    pub s: Option<String>,
    pub vs: Option<String>,
}

impl SignatureData {
    /// Parses the wire form. `vs` is derived from `v` and `s` when absent.
    pub fn to_node_signature(&self) -> Result<NodeSignature, String> {
        let identity_id = self
            .identity_id
            .as_ref()
            .and_then(IdentityIdValue::parse)
            .ok_or("missing or invalid identityId")?;
        let v = self.v.ok_or("missing v")?;
        let r = parse_word(self.r.as_deref(), "r")?;
        let s = parse_word(self.s.as_deref(), "s")?;
        let vs = match self.vs.as_deref() {
            Some(_) => parse_word(self.vs.as_deref(), "vs")?,
            None => NodeSignature::compact_vs(v, s),
        };

        Ok(NodeSignature {
            identity_id,
            v,
            r,
            s,
            vs,
        })
    }
}

fn parse_word(value: Option<&str>, field: &str) -> Result<B256, String> {
    let value = value.ok_or_else(|| format!("missing {field}"))?;
    value
        .parse::<B256>()
        .map_err(|e| format!("invalid {field} '{value}': {e}"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct FinalityResponse {
    #[serde(default)]
    pub finality: u64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_statuses_are_pending() {
        let result: OperationResult =
            serde_json::from_value(json!({"status": "PUBLISH_REPLICATE_START"})).unwrap();
        assert_eq!(result.status, OperationStatus::Pending);
        assert!(!result.is_usable());

        let result: OperationResult = serde_json::from_value(json!({"status": null})).unwrap();
        assert_eq!(result.status, OperationStatus::Pending);
    }

    #[test]
    fn failed_with_min_acks_is_usable() {
        let result: OperationResult = serde_json::from_value(json!({
            "status": "FAILED",
            "data": {"minAcksReached": true, "signatures": []}
        }))
        .unwrap();
        assert!(result.status.is_terminal());
        assert!(result.is_usable());
    }

    #[test]
    fn parses_signature_with_string_identity() {
        let data: SignatureData = serde_json::from_value(json!({
            "identityId": "42",
            "v": 28,
            "r": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "s": "0x2222222222222222222222222222222222222222222222222222222222222222"
        }))
        .unwrap();

        let signature = data.to_node_signature().unwrap();
        assert_eq!(signature.identity_id, 42);
        assert_eq!(signature.vs.0[0], 0xa2);
    }

    #[test]
    fn rejects_incomplete_signature() {
        let data: SignatureData = serde_json::from_value(json!({
            "identityId": 7,
            "v": 27,
            "r": "0x11"
        }))
        .unwrap();
        assert!(data.to_node_signature().is_err());
    }

    #[test]
    fn publish_request_uses_camel_case() {
        let request = PublishRequest {
            dataset_root: B256::ZERO,
            dataset: Dataset::new(vec!["<urn:a> <urn:b> \"c\" .".into()], None),
            blockchain: "otp:20430".into(),
            hash_function_id: 1,
            minimum_number_of_node_replications: 1,
        };

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["hashFunctionId"], 1);
        assert_eq!(body["minimumNumberOfNodeReplications"], 1);
        assert_eq!(body["dataset"]["public"].as_array().unwrap().len(), 1);
        assert!(body["dataset"].get("private").is_none());
        assert!(body["datasetRoot"].as_str().unwrap().starts_with("0x"));
    }
}
