use alloy::{
    contract::Error as ContractError,
    hex,
    primitives::Bytes,
    sol_types::{SolInterface, decode_revert_reason},
};

use super::contracts::{Hub, KnowledgeCollectionBatch, Token};

fn find_hex_revert(value: &serde_json::Value) -> Option<Bytes> {
    match value {
        serde_json::Value::String(s) => s.parse().ok(),
        serde_json::Value::Object(o) => o.values().find_map(find_hex_revert),
        _ => None,
    }
}

/// Revert data from the error, including RPCs that tuck it into non-standard
/// JSON-RPC error payloads.
fn extract_revert_data(err: &ContractError) -> Option<Bytes> {
    if let Some(data) = err.as_revert_data() {
        return Some(data);
    }

    let ContractError::TransportError(transport) = err else {
        return None;
    };
    let raw = transport.as_error_resp()?.data.as_ref()?.get().trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(raw)
        && let Some(bytes) = find_hex_revert(&value)
    {
        return Some(bytes);
    }

    raw.trim_matches('"').parse().ok()
}

pub(crate) fn decode_revert_data(data: &[u8]) -> String {
    macro_rules! decode_interface {
        ($iface:ty, $name:expr) => {
            if let Ok(decoded) = <$iface as SolInterface>::abi_decode(data) {
                return format!("{}::{:?}", $name, decoded);
            }
        };
    }

    decode_interface!(
        KnowledgeCollectionBatch::KnowledgeCollectionBatchErrors,
        "KnowledgeCollectionBatch"
    );
    decode_interface!(Token::TokenErrors, "Token");
    decode_interface!(Hub::HubErrors, "Hub");

    if let Some(reason) = decode_revert_reason(data) {
        return reason;
    }

    if data.len() >= 4 {
        return format!("Unknown custom error selector 0x{}", hex::encode(&data[..4]));
    }
    format!("Unknown revert data 0x{}", hex::encode(data))
}

pub(crate) fn decode_contract_error(err: &ContractError) -> Option<String> {
    extract_revert_data(err).map(|data| decode_revert_data(&data))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use alloy::{
        primitives::{Address, U256},
        sol_types::{SolError, Revert},
    };

    use super::*;

    #[test]
    fn decodes_known_custom_error() {
        let error = Token::ERC20InsufficientAllowance {
            spender: Address::repeat_byte(0x11),
            allowance: U256::from(5u64),
            needed: U256::from(9u64),
        };
        let decoded = decode_revert_data(&error.abi_encode());
        assert!(decoded.starts_with("Token::ERC20InsufficientAllowance"), "{decoded}");
    }

    #[test]
    fn decodes_plain_revert_reason() {
        let revert = Revert {
            reason: "Not enough signatures".to_string(),
        };
        let decoded = decode_revert_data(&revert.abi_encode());
        assert!(decoded.contains("Not enough signatures"), "{decoded}");
    }

    #[test]
    fn unknown_selector_is_reported_in_hex() {
        assert_eq!(
            decode_revert_data(&[0xde, 0xad, 0xbe, 0xef, 0x00]),
            "Unknown custom error selector 0xdeadbeef"
        );
    }
}
