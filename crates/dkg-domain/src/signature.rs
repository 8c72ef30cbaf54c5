use alloy::primitives::{B256, Signature, U256};
use serde::{Deserialize, Serialize};

/// A storage node's signature over a dataset root.
///
/// Nodes return both the expanded (`v`, `r`, `s`) and the compact (`r`, `vs`)
/// forms; the ledger consumes the compact one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSignature {
    pub identity_id: u128,
    pub v: u8,
    pub r: B256,
    pub s: B256,
    pub vs: B256,
}

impl NodeSignature {
    /// Builds the compact `vs` value: `s` with the top bit set for odd parity.
    pub fn compact_vs(v: u8, s: B256) -> B256 {
        let mut vs = s;
        if y_parity(v) == Some(true) {
            vs.0[0] |= 0x80;
        }
        vs
    }

    /// Converts to an alloy signature for address recovery.
    ///
    /// Returns `None` when `v` is not one of 0, 1, 27 or 28.
    pub fn to_signature(&self) -> Option<Signature> {
        let parity = y_parity(self.v)?;
        Some(Signature::new(
            U256::from_be_bytes(self.r.0),
            U256::from_be_bytes(self.s.0),
            parity,
        ))
    }

    pub fn share(&self) -> SignatureShare {
        SignatureShare {
            identity_id: self.identity_id,
            r: self.r,
            vs: self.vs,
        }
    }
}

fn y_parity(v: u8) -> Option<bool> {
    match v {
        0 | 27 => Some(false),
        1 | 28 => Some(true),
        _ => None,
    }
}

/// Signature share accepted for on-chain registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureShare {
    pub identity_id: u128,
    pub r: B256,
    pub vs: B256,
}
