use serde::{Deserialize, Serialize};

/// Public triples plus optional private triples, one N-Quads statement per entry.
///
/// Public triples are replicated by the storage network and committed on-chain
/// through their merkle root. Private triples travel only to the publishing node
/// and are represented in `public` by their own root and pointer triples.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub public: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<Vec<String>>,
}

impl Dataset {
    pub fn new(public: Vec<String>, private: Option<Vec<String>>) -> Self {
        Self { public, private }
    }

    pub fn has_private(&self) -> bool {
        self.private.as_ref().is_some_and(|p| !p.is_empty())
    }
}
