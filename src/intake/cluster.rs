use dkg_dataset::{Content, DatasetError};
use serde::Deserialize;
use serde_json::{Value, json};

/// Chain label used in record ids when the report does not name one.
pub(crate) const DEFAULT_CHAIN: &str = "ethereum";

const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Output of the address-clustering analyzer.
///
/// A report without a prominent cluster carries no addresses and produces no
/// records.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ClusterReport {
    #[serde(default)]
    pub cluster_id: Option<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
    pub confidence_level: String,
    #[serde(default)]
    pub reasoning: String,
}

impl ClusterReport {
    /// One JSON-LD record per address, in report order.
    pub(crate) fn records(&self, chain: &str) -> Vec<Value> {
        self.addresses
            .iter()
            .map(|address| address.trim())
            .filter(|address| !address.is_empty())
            .map(|address| {
                let address = address.to_lowercase();
                json!({
                    "@context": SCHEMA_CONTEXT,
                    "@id": format!("urn:dkg-publisher:address:{chain}:{address}"),
                    "@type": "Thing",
                    "identifier": address,
                    "description": self.reasoning,
                    "additionalProperty": {
                        "@type": "PropertyValue",
                        "name": "confidence_level",
                        "value": self.confidence_level,
                    },
                })
            })
            .collect()
    }

    /// Records wrapped as public-only content, ready for the queue.
    pub(crate) fn into_contents(self, chain: &str) -> Result<Vec<Content>, DatasetError> {
        self.records(chain)
            .into_iter()
            .map(Content::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use dkg_dataset::TripleSource;

    use super::*;

    fn report() -> ClusterReport {
        serde_json::from_value(json!({
            "cluster_id": "RugPull_Trading_Cluster_1",
            "addresses": [
                "0x3A886701987F64BFFD3613B52CE1C03209D838BA",
                "0x610d60e5f2754d2c4f3de517cbe3cbe17ba58e9a"
            ],
            "confidence_level": "High",
            "reasoning": "Cluster is linked to initial token source/minter."
        }))
        .unwrap()
    }

    #[test]
    fn each_address_becomes_a_schema_org_thing() {
        let records = report().records("base:8453");

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first["@context"], SCHEMA_CONTEXT);
        assert_eq!(
            first["@id"],
            "urn:dkg-publisher:address:base:8453:0x3a886701987f64bffd3613b52ce1c03209d838ba"
        );
        assert_eq!(first["@type"], "Thing");
        assert_eq!(first["identifier"], "0x3a886701987f64bffd3613b52ce1c03209d838ba");
        assert_eq!(
            first["description"],
            "Cluster is linked to initial token source/minter."
        );
        assert_eq!(first["additionalProperty"]["name"], "confidence_level");
        assert_eq!(first["additionalProperty"]["value"], "High");
    }

    #[test]
    fn report_without_cluster_yields_nothing() {
        let report: ClusterReport = serde_json::from_value(json!({
            "message": "No single prominent rug puller trading cluster identified with high confidence.",
            "confidence_level": "None"
        }))
        .unwrap();

        assert!(report.records(DEFAULT_CHAIN).is_empty());
    }

    #[test]
    fn records_convert_to_public_json_ld_content() {
        let contents = report().into_contents(DEFAULT_CHAIN).unwrap();

        assert_eq!(contents.len(), 2);
        assert!(contents.iter().all(|c| c.private.is_none()));
        assert!(matches!(contents[0].public, Some(TripleSource::JsonLd(_))));
    }
}
