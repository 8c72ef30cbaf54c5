use std::collections::HashMap;

use alloy::{hex, primitives::B256};
use dkg_domain::{
    BillingParams, BlockchainId, Dataset, calculate_dataset_size, calculate_merkle_root,
    ontology::{PRIVATE_HASH_SUBJECT_PREFIX, PRIVATE_MERKLE_ROOT, REPRESENTS_PRIVATE_RESOURCE},
};
use oxigraph::model::Quad;
use sha2::{Digest, Sha256};

use crate::{
    Content, DatasetError, IdGenerator, RandomIdGenerator, TripleSource, json_ld,
    rdf::{
        IdIssuer, extract_subject, group_by_subject, insert_sorted, parse_quads,
        replace_blank_nodes, serialize_quad,
    },
};

pub const DEFAULT_MAX_DATASET_SIZE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub blockchain: BlockchainId,
    pub billing: BillingParams,
    pub max_dataset_size_bytes: u64,
}

impl BuildOptions {
    pub fn new(blockchain: BlockchainId, billing: BillingParams) -> Self {
        Self {
            blockchain,
            billing,
            max_dataset_size_bytes: DEFAULT_MAX_DATASET_SIZE_BYTES,
        }
    }
}

/// A dataset ready to be submitted to the storage network.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub dataset: Dataset,
    pub dataset_root: B256,
    pub private_root: Option<B256>,
    pub dataset_size: u64,
    pub knowledge_assets_amount: u64,
    pub blockchain: BlockchainId,
    pub billing: BillingParams,
}

/// Turns submitted content into a partitioned, merkle-rooted dataset.
///
/// Private triples stay in `dataset.private`. The public part gains one triple
/// holding the private root and one pointer per private subject: attached to the
/// matching public subject when there is one, otherwise under a
/// `metadata-hash:` placeholder subject derived from the private subject IRI.
#[derive(Debug, Clone)]
pub struct DatasetBuilder {
    options: BuildOptions,
}

impl DatasetBuilder {
    pub fn new(options: BuildOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &BuildOptions {
        &self.options
    }

    pub fn build(&self, content: &Content) -> Result<PreparedDataset, DatasetError> {
        self.build_with_ids(content, &mut RandomIdGenerator)
    }

    pub fn build_with_ids(
        &self,
        content: &Content,
        ids: &mut dyn IdGenerator,
    ) -> Result<PreparedDataset, DatasetError> {
        let public_quads = match &content.public {
            Some(source) => parse_source(source)?,
            None => Vec::new(),
        };
        if public_quads.is_empty() {
            return Err(DatasetError::validation("public content contains no triples"));
        }
        let private_quads = match &content.private {
            Some(source) => parse_source(source)?,
            None => Vec::new(),
        };

        let mut issuer = IdIssuer::new(ids, [public_quads.as_slice(), private_quads.as_slice()]);
        let public_lines = serialize_all(replace_blank_nodes(public_quads, &mut issuer))?;
        let private_lines = serialize_all(replace_blank_nodes(private_quads, &mut issuer))?;

        let mut public_groups = group_by_subject(public_lines);
        let mut private_root = None;
        let mut private = None;

        if !private_lines.is_empty() {
            let private_groups = group_by_subject(private_lines);
            let private_flat = private_groups.concat();
            let root = calculate_merkle_root(&private_flat)
                .ok_or_else(|| DatasetError::validation("private content contains no triples"))?;

            public_groups.push(vec![format!(
                "<{}> <{PRIVATE_MERKLE_ROOT}> \"{root}\" .",
                issuer.issue()
            )]);

            let public_index: HashMap<String, usize> = public_groups
                .iter()
                .enumerate()
                .filter_map(|(idx, group)| {
                    let subject = extract_subject(group.first()?)?;
                    Some((subject.to_string(), idx))
                })
                .collect();

            let mut placeholders: Vec<(String, String)> = Vec::new();
            for group in &private_groups {
                let Some(subject) = group.first().and_then(|line| extract_subject(line)) else {
                    continue;
                };
                let pointer = issuer.issue();

                match public_index.get(subject) {
                    Some(&idx) => insert_sorted(
                        &mut public_groups[idx],
                        format!("{subject} <{REPRESENTS_PRIVATE_RESOURCE}> <{pointer}> ."),
                    ),
                    None => {
                        let hash = subject_hash(subject);
                        let line = format!(
                            "<{PRIVATE_HASH_SUBJECT_PREFIX}{hash}> <{REPRESENTS_PRIVATE_RESOURCE}> <{pointer}> ."
                        );
                        let position = placeholders.partition_point(|(existing, _)| *existing < hash);
                        placeholders.insert(position, (hash, line));
                    }
                }
            }

            public_groups.extend(placeholders.into_iter().map(|(_, line)| vec![line]));
            private_root = Some(root);
            private = Some(private_flat);
        }

        let knowledge_assets_amount = public_groups.len() as u64;
        let public = public_groups.concat();

        let dataset_size = calculate_dataset_size(&public);
        if dataset_size > self.options.max_dataset_size_bytes {
            return Err(DatasetError::SizeLimitExceeded {
                size: dataset_size,
                limit: self.options.max_dataset_size_bytes,
            });
        }

        let dataset_root = calculate_merkle_root(&public)
            .ok_or_else(|| DatasetError::validation("public content contains no triples"))?;

        tracing::debug!(
            blockchain = %self.options.blockchain,
            public_triples = public.len(),
            private_triples = private.as_ref().map_or(0, Vec::len),
            dataset_size,
            knowledge_assets_amount,
            "Dataset prepared"
        );

        Ok(PreparedDataset {
            dataset: Dataset::new(public, private),
            dataset_root,
            private_root,
            dataset_size,
            knowledge_assets_amount,
            blockchain: self.options.blockchain.clone(),
            billing: self.options.billing.clone(),
        })
    }
}

fn parse_source(source: &TripleSource) -> Result<Vec<Quad>, DatasetError> {
    match source {
        TripleSource::NQuads(text) => parse_quads(text),
        TripleSource::Lines(lines) => parse_quads(&lines.join("\n")),
        TripleSource::JsonLd(document) => json_ld::parse_json_ld(document),
    }
}

fn serialize_all(quads: Vec<Quad>) -> Result<Vec<String>, DatasetError> {
    quads.iter().map(serialize_quad).collect()
}

/// `0x`-prefixed sha256 of a subject IRI, brackets stripped.
fn subject_hash(subject: &str) -> String {
    let iri = subject.trim_start_matches('<').trim_end_matches('>');
    hex::encode_prefixed(Sha256::digest(iri.as_bytes()))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::SeededIdGenerator;

    struct FixedIds(Vec<Uuid>);

    impl IdGenerator for FixedIds {
        fn next_uuid(&mut self) -> Uuid {
            self.0.remove(0)
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn builder() -> DatasetBuilder {
        DatasetBuilder::new(BuildOptions::new(
            BlockchainId::from("hardhat1:31337"),
            BillingParams {
                epochs: 2,
                token_amount: None,
                immutable: false,
                minimum_replications: 1,
            },
        ))
    }

    fn us_cities() -> Content {
        Content::with_private(
            TripleSource::Lines(lines(&[
                "<urn:us-cities:info:new-york> <http://schema.org/area> \"468.9 sq mi\" .",
                "<urn:us-cities:info:new-york> <http://schema.org/name> \"New York\" .",
                "<urn:us-cities:info:new-york> <http://schema.org/population> \"8,336,817\" .",
                "<urn:us-cities:info:new-york> <http://schema.org/state> \"New York\" .",
                "<urn:us-cities:info:new-york> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/City> .",
            ])),
            TripleSource::Lines(lines(&[
                "<urn:us-cities:data:new-york> <http://schema.org/averageIncome> \"$63,998\" .",
                "<urn:us-cities:data:new-york> <http://schema.org/crimeRate> \"Low\" .",
                "<urn:us-cities:data:new-york> <http://schema.org/infrastructureScore> \"8.5\" .",
                "<urn:us-cities:data:new-york> <http://schema.org/relatedCities> <urn:us-cities:info:chicago> .",
                "<urn:us-cities:data:new-york> <http://schema.org/relatedCities> <urn:us-cities:info:los-angeles> .",
                "<urn:us-cities:data:new-york> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/CityPrivateData> .",
                "<urn:us-cities:info:chicago> <http://schema.org/name> \"Chicago\" .",
                "<urn:us-cities:info:los-angeles> <http://schema.org/name> \"Los Angeles\" .",
            ])),
        )
    }

    #[test]
    fn private_content_matches_known_public_root() {
        let mut ids = FixedIds(vec![
            Uuid::parse_str("1e91a527-a3ef-430e-819e-64710ab0f797").unwrap(),
            Uuid::parse_str("88a388be-5822-49e9-8663-8820e02707ab").unwrap(),
            Uuid::parse_str("b88ffefd-ce8e-42fb-8a49-7b91d77c71bf").unwrap(),
            Uuid::parse_str("dcb5abcf-66c4-4e63-9dbe-db9da20cb22a").unwrap(),
        ]);

        let prepared = builder().build_with_ids(&us_cities(), &mut ids).unwrap();

        assert_eq!(
            prepared.private_root.unwrap().to_string(),
            "0xaac2a420672a1eb77506c544ff01beed2be58c0ee3576fe037c846f97481cefd"
        );
        assert_eq!(
            prepared.dataset.public[5..],
            lines(&[
                "<uuid:1e91a527-a3ef-430e-819e-64710ab0f797> <https://ontology.origintrail.io/dkg/1.0#privateMerkleRoot> \"0xaac2a420672a1eb77506c544ff01beed2be58c0ee3576fe037c846f97481cefd\" .",
                "<https://ontology.origintrail.io/dkg/1.0#metadata-hash:0x5cb6421dd41c7a62a84c223779303919e7293753d8a1f6f49da2e598013fe652> <https://ontology.origintrail.io/dkg/1.0#representsPrivateResource> <uuid:b88ffefd-ce8e-42fb-8a49-7b91d77c71bf> .",
                "<https://ontology.origintrail.io/dkg/1.0#metadata-hash:0x6a2292b30c844d2f8f2910bf11770496a3a79d5a6726d1b2fd3ddd18e09b5850> <https://ontology.origintrail.io/dkg/1.0#representsPrivateResource> <uuid:88a388be-5822-49e9-8663-8820e02707ab> .",
                "<https://ontology.origintrail.io/dkg/1.0#metadata-hash:0xc1f682b783b1b93c9d5386eb1730c9647cf4b55925ec24f5e949e7457ba7bfac> <https://ontology.origintrail.io/dkg/1.0#representsPrivateResource> <uuid:dcb5abcf-66c4-4e63-9dbe-db9da20cb22a> .",
            ])[..]
        );
        assert_eq!(
            prepared.dataset_root.to_string(),
            "0x66ca3160277b181d0307262a0127f5f570f1d8c1b3276e8fe3b0e19ba8edcc35"
        );
        assert_eq!(prepared.knowledge_assets_amount, 5);
        assert_eq!(prepared.dataset.private.as_ref().map(Vec::len), Some(8));
        assert_eq!(prepared.dataset_size, calculate_dataset_size(&prepared.dataset.public));
    }

    #[test]
    fn shared_subject_gets_pointer_in_its_group() {
        let content = Content::with_private(
            TripleSource::NQuads("<urn:a> <urn:p> \"public\" .\n<urn:b> <urn:p> \"other\" .".into()),
            TripleSource::NQuads("<urn:a> <urn:secret> \"hidden\" .".into()),
        );

        let prepared = builder()
            .build_with_ids(&content, &mut SeededIdGenerator::new(1))
            .unwrap();
        let public = &prepared.dataset.public;

        assert!(public[0].starts_with("<urn:a> <https://ontology.origintrail.io/dkg/1.0#representsPrivateResource> <uuid:"));
        assert_eq!(public[1], "<urn:a> <urn:p> \"public\" .");
        assert_eq!(public[2], "<urn:b> <urn:p> \"other\" .");
        assert!(public[3].contains("#privateMerkleRoot"));
        assert!(!public.iter().any(|line| line.contains("metadata-hash")));
        assert_eq!(public.len(), 4);
        assert_eq!(prepared.knowledge_assets_amount, 3);
    }

    #[test]
    fn every_input_triple_lands_in_its_part() {
        let public_input = lines(&["<urn:x> <urn:p> \"1\" .", "<urn:y> <urn:p> \"2\" ."]);
        let private_input = lines(&["<urn:y> <urn:q> \"3\" .", "<urn:z> <urn:q> \"4\" ."]);
        let content = Content::with_private(
            TripleSource::Lines(public_input.clone()),
            TripleSource::Lines(private_input.clone()),
        );

        let prepared = builder().build(&content).unwrap();
        let private = prepared.dataset.private.unwrap();

        for line in &public_input {
            assert!(prepared.dataset.public.contains(line));
            assert!(!private.contains(line));
        }
        for line in &private_input {
            assert!(private.contains(line));
            assert!(!prepared.dataset.public.contains(line));
        }
        let placeholders = prepared
            .dataset
            .public
            .iter()
            .filter(|line| line.contains("metadata-hash"))
            .count();
        assert_eq!(placeholders, 1);
    }

    #[test]
    fn seeded_ids_make_builds_reproducible() {
        let content = Content::with_private(
            TripleSource::NQuads("_:root <urn:p> _:child .\n_:child <urn:p> \"x\" .".into()),
            TripleSource::NQuads("_:root <urn:q> \"y\" .".into()),
        );

        let first = builder()
            .build_with_ids(&content, &mut SeededIdGenerator::new(42))
            .unwrap();
        let second = builder()
            .build_with_ids(&content, &mut SeededIdGenerator::new(42))
            .unwrap();
        let other = builder()
            .build_with_ids(&content, &mut SeededIdGenerator::new(43))
            .unwrap();

        assert_eq!(first.dataset, second.dataset);
        assert_eq!(first.dataset_root, second.dataset_root);
        assert_ne!(first.dataset_root, other.dataset_root);
    }

    #[test]
    fn blank_nodes_are_scoped_per_part() {
        let content = Content::with_private(
            TripleSource::NQuads("_:b0 <urn:p> _:b1 .\n_:b1 <urn:p> \"x\" .".into()),
            TripleSource::NQuads("_:b0 <urn:q> \"y\" .".into()),
        );

        let prepared = builder()
            .build_with_ids(&content, &mut SeededIdGenerator::new(7))
            .unwrap();
        let public = &prepared.dataset.public;
        let private = prepared.dataset.private.as_ref().unwrap();

        assert!(public.iter().chain(private).all(|line| !line.contains("_:")));

        let linking = public
            .iter()
            .find(|line| line.contains("<urn:p> <uuid:"))
            .unwrap();
        let parent = extract_subject(linking).unwrap();
        let child = linking
            .split_whitespace()
            .nth(2)
            .unwrap();
        assert!(public.iter().any(|line| line.starts_with(child)));
        assert_ne!(parent, child);
        assert_ne!(extract_subject(&private[0]).unwrap(), parent);
        // The private node shares no public subject, so it is reached via a placeholder.
        assert!(public.iter().any(|line| line.contains("metadata-hash")));
    }

    #[test]
    fn json_ld_content_is_converted() {
        let content: Content = serde_json::from_value(json!({
            "public": {
                "@context": "https://www.schema.org",
                "@id": "urn:first-dkg-ka:info:hello-dkg",
                "@type": "CreativeWork",
                "name": "Hello DKG"
            },
            "private": {
                "@context": "https://www.schema.org",
                "@id": "urn:first-dkg-ka:info:hello-dkg",
                "secret": "only on my node"
            }
        }))
        .unwrap();

        let prepared = builder().build(&content).unwrap();

        assert!(prepared.dataset.public.contains(
            &"<urn:first-dkg-ka:info:hello-dkg> <http://schema.org/name> \"Hello DKG\" .".to_string()
        ));
        assert_eq!(
            prepared.dataset.private,
            Some(lines(&[
                "<urn:first-dkg-ka:info:hello-dkg> <http://schema.org/secret> \"only on my node\" ."
            ]))
        );
        assert_eq!(prepared.knowledge_assets_amount, 2);
    }

    #[test]
    fn oversized_dataset_is_rejected() {
        let mut builder = builder();
        builder.options.max_dataset_size_bytes = 64;
        let content = Content::public(TripleSource::NQuads(
            "<urn:a> <urn:p> \"a literal long enough to pass sixty four bytes\" .".into(),
        ));

        assert!(matches!(
            builder.build(&content),
            Err(DatasetError::SizeLimitExceeded { size: 96, limit: 64 })
        ));
    }

    #[test]
    fn invalid_or_empty_content_is_rejected() {
        let invalid = Content::public(TripleSource::NQuads("<urn:a> <urn:p> .".into()));
        assert!(matches!(builder().build(&invalid), Err(DatasetError::Validation(_))));

        let empty = Content::public(TripleSource::Lines(Vec::new()));
        assert!(matches!(builder().build(&empty), Err(DatasetError::Validation(_))));

        let private_only = Content {
            public: None,
            private: Some(TripleSource::NQuads("<urn:a> <urn:p> \"x\" .".into())),
        };
        assert!(matches!(builder().build(&private_only), Err(DatasetError::Validation(_))));
    }
}
