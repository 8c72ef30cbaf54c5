//! JSON-LD records to quads through oxigraph's JSON-LD parser.
//!
//! Remote contexts are never fetched. The schema.org context resolves to a local
//! document carrying its vocabulary mapping; any other remote context is an error.

use std::error::Error;

use oxigraph::{
    io::{JsonLdProfile, JsonLdProfileSet, LoadedDocument, RdfFormat, RdfParser},
    model::Quad,
};
use serde_json::Value;

use crate::DatasetError;

const SCHEMA_ORG_CONTEXT: &[u8] =
    br#"{"@context":{"@vocab":"http://schema.org/","schema":"http://schema.org/"}}"#;

pub(crate) fn parse_json_ld(document: &Value) -> Result<Vec<Quad>, DatasetError> {
    let bytes = serde_json::to_vec(document)
        .map_err(|e| DatasetError::validation(format!("invalid JSON-LD: {e}")))?;

    // Labels are renamed so user-written blank nodes never meet generated ones.
    RdfParser::from_format(RdfFormat::JsonLd {
        profile: JsonLdProfileSet::empty(),
    })
    .rename_blank_nodes()
    .for_slice(&bytes)
    .with_document_loader(load_context)
    .map(|parsed| parsed.map_err(|e| DatasetError::validation(format!("invalid JSON-LD: {e}"))))
    .collect()
}

fn load_context(url: &str) -> Result<LoadedDocument, Box<dyn Error + Send + Sync>> {
    if !is_schema_org(url) {
        return Err(format!("remote context {url} cannot be loaded").into());
    }

    Ok(LoadedDocument {
        url: url.to_string(),
        content: SCHEMA_ORG_CONTEXT.to_vec(),
        format: RdfFormat::JsonLd {
            profile: JsonLdProfile::Context.into(),
        },
    })
}

fn is_schema_org(url: &str) -> bool {
    let Some((scheme, rest)) = url.split_once("://") else {
        return false;
    };
    let host = rest.trim_end_matches('/');
    matches!(scheme, "http" | "https") && matches!(host, "schema.org" | "www.schema.org")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::HashSet;

    use serde_json::json;

    use super::*;
    use crate::rdf::{extract_subject, serialize_quad};

    const SCHEMA_NAME: &str = "<http://schema.org/name>";
    const RDF_FIRST: &str = "<http://www.w3.org/1999/02/22-rdf-syntax-ns#first>";

    fn lines(document: Value) -> Vec<String> {
        parse_json_ld(&document)
            .unwrap()
            .iter()
            .map(|quad| serialize_quad(quad).unwrap())
            .collect()
    }

    fn object_of<'a>(lines: &'a [String], predicate: &str) -> &'a str {
        lines
            .iter()
            .find(|line| line.contains(predicate))
            .and_then(|line| line.split_whitespace().nth(2))
            .unwrap()
    }

    #[test]
    fn converts_schema_org_record() {
        let lines: HashSet<String> = lines(json!({
            "@context": "https://www.schema.org",
            "@id": "urn:first-dkg-ka:info:hello-dkg",
            "@type": "CreativeWork",
            "name": "Hello DKG",
            "description": "My first Knowledge Asset"
        }))
        .into_iter()
        .collect();

        let expected: HashSet<String> = [
            "<urn:first-dkg-ka:info:hello-dkg> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/CreativeWork> .",
            "<urn:first-dkg-ka:info:hello-dkg> <http://schema.org/description> \"My first Knowledge Asset\" .",
            "<urn:first-dkg-ka:info:hello-dkg> <http://schema.org/name> \"Hello DKG\" .",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        assert_eq!(lines, expected);
    }

    #[test]
    fn nested_objects_become_blank_nodes() {
        let lines = lines(json!({
            "@context": "https://schema.org",
            "@id": "urn:token:0xabc",
            "additionalProperty": {
                "@type": "PropertyValue",
                "name": "holders",
                "value": 120
            }
        }));

        let node = object_of(&lines, "<http://schema.org/additionalProperty>");
        assert!(node.starts_with("_:"));
        assert!(lines.contains(&format!(
            "{node} <http://schema.org/value> \"120\"^^<http://www.w3.org/2001/XMLSchema#integer> ."
        )));
        assert!(lines.contains(&format!(
            "{node} <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://schema.org/PropertyValue> ."
        )));
    }

    #[test]
    fn written_blank_node_labels_stay_distinct_from_anonymous_nodes() {
        let lines = lines(json!({
            "@context": {"@vocab": "http://schema.org/"},
            "@id": "urn:a",
            "knows": {"name": "nested anonymous"},
            "owner": {"@id": "_:genid0", "name": "explicit blank"}
        }));

        let named: HashSet<&str> = lines
            .iter()
            .filter(|line| line.contains(SCHEMA_NAME))
            .filter_map(|line| extract_subject(line))
            .collect();
        assert_eq!(named.len(), 2);
        assert_ne!(
            object_of(&lines, "<http://schema.org/knows>"),
            object_of(&lines, "<http://schema.org/owner>")
        );
    }

    #[test]
    fn list_values_become_rdf_collections() {
        let lines = lines(json!({
            "@context": {"@vocab": "http://schema.org/"},
            "@id": "urn:a",
            "itemListElement": {"@list": ["x", "y"]}
        }));

        let firsts: Vec<&String> = lines.iter().filter(|line| line.contains(RDF_FIRST)).collect();
        assert_eq!(firsts.len(), 2);
        assert!(firsts.iter().any(|line| line.ends_with("\"x\" .")));
        assert!(firsts.iter().any(|line| line.ends_with("\"y\" .")));
    }

    #[test]
    fn object_context_expands_prefixes_and_coerces_ids() {
        let lines: HashSet<String> = lines(json!({
            "@context": {
                "schema": "http://schema.org/",
                "owner": {"@id": "schema:owner", "@type": "@id"}
            },
            "@id": "urn:account:1",
            "schema:name": {"@value": "Treasury", "@language": "en"},
            "owner": "urn:account:2"
        }))
        .into_iter()
        .collect();

        assert!(lines.contains("<urn:account:1> <http://schema.org/owner> <urn:account:2> ."));
        assert!(lines.contains("<urn:account:1> <http://schema.org/name> \"Treasury\"@en ."));
    }

    #[test]
    fn graph_documents_emit_every_node() {
        let lines = lines(json!({
            "@context": "https://schema.org",
            "@graph": [
                {"@id": "urn:a", "name": "A"},
                {"@id": "urn:b", "name": "B"}
            ]
        }));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn unknown_remote_context_is_rejected() {
        let result = parse_json_ld(&json!({
            "@context": "https://example.org/context.jsonld",
            "@id": "urn:x",
            "name": "x"
        }));
        assert!(matches!(result, Err(DatasetError::Validation(_))));
    }

    #[test]
    fn only_schema_org_contexts_resolve_locally() {
        assert!(is_schema_org("https://schema.org"));
        assert!(is_schema_org("http://www.schema.org/"));
        assert!(!is_schema_org("https://schema.org.evil.example"));
        assert!(!is_schema_org("schema.org"));
    }
}
