//! N-Quads line helpers: strict parsing, canonical serialization, subject grouping
//! and blank-node replacement.

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
};

use dkg_domain::ontology::GENERATED_ID_SCHEME;
use oxigraph::{
    io::{RdfFormat, RdfParser, RdfSerializer},
    model::{GraphName, NamedNode, NamedOrBlankNode, Quad, Term},
};

use crate::{DatasetError, IdGenerator};

/// Parses an N-Quads document. Any malformed statement fails the whole document.
pub(crate) fn parse_quads(text: &str) -> Result<Vec<Quad>, DatasetError> {
    RdfParser::from_format(RdfFormat::NQuads)
        .for_reader(text.as_bytes())
        .map(|parsed| {
            parsed.map_err(|e| DatasetError::validation(format!("invalid N-Quads: {e}")))
        })
        .collect()
}

pub(crate) fn serialize_quad(quad: &Quad) -> Result<String, DatasetError> {
    let mut serializer = RdfSerializer::from_format(RdfFormat::NQuads).for_writer(Vec::new());
    serializer
        .serialize_quad(quad)
        .map_err(|e| DatasetError::validation(format!("failed to serialize quad: {e}")))?;
    let bytes = serializer
        .finish()
        .map_err(|e| DatasetError::validation(format!("failed to serialize quad: {e}")))?;
    let text = String::from_utf8(bytes)
        .map_err(|e| DatasetError::validation(format!("serialized quad is not UTF-8: {e}")))?;
    Ok(text.trim_end_matches(['\n', '\r']).to_string())
}

/// Subject token of a canonical N-Quads line: `<iri>` or `_:label`.
pub(crate) fn extract_subject(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.starts_with('<') {
        line.find('>').map(|end| &line[..=end])
    } else {
        line.split_whitespace().next()
    }
}

/// Orders strings by UTF-16 code units, as JavaScript's default `Array.sort` does.
pub fn compare_js_default_string_order(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Groups lines by subject. Groups keep first-seen order; lines inside a group
/// are sorted and deduplicated.
pub(crate) fn group_by_subject(lines: Vec<String>) -> Vec<Vec<String>> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let subject = extract_subject(&line).unwrap_or_default().to_string();
        match index.get(&subject) {
            Some(&idx) => groups[idx].push(line),
            None => {
                index.insert(subject, groups.len());
                groups.push(vec![line]);
            }
        }
    }

    for group in &mut groups {
        group.sort_by(|a, b| compare_js_default_string_order(a, b));
        group.dedup();
    }

    groups
}

/// Inserts `line` at its sorted position unless it is already present.
pub(crate) fn insert_sorted(group: &mut Vec<String>, line: String) {
    if let Err(position) =
        group.binary_search_by(|existing| compare_js_default_string_order(existing, &line))
    {
        group.insert(position, line);
    }
}

/// Hands out `uuid:` IRIs that collide neither with IRIs present in the input
/// nor with each other.
pub(crate) struct IdIssuer<'a> {
    generator: &'a mut dyn IdGenerator,
    taken: HashSet<String>,
}

impl<'a> IdIssuer<'a> {
    pub(crate) fn new<'q>(
        generator: &'a mut dyn IdGenerator,
        parts: impl IntoIterator<Item = &'q [Quad]>,
    ) -> Self {
        let mut taken = HashSet::new();
        for quad in parts.into_iter().flatten() {
            if let NamedOrBlankNode::NamedNode(node) = &quad.subject {
                taken.insert(node.as_str().to_string());
            }
            taken.insert(quad.predicate.as_str().to_string());
            if let Term::NamedNode(node) = &quad.object {
                taken.insert(node.as_str().to_string());
            }
            if let GraphName::NamedNode(node) = &quad.graph_name {
                taken.insert(node.as_str().to_string());
            }
        }

        Self { generator, taken }
    }

    /// Returns a fresh IRI without angle brackets.
    pub(crate) fn issue(&mut self) -> String {
        loop {
            let iri = format!("{GENERATED_ID_SCHEME}{}", self.generator.next_uuid());
            if self.taken.insert(iri.clone()) {
                return iri;
            }
            tracing::debug!(%iri, "Generated id already in use, drawing another");
        }
    }
}

/// Replaces every blank node subject and object with a generated IRI. One label
/// maps to one IRI within the given quads.
pub(crate) fn replace_blank_nodes(quads: Vec<Quad>, issuer: &mut IdIssuer<'_>) -> Vec<Quad> {
    let mut labels: HashMap<String, NamedNode> = HashMap::new();
    let mut replaced = Vec::with_capacity(quads.len());

    for mut quad in quads {
        if let NamedOrBlankNode::BlankNode(node) = &quad.subject {
            quad.subject = generated_node(&mut labels, issuer, node.as_str()).into();
        }
        if let Term::BlankNode(node) = &quad.object {
            quad.object = generated_node(&mut labels, issuer, node.as_str()).into();
        }
        replaced.push(quad);
    }

    replaced
}

fn generated_node(
    labels: &mut HashMap<String, NamedNode>,
    issuer: &mut IdIssuer<'_>,
    label: &str,
) -> NamedNode {
    labels
        .entry(label.to_string())
        .or_insert_with(|| NamedNode::new_unchecked(issuer.issue()))
        .clone()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use uuid::Uuid;

    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    struct Sequence(Vec<Uuid>);

    impl IdGenerator for Sequence {
        fn next_uuid(&mut self) -> Uuid {
            self.0.remove(0)
        }
    }

    #[test]
    fn extracts_iri_and_blank_subjects() {
        assert_eq!(
            extract_subject("<http://example.org/s> <http://example.org/p> \"v\" ."),
            Some("<http://example.org/s>")
        );
        assert_eq!(extract_subject("_:b0 <http://example.org/p> \"v\" ."), Some("_:b0"));
    }

    #[test]
    fn groups_keep_first_seen_order_and_sort_inside() {
        let groups = group_by_subject(lines(&[
            "<urn:z> <urn:p2> \"b\" .",
            "<urn:a> <urn:p> \"x\" .",
            "<urn:z> <urn:p1> \"a\" .",
            "<urn:z> <urn:p1> \"a\" .",
        ]));

        assert_eq!(
            groups,
            vec![
                lines(&["<urn:z> <urn:p1> \"a\" .", "<urn:z> <urn:p2> \"b\" ."]),
                lines(&["<urn:a> <urn:p> \"x\" ."]),
            ]
        );
    }

    #[test]
    fn js_order_compares_utf16_code_units() {
        assert_eq!(
            compare_js_default_string_order("a\u{10000}", "a\u{E000}"),
            Ordering::Less
        );
        assert_eq!(compare_js_default_string_order("B", "a"), Ordering::Less);
        assert_eq!(compare_js_default_string_order("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn insert_sorted_skips_duplicates() {
        let mut group = lines(&["<urn:a> <urn:b> \"1\" .", "<urn:a> <urn:d> \"1\" ."]);
        insert_sorted(&mut group, "<urn:a> <urn:c> \"1\" .".to_string());
        insert_sorted(&mut group, "<urn:a> <urn:c> \"1\" .".to_string());
        assert_eq!(group.len(), 3);
        assert_eq!(group[1], "<urn:a> <urn:c> \"1\" .");
    }

    #[test]
    fn strict_parser_rejects_garbage() {
        assert!(parse_quads("<urn:a> <urn:b> .").is_err());
        assert!(parse_quads("not a triple").is_err());
        assert_eq!(parse_quads("<urn:a> <urn:b> \"c\" .\n\n").unwrap().len(), 1);
    }

    #[test]
    fn blank_labels_map_to_one_iri_each() {
        let quads = parse_quads("_:b0 <urn:p> _:b1 .\n_:b1 <urn:p> \"x\" .\n_:b0 <urn:q> \"y\" .")
            .unwrap();
        let mut generator = Sequence(vec![Uuid::from_u128(1), Uuid::from_u128(2)]);
        let mut issuer = IdIssuer::new(&mut generator, [quads.as_slice()]);
        let replaced = replace_blank_nodes(quads, &mut issuer);
        let serialized: Vec<String> = replaced.iter().map(|q| serialize_quad(q).unwrap()).collect();

        assert_eq!(
            serialized,
            lines(&[
                "<uuid:00000000-0000-0000-0000-000000000001> <urn:p> <uuid:00000000-0000-0000-0000-000000000002> .",
                "<uuid:00000000-0000-0000-0000-000000000002> <urn:p> \"x\" .",
                "<uuid:00000000-0000-0000-0000-000000000001> <urn:q> \"y\" .",
            ])
        );
    }

    #[test]
    fn issuer_skips_iris_present_in_input() {
        let quads =
            parse_quads("<uuid:00000000-0000-0000-0000-000000000001> <urn:p> \"x\" .").unwrap();
        let mut generator = Sequence(vec![Uuid::from_u128(1), Uuid::from_u128(1), Uuid::from_u128(2)]);
        let mut issuer = IdIssuer::new(&mut generator, [quads.as_slice()]);

        assert_eq!(issuer.issue(), "uuid:00000000-0000-0000-0000-000000000002");
    }
}
