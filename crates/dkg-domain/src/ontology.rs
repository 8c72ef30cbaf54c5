//! DKG ontology terms used when merging private triples into the public graph.

/// Predicate carrying the merkle root of the private triples.
pub const PRIVATE_MERKLE_ROOT: &str = "https://ontology.origintrail.io/dkg/1.0#privateMerkleRoot";

/// Predicate linking a public subject to a generated private resource node.
pub const REPRESENTS_PRIVATE_RESOURCE: &str =
    "https://ontology.origintrail.io/dkg/1.0#representsPrivateResource";

/// Subject prefix for private subjects that have no public counterpart.
/// Followed by the `0x`-prefixed sha256 of the private subject IRI.
pub const PRIVATE_HASH_SUBJECT_PREFIX: &str =
    "https://ontology.origintrail.io/dkg/1.0#metadata-hash:";

/// IRI scheme for generated node identifiers.
pub const GENERATED_ID_SCHEME: &str = "uuid:";
