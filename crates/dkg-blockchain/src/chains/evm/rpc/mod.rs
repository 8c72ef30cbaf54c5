pub(crate) mod identity;
pub(crate) mod knowledge_collections;
pub(crate) mod pricing;
