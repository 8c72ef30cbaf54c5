//! Dataset construction: content parsing, blank-node assignment, private/public
//! partitioning, merkle root and billed size.

mod builder;
mod content;
mod error;
mod ids;
mod json_ld;
mod rdf;

pub use builder::{BuildOptions, DEFAULT_MAX_DATASET_SIZE_BYTES, DatasetBuilder, PreparedDataset};
pub use content::{Content, TripleSource};
pub use error::DatasetError;
pub use ids::{IdGenerator, RandomIdGenerator, SeededIdGenerator};
pub use rdf::compare_js_default_string_order;
