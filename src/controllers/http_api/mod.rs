mod deps;
mod router;
mod v1;

pub(crate) use deps::HttpApiDeps;
pub(crate) use router::{HttpApiConfig, HttpApiRouter};
