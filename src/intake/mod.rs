//! Adapters that turn upstream analysis output into queueable content.

mod cluster;

pub(crate) use cluster::{ClusterReport, DEFAULT_CHAIN};
