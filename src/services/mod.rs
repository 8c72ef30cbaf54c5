mod attestation;
mod config;
mod finality;
mod pipeline;
mod pricing;
mod publish;
mod registration;
#[cfg(test)]
pub(crate) mod test_support;

pub(crate) use attestation::LedgerAttestation;
pub(crate) use config::{NodeConfig, NodeSettings, PublishConfig, PublishSettings};
pub(crate) use finality::FinalityWatcher;
pub(crate) use pipeline::PublishPipeline;
pub(crate) use publish::{PublishError, PublishService};
pub(crate) use registration::{RegistrationError, RegistrationOutcome, RegistrationService};
