//! Two-stage hand-off between node publishing and batched ledger registration.

mod config;
mod stages;
mod state;

pub(crate) use config::{QueueConfig, RegistrationFailurePolicy};
pub(crate) use stages::{
    AssetPublisher, BatchRegistrar, LedgerRegistrationStage, NodePublishStage, TickOutcome,
};
pub(crate) use state::{QueueDepths, QueueHandle, QueueState};
