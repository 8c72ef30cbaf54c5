use std::{sync::Arc, time::Duration};

use crate::queue::{AssetPublisher, BatchRegistrar, QueueState, RegistrationFailurePolicy};

#[derive(Clone)]
pub(crate) struct NodePublishDeps {
    pub(crate) queue_state: Arc<QueueState>,
    pub(crate) publisher: Arc<dyn AssetPublisher>,
    pub(crate) interval: Duration,
}

#[derive(Clone)]
pub(crate) struct LedgerRegistrationDeps {
    pub(crate) queue_state: Arc<QueueState>,
    pub(crate) registrar: Arc<dyn BatchRegistrar>,
    pub(crate) failure_policy: RegistrationFailurePolicy,
    pub(crate) interval: Duration,
}

#[derive(Clone)]
pub(crate) struct PeriodicTasksDeps {
    pub(crate) node_publish: NodePublishDeps,
    pub(crate) ledger_registration: LedgerRegistrationDeps,
}
