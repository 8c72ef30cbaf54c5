use std::sync::Arc;

use crate::{
    bootstrap::CoreBootstrap,
    periodic_tasks::{LedgerRegistrationDeps, NodePublishDeps, PeriodicTasksDeps},
};

pub(crate) fn build_periodic_tasks_deps(core: &CoreBootstrap) -> PeriodicTasksDeps {
    let queue_config = &core.config.queue;

    PeriodicTasksDeps {
        node_publish: NodePublishDeps {
            queue_state: Arc::clone(&core.queue_state),
            publisher: core.publish_pipeline.clone(),
            interval: queue_config.stage_a_interval(),
        },
        ledger_registration: LedgerRegistrationDeps {
            queue_state: Arc::clone(&core.queue_state),
            registrar: core.registration_service.clone(),
            failure_policy: queue_config.registration_failure_policy,
            interval: queue_config.stage_b_interval(),
        },
    }
}
