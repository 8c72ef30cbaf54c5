mod deps;
mod runner;
mod tasks;

pub(crate) use deps::{LedgerRegistrationDeps, NodePublishDeps, PeriodicTasksDeps};
use tasks::{ledger_registration::LedgerRegistrationTask, node_publish::NodePublishTask};
use tokio_util::sync::CancellationToken;

/// Runs both queue stages until `shutdown` is cancelled.
pub(crate) async fn run(deps: PeriodicTasksDeps, shutdown: CancellationToken) {
    let mut set = tokio::task::JoinSet::new();

    set.spawn(NodePublishTask::new(deps.node_publish).run(shutdown.clone()));
    set.spawn(LedgerRegistrationTask::new(deps.ledger_registration).run(shutdown.clone()));

    while let Some(result) = set.join_next().await {
        if let Err(error) = result {
            tracing::error!(error = ?error, "Periodic task panicked");
        }
    }
}
