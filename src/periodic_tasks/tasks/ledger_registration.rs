use std::time::{Duration, Instant};

use dkg_observability::{record_task_run, record_task_skipped};
use tokio_util::sync::CancellationToken;

use crate::{
    periodic_tasks::{LedgerRegistrationDeps, runner::run_with_shutdown},
    queue::{LedgerRegistrationStage, TickOutcome},
};

const TASK_NAME: &str = "ledger_registration";

/// Stage B timer: registers the accumulated batch once per interval.
pub(crate) struct LedgerRegistrationTask {
    stage: LedgerRegistrationStage,
    interval: Duration,
}

impl LedgerRegistrationTask {
    pub(crate) fn new(deps: LedgerRegistrationDeps) -> Self {
        Self {
            stage: LedgerRegistrationStage::new(
                deps.queue_state,
                deps.registrar,
                deps.failure_policy,
            ),
            interval: deps.interval,
        }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown(TASK_NAME, shutdown, || self.execute()).await;
    }

    #[tracing::instrument(
        name = "periodic_tasks.ledger_registration",
        skip(self),
        fields(
            batch_size = tracing::field::Empty,
            registered = tracing::field::Empty,
        )
    )]
    async fn execute(&self) -> Duration {
        let started = Instant::now();

        match self.stage.tick().await {
            TickOutcome::Processed(summary) => {
                let span = tracing::Span::current();
                span.record("batch_size", summary.items);
                span.record("registered", summary.succeeded);

                let status = if summary.failed > 0 { "failed" } else { "success" };
                record_task_run(TASK_NAME, status, started.elapsed());
            }
            TickOutcome::Skipped => {
                record_task_skipped(TASK_NAME);
                tracing::debug!("Previous registration cycle still running");
            }
        }

        self.interval
    }
}
