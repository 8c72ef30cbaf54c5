use std::time::{Duration, Instant};

use dkg_observability::{record_task_run, record_task_skipped};
use tokio_util::sync::CancellationToken;

use crate::{
    periodic_tasks::{NodePublishDeps, runner::run_with_shutdown},
    queue::{NodePublishStage, TickOutcome},
};

const TASK_NAME: &str = "node_publish";

/// Stage A timer: publishes every queued content item once per interval.
pub(crate) struct NodePublishTask {
    stage: NodePublishStage,
    interval: Duration,
}

impl NodePublishTask {
    pub(crate) fn new(deps: NodePublishDeps) -> Self {
        Self {
            stage: NodePublishStage::new(deps.queue_state, deps.publisher),
            interval: deps.interval,
        }
    }

    pub(crate) async fn run(self, shutdown: CancellationToken) {
        run_with_shutdown(TASK_NAME, shutdown, || self.execute()).await;
    }

    #[tracing::instrument(
        name = "periodic_tasks.node_publish",
        skip(self),
        fields(
            items = tracing::field::Empty,
            published = tracing::field::Empty,
            failed = tracing::field::Empty,
        )
    )]
    async fn execute(&self) -> Duration {
        let started = Instant::now();

        match self.stage.tick().await {
            TickOutcome::Processed(summary) => {
                let span = tracing::Span::current();
                span.record("items", summary.items);
                span.record("published", summary.succeeded);
                span.record("failed", summary.failed);

                let status = if summary.failed > 0 { "partial" } else { "success" };
                record_task_run(TASK_NAME, status, started.elapsed());

                if summary.items > 0 {
                    tracing::info!(
                        items = summary.items,
                        published = summary.succeeded,
                        no_result = summary.items - summary.succeeded - summary.failed,
                        failed = summary.failed,
                        "Node publish cycle finished"
                    );
                }
            }
            TickOutcome::Skipped => {
                record_task_skipped(TASK_NAME);
                tracing::debug!("Previous node publish cycle still running");
            }
        }

        self.interval
    }
}
