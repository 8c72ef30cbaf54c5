use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{queue::QueueHandle, services::FinalityWatcher};

// Covers one publish cycle whose in-flight poll is still running.
const PERIODIC_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(60);
const HTTP_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub(super) struct ShutdownContext {
    pub(super) periodic_shutdown: CancellationToken,
    pub(super) periodic_handle: JoinHandle<()>,
    pub(super) http_shutdown_tx: tokio::sync::oneshot::Sender<()>,
    pub(super) handle_http_events_task: JoinHandle<()>,
    pub(super) queue: QueueHandle,
    pub(super) finality_watcher: Arc<FinalityWatcher>,
}

/// Stops intake first so nothing new lands in the queue, then lets the
/// periodic stages finish their current cycle.
pub(super) async fn graceful_shutdown(context: ShutdownContext) {
    let ShutdownContext {
        periodic_shutdown,
        mut periodic_handle,
        http_shutdown_tx,
        mut handle_http_events_task,
        queue,
        finality_watcher,
    } = context;

    tracing::info!("Shutting down gracefully...");

    let _ = http_shutdown_tx.send(());

    periodic_shutdown.cancel();
    wait_for_shutdown_task(
        "periodic_tasks",
        PERIODIC_SHUTDOWN_TIMEOUT,
        &mut periodic_handle,
        true,
    )
    .await;

    finality_watcher.shutdown().await;
    report_unprocessed(&queue).await;

    wait_for_shutdown_task(
        "http_api",
        HTTP_SHUTDOWN_TIMEOUT,
        &mut handle_http_events_task,
        false,
    )
    .await;

    tracing::info!("Shutdown complete");
}

/// The queue lives in memory only; whatever is still pending is lost on exit.
async fn report_unprocessed(queue: &QueueHandle) {
    let depths = queue.depths().await;
    if depths.stage_a == 0 && depths.stage_b == 0 {
        return;
    }
    tracing::warn!(
        stage_a = depths.stage_a,
        stage_b = depths.stage_b,
        "Discarding unprocessed queue items"
    );
}

async fn wait_for_shutdown_task(
    task: &str,
    timeout: Duration,
    handle: &mut JoinHandle<()>,
    abort_on_timeout: bool,
) {
    match tokio::time::timeout(timeout, &mut *handle).await {
        Ok(Ok(())) => {}
        Ok(Err(error)) => tracing::error!(
            task,
            error = ?error,
            "Shutdown task panicked"
        ),
        Err(_) if abort_on_timeout => {
            tracing::warn!(
                task,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout reached, aborting task"
            );
            handle.abort();
            let _ = handle.await;
        }
        Err(_) => tracing::warn!(
            task,
            timeout_secs = timeout.as_secs(),
            "Shutdown timeout reached"
        ),
    }
}
